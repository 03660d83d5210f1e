// Materialized query results shared by every backend.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::DbRow;
