use crate::connection::Connection;

/// Scope-bound transaction discipline for a [`Connection`].
///
/// Construction attempts `begin_transaction` immediately; if that fails the
/// guard is inert for the rest of its life. Going out of scope without an
/// explicit [`commit`](TransactionGuard::commit) rolls the transaction back.
/// The `&mut` borrow gives the guard exclusive use of the connection for
/// its scope; statements inside the transaction go through
/// [`connection`](TransactionGuard::connection).
///
/// ```no_run
/// use sql_conduit::prelude::*;
///
/// # fn demo(conn: &mut Connection) {
/// {
///     let mut guard = TransactionGuard::new(conn);
///     guard.connection().execute("INSERT INTO t VALUES (1)");
///     guard.commit();
/// } // rolled back here if commit() was never reached
/// # }
/// ```
#[derive(Debug)]
pub struct TransactionGuard<'conn> {
    connection: &'conn mut Connection,
    committed: bool,
    active: bool,
}

impl<'conn> TransactionGuard<'conn> {
    /// Begin a transaction on the connection.
    ///
    /// Check [`is_active`](TransactionGuard::is_active) to learn whether the
    /// begin succeeded; on failure the connection's `last_error` has detail.
    pub fn new(connection: &'conn mut Connection) -> Self {
        let active = connection.begin_transaction();
        Self {
            connection,
            committed: false,
            active,
        }
    }

    /// The guarded connection, for executing statements inside the
    /// transaction.
    pub fn connection(&mut self) -> &mut Connection {
        self.connection
    }

    /// Commit the transaction.
    ///
    /// Returns `false` without touching the connection when the guard is
    /// not active or was already committed. A failed commit leaves the
    /// guard active, so the caller may retry or let the drop roll back.
    pub fn commit(&mut self) -> bool {
        if !self.active || self.committed {
            return false;
        }
        if self.connection.commit() {
            self.committed = true;
            true
        } else {
            false
        }
    }

    /// Explicitly roll back the transaction.
    ///
    /// Returns `false` without touching the connection when the guard is
    /// not active or was already committed.
    pub fn rollback(&mut self) -> bool {
        if !self.active || self.committed {
            return false;
        }
        if self.connection.rollback() {
            self.active = false;
            true
        } else {
            false
        }
    }

    /// Whether the transaction is still open (begun, not yet committed or
    /// rolled back).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active && !self.committed
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.active && !self.committed {
            // Implicit cleanup has no caller to report to; the failure is
            // logged and otherwise swallowed.
            if !self.connection.rollback() {
                tracing::warn!(
                    name = %self.connection.name(),
                    error = %self.connection.last_error(),
                    "rollback on scope exit failed"
                );
            }
        }
    }
}
