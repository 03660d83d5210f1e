use crate::error::SqlConduitError;

/// Positional placeholder style of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `SQLite`-style placeholders like `?1`.
    SqliteNumbered,
    /// `PostgreSQL`-style placeholders like `$1`.
    PostgresNumbered,
    /// `MySQL`-style anonymous placeholders, `?`.
    Anonymous,
}

impl PlaceholderStyle {
    fn render(self, index: usize, out: &mut Vec<u8>) {
        match self {
            PlaceholderStyle::SqliteNumbered => {
                out.push(b'?');
                out.extend_from_slice(index.to_string().as_bytes());
            }
            PlaceholderStyle::PostgresNumbered => {
                out.push(b'$');
                out.extend_from_slice(index.to_string().as_bytes());
            }
            PlaceholderStyle::Anonymous => out.push(b'?'),
        }
    }
}

/// A statement template rewritten from named to positional placeholders.
#[derive(Debug, Clone)]
pub struct ExpandedStatement {
    /// The rewritten SQL text.
    pub sql: String,
    /// Parameter names in positional order, one entry per placeholder
    /// occurrence. A name bound twice in the template appears twice.
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
}

fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'-' && bytes.get(idx + 1) == Some(&b'-')
}

fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'/' && bytes.get(idx + 1) == Some(&b'*')
}

fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/')
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn scan_name(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut end = start;
    while end < bytes.len() && is_name_byte(bytes[end]) {
        end += 1;
    }
    if end == start {
        return None;
    }
    // Placeholder names are ASCII, so the slice is valid UTF-8.
    std::str::from_utf8(&bytes[start..end]).ok().map(|s| (end, s))
}

/// Rewrite `:name` placeholders into the backend's positional style.
///
/// Quoted literals (single or double), `--` line comments, and nested
/// `/* */` block comments are skipped; `::` is left alone so `PostgreSQL`
/// casts survive. Dollar-quoted bodies are not recognized; statements using
/// them should avoid `:name` tokens inside the quoted block.
///
/// # Errors
///
/// Returns `SqlConduitError::ParameterError` if a lone `:` is followed by
/// no parameter name outside a literal or comment.
pub fn expand_named_placeholders(
    sql: &str,
    style: PlaceholderStyle,
) -> Result<ExpandedStatement, SqlConduitError> {
    let bytes = sql.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => {
                    state = State::SingleQuoted;
                    out.push(b'\'');
                }
                b'"' => {
                    state = State::DoubleQuoted;
                    out.push(b'"');
                }
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    out.push(b'-');
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    // Consume both opener bytes so the '*' cannot also
                    // match as a terminator.
                    out.extend_from_slice(b"/*");
                    idx += 2;
                    continue;
                }
                b':' => {
                    if bytes.get(idx + 1) == Some(&b':') {
                        // Postgres cast, copy both colons through
                        out.extend_from_slice(b"::");
                        idx += 2;
                        continue;
                    }
                    let Some((end, name)) = scan_name(bytes, idx + 1) else {
                        return Err(SqlConduitError::ParameterError(format!(
                            "expected parameter name after ':' at byte {idx}"
                        )));
                    };
                    names.push(name.to_string());
                    style.render(names.len(), &mut out);
                    idx = end;
                    continue;
                }
                _ => out.push(b),
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        out.extend_from_slice(b"''");
                        idx += 2;
                        continue;
                    }
                    state = State::Normal;
                }
                out.push(b);
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        out.extend_from_slice(b"\"\"");
                        idx += 2;
                        continue;
                    }
                    state = State::Normal;
                }
                out.push(b);
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
                out.push(b);
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    out.extend_from_slice(b"/*");
                    idx += 2;
                    continue;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    out.extend_from_slice(b"*/");
                    idx += 2;
                    continue;
                }
                out.push(b);
            }
        }
        idx += 1;
    }

    // Replacements are ASCII and everything else is copied verbatim, so the
    // buffer stays valid UTF-8.
    let sql = String::from_utf8(out)
        .map_err(|err| SqlConduitError::ParameterError(err.to_string()))?;
    Ok(ExpandedStatement { sql, names })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_to_sqlite_numbered() {
        let expanded = expand_named_placeholders(
            "select * from t where a = :a and b = :b",
            PlaceholderStyle::SqliteNumbered,
        )
        .unwrap();
        assert_eq!(expanded.sql, "select * from t where a = ?1 and b = ?2");
        assert_eq!(expanded.names, vec!["a", "b"]);
    }

    #[test]
    fn expands_to_postgres_numbered() {
        let expanded = expand_named_placeholders(
            "insert into t values(:x, :y)",
            PlaceholderStyle::PostgresNumbered,
        )
        .unwrap();
        assert_eq!(expanded.sql, "insert into t values($1, $2)");
        assert_eq!(expanded.names, vec!["x", "y"]);
    }

    #[test]
    fn expands_to_anonymous() {
        let expanded =
            expand_named_placeholders("update t set a = :a", PlaceholderStyle::Anonymous).unwrap();
        assert_eq!(expanded.sql, "update t set a = ?");
    }

    #[test]
    fn repeated_name_gets_one_slot_per_occurrence() {
        let expanded = expand_named_placeholders(
            "select :v as a, :v as b",
            PlaceholderStyle::SqliteNumbered,
        )
        .unwrap();
        assert_eq!(expanded.sql, "select ?1 as a, ?2 as b");
        assert_eq!(expanded.names, vec!["v", "v"]);
    }

    #[test]
    fn skips_literals_and_comments() {
        let sql = "select ':skip', \":also\" -- :line\n/* :block */ from t where a = :a";
        let expanded =
            expand_named_placeholders(sql, PlaceholderStyle::SqliteNumbered).unwrap();
        assert_eq!(
            expanded.sql,
            "select ':skip', \":also\" -- :line\n/* :block */ from t where a = ?1"
        );
        assert_eq!(expanded.names, vec!["a"]);
    }

    #[test]
    fn comment_opener_cannot_double_as_its_own_terminator() {
        let expanded =
            expand_named_placeholders("a /*/ :x */ b", PlaceholderStyle::SqliteNumbered)
                .unwrap();
        assert_eq!(expanded.sql, "a /*/ :x */ b");
        assert!(expanded.names.is_empty());
    }

    #[test]
    fn nested_block_comments_track_depth() {
        let expanded = expand_named_placeholders(
            "select :a /* outer /* inner */ :b */ from t",
            PlaceholderStyle::SqliteNumbered,
        )
        .unwrap();
        assert_eq!(expanded.sql, "select ?1 /* outer /* inner */ :b */ from t");
        assert_eq!(expanded.names, vec!["a"]);
    }

    #[test]
    fn leaves_postgres_casts_alone() {
        let expanded = expand_named_placeholders(
            "select :a::text from t",
            PlaceholderStyle::PostgresNumbered,
        )
        .unwrap();
        assert_eq!(expanded.sql, "select $1::text from t");
    }

    #[test]
    fn bare_colon_is_an_error() {
        let err =
            expand_named_placeholders("select : from t", PlaceholderStyle::SqliteNumbered)
                .unwrap_err();
        assert!(matches!(err, SqlConduitError::ParameterError(_)));
    }
}
