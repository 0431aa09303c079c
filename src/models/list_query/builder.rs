// SQL fragments for a ListQuery. Column names never come from user input:
// each entity passes a resolver mapping its logical columns to fixed SQL.

use std::fmt;

use super::{SearchFilter, SortSpec};

/// Maps a logical column name to its SQL expression.
pub type ColumnMap = fn(&str) -> Option<&'static str>;

#[derive(Debug, PartialEq, Eq)]
pub enum BuildError {
    UnknownColumn(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnknownColumn(c) => write!(f, "unknown column '{c}'"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Escape `%`, `_` and `\` so the term matches literally inside a LIKE pattern.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the WHERE fragment for an optional search filter.
/// `param_offset` is the number of `$N` placeholders already used.
pub fn search_clause(
    search: Option<&SearchFilter>,
    columns: ColumnMap,
    param_offset: usize,
) -> Result<(String, Vec<String>), BuildError> {
    let Some(filter) = search else {
        return Ok(("TRUE".to_string(), vec![]));
    };
    let n = param_offset + 1;
    let parts = filter
        .columns
        .iter()
        .map(|c| {
            columns(c)
                .map(|col| format!("{col} ILIKE ${n}"))
                .ok_or_else(|| BuildError::UnknownColumn(c.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if parts.is_empty() {
        return Ok(("TRUE".to_string(), vec![]));
    }
    let pattern = format!("%{}%", escape_like(&filter.term));
    Ok((format!("({})", parts.join(" OR ")), vec![pattern]))
}

/// Build the ORDER BY list. Unknown or missing sort columns fall back to the
/// tiebreak column, which is always appended so pages stay stable.
pub fn order_clause(sort: Option<&SortSpec>, columns: ColumnMap, tiebreak: &'static str) -> String {
    match sort.and_then(|s| columns(&s.column).map(|col| (col, s.dir))) {
        Some((col, dir)) if col == tiebreak => format!("{col} {}", dir.sql()),
        Some((col, dir)) => format!("{col} {}, {tiebreak} ASC", dir.sql()),
        None => format!("{tiebreak} ASC"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::list_query::{ListQuery, SortDir};

    fn cols(key: &str) -> Option<&'static str> {
        match key {
            "name" => Some("users.name"),
            "email" => Some("users.email"),
            "id" => Some("users.id"),
            _ => None,
        }
    }

    #[test]
    fn no_search_is_passthrough() {
        let (sql, params) = search_clause(None, cols, 0).unwrap();
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn search_shares_one_placeholder() {
        let q = ListQuery::new().where_any_contains(&["name", "email"], "ali");
        let (sql, params) = search_clause(q.search.as_ref(), cols, 0).unwrap();
        assert_eq!(sql, "(users.name ILIKE $1 OR users.email ILIKE $1)");
        assert_eq!(params, vec!["%ali%"]);
    }

    #[test]
    fn search_respects_offset() {
        let q = ListQuery::new().where_any_contains(&["name"], "bob");
        let (sql, _) = search_clause(q.search.as_ref(), cols, 2).unwrap();
        assert_eq!(sql, "(users.name ILIKE $3)");
    }

    #[test]
    fn unknown_search_column_is_an_error() {
        let q = ListQuery::new().where_any_contains(&["password"], "x");
        let err = search_clause(q.search.as_ref(), cols, 0).unwrap_err();
        assert_eq!(err, BuildError::UnknownColumn("password".into()));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn order_clause_variants() {
        let q = ListQuery::new().order_by("name", SortDir::Desc);
        assert_eq!(order_clause(q.sort.as_ref(), cols, "users.id"), "users.name DESC, users.id ASC");

        let q = ListQuery::new().order_by("id", SortDir::Desc);
        assert_eq!(order_clause(q.sort.as_ref(), cols, "users.id"), "users.id DESC");

        let q = ListQuery::new().order_by("password; DROP TABLE users", SortDir::Asc);
        assert_eq!(order_clause(q.sort.as_ref(), cols, "users.id"), "users.id ASC");

        assert_eq!(order_clause(None, cols, "users.id"), "users.id ASC");
    }
}
