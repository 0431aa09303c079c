use crate::models::list_query::ListQuery;

/// Columns matched by the user search box.
pub const SEARCH_COLUMNS: &[&str] = &["name", "email"];

/// Columns the users table may be sorted by.
pub const SORTABLE_COLUMNS: &[&str] = &["name", "email", "created_at", "updated_at", "id"];

/// Users whose name or email contains `term`.
pub fn search(query: ListQuery, term: &str) -> ListQuery {
    query.where_any_contains(SEARCH_COLUMNS, term)
}

pub fn is_sortable(column: &str) -> bool {
    SORTABLE_COLUMNS.contains(&column)
}

/// SQL expression for each logical column. Values are hardcoded SQL, never user input.
pub fn column(key: &str) -> Option<&'static str> {
    match key {
        "id" => Some("users.id"),
        "name" => Some("users.name"),
        "email" => Some("users.email"),
        "created_at" => Some("users.created_at"),
        "updated_at" => Some("users.updated_at"),
        _ => None,
    }
}
