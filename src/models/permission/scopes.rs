use crate::models::list_query::ListQuery;

pub const SEARCH_COLUMNS: &[&str] = &["name", "slug"];

/// Permissions whose name or slug contains `term`.
pub fn search(query: ListQuery, term: &str) -> ListQuery {
    query.where_any_contains(SEARCH_COLUMNS, term)
}

pub fn column(key: &str) -> Option<&'static str> {
    match key {
        "id" => Some("permissions.id"),
        "name" => Some("permissions.name"),
        "slug" => Some("permissions.slug"),
        _ => None,
    }
}
