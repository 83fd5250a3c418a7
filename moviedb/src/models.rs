use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing catalogue resources.
///
/// # Filtering
/// `filter` is a JSON object:
/// - free text over the text columns: `{"q": "nolan"}`
/// - one value per column: `{"name": "Drama"}` (text columns match substrings)
/// - several values for one column: `{"id": [1, 2, 3]}`
///
/// # Pagination
/// - `range=[0,9]` (inclusive bounds)
/// - `page=1&per_page=10` (1-based)
///
/// Without either the first 10 rows are returned.
///
/// # Sorting
/// - `sort=["name","DESC"]`
/// - `sort_by=name&order=DESC`
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// JSON-encoded filter object.
    #[param(example = json!({"q": "drama", "id": [1, 2]}))]
    pub filter: Option<String>,
    /// Range for pagination in the format "[start, end]".
    #[param(example = "[0,9]")]
    pub range: Option<String>,
    /// Page number (1-based).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page.
    #[param(example = 10)]
    pub per_page: Option<u64>,
    /// Sort as `["column", "ASC"|"DESC"]`, or a bare column name.
    #[param(example = r#"["name", "ASC"]"#)]
    pub sort: Option<String>,
    /// Sort column, takes priority over `sort`.
    #[param(example = "name")]
    pub sort_by: Option<String>,
    /// Sort order for `sort_by` or a bare `sort` (ASC or DESC).
    #[param(example = "ASC")]
    pub order: Option<String>,
}
