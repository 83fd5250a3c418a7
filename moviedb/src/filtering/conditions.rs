use sea_orm::{ColumnTrait, Condition, Value};
use serde_json::Map;

use crate::errors::ApiError;
use crate::models::ListParams;

// Basic safety limits
const MAX_FIELD_VALUE_LENGTH: usize = 10_000;
const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 1_000;

/// Basic value length check
const fn validate_field_value(value: &str) -> bool {
    value.len() <= MAX_FIELD_VALUE_LENGTH
}

fn parse_filter_json(filter_str: Option<&str>) -> Result<Map<String, serde_json::Value>, ApiError> {
    match filter_str.map(str::trim) {
        None | Some("") => Ok(Map::new()),
        Some(raw) => serde_json::from_str::<Map<String, serde_json::Value>>(raw)
            .map_err(|_| ApiError::bad_request("filter must be a JSON object")),
    }
}

fn json_to_value(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::String(s) if validate_field_value(s) => Some(s.clone().into()),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_f64().map(Value::from)),
        serde_json::Value::Bool(b) => Some((*b).into()),
        _ => None,
    }
}

/// Free text search across the text columns of a resource.
fn fulltext_condition<C: ColumnTrait + Copy>(
    query: &str,
    columns: &[(&str, C)],
    text_columns: &[&str],
) -> Option<Condition> {
    let query = query.trim();
    if query.is_empty() || !validate_field_value(query) {
        return None;
    }
    let mut any = Condition::any();
    for (name, column) in columns {
        if text_columns.contains(name) {
            any = any.add(column.contains(query));
        }
    }
    Some(any)
}

/// Translate the `filter` JSON object into a sea-orm `Condition`.
///
/// Keys that are not filterable columns are ignored. Text columns listed in
/// `text_columns` match substrings; every other column matches exactly.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` when `filter` is not a JSON object.
pub fn apply_filters<C>(
    filter_str: Option<&str>,
    filterable_columns: &[(&str, C)],
    text_columns: &[&str],
) -> Result<Condition, ApiError>
where
    C: ColumnTrait + Copy,
{
    let filters = parse_filter_json(filter_str)?;
    let mut condition = Condition::all();

    for (key, value) in &filters {
        if key == "q" {
            if let Some(q) = value.as_str() {
                if let Some(search) = fulltext_condition(q, filterable_columns, text_columns) {
                    condition = condition.add(search);
                }
            }
            continue;
        }

        let Some(column) = filterable_columns
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, column)| *column)
        else {
            tracing::debug!(field = %key, "ignoring filter on unknown field");
            continue;
        };

        let filter_condition = match value {
            serde_json::Value::Null => Some(column.is_null()),
            serde_json::Value::String(s) if text_columns.contains(&key.as_str()) => {
                validate_field_value(s).then(|| column.contains(s))
            }
            serde_json::Value::Array(items) => {
                let values: Vec<Value> = items.iter().filter_map(json_to_value).collect();
                (!values.is_empty()).then(|| column.is_in(values))
            }
            scalar => json_to_value(scalar).map(|v| column.eq(v)),
        };

        if let Some(filter_condition) = filter_condition {
            condition = condition.add(filter_condition);
        }
    }

    Ok(condition)
}

/// Parse a React Admin style `[start, end]` range.
#[must_use]
pub fn parse_range(range_str: Option<&str>) -> (u64, u64) {
    range_str.map_or((0, DEFAULT_PAGE_SIZE - 1), |r| {
        serde_json::from_str::<[u64; 2]>(r)
            .map(|range| (range[0], range[1].max(range[0])))
            .unwrap_or((0, DEFAULT_PAGE_SIZE - 1))
    })
}

/// Resolve `(offset, limit)` from `page`/`per_page` or `range`.
#[must_use]
pub fn parse_pagination(params: &ListParams) -> (u64, u64) {
    if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        (offset, per_page)
    } else if let Some(range) = &params.range {
        let (start, end) = parse_range(Some(range));
        let limit = end.saturating_sub(start).saturating_add(1).min(MAX_PAGE_SIZE);
        (start, limit)
    } else {
        (0, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_models::genre;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn columns() -> Vec<(&'static str, genre::Column)> {
        vec![("id", genre::Column::Id), ("name", genre::Column::Name)]
    }

    fn sql_for(condition: Condition) -> String {
        genre::Entity::find()
            .filter(condition)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_empty_filter_is_unconditional() {
        let condition = apply_filters(None, &columns(), &["name"]).unwrap();
        assert!(condition.is_empty());
        assert!(!sql_for(condition).contains(r#""genres"."id" ="#));

        let condition = apply_filters(Some("  "), &columns(), &["name"]).unwrap();
        assert!(condition.is_empty());
    }

    #[test]
    fn test_range_pagination_is_capped() {
        let params = ListParams {
            range: Some(format!("[0,{}]", u64::MAX)),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (0, MAX_PAGE_SIZE));

        let params = ListParams {
            range: Some("[20,29]".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (20, 10));

        let params = ListParams {
            range: Some(format!("[{},{}]", u64::MAX, u64::MAX)),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&params), (u64::MAX, 1));
    }

    #[test]
    fn test_text_column_uses_like() {
        let condition = apply_filters(Some(r#"{"name": "dra"}"#), &columns(), &["name"]).unwrap();
        assert!(sql_for(condition).contains(r#""genres"."name" LIKE '%dra%'"#));
    }

    #[test]
    fn test_number_uses_equality_and_arrays_use_in() {
        let condition = apply_filters(Some(r#"{"id": 4}"#), &columns(), &["name"]).unwrap();
        assert!(sql_for(condition).contains(r#""genres"."id" = 4"#));

        let condition = apply_filters(Some(r#"{"id": [1, 2]}"#), &columns(), &["name"]).unwrap();
        assert!(sql_for(condition).contains(r#""genres"."id" IN (1, 2)"#));
    }

    #[test]
    fn test_q_searches_text_columns_only() {
        let condition = apply_filters(Some(r#"{"q": "com"}"#), &columns(), &["name"]).unwrap();
        let sql = sql_for(condition);
        assert!(sql.contains(r#""genres"."name" LIKE '%com%'"#));
        assert!(!sql.contains(r#""genres"."id" LIKE"#));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let condition =
            apply_filters(Some(r#"{"secret": "x"}"#), &columns(), &["name"]).unwrap();
        assert!(!sql_for(condition).contains("secret"));
    }

    #[test]
    fn test_malformed_filter_is_bad_request() {
        let err = apply_filters(Some("[1,2"), &columns(), &["name"]).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(Some("[0,9]")), (0, 9));
        assert_eq!(parse_range(Some("[10,19]")), (10, 19));
        assert_eq!(parse_range(Some("garbage")), (0, 9));
        assert_eq!(parse_range(None), (0, 9));
    }

    #[test]
    fn test_parse_pagination() {
        let by_page = ListParams {
            page: Some(3),
            per_page: Some(5),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&by_page), (10, 5));

        let by_range = ListParams {
            range: Some("[5,14]".to_string()),
            ..Default::default()
        };
        assert_eq!(parse_pagination(&by_range), (5, 10));

        assert_eq!(parse_pagination(&ListParams::default()), (0, 10));
    }
}
