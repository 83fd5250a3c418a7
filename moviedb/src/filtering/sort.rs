use sea_orm::{ColumnTrait, sea_query::Order};

use crate::models::ListParams;

// Shared default values
const DEFAULT_SORT_COLUMN: &str = "id";
const DEFAULT_SORT_ORDER: &str = "ASC";

/// Parse sort column and order from JSON array format
fn parse_json_sort(json: &str) -> (String, String) {
    let sort_vec: Vec<String> = serde_json::from_str(json).unwrap_or_default();
    (
        sort_vec
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT_COLUMN.to_string()),
        sort_vec
            .get(1)
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
    )
}

/// Convert sort order string to Order enum
fn parse_order(sort_order: &str) -> Order {
    if sort_order.eq_ignore_ascii_case("ASC") {
        Order::Asc
    } else {
        Order::Desc
    }
}

/// Find column by name or return default
fn find_column<C>(column_name: &str, columns: &[(&str, C)], default: C) -> C
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|&&(col_name, _)| col_name == column_name)
        .map_or(default, |&(_, col)| col)
}

/// Resolve the requested sort against the sortable columns of a resource.
///
/// `sort_by`/`order` wins over `sort`; `sort` accepts a JSON pair or a bare
/// column name. Unknown columns fall back to `default_column`.
pub fn parse_sorting<C>(
    params: &ListParams,
    sortable_columns: &[(&str, C)],
    default_column: C,
) -> (C, Order)
where
    C: ColumnTrait + Copy,
{
    let fallback_order = || {
        params
            .order
            .as_deref()
            .unwrap_or(DEFAULT_SORT_ORDER)
            .to_string()
    };

    let (sort_column, sort_order) = if let Some(sort_by) = &params.sort_by {
        (sort_by.clone(), fallback_order())
    } else if let Some(sort) = &params.sort {
        if sort.starts_with('[') {
            parse_json_sort(sort)
        } else {
            (sort.clone(), fallback_order())
        }
    } else {
        (DEFAULT_SORT_COLUMN.to_string(), DEFAULT_SORT_ORDER.to_string())
    };

    let order_direction = parse_order(&sort_order);
    let order_column = find_column(&sort_column, sortable_columns, default_column);

    (order_column, order_direction)
}
