use axum::http::{HeaderMap, HeaderValue, header::CONTENT_RANGE};

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Build the `Content-Range` header for one page of a list response.
///
/// The header reads `{resource} {first}-{last}/{total}` with inclusive bounds
/// clamped to the available rows, e.g. `genres 0-9/42`. An empty page is
/// reported as `{resource} */{total}`.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);

    let content_range = if limit == 0 || offset >= total_count {
        format!("{safe_name} */{total_count}")
    } else {
        let last = offset
            .saturating_add(limit - 1)
            .min(total_count.saturating_sub(1));
        format!("{safe_name} {offset}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&content_range)
        .unwrap_or_else(|_| HeaderValue::from_static("items */0"));
    headers.insert(CONTENT_RANGE, value);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(headers: &HeaderMap) -> &str {
        headers.get(CONTENT_RANGE).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_content_range_normal() {
        let headers = calculate_content_range(0, 10, 100, "genres");
        assert_eq!(header(&headers), "genres 0-9/100");
    }

    #[test]
    fn test_content_range_last_partial_page() {
        let headers = calculate_content_range(10, 10, 14, "actors");
        assert_eq!(header(&headers), "actors 10-13/14");
    }

    #[test]
    fn test_content_range_empty() {
        let headers = calculate_content_range(0, 10, 0, "halls");
        assert_eq!(header(&headers), "halls */0");
    }

    #[test]
    fn test_content_range_strips_control_characters() {
        let headers = calculate_content_range(0, 10, 100, "genres\r\nInjected: evil");
        let value = header(&headers);
        assert!(!value.contains('\r'));
        assert!(!value.contains('\n'));
    }
}
