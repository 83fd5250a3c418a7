//! # List querying
//!
//! Translation of list query parameters into sea-orm conditions, ordering and
//! paging for the catalogue resources.
//!
//! ```text
//! GET /api/genres?filter={"q":"com"}&sort=["name","DESC"]&range=[0,24]
//! GET /api/halls?filter={"cinema_id":3,"hall_type":"3D"}&page=2&per_page=20
//! GET /api/actors?filter={"id":[1,2,3]}
//! ```

pub mod conditions;
pub mod pagination;
pub mod sort;

pub use conditions::{apply_filters, parse_pagination, parse_range};
pub use pagination::calculate_content_range;
pub use sort::parse_sorting;
