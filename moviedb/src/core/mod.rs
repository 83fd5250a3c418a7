pub mod handlers;
pub mod traits;

pub use handlers::resource_router;
pub use traits::{CrudResource, MergeIntoActiveModel};
