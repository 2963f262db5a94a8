pub mod visibility;
pub mod manager;

pub use visibility::VisibilityState;
pub use manager::{Fragment, FragmentManager, UpdateRequest};
