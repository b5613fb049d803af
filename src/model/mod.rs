//! Resource model shared by the scanner, locator and inliner.

mod record;
mod resource;

pub use record::ResourceRecord;
pub use resource::{ResourceReference, ResourceType};
