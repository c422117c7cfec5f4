pub mod scope;

pub use scope::{CurrentResource, ResourceScope};
