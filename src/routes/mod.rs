//! REST conventions, the routing engine seam, the in-memory route table and axum mounting.

pub mod action;
pub mod engine;
pub mod mount;
pub mod table;

pub use action::*;
pub use engine::*;
pub use mount::{axum_path, method_filter, mount, HandlerMap, MiddlewareMap};
pub use table::*;
