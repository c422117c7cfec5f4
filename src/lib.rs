//! Resource router: convention-driven REST route registration.

pub mod config;
pub mod error;
pub mod extractors;
pub mod registrar;
pub mod routes;
pub mod shorthand;
pub mod state;

pub use config::{normalize, ConfigLookup, JsonConfig, OptionsMap, RawOptions, ResourceOptions};
pub use error::{ConfigError, MountError, UsageError};
pub use extractors::{CurrentResource, ResourceScope};
pub use registrar::{ResourceRouter, AUTH_MIDDLEWARE, SCOPE_MIDDLEWARE};
pub use routes::{
    mount, GroupAttributes, HandlerMap, HttpVerb, MiddlewareMap, RestAction, RouteEntry,
    RouteTable, RouteTarget, RoutingEngine,
};
pub use shorthand::Shorthand;
pub use state::ResourceRegistry;
