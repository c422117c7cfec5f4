//! Demo server: registers a few resources plus the auth endpoints, mounts them on axum and serves.
//!
//! Config comes from the JSON file named by `RESOURCE_ROUTER_CONFIG` (optional).
//! Run: `cargo run --example server`

use axum::{
    extract::{Path, Request},
    http::StatusCode,
    middleware::{from_fn, Next},
    response::Response,
    Json,
};
use resource_router::config::AUTH_CONTROLLER;
use resource_router::{
    mount, CurrentResource, HandlerMap, JsonConfig, MiddlewareMap, RawOptions, ResourceRouter,
    RouteTable,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const TOKEN: &str = "Bearer demo";

async fn list(resource: CurrentResource) -> Json<Value> {
    Json(json!({ "data": [], "meta": { "resource": resource.name } }))
}

async fn read(resource: CurrentResource, Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "data": { "id": id }, "meta": { "resource": resource.name } }))
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn login() -> Json<Value> {
    Json(json!({ "token": TOKEN }))
}

async fn user(resource: CurrentResource) -> Json<Value> {
    Json(json!({ "model": resource.options.model }))
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn require_token(req: Request, next: Next) -> Result<Response, StatusCode> {
    let authorized = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == TOKEN)
        .unwrap_or(false);
    if authorized {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resource_router=info")),
        )
        .init();

    let config = JsonConfig::from_env()?;
    let mut router = ResourceRouter::new(RouteTable::new(), config)?;
    router.resource(
        "widgets",
        RawOptions::from("WidgetController").with("only", json!(["index", "read"])),
    )?;
    router.read("gadgets", "GadgetController")?;
    router.index("status", RawOptions::from("StatusController").with("auth", false))?;
    router.auth()?;

    let (table, registry) = router.into_parts();
    for route in table.routes() {
        tracing::info!(verb = %route.verb, path = %route.path, uses = %route.uses, "route");
    }

    let auth = AUTH_CONTROLLER;
    let handlers: HandlerMap<()> = HandlerMap::new()
        .handler("WidgetController@index", list)
        .handler("WidgetController@read", read)
        .handler("GadgetController@read", read)
        .handler("StatusController@index", status)
        .handler(format!("{}@login", auth), login)
        .handler(format!("{}@user", auth), user)
        .handler(format!("{}@logout", auth), logout)
        .handler(format!("{}@refresh", auth), login);
    let middleware: MiddlewareMap<()> = MiddlewareMap::new().layer("auth", |route, _| route.layer(from_fn(require_token)));

    let app = mount(&table, &handlers, &middleware, Arc::new(registry))?;
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
