use axum::{
    body::Body,
    extract::{Path, Request},
    http::{self, StatusCode},
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use resource_router::{
    mount, CurrentResource, HandlerMap, JsonConfig, MiddlewareMap, MountError, RawOptions,
    ResourceRouter, RouteTable,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

async fn list_widgets() -> &'static str {
    "list"
}

async fn read_widget(Path(id): Path<String>) -> String {
    format!("read {}", id)
}

async fn current_scope(resource: CurrentResource) -> String {
    format!("{} {}", resource.name, resource.options.controller)
}

async fn require_token(req: Request, next: Next) -> Result<Response, StatusCode> {
    if req.headers().contains_key("authorization") {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn registered() -> ResourceRouter<RouteTable, JsonConfig> {
    let mut router = ResourceRouter::new(RouteTable::new(), JsonConfig::empty()).unwrap();
    router
        .resource(
            "widgets",
            RawOptions::from("WidgetController").with("only", json!(["index", "read"])),
        )
        .unwrap();
    router.get("whoami", "ScopeController").unwrap();
    router
        .index("public", RawOptions::from("WidgetController").with("auth", false))
        .unwrap();
    router
}

fn handlers() -> HandlerMap<()> {
    HandlerMap::new()
        .handler("WidgetController@index", list_widgets)
        .handler("WidgetController@read", read_widget)
        .handler("ScopeController@read", current_scope)
}

fn middleware() -> MiddlewareMap<()> {
    MiddlewareMap::new().layer("auth", |route, _| route.layer(from_fn(require_token)))
}

fn app() -> Router {
    let (table, registry) = registered().into_parts();
    mount(&table, &handlers(), &middleware(), Arc::new(registry)).unwrap()
}

async fn call(app: &Router, uri: &str, token: bool) -> (StatusCode, String) {
    let mut req = http::Request::builder().uri(uri);
    if token {
        req = req.header("authorization", "Bearer test");
    }
    let res = app
        .clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_mounted_routes_dispatch_to_handlers() {
    let app = app();
    assert_eq!(call(&app, "/widgets", true).await, (StatusCode::OK, "list".into()));
    assert_eq!(call(&app, "/widgets/7", true).await, (StatusCode::OK, "read 7".into()));
    assert_eq!(call(&app, "/missing", true).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_middleware_guards_authenticated_resources() {
    let app = app();
    assert_eq!(call(&app, "/widgets", false).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(call(&app, "/widgets/7", false).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(call(&app, "/public", false).await, (StatusCode::OK, "list".into()));
}

/// The scope middleware lets handlers read their resource's options.
#[tokio::test]
async fn test_scope_extension_resolves_current_resource() {
    let app = app();
    assert_eq!(
        call(&app, "/whoami", true).await,
        (StatusCode::OK, "whoami ScopeController".into())
    );
}

#[test]
fn test_mount_reports_unknown_handler_and_middleware() {
    let (table, registry) = registered().into_parts();
    let registry = Arc::new(registry);

    let err = mount(&table, &HandlerMap::<()>::new(), &middleware(), registry.clone()).unwrap_err();
    assert!(matches!(err, MountError::UnknownHandler(ref r) if r == "WidgetController@index"));

    let err = mount(&table, &handlers(), &MiddlewareMap::new(), registry).unwrap_err();
    assert!(matches!(err, MountError::UnknownMiddleware(ref m) if m == "auth"));
}

#[test]
fn test_mount_rejects_duplicate_method_on_path() {
    let mut router = ResourceRouter::new(RouteTable::new(), JsonConfig::empty()).unwrap();
    router.read("widgets", "WidgetController").unwrap();
    router.read("widgets", "WidgetController").unwrap();
    let (table, registry) = router.into_parts();

    let err = mount(&table, &handlers(), &middleware(), Arc::new(registry)).unwrap_err();
    assert!(matches!(
        err,
        MountError::DuplicateRoute { method: "GET", ref path } if path == "/widgets/{id}"
    ));
}

/// Two parameter names on the same segment are reported instead of panicking inside axum.
#[test]
fn test_mount_reports_conflicting_param_names() {
    let mut router = ResourceRouter::new(RouteTable::new(), JsonConfig::empty()).unwrap();
    router
        .resource(
            "widgets",
            RawOptions::from("WidgetController").with("only", json!(["read"])),
        )
        .unwrap();
    router.index("widgets/{slug}", "SlugController").unwrap();
    let (table, registry) = router.into_parts();

    let handlers = handlers().handler("SlugController@index", list_widgets);
    let err = mount(&table, &handlers, &middleware(), Arc::new(registry)).unwrap_err();
    match err {
        MountError::ConflictingRoute { path, existing } => {
            assert_eq!(path, "/widgets/{slug}");
            assert!(existing.starts_with("/widgets/"), "{}", existing);
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
}
