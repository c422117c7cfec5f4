//! Mount a route table on axum: resolve handler references and middleware tokens.
//! `{id}` path params become axum's `:id`; routes sharing a path share one method router.

use crate::error::MountError;
use crate::extractors::scope::ResourceScope;
use crate::registrar::SCOPE_MIDDLEWARE;
use crate::routes::{HttpVerb, RouteTable};
use crate::state::ResourceRegistry;
use axum::{
    handler::Handler,
    routing::{on, MethodFilter, MethodRouter},
    Extension, Router,
};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

type HandlerFactory<S> = Box<dyn Fn(MethodFilter) -> MethodRouter<S>>;
type MiddlewareFn<S> = Box<dyn Fn(MethodRouter<S>, Option<&str>) -> MethodRouter<S>>;

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid path param pattern"));

/// Handlers keyed by reference (`Controller@action`, namespace included).
pub struct HandlerMap<S> {
    handlers: HashMap<String, HandlerFactory<S>>,
}

impl<S> Default for HandlerMap<S> {
    fn default() -> Self {
        HandlerMap {
            handlers: HashMap::new(),
        }
    }
}

impl<S> HandlerMap<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler<H, T>(mut self, reference: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let factory: HandlerFactory<S> =
            Box::new(move |filter: MethodFilter| -> MethodRouter<S> { on(filter, handler.clone()) });
        self.handlers.insert(reference.into(), factory);
        self
    }
}

/// Middleware keyed by name. Tokens `name:param` pass `param` to the layer function.
/// `api-scope` is built in and tags requests with [`ResourceScope`].
pub struct MiddlewareMap<S> {
    layers: HashMap<String, MiddlewareFn<S>>,
}

impl<S> Default for MiddlewareMap<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        let mut layers: HashMap<String, MiddlewareFn<S>> = HashMap::new();
        layers.insert(SCOPE_MIDDLEWARE.to_string(), Box::new(tag_scope::<S>));
        MiddlewareMap { layers }
    }
}

impl<S> MiddlewareMap<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(MethodRouter<S>, Option<&str>) -> MethodRouter<S> + 'static,
    {
        self.layers.insert(name.into(), Box::new(f));
        self
    }
}

fn tag_scope<S>(route: MethodRouter<S>, scope: Option<&str>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.layer(Extension(ResourceScope(scope.unwrap_or_default().to_string())))
}

pub fn method_filter(verb: HttpVerb) -> MethodFilter {
    match verb {
        HttpVerb::Get => MethodFilter::GET,
        HttpVerb::Post => MethodFilter::POST,
        HttpVerb::Put => MethodFilter::PUT,
        HttpVerb::Patch => MethodFilter::PATCH,
        HttpVerb::Delete => MethodFilter::DELETE,
        HttpVerb::Options => MethodFilter::OPTIONS,
    }
}

/// `/widgets/{id}` -> `/widgets/:id`.
pub fn axum_path(path: &str) -> String {
    PATH_PARAM.replace_all(path, ":$1").into_owned()
}

fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (token, None),
    }
}

fn check_pattern(
    patterns: &mut matchit::Router<String>,
    path: &str,
    original: &str,
) -> Result<(), MountError> {
    match patterns.insert(path, original.to_string()) {
        Ok(()) => Ok(()),
        Err(matchit::InsertError::Conflict { with }) => {
            let existing = patterns
                .at(&with)
                .map(|m| m.value.clone())
                .unwrap_or(with);
            Err(MountError::ConflictingRoute {
                path: original.to_string(),
                existing,
            })
        }
        Err(e) => Err(MountError::InvalidRoute {
            path: original.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Build an axum router for every entry of `table`; the registry is attached as an extension.
pub fn mount<S>(
    table: &RouteTable,
    handlers: &HandlerMap<S>,
    middleware: &MiddlewareMap<S>,
    registry: Arc<ResourceRegistry>,
) -> Result<Router<S>, MountError>
where
    S: Clone + Send + Sync + 'static,
{
    let mut order: Vec<String> = Vec::new();
    // same matcher axum uses; catches pattern conflicts before axum would panic on them
    let mut patterns: matchit::Router<String> = matchit::Router::new();
    let mut by_path: HashMap<String, (MethodRouter<S>, HashSet<HttpVerb>)> = HashMap::new();

    for entry in table.routes() {
        let factory = handlers
            .handlers
            .get(&entry.uses)
            .ok_or_else(|| MountError::UnknownHandler(entry.uses.clone()))?;
        let mut route = factory(method_filter(entry.verb));
        // last applied runs first: wrap innermost token first
        for token in entry.middleware.iter().rev() {
            let (name, param) = split_token(token);
            let layer = middleware
                .layers
                .get(name)
                .ok_or_else(|| MountError::UnknownMiddleware(name.to_string()))?;
            route = layer(route, param);
        }

        let path = axum_path(&entry.path);
        match by_path.remove(&path) {
            Some((existing, mut verbs)) => {
                if !verbs.insert(entry.verb) {
                    return Err(MountError::DuplicateRoute {
                        method: entry.verb.as_str(),
                        path: entry.path.clone(),
                    });
                }
                by_path.insert(path, (existing.merge(route), verbs));
            }
            None => {
                check_pattern(&mut patterns, &path, &entry.path)?;
                order.push(path.clone());
                by_path.insert(path, (route, HashSet::from([entry.verb])));
            }
        }
    }

    let mut router = Router::new();
    for path in order {
        if let Some((route, _)) = by_path.remove(&path) {
            router = router.route(&path, route);
        }
    }
    tracing::info!(routes = table.len(), "mounted route table");
    Ok(router.layer(Extension(registry)))
}
