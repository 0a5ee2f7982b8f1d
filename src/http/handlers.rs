//! `/models` resource handlers and route table.

use std::future::Future;
use std::pin::Pin;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;

use crate::http::error::ApiError;
use crate::http::exchange::Exchange;
use crate::http::request::{read_input, Input};
use crate::http::response::{Reply, ResponseBody};
use crate::http::server::AppState;
use crate::routing::{split_path, Captures, PatternError, RouteTable};

/// Boxed future returned by a [`Handler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Reply, ApiError>> + Send>>;

/// Logic run when a route matches.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, state: AppState, captures: Captures, request: Request<Body>) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(AppState, Captures, Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply, ApiError>> + Send + 'static,
{
    fn call(&self, state: AppState, captures: Captures, request: Request<Body>) -> HandlerFuture {
        Box::pin(self(state, captures, request))
    }
}

pub type BoxedHandler = Box<dyn Handler>;

fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Box::new(handler)
}

/// Route table for the `/models` resource.
pub fn model_routes() -> Result<RouteTable<BoxedHandler>, PatternError> {
    RouteTable::new()
        .route(Method::GET, "/models", boxed(list_models))?
        .route(Method::GET, "/models/:id", boxed(get_model))?
        .route(Method::POST, "/models", boxed(create_model))?
        .route(Method::POST, "/models/:id", boxed(method_not_allowed))?
        .route(Method::PUT, "/models", boxed(method_not_allowed))?
        .route(Method::PUT, "/models/:id", boxed(update_model))?
        .route(Method::DELETE, "/models", boxed(method_not_allowed))?
        .route(Method::DELETE, "/models/:id", boxed(delete_model))
}

/// Fallback handler: routes every request through the model route table.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = Exchange::enter(&request);
    let method = request.method().clone();
    let path = exchange.path().to_string();
    let routes = state.routes.clone();
    let resolved = routes.resolve(&method, &split_path(&path));

    let outcome = match resolved {
        Some((route, captures)) => {
            exchange.mark_matched(route.pattern());
            route.handler().call(state, captures, request).await
        }
        None if !routes.has_method(&method) => Err(ApiError::NotImplemented(method)),
        None => Err(ApiError::NoRoute { method, path }),
    };

    exchange.finish(outcome)
}

fn key_param(captures: &Captures) -> Result<String, ApiError> {
    captures
        .get("id")
        .map(str::to_string)
        .ok_or(ApiError::MissingParam("id"))
}

async fn list_models(
    state: AppState,
    _captures: Captures,
    _request: Request<Body>,
) -> Result<Reply, ApiError> {
    let keys = state.store.list();
    Ok(Reply::ok().with_body(ResponseBody::structured(&keys)?))
}

async fn get_model(
    state: AppState,
    captures: Captures,
    _request: Request<Body>,
) -> Result<Reply, ApiError> {
    let key = key_param(&captures)?;
    match state.store.get(&key) {
        Some(record) => Ok(Reply::ok().with_body(record.into())),
        None => Err(ApiError::NotFound(key)),
    }
}

async fn create_model(
    state: AppState,
    _captures: Captures,
    request: Request<Body>,
) -> Result<Reply, ApiError> {
    let record = read_input(request, state.limits.max_body_bytes)
        .await?
        .and_then(Input::into_record)
        .ok_or(ApiError::BadInput)?;

    let key = state.store.next_key()?;
    state.store.put(key.clone(), record);
    tracing::info!(key = %key, "Record created");

    Ok(Reply::new(StatusCode::CREATED).with_location(key))
}

async fn update_model(
    state: AppState,
    captures: Captures,
    request: Request<Body>,
) -> Result<Reply, ApiError> {
    let key = key_param(&captures)?;
    let record = read_input(request, state.limits.max_body_bytes)
        .await?
        .and_then(Input::into_record)
        .ok_or(ApiError::BadInput)?;

    let existed = state.store.contains(&key);
    state.store.put(key.clone(), record);
    tracing::info!(key = %key, created = !existed, "Record stored");

    Ok(Reply::new(StatusCode::NO_CONTENT).with_location(key))
}

async fn delete_model(
    state: AppState,
    captures: Captures,
    _request: Request<Body>,
) -> Result<Reply, ApiError> {
    let key = key_param(&captures)?;
    if state.store.delete(&key) {
        tracing::info!(key = %key, "Record deleted");
        Ok(Reply::ok())
    } else {
        Err(ApiError::NotFound(key))
    }
}

async fn method_not_allowed(
    _state: AppState,
    _captures: Captures,
    request: Request<Body>,
) -> Result<Reply, ApiError> {
    Err(ApiError::MethodNotAllowed {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
    })
}
