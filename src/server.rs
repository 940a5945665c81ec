//! HTTP surface for the grocery list.
//!
//! Five fixed routes, one per operation. Error detail never leaves the
//! process: any failure, validation included, maps to a generic 500 body and
//! the specifics go to the log. The facade is synchronous, so handlers run it
//! on the blocking pool.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::app::GroceryApp;
use crate::error::{PantryError, Result};

/// Build the application router.
pub fn router(app: Arc<GroceryApp>) -> Router {
    Router::new()
        .route("/list", get(list_items).fallback(method_not_allowed))
        .route("/add", post(add_item).fallback(method_not_allowed))
        .route("/edit", put(edit_item).fallback(method_not_allowed))
        .route("/remove", delete(remove_item).fallback(method_not_allowed))
        .route("/toggle", put(toggle_item).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Bind and serve until the process is stopped.
pub async fn serve(app: Arc<GroceryApp>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PantryError::config(format!("binding {}: {}", addr, e)))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router(app))
        .await
        .map_err(|e| PantryError::config(format!("server error: {}", e)))?;
    Ok(())
}

/// Run a facade call on the blocking pool.
async fn run<T, F>(app: Arc<GroceryApp>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&GroceryApp) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&app))
        .await
        .map_err(|e| PantryError::config(format!("blocking task failed: {}", e)))?
}

fn internal_error(err: PantryError) -> Response<Body> {
    tracing::error!("request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Internal Server Error"})),
    )
        .into_response()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not Found"})))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"message": "Invalid Method type"})),
    )
}

/// Pull the target name out of a request body.
fn target_name(payload: &Value) -> Result<String> {
    payload
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PantryError::invalid_update("request is missing a name"))
}

async fn list_items(State(app): State<Arc<GroceryApp>>) -> Response<Body> {
    match run(app, |a| a.list()).await {
        Ok(items) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(items))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(err) => internal_error(err),
    }
}

async fn add_item(State(app): State<Arc<GroceryApp>>, body: String) -> Response<Body> {
    let result = async {
        let payload: Value = serde_json::from_str(&body)?;
        run(app, move |a| a.create(&payload)).await
    }
    .await;

    match result {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(err) => internal_error(err),
    }
}

async fn edit_item(State(app): State<Arc<GroceryApp>>, body: String) -> Response<Body> {
    let result = async {
        let payload: Value = serde_json::from_str(&body)?;
        let name = target_name(&payload)?;
        let update = payload.get("update").cloned().unwrap_or(Value::Null);
        run(app, move |a| a.update(&name, &update)).await
    }
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => internal_error(err),
    }
}

async fn remove_item(State(app): State<Arc<GroceryApp>>, body: String) -> Response<Body> {
    let result = async {
        let payload: Value = serde_json::from_str(&body)?;
        let name = target_name(&payload)?;
        run(app, move |a| a.delete(&name)).await
    }
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => internal_error(err),
    }
}

async fn toggle_item(State(app): State<Arc<GroceryApp>>, body: String) -> Response<Body> {
    let result = async {
        let payload: Value = serde_json::from_str(&body)?;
        let name = target_name(&payload)?;
        run(app, move |a| a.check_off(&name)).await
    }
    .await;

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => internal_error(err),
    }
}
