pub mod health;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::chat::handlers::handle_chat;
use crate::errors::AppError;
use crate::state::AppState;
use crate::vm::handlers::{
    handle_analyze, handle_delete_document, handle_list_documents, handle_match_job,
};

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// CORS preflights answered by `CorsLayer` come back as 200; clients of this API expect 204.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Chat proxy
        .route(
            "/chat",
            post(handle_chat)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        // Document-analysis VM passthrough
        .route(
            "/vm/analyze",
            post(handle_analyze)
                .options(preflight)
                .fallback(method_not_allowed)
                .layer(upload_limit),
        )
        .route(
            "/vm/documents",
            get(handle_list_documents)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/vm/documents/:id",
            delete(handle_delete_document)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/vm/match-job",
            post(handle_match_job)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(preflight_no_content))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}
