//! CORS

use super::system;
use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "*";
/// `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
/// `Access-Control-Allow-Headers`
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// 任意パスへのOPTIONSをボディなしの200で返す
///
/// axumの`get()`はHEADも受け付けるため、HEADはルーティング前に404とする。
pub async fn preflight(request: Request, next: Next) -> Response {
    match *request.method() {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::HEAD => system::not_found(request.uri().clone())
            .await
            .into_response(),
        _ => next.run(request).await,
    }
}
