//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング。全エラーは`{error, message, timestamp}`形式のJSON。

use super::now_timestamp;
use crate::common::error::{AuthScheme, GatewayError};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub GatewayError);

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
    timestamp: String,
}

fn auth_hint(scheme: AuthScheme) -> &'static str {
    match scheme {
        AuthScheme::Basic => "Use HTTP Basic authentication with the admin credentials",
        AuthScheme::Bearer => "Send a valid access token as 'Authorization: Bearer <token>'",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();

        // 詳細はログにのみ出力する
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!("{}", self.0);
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!("{}", self.0);
        } else {
            debug!("{}", self.0);
        }

        let hint = match &self.0 {
            GatewayError::Unauthorized { scheme, .. } => Some(auth_hint(*scheme)),
            _ => None,
        };
        let body = ErrorBody {
            error: self.0.label(),
            message: self.0.external_message(),
            hint,
            timestamp: now_timestamp(),
        };

        let mut response = (status, Json(body)).into_response();
        if let GatewayError::Unauthorized {
            scheme, challenge, ..
        } = &self.0
        {
            let value = HeaderValue::from_str(challenge)
                .unwrap_or_else(|_| HeaderValue::from_static(scheme.as_str()));
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}
