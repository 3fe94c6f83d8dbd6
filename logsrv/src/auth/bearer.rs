//! Bearerトークン認証
//!
//! トークンを外部認証サービスの`GET <base>/auth/validate`に転送し、200のみを有効とみなす。
//! 認証サービスに到達できない場合はアクセスを拒否する。

use super::{credentials_for, Authenticator};
use crate::common::error::{AuthFailure, AuthScheme, GatewayError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// 認証サービスの検証エンドポイント
const VALIDATE_PATH: &str = "/auth/validate";

/// 外部認証サービスによるBearer認証
#[derive(Debug, Clone)]
pub struct BearerAuthenticator {
    validate_url: String,
    client: Client,
}

impl BearerAuthenticator {
    /// 新しいBearer認証を作成
    ///
    /// `timeout`は1回の検証呼び出し全体（接続含む）に適用される。
    pub fn new(identity_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            validate_url: format!("{}{}", identity_url.trim_end_matches('/'), VALIDATE_PATH),
            client,
        })
    }

    /// 検証エンドポイントのURL
    pub fn validate_url(&self) -> &str {
        &self.validate_url
    }
}

#[async_trait]
impl Authenticator for BearerAuthenticator {
    fn scheme(&self) -> AuthScheme {
        AuthScheme::Bearer
    }

    fn challenge(&self) -> String {
        "Bearer realm=\"Log Server\"".to_string()
    }

    async fn verify(&self, authorization: Option<&str>) -> Result<(), AuthFailure> {
        let token = credentials_for(authorization, AuthScheme::Bearer)?;

        let response = self
            .client
            .get(&self.validate_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthFailure::IdentityServiceUnreachable(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Identity service answered");
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(AuthFailure::IdentityServiceRejected(status.as_u16()))
        }
    }
}
