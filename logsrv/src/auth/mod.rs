//! アクセス制御ゲート
//!
//! スナップショットの`summary.auth_required`がtrueの場合のみ資格情報を検証する。
//! 検証方式は起動時の設定で1つだけ選ばれ、`Authenticator`トレイトの背後に隠れる。

/// 固定の管理者資格情報（HTTP Basic）
pub mod basic;

/// 外部認証サービスによるトークン検証（Bearer）
pub mod bearer;

use crate::common::error::{AuthFailure, AuthScheme, GatewayError};
use crate::config::AuthConfig;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use std::sync::Arc;
use tracing::{debug, warn};

pub use basic::BasicAuthenticator;
pub use bearer::BearerAuthenticator;

/// 資格情報検証の共通インターフェース
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// 使用する認証方式
    fn scheme(&self) -> AuthScheme;

    /// 401応答の`WWW-Authenticate`ヘッダー値
    fn challenge(&self) -> String;

    /// Authorizationヘッダーの値を検証する
    async fn verify(&self, authorization: Option<&str>) -> Result<(), AuthFailure>;
}

/// 設定に応じた認証方式を生成
pub fn build_authenticator(config: &AuthConfig) -> Result<Arc<dyn Authenticator>, GatewayError> {
    let authenticator: Arc<dyn Authenticator> = match config {
        AuthConfig::Basic {
            username,
            password,
            realm,
        } => Arc::new(BasicAuthenticator::new(username, password, realm)),
        AuthConfig::Bearer {
            identity_url,
            timeout,
        } => Arc::new(BearerAuthenticator::new(identity_url, *timeout)?),
    };
    Ok(authenticator)
}

/// ゲートの判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 認証不要（スナップショットが公開状態）
    Public,
    /// 有効な資格情報が提示された
    Authenticated,
}

/// スナップショットを公開してよいか判定する
///
/// 拒否時は`GatewayError::Unauthorized`を返し、スナップショットの内容は含まない。
pub async fn authorize(
    snapshot: &Snapshot,
    headers: &HeaderMap,
    authenticator: &dyn Authenticator,
) -> Result<Access, GatewayError> {
    if !snapshot.auth_required() {
        return Ok(Access::Public);
    }

    // 非ASCIIのヘッダー値は「不正な資格情報」として扱う
    let authorization = match headers.get(header::AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(v) => Some(v),
            Err(_) => {
                return Err(reject(
                    authenticator,
                    AuthFailure::MalformedCredentials("non-ASCII header value".to_string()),
                ))
            }
        },
    };

    match authenticator.verify(authorization).await {
        Ok(()) => {
            debug!(scheme = %authenticator.scheme(), "Snapshot access authenticated");
            Ok(Access::Authenticated)
        }
        Err(failure) => Err(reject(authenticator, failure)),
    }
}

fn reject(authenticator: &dyn Authenticator, failure: AuthFailure) -> GatewayError {
    if failure.is_missing() {
        debug!(scheme = %authenticator.scheme(), "Snapshot access requires credentials");
    } else {
        warn!(scheme = %authenticator.scheme(), "Snapshot access denied: {}", failure);
    }
    GatewayError::Unauthorized {
        scheme: authenticator.scheme(),
        challenge: authenticator.challenge(),
        failure,
    }
}

/// `Authorization`ヘッダーから指定スキームの資格情報部分を取り出す
///
/// スキーム名は大文字小文字を区別しない。
pub(crate) fn credentials_for<'a>(
    authorization: Option<&'a str>,
    scheme: AuthScheme,
) -> Result<&'a str, AuthFailure> {
    let value = authorization
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthFailure::MissingCredentials)?;

    let (name, rest) = value
        .split_once(' ')
        .ok_or(AuthFailure::WrongScheme { expected: scheme })?;
    if !name.eq_ignore_ascii_case(scheme.as_str()) {
        return Err(AuthFailure::WrongScheme { expected: scheme });
    }

    let credentials = rest.trim();
    if credentials.is_empty() {
        return Err(AuthFailure::MalformedCredentials(
            "empty credentials".to_string(),
        ));
    }
    Ok(credentials)
}
