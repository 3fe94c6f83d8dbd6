//! HTTP Basic認証
//!
//! `Authorization: Basic <base64(username:password)>`を単一の管理者資格情報と比較する。

use super::{credentials_for, Authenticator};
use crate::common::error::{AuthFailure, AuthScheme};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;

/// 固定資格情報によるBasic認証
pub struct BasicAuthenticator {
    username: String,
    password: String,
    realm: String,
}

impl BasicAuthenticator {
    /// 新しいBasic認証を作成
    pub fn new(username: &str, password: &str, realm: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            realm: realm.to_string(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        // 長さ以外の情報が比較時間から漏れないよう、両方を必ず比較する
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn scheme(&self) -> AuthScheme {
        AuthScheme::Basic
    }

    fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm.replace('"', "'"))
    }

    async fn verify(&self, authorization: Option<&str>) -> Result<(), AuthFailure> {
        let encoded = credentials_for(authorization, AuthScheme::Basic)?;

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| AuthFailure::MalformedCredentials(format!("invalid base64: {e}")))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| AuthFailure::MalformedCredentials("credentials are not UTF-8".into()))?;
        let (username, password) = decoded.split_once(':').ok_or_else(|| {
            AuthFailure::MalformedCredentials("missing ':' separator".to_string())
        })?;

        if self.matches(username, password) {
            Ok(())
        } else {
            Err(AuthFailure::InvalidCredentials)
        }
    }
}
