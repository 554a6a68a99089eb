//! Supabase identity client.
//!
//! Wraps the GoTrue user endpoint behind the [`IdentityVerifier`] seam so the
//! authenticator can run against a fake service in tests. The production
//! client is a process-wide lazy singleton built from the environment; missing
//! configuration is reported per request, not at process start.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
const USER_ENDPOINT_PATH: &str = "auth/v1/user";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure reported by an identity verifier. The authenticator normalizes
/// every variant to an authentication failure carrying this error's text.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The service looked at the credential and said no, or knew no user.
    #[error("{0}")]
    Rejected(String),
    /// The service could not be reached or answered with garbage.
    #[error("{0}")]
    Service(String),
}

/// Identity record returned by the identity service for a valid credential.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Map<String, serde_json::Value>,
}

/// One operation: turn a bearer credential into a user identity or fail.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, VerifyError>;
}

/// Connection settings for the Supabase project backing this deployment.
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Read both required variables; `None` when either is absent.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(SUPABASE_URL_VAR).ok()?;
        let anon_key = std::env::var(SUPABASE_ANON_KEY_VAR).ok()?;
        Some(Self { url, anon_key })
    }
}

/// GoTrue-backed verifier. Safe to share across concurrent requests; issues
/// one validation call per credential, no retries, no caching.
#[derive(Clone, Debug)]
pub struct SupabaseAuth {
    http: reqwest::Client,
    user_endpoint: Url,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig) -> anyhow::Result<Self> {
        let user_endpoint = Url::parse(&format!(
            "{}/{}",
            config.url.trim_end_matches('/'),
            USER_ENDPOINT_PATH
        ))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            user_endpoint,
            anon_key: config.anon_key,
        })
    }
}

/// Error payload GoTrue uses across its versions; field name varies.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ServiceErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseAuth {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, VerifyError> {
        let response = self
            .http
            .get(self.user_endpoint.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| VerifyError::Service(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ServiceErrorBody>()
                .await
                .ok()
                .and_then(ServiceErrorBody::into_message)
                .unwrap_or_else(|| format!("identity service returned {status}"));
            return Err(VerifyError::Rejected(message));
        }

        let user: VerifiedUser = response
            .json()
            .await
            .map_err(|err| VerifyError::Service(err.to_string()))?;
        if user.id.is_empty() {
            return Err(VerifyError::Rejected("User not found".into()));
        }
        Ok(user)
    }
}

static SUPABASE: OnceCell<Option<Arc<SupabaseAuth>>> = OnceCell::new();

/// Process-wide Supabase client, built from the environment on first use.
///
/// Returns `None` when `SUPABASE_URL` or `SUPABASE_ANON_KEY` is unset (or the
/// URL does not parse) so callers can fail the individual request instead of
/// refusing to start.
pub fn supabase_client() -> Option<Arc<SupabaseAuth>> {
    SUPABASE
        .get_or_init(|| {
            let config = SupabaseConfig::from_env()?;
            match SupabaseAuth::new(config) {
                Ok(client) => Some(Arc::new(client)),
                Err(err) => {
                    warn!(error = %err, "Supabase client construction failed");
                    None
                }
            }
        })
        .clone()
}
