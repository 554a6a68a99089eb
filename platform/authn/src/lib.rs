//! Bearer authentication for the agent gateway.
//!
//! One call per request: extract the `Authorization: Bearer <token>` header,
//! resolve the credential through the identity service, and hand back the
//! identity plus its permission grant for the policy layer to consume.

pub mod error;
pub mod permission;
pub mod supabase;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::{AuthError, AuthResult};
pub use permission::{Permission, PermissionSet};
pub use supabase::{
    IdentityVerifier, SupabaseAuth, SupabaseConfig, VerifiedUser, VerifyError, supabase_client,
};

/// Durable user identity resolved from a valid credential. Immutable once
/// resolved; this layer never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Authenticate result: who the caller is and what they may do, valid for
/// the lifetime of one request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
    pub permissions: PermissionSet,
}

/// Minimal view of an inbound request. The transport implements this over
/// its own request type; tests implement it with a plain struct.
pub trait InboundRequest: Send + Sync {
    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<&str>;

    /// Request target (path or URL), used only for log lines.
    fn target(&self) -> &str;
}

/// Validates bearer credentials against the configured identity service.
///
/// Holds the verifier as an optional capability: a gateway booted without
/// Supabase configuration still starts, and every authenticate call reports
/// the missing backend instead.
pub struct Authenticator {
    verifier: Option<Arc<dyn IdentityVerifier>>,
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            verifier: Some(verifier),
        }
    }

    /// An authenticator with no identity backend; every call fails with the
    /// backend-unavailable error.
    pub fn unconfigured() -> Self {
        Self { verifier: None }
    }

    /// Wire up the process-wide Supabase client (lazily built from the
    /// environment on first use).
    pub fn from_env() -> Self {
        Self {
            verifier: supabase_client().map(|client| client as Arc<dyn IdentityVerifier>),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.verifier.is_some()
    }

    /// Authenticate one request. Single attempt against the identity
    /// service; failures surface immediately, nothing is cached.
    pub async fn authenticate(&self, request: &dyn InboundRequest) -> AuthResult<AuthSession> {
        let header = request
            .header("authorization")
            .ok_or_else(|| AuthError::unauthenticated("Authorization header missing"))?;
        let token = bearer_token(header)?;
        let verifier = self
            .verifier
            .as_deref()
            .ok_or_else(|| AuthError::internal("Supabase client not initialized"))?;
        let user = verifier
            .verify(token)
            .await
            .map_err(|err| AuthError::unauthenticated(format!("Authentication error: {err}")))?;
        debug!(user = %user.id, path = request.target(), "request authenticated");
        Ok(AuthSession {
            identity: Identity::new(user.id),
            permissions: PermissionSet::full(),
        })
    }
}

/// Pull the credential out of an `Authorization` header value. The scheme is
/// matched case-insensitively; anything other than `Bearer <token>` is
/// malformed.
fn bearer_token(header: &str) -> AuthResult<&str> {
    let mut parts = header.split_ascii_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::unauthenticated(
            "Invalid authorization header format",
        )),
    }
}
