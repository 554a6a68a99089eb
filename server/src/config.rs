use anyhow::Result;

/// Server settings from the process environment. Supabase credentials are
/// deliberately not read here: the identity client builds itself lazily in
/// `platform-authn` and reports absence per request.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            cors_allowed_origins,
        })
    }
}
