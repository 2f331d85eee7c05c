use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims issued by Supabase Auth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (auth user id, also the profile id)
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub nbf: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub app_metadata: Option<AppMetadata>,
    #[serde(default)]
    pub user_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppMetadata {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub providers: Option<Vec<String>>,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Sign-in provider (`email`, `google`, ...)
    pub fn provider(&self) -> Option<&str> {
        self.app_metadata.as_ref()?.provider.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_supabase_token() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "8d0f7a43-6f2b-4a8e-9e53-2f0b5d5b1c11",
            "aud": "authenticated",
            "iss": "https://x.supabase.co/auth/v1",
            "iat": 1700000000,
            "exp": 1700003600,
            "app_metadata": { "provider": "github" }
        }))
        .unwrap();

        assert!(claims.user_id().is_some());
        assert_eq!(claims.provider(), Some("github"));
        assert!(claims.email.is_none());
    }
}
