use super::Claims;
use uuid::Uuid;

/// Authenticated user extracted from a verified JWT
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Auth user id; profiles share this id
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    pub issuer: String,
    pub audience: String,
    token: String,
    claims: Claims,
}

impl AuthContext {
    pub fn from_claims_with_token(claims: &Claims, token: &str) -> Result<Self, &'static str> {
        let user_id = claims.user_id().ok_or("Invalid user ID in token")?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            role: claims.role.clone(),
            issuer: claims.iss.clone(),
            audience: claims.aud.clone(),
            token: token.to_string(),
            claims: claims.clone(),
        })
    }

    /// Raw bearer token, forwarded to Supabase for user-scoped calls
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
