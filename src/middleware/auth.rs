use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Authenticated caller, inserted into request extensions by [`require_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

pub fn decode_user(token: &str, secret: &str) -> Result<AuthUser, &'static str> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|_| "invalid_token")?;
    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| "invalid_token_subject")?;
    Ok(AuthUser(user_id))
}

pub async fn require_user(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    match decode_user(token, &state.jwt_secret) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(code) => {
            tracing::debug!("Rejected bearer token: {}", code);
            unauthorized(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::token::issue_token;

    #[test]
    fn issued_tokens_decode_to_their_user() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "secret", chrono::Duration::hours(1)).unwrap();
        assert_eq!(decode_user(&token, "secret"), Ok(AuthUser(user_id)));
        assert_eq!(decode_user(&token, "other"), Err("invalid_token"));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = issue_token(Uuid::new_v4(), "secret", chrono::Duration::hours(-2)).unwrap();
        assert_eq!(decode_user(&token, "secret"), Err("invalid_token"));
    }
}
