use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, instrument};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, JwtClaims, JwtHeader, Role};

type HmacSha256 = Hmac<Sha256>;

/// Issues an HS256 token carrying the user id, email and role name.
#[instrument(skip(email, config))]
pub fn issue_token(
    user_id: i64,
    email: &str,
    role: Role,
    config: &AppConfig,
) -> Result<String, String> {
    if !config.has_strong_jwt_secret() {
        return Err("Secret key must be at least 32 characters long.".to_string());
    }

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };

    let claims = JwtClaims {
        nameid: user_id.to_string(),
        unique_name: email.to_string(),
        role: role.as_str().to_string(),
        exp: (Utc::now() + Duration::minutes(config.jwt_expiry_minutes)).timestamp(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
    };

    let header_json = serde_json::to_vec(&header).map_err(|e| e.to_string())?;
    let claims_json = serde_json::to_vec(&claims).map_err(|e| e.to_string())?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );

    let mut mac = HmacSha256::new_from_slice(config.jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    debug!("Issued token for user {}", user_id);
    Ok(format!("{}.{}", signing_input, signature))
}

pub fn validate_token(token: &str, config: &AppConfig) -> Result<AuthUser, String> {
    if config.jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(config.jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    if claims.iss != config.jwt_issuer {
        debug!("Unexpected issuer: {}", claims.iss);
        return Err("Invalid token issuer".to_string());
    }

    if claims.aud != config.jwt_audience {
        debug!("Unexpected audience: {}", claims.aud);
        return Err("Invalid token audience".to_string());
    }

    let id = claims
        .nameid
        .parse::<i64>()
        .map_err(|_| "User ID not found in token.".to_string())?;
    let role = claims.role.parse::<Role>()?;

    let user = AuthUser {
        id,
        email: claims.unique_name,
        role,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}
