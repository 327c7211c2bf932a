use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::LoginRequest;
use crate::utils::{AppError, AppResult};

/// bcrypt work factor used for every stored password
pub const BCRYPT_COST: u32 = 10;

/// Who a token was issued to. Every protected scope accepts exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Influencer,
    User,
}

impl Role {
    /// Header the browser apps send the token in.
    pub fn header_name(&self) -> &'static str {
        match self {
            Role::Admin => "atoken",
            Role::Influencer => "itoken",
            Role::User => "token",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Influencer => "influencer",
            Role::User => "user",
        };
        write!(f, "{}", name)
    }
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // document id, or the admin email
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

/// Signing keys plus the admin credentials. Shared through `web::Data`.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    admin_email: String,
    admin_password: String,
}

impl AuthKeys {
    pub fn new(secret: &str, ttl_hours: i64, admin_email: &str, admin_password: &str) -> Self {
        AuthKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
            admin_email: admin_email.trim().to_lowercase(),
            admin_password: admin_password.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_ttl_hours,
            &config.admin_email,
            &config.admin_password,
        )
    }

    pub fn issue(&self, subject: &str, role: Role) -> AppResult<String> {
        self.issue_at(subject, role, Utc::now().timestamp())
    }

    fn issue_at(&self, subject: &str, role: Role, now: i64) -> AppResult<String> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now as usize,
            exp: (now + self.ttl.num_seconds()) as usize,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Checks signature, expiry and that the token belongs to `expected`.
    pub fn verify(&self, token: &str, expected: Role) -> Result<Claims, String> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))?;

        if claims.role != expected {
            return Err(format!(
                "Token issued for {} cannot access {} routes",
                claims.role, expected
            ));
        }

        Ok(claims)
    }

    /// Admin accounts are not stored; credentials come from configuration.
    pub fn admin_login(&self, request: &LoginRequest) -> AppResult<String> {
        let email_matches = request.email.trim().to_lowercase() == self.admin_email;
        if email_matches && request.password == self.admin_password {
            log::info!("✅ Admin login: {}", self.admin_email);
            self.issue(&self.admin_email, Role::Admin)
        } else {
            Err(AppError::unauthorized("Invalid credentials"))
        }
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    Ok(hash(password, BCRYPT_COST)?)
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    match verify(password, hashed) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("⚠️ Stored password hash could not be checked: {}", e);
            false
        }
    }
}
