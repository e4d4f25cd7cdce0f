use serde::{Deserialize, Serialize};

/// JWT payload. `sub` is the user id, `exp` a unix timestamp, `admin` a
/// convenience flag for clients; authorization decisions re-check the role
/// against the database.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
}

/// Verified claims extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
