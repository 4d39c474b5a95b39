use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller role. Stored and sent to clients as its integer code; the token
/// carries the role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    Doctor,
    Patient,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "Doctor",
            Role::Patient => "Patient",
            Role::Assistant => "Assistant",
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        match role {
            Role::Doctor => 0,
            Role::Patient => 1,
            Role::Assistant => 2,
        }
    }
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Role::Doctor),
            1 => Ok(Role::Patient),
            2 => Ok(Role::Assistant),
            other => Err(format!("Unknown role code {}", other)),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Doctor" => Ok(Role::Doctor),
            "Patient" => Ok(Role::Patient),
            "Assistant" => Ok(Role::Assistant),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Token payload. Claim names follow the short forms the existing frontend
/// and token consumers already understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub nameid: String,
    pub unique_name: String,
    pub role: String,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated caller, placed in request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
