use serde::{Deserialize, Serialize};

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // user email
    pub exp: i64,    // expires at (unix timestamp)
    #[serde(default)]
    pub iat: i64, // issued at (unix timestamp)
}
