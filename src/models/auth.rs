use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub username: String,
}

impl LoginResponse {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            province: self.province.clone(),
            role: self.role.clone(),
            district: self.district.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub province: String,
    pub district: String,
    pub role: String,
    pub password: String,
}

/// Body of signup, forgot-password and reset-password responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Error body returned by the remote API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub province: String,
    pub role: String,
    pub district: String,
}
