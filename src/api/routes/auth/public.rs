//! Public types for the auth API
use serde::{Deserialize, Serialize};

/// Query Google appends when redirecting back after consent. On denial
/// there is an `error` and no `code`.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct UserResponse {
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}
