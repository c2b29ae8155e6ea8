use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub view: &'static str,
    pub username: String,
    pub welcome: String,
}

impl HomeView {
    pub fn new(username: String) -> Self {
        HomeView {
            view: "home",
            welcome: format!("Welcome, {}", username),
            username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}
