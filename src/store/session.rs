use log::info;

use crate::db::SharedSlot;
use crate::errors::AppError;

pub const USERNAME_KEY: &str = "username";

/// A non-empty `username` marker is the whole session.
pub struct SessionGate {
    slot: SharedSlot,
}

impl SessionGate {
    pub fn new(slot: SharedSlot) -> Self {
        SessionGate { slot }
    }

    pub fn current_user(&self) -> Result<Option<String>, AppError> {
        Ok(self.slot.get(USERNAME_KEY)?.filter(|name| !name.is_empty()))
    }

    pub fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.current_user()?.is_some())
    }

    /// Display name of the signed-in operator, or `Unauthorized`.
    pub fn require(&self) -> Result<String, AppError> {
        self.current_user()?
            .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))
    }

    pub fn login(&self, username: &str) -> Result<(), AppError> {
        self.slot.set(USERNAME_KEY, username)?;
        info!("Operator '{}' logged in", username);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.slot.remove(USERNAME_KEY)?;
        info!("Operator logged out");
        Ok(())
    }
}
