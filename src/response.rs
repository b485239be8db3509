use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Envelope every storefront endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Data of a successful envelope, or a protocol error carrying the backend message.
    pub fn into_data(self) -> AppResult<Option<T>> {
        if self.success && !self.error {
            return Ok(self.data);
        }
        Err(AppError::Protocol(
            self.message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "request was not successful".to_string()),
        ))
    }
}
