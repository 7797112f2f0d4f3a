//! Success bodies shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Bare acknowledgement: `{"success": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ack {
    /// Always `true`.
    pub success: bool,
}

impl Ack {
    pub const OK: Self = Self { success: true };
}

/// Acknowledgement carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageAck {
    /// Always `true`.
    pub success: bool,
    /// What happened.
    pub message: String,
}

impl MessageAck {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
