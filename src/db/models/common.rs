//! Types shared across API resources.

use serde::Serialize;

/// Plain acknowledgement body for operations that return no record.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
