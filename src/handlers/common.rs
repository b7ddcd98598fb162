use axum::extract::FromRequest;
use serde::Serialize;

use crate::error::AppError;

/// `axum::Json` whose rejections render as `{"error": ...}` like every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// The `{"message": ...}` body used by routes that only confirm success.
#[derive(Serialize, Debug)]
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
