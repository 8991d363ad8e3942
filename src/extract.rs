// src/extract.rs

use crate::errors::AppError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections go through `AppError`, so malformed or
/// mistyped bodies get the usual 400 error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
