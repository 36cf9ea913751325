//! Contact form route.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use maplewood_core::Email;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Maximum accepted message length.
const MAX_MESSAGE_LENGTH: usize = 5_000;

/// Contact form submission.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// Acknowledgement body.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
}

/// Handle a contact form submission.
///
/// Sends an email notification to the clinic inbox. Responds 503 when no
/// SMTP transport is configured.
///
/// POST /contact
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<ContactRequest>,
) -> Result<Json<ContactResponse>> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let message = input.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }
    if message.len() > MAX_MESSAGE_LENGTH {
        return Err(AppError::BadRequest("message is too long".to_string()));
    }

    let email = Email::parse(&input.email)
        .map_err(|_| AppError::BadRequest("invalid email address".to_string()))?;

    let Some(service) = state.email() else {
        return Err(AppError::Unavailable(
            "contact form is not available right now".to_string(),
        ));
    };

    service
        .send_contact_notification(name, email.as_str(), input.phone.as_deref(), message)
        .await?;

    tracing::info!(from = %email, "Contact form submission forwarded");

    Ok(Json(ContactResponse { status: "sent" }))
}
