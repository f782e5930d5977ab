use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use relayform_notification::ContactNotice;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::routes::AppState;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    fn accepted() -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                error: None,
            }),
        )
            .into_response()
    }

    fn rejected(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                success: false,
                error: Some(error.into()),
            }),
        )
            .into_response()
    }
}

/// Accepts the url-encoded body the form submitter sends, or JSON.
pub struct ContactPayload(pub ContactNotice);

impl<S: Send + Sync> FromRequest<S> for ContactPayload {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let notice = if is_json {
            Json::<ContactNotice>::from_request(req, state)
                .await
                .map(|Json(notice)| notice)
                .map_err(|e| e.body_text())
        } else {
            Form::<ContactNotice>::from_request(req, state)
                .await
                .map(|Form(notice)| notice)
                .map_err(|e| e.body_text())
        };

        notice.map(Self).map_err(|reason| {
            tracing::warn!(reason = %reason, "Rejected contact payload");
            ContactResponse::rejected(StatusCode::BAD_REQUEST, INVALID_BODY)
        })
    }
}

pub async fn action(
    State(app_state): State<AppState>,
    ContactPayload(notice): ContactPayload,
) -> Response {
    if notice.missing_required() {
        return ContactResponse::rejected(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    }

    if notice.validate().is_err() {
        return ContactResponse::rejected(StatusCode::BAD_REQUEST, INVALID_EMAIL);
    }

    tracing::info!(
        name = %notice.name,
        email = %notice.email,
        category = notice.category.as_deref().unwrap_or_default(),
        "Contact form received"
    );

    match app_state.email.send_contact(&notice).await {
        Ok(()) => ContactResponse::accepted(),
        Err(e) => {
            tracing::error!(error = %e, "Contact notification failed");
            ContactResponse::rejected(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
