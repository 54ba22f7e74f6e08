//! API response types.
//!
//! Mutating operations answer in one of two transports: a JSON envelope
//! `{success, data, notices}` for programmatic calls, or an HTTP
//! redirect to a caller-supplied URL for traditional form submissions.
//! In redirect mode the queued notices stay put and are rendered on the
//! next page load.

use axum::{
    Json,
    response::{IntoResponse, Redirect, Response},
};
use faved_db::entities::notice;
use serde_json::{Value, json};

use crate::middleware::AppState;

/// Render drained notices as HTML fragments.
#[must_use]
pub fn render_notices(notices: &[notice::Model]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let mut out = String::from("<div class=\"favorites-notices\">");
    for n in notices {
        let kind = match n.kind {
            notice::NoticeKind::Error => "error",
            notice::NoticeKind::Success => "success",
            notice::NoticeKind::Info => "info",
        };
        out.push_str(&format!(
            "<p class=\"favorites-notice favorites-notice-{kind}\">{}</p>",
            n.message
        ));
    }
    out.push_str("</div>");
    out
}

/// Finish an action: redirect when the form asked for it, otherwise
/// drain the user's notices into a JSON envelope.
pub async fn respond(
    state: &AppState,
    user_id: &str,
    success: bool,
    data: Value,
    redirect: Option<&str>,
) -> Response {
    if let Some(url) = redirect.filter(|u| !u.is_empty()) {
        // Notices stay queued; the next page load displays them.
        return Redirect::to(url).into_response();
    }

    let notices = match state.notice_service.drain(user_id).await {
        Ok(notices) => notices,
        Err(e) => {
            tracing::warn!(error = %e, user_id, "Failed to drain notices");
            Vec::new()
        }
    };

    Json(json!({
        "success": success,
        "data": data,
        "notices": render_notices(&notices),
    }))
    .into_response()
}

/// Queue an error notice, swallowing storage failures. Nothing is
/// allowed to raise past the action dispatcher.
pub async fn queue_error(state: &AppState, user_id: &str, message: &str) {
    if let Err(e) = state.notice_service.error(user_id, message).await {
        tracing::warn!(error = %e, user_id, "Failed to queue error notice");
    }
}

/// Queue a success notice, swallowing storage failures.
pub async fn queue_success(state: &AppState, user_id: &str, message: &str) {
    if let Err(e) = state.notice_service.success(user_id, message).await {
        tracing::warn!(error = %e, user_id, "Failed to queue success notice");
    }
}

/// Queue an info notice, swallowing storage failures.
pub async fn queue_info(state: &AppState, user_id: &str, message: &str) {
    if let Err(e) = state.notice_service.info(user_id, message).await {
        tracing::warn!(error = %e, user_id, "Failed to queue info notice");
    }
}
