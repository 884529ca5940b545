//! Check-in handler.
//!
//! Decodes the QR token, scans the configured rosters in order for the
//! student, marks today's attendance cell, and pushes a best-effort
//! parent notification. The first match across all rosters wins; rosters
//! without today's date column are skipped, not failed.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rollcall_core::{
    models::{CheckinOutcome, StudentMatch},
    roster,
    time::LocalStamp,
};
use rollcall_line::TextMessage;
use rollcall_sheets::SheetsError;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{pages, AppState};

/// Query parameters of the attend endpoint.
#[derive(Debug, Deserialize)]
pub struct AttendQuery {
    /// Base64-encoded student ID from the QR code.
    pub token: Option<String>,
}

/// Check-in endpoint handler.
///
/// Responds with HTML in every outcome: 400 for a missing token, 200 for
/// a recorded or duplicate check-in, 404 when no roster matches, and a
/// generic 500 when an upstream call fails (details stay in the log).
#[instrument(name = "attend", skip(state, query))]
pub async fn attend(State(state): State<AppState>, Query(query): Query<AttendQuery>) -> Response {
    let Some(token) = query.token else {
        warn!("check-in request without token");
        return (StatusCode::BAD_REQUEST, Html(pages::missing_token())).into_response();
    };

    let Some(student_id) = decode_token(&token) else {
        // Corrupted tokens skip the rosters entirely and render not-found.
        warn!("check-in token is not valid base64 UTF-8");
        return (StatusCode::NOT_FOUND, Html(pages::not_found(&token))).into_response();
    };

    let stamp = LocalStamp::now(state.clock.as_ref());
    info!(student_id = %student_id, today = %stamp.today, "processing check-in");

    match run_checkin(&state, &student_id, &stamp).await {
        Ok(CheckinOutcome::Completed { student_id, name, class, datetime, notified }) => (
            StatusCode::OK,
            Html(pages::checkin_success(&datetime, &student_id, &name, &class, notified)),
        )
            .into_response(),
        Ok(CheckinOutcome::AlreadyCheckedIn { recorded }) => {
            (StatusCode::OK, Html(pages::already_checked_in(&recorded))).into_response()
        },
        Ok(CheckinOutcome::NotFound { student_id }) => {
            info!(student_id = %student_id, "student not found in any roster");
            (StatusCode::NOT_FOUND, Html(pages::not_found(&student_id))).into_response()
        },
        Err(e) => {
            error!(error = %e, "check-in failed on upstream call");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::server_error())).into_response()
        },
    }
}

/// Decodes a QR token into a trimmed student ID.
fn decode_token(token: &str) -> Option<String> {
    let bytes = BASE64.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let student_id = decoded.trim();
    if student_id.is_empty() {
        return None;
    }
    Some(student_id.to_string())
}

/// Scans the rosters in configured order and records attendance on the
/// first match.
///
/// Upstream errors propagate to the handler's single top-level mapping;
/// there are no retries. Only the parent notification is allowed to fail
/// without consequence: the attendance write has already committed by
/// then.
async fn run_checkin(
    state: &AppState,
    student_id: &str,
    stamp: &LocalStamp,
) -> Result<CheckinOutcome, SheetsError> {
    for sheet_id in state.config.roster_sheet_ids() {
        let title = state.sheets.first_sheet_title(&sheet_id).await?;

        let Some(grid) = state.sheets.read_grid(&sheet_id, &title).await? else {
            debug!(sheet = %sheet_id, %title, "roster has no data, skipping");
            continue;
        };

        let Some(columns) = grid.columns(&stamp.today) else {
            debug!(sheet = %sheet_id, %title, "no student ID or date column for today, skipping");
            continue;
        };

        let Some(found) = grid.find_student(&columns, student_id) else {
            continue;
        };

        info!(sheet = %sheet_id, %title, row = found.row_index, "student matched");

        if roster::is_checked_in(&found.date_cell) {
            info!(recorded = %found.date_cell, "student already checked in today");
            return Ok(CheckinOutcome::AlreadyCheckedIn { recorded: found.date_cell });
        }

        let Some(cell) = roster::cell_ref(columns.date, found.row_index) else {
            warn!(column = columns.date, "date column beyond addressable range, skipping roster");
            continue;
        };

        state
            .sheets
            .write_cell(&sheet_id, &title, &cell, &roster::attended_value(&stamp.time))
            .await?;

        let class = found.class.clone().unwrap_or_else(|| title.clone());
        let notified = notify_parent(state, &found, &class, stamp).await;

        return Ok(CheckinOutcome::Completed {
            student_id: student_id.to_string(),
            name: found.name,
            class,
            datetime: stamp.datetime.clone(),
            notified,
        });
    }

    Ok(CheckinOutcome::NotFound { student_id: student_id.to_string() })
}

/// Best-effort parent notification; returns whether one was delivered.
///
/// The attendance write has already happened, so nothing here may fail
/// the request: missing recipient, missing channel token, and delivery
/// errors all reduce to a log line.
async fn notify_parent(
    state: &AppState,
    found: &StudentMatch,
    class: &str,
    stamp: &LocalStamp,
) -> bool {
    let Some(recipient) = found.parent_line_id.as_deref() else {
        debug!("no parent LINE ID on the matched row");
        return false;
    };

    if !state.line.can_send() {
        info!("LINE channel token not configured, skipping parent notification");
        return false;
    }

    let text = format!(
        "【簽到通知】\n您的孩子 {} 已於 {} 完成簽到。\n班級：{}\n\n祝學習愉快！",
        found.name, stamp.datetime, class
    );

    match state.line.push(recipient, &[TextMessage::new(text)]).await {
        Ok(()) => {
            info!("parent notification delivered");
            true
        },
        Err(e) => {
            warn!(error = %e, "parent notification failed");
            false
        },
    }
}
