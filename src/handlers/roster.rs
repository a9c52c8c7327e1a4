//! Bulk roster import handler
//!
//! The spreadsheet is parsed client-side; the request carries the raw rows as
//! JSON objects keyed by the original column headers. Rows are normalized,
//! validated, and the valid subset imported sequentially with per-row
//! failure reporting.

use axum::{extract::State, response::Json, Extension};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::auth::{Capability, CurrentUser, DbConn};
use crate::entity::department;
use crate::error::{AppError, AppResult};
use crate::roster::{
    normalize_row, run_import, validate_row, ImportReport, RosterKind, RowResult, SeaOrmRosterSink,
};
use crate::routes::ApiResponse;

/// Import request: roster kind plus raw spreadsheet rows
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub kind: String,
    pub rows: Vec<Map<String, Value>>,
}

/// Import response data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportData {
    pub total_rows: usize,
    pub report: ImportReport,
    /// Rows excluded from the batch, with their errors
    pub invalid_rows: Vec<RowResult>,
    /// Imported rows that carried warnings
    pub warning_rows: Vec<RowResult>,
}

/// POST /api/roster/import
pub async fn import_roster(
    State(state): State<crate::state::AppState>,
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ImportRequest>,
) -> AppResult<Json<ApiResponse<ImportData>>> {
    if !user.can(Capability::BulkImport) {
        return Err(AppError::Forbidden);
    }

    let Some(kind) = RosterKind::parse(&req.kind) else {
        return Err(AppError::BadRequest(format!(
            "unknown roster kind '{}' (expected staff or student)",
            req.kind
        )));
    };

    if req.rows.is_empty() {
        return Err(AppError::BadRequest("no rows to import".to_string()));
    }

    // Reference set of valid department codes for the validator
    let known_codes: BTreeSet<String> = department::Entity::find()
        .all(&*db)
        .await?
        .into_iter()
        .map(|d| d.code)
        .collect();

    // Data rows start at spreadsheet row 2, after the header row
    let results: Vec<RowResult> = req
        .rows
        .iter()
        .enumerate()
        .map(|(i, raw)| validate_row(normalize_row(raw), i + 2, &known_codes))
        .collect();

    let total_rows = results.len();
    let (valid, invalid): (Vec<RowResult>, Vec<RowResult>) =
        results.into_iter().partition(|r| r.is_valid);

    let records: Vec<_> = valid.iter().map(|r| r.data.clone()).collect();
    let sink = SeaOrmRosterSink::new(db.0.clone());
    let report = run_import(&sink, state.notifier.as_ref(), &records, kind).await;

    let warning_rows: Vec<RowResult> = valid
        .into_iter()
        .filter(|r| !r.warnings.is_empty())
        .collect();

    tracing::info!(
        "Roster import by user {}: {} rows, {} imported, {} failed, {} invalid",
        user.id,
        total_rows,
        report.total_successful,
        report.total_failed,
        invalid.len()
    );

    let message = format!(
        "{} imported, {} failed, {} invalid",
        report.total_successful,
        report.total_failed,
        invalid.len()
    );

    Ok(Json(ApiResponse::success_with_message(
        message,
        ImportData {
            total_rows,
            report,
            invalid_rows: invalid,
            warning_rows,
        },
    )))
}
