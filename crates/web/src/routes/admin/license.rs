//! License key management handlers.

use askama::Template;
use askama_web::WebTemplate;
use atribot_core::inventory::{
    CSV_FILENAME, InventoryError, InventoryFilter, LicenseRecord, MAX_BATCH, MAX_INVENTORY,
};
use atribot_core::qr::{card_for, error_correction_label};
use atribot_core::{KeyStatus, LevelId};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use super::{FlashQuery, flash_url};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Learner;
use crate::routes::{LevelView, parse_level_param};
use crate::state::AppState;

const LIST_PATH: &str = "/admin/license";

// =============================================================================
// Query & Form Types
// =============================================================================

/// License table filters, shared by the list and the CSV export.
#[derive(Debug, Default, Deserialize)]
pub struct LicenseQuery {
    pub q: Option<String>,
    pub level: Option<String>,
    pub status: Option<String>,
}

impl LicenseQuery {
    fn filter(&self) -> InventoryFilter {
        InventoryFilter {
            search: self.q.clone().unwrap_or_default(),
            level: parse_level_param(self.level.as_deref()),
            status: self
                .status
                .as_deref()
                .and_then(|s| s.trim().parse::<KeyStatus>().ok()),
        }
    }
}

/// Key generation form.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub level: String,
    pub count: String,
}

// =============================================================================
// View Models
// =============================================================================

/// One row in the license table.
#[derive(Debug, Clone)]
pub struct LicenseRow {
    pub id: String,
    pub key: String,
    pub level_name: &'static str,
    pub level_number: u8,
    pub used: bool,
    pub status: &'static str,
    pub assigned_to: String,
    pub created_at: String,
}

impl From<&LicenseRecord> for LicenseRow {
    fn from(record: &LicenseRecord) -> Self {
        Self {
            id: record.id.to_string(),
            key: record.key.clone(),
            level_name: record.level.name(),
            level_number: record.level.number(),
            used: record.used,
            status: record.status().label(),
            assigned_to: record.assigned_to.clone().unwrap_or_else(|| "-".to_string()),
            created_at: record.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// License list page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/license.html")]
pub struct LicenseIndexTemplate {
    pub signed_in: bool,
    pub current_path: &'static str,
    pub rows: Vec<LicenseRow>,
    pub total: usize,
    pub levels: Vec<LevelView>,
    pub search: String,
    pub level: String,
    pub status: String,
    /// Query string reused by the export link.
    pub export_query: String,
    pub max_batch: u32,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

/// QR card page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/qr.html")]
pub struct QrTemplate {
    pub signed_in: bool,
    pub current_path: &'static str,
    pub row: LicenseRow,
    pub payload: String,
    /// Inline `<svg>` of the code.
    pub qr_svg: String,
    pub error_correction: char,
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "generated" => Some("License keys generated."),
        _ => None,
    }
}

fn error_message(code: &str) -> Option<String> {
    match code {
        "batch_size" => Some(format!(
            "Choose a level and a number of keys between 1 and {MAX_BATCH}."
        )),
        "full" => Some(format!(
            "The inventory is full. It holds at most {MAX_INVENTORY} keys."
        )),
        _ => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// License list page handler.
#[instrument(skip_all)]
pub async fn index(
    _learner: Learner,
    State(state): State<AppState>,
    Query(query): Query<LicenseQuery>,
    Query(flash): Query<FlashQuery>,
) -> impl IntoResponse {
    let filter = query.filter();
    let records = state.inventory().list(&filter).await;

    LicenseIndexTemplate {
        signed_in: true,
        current_path: LIST_PATH,
        total: state.inventory().stats().await.total,
        rows: records.iter().map(LicenseRow::from).collect(),
        levels: LevelView::all(None),
        search: filter.search.clone(),
        level: filter.level.map(|l| l.as_str().to_string()).unwrap_or_default(),
        status: filter.status.map(|s| s.to_string()).unwrap_or_default(),
        export_query: export_query(&filter),
        max_batch: MAX_BATCH,
        notice: flash.notice.as_deref().and_then(notice_message),
        error: flash.error.as_deref().and_then(error_message),
    }
}

/// Generate a batch of keys and return to the list.
#[instrument(skip_all, fields(level = %form.level, count = %form.count))]
pub async fn generate(
    _learner: Learner,
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Redirect {
    let level = form.level.trim().parse::<LevelId>().ok();
    let count = form.count.trim().parse::<u32>().ok();
    let (Some(level), Some(count)) = (level, count) else {
        return Redirect::to(&flash_url(LIST_PATH, "error", "batch_size"));
    };

    let today = chrono::Utc::now().date_naive();
    match state.inventory().generate(level, count, today).await {
        Ok(batch) => {
            add_breadcrumb(
                "admin",
                "License keys generated",
                Some(&[("level", level.as_str()), ("count", &batch.len().to_string())]),
            );
            Redirect::to(&flash_url(LIST_PATH, "notice", "generated"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Key generation rejected");
            let code = match e {
                InventoryError::BatchSize(_) => "batch_size",
                InventoryError::Full => "full",
            };
            Redirect::to(&flash_url(LIST_PATH, "error", code))
        }
    }
}

/// Download the filtered license table as CSV.
#[instrument(skip_all)]
pub async fn export(
    _learner: Learner,
    State(state): State<AppState>,
    Query(query): Query<LicenseQuery>,
) -> Response {
    let csv = state.inventory().export(&query.filter()).await;
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILENAME}\""),
            ),
        ],
        csv,
    )
        .into_response()
}

/// QR card for one key.
#[instrument(skip(_learner, state))]
pub async fn qr(
    _learner: Learner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<QrTemplate> {
    let not_found = || AppError::NotFound(format!("License key {id}"));
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let record = state.inventory().find(id).await.ok_or_else(not_found)?;

    let card = card_for(&state.config().qr_base_url, &record.key)?;

    Ok(QrTemplate {
        signed_in: true,
        current_path: LIST_PATH,
        row: LicenseRow::from(&record),
        payload: card.payload,
        qr_svg: card.svg,
        error_correction: error_correction_label(),
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Query string that reproduces `filter` on the export link.
fn export_query(filter: &InventoryFilter) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    if !filter.search.trim().is_empty() {
        params.append_pair("q", filter.search.trim());
    }
    if let Some(level) = filter.level {
        params.append_pair("level", level.as_str());
    }
    if let Some(status) = filter.status {
        params.append_pair("status", &status.to_string());
    }
    params.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builds_filter() {
        let query = LicenseQuery {
            q: Some("ab12".to_string()),
            level: Some("LEVEL_2".to_string()),
            status: Some("unused".to_string()),
        };
        let filter = query.filter();
        assert_eq!(filter.search, "ab12");
        assert_eq!(filter.level, Some(LevelId::Level2));
        assert_eq!(filter.status, Some(KeyStatus::Available));
    }

    #[test]
    fn test_all_values_mean_no_filter() {
        let query = LicenseQuery {
            q: None,
            level: Some("ALL".to_string()),
            status: Some("all".to_string()),
        };
        let filter = query.filter();
        assert_eq!(filter.level, None);
        assert_eq!(filter.status, None);
    }

    #[test]
    fn test_export_query_round_trips_filter() {
        let filter = InventoryFilter {
            search: "AB 12".to_string(),
            level: Some(LevelId::Level1),
            status: Some(KeyStatus::Used),
        };
        assert_eq!(export_query(&filter), "q=AB+12&level=LEVEL_1&status=used");
        assert_eq!(export_query(&InventoryFilter::default()), "");
    }

    #[test]
    fn test_error_codes_have_messages() {
        assert!(error_message("batch_size").is_some());
        assert!(error_message("full").unwrap().contains(&MAX_INVENTORY.to_string()));
        assert_eq!(error_message("<b>"), None);
    }

    #[test]
    fn test_row_for_unassigned_key() {
        let record = LicenseRecord::new(
            "AB12-CD34-EF56-GH02",
            LevelId::Level2,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
        );
        let row = LicenseRow::from(&record);
        assert_eq!(row.assigned_to, "-");
        assert_eq!(row.status, "Available");
        assert_eq!(row.created_at, "2024-01-16");
    }
}
