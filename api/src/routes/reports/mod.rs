//! Route group for `/api/reports`: the daily report, the ranged summary,
//! the CSV export and the printable grid. All four read the same
//! reconciliation pipeline and differ only in aggregation and rendering.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod get;

use get::{daily_report, export_daily_csv, print_report, summary_report};

/// Builds the `/reports` route group (all authenticated, class-scoped).
///
/// - `GET /reports/daily` → `daily_report`
/// - `GET /reports/summary` → `summary_report`
/// - `GET /reports/export` → `export_daily_csv`
/// - `GET /reports/print` → `print_report`
pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(daily_report))
        .route("/summary", get(summary_report))
        .route("/export", get(export_daily_csv))
        .route("/print", get(print_report))
}
