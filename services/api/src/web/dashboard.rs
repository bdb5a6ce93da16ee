//! services/api/src/web/dashboard.rs

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use inventory_core::summarize;
use std::sync::Arc;

use crate::web::notice::{port_failure, HandlerResult, NoticeBody};
use crate::web::state::{AppState, CurrentUser};
use crate::web::views::DashboardView;

/// GET /dashboard - Stats cards and the 7-day sales trend
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardView),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<DashboardView>> {
    let (records, total_products, low_stock) = tokio::try_join!(
        state.store.list_sales_records(user.id),
        state.store.count_products(user.id),
        state.store.low_stock_products(user.id),
    )
    .map_err(|e| port_failure(e, "Error fetching dashboard data"))?;

    let stats = summarize(
        &records,
        total_products,
        low_stock.len(),
        Utc::now().date_naive(),
    );
    Ok(Json(stats.into()))
}
