//! services/api/src/web/bills.rs
//!
//! Bill listing, the bill-creation flow and the printable receipt.
//!
//! A bill is written as its parent row first and its line items second. The
//! two inserts are not wrapped in a transaction: if the items fail, the bill
//! row stays behind and the failure is logged with its id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use futures::future::try_join_all;
use inventory_core::{
    receipt::{receipt_message, render_receipt_html},
    BillDraft, BillWithItems, PortError,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::web::forms::BillForm;
use crate::web::notice::{
    billing_rejection, port_failure, HandlerResult, Mutation, NoticeBody, ValidatedJson,
};
use crate::web::state::{AppState, CurrentUser};
use crate::web::views::BillView;

async fn load_bills(state: &AppState, user_id: Uuid) -> HandlerResult<Vec<BillView>> {
    let bills = state
        .store
        .list_bills(user_id)
        .await
        .map_err(|e| port_failure(e, "Error fetching bills"))?;

    let bills = try_join_all(bills.into_iter().map(|bill| async move {
        let items = state.store.list_bill_items(bill.id).await?;
        Ok::<_, PortError>(BillWithItems { bill, items })
    }))
    .await
    .map_err(|e| port_failure(e, "Error fetching bill items"))?;

    Ok(bills.into_iter().map(BillView::from).collect())
}

/// GET /bills - Bills newest first, each with its items
#[utoipa::path(
    get,
    path = "/bills",
    responses(
        (status = 200, description = "Bills of the signed-in user", body = [BillView]),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn list_bills_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<Vec<BillView>>> {
    Ok(Json(load_bills(&state, user.id).await?))
}

/// POST /bills - Create a bill from the selected products
#[utoipa::path(
    post,
    path = "/bills",
    request_body = BillForm,
    responses(
        (status = 201, description = "Bill created; body carries the notice and reloaded bills"),
        (status = 404, description = "A selected product does not exist", body = NoticeBody),
        (status = 422, description = "Incomplete form, bad discount or quantity exceeds stock", body = NoticeBody),
        (status = 500, description = "The bill or its items could not be saved", body = NoticeBody)
    )
)]
pub async fn create_bill_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(form): ValidatedJson<BillForm>,
) -> HandlerResult<(StatusCode, Json<Mutation<Vec<BillView>>>)> {
    // 1. Assemble the draft against the current stock of each product
    let mut draft = BillDraft::new(form.customer()).with_discount(form.discount);
    for line in &form.items {
        let product = state
            .store
            .get_product(user.id, line.product_id)
            .await
            .map_err(|e| port_failure(e, "Error fetching product"))?;
        draft
            .add_product(&product, line.quantity)
            .map_err(billing_rejection)?;
    }
    let (new_bill, new_items) = draft.finalize().map_err(billing_rejection)?;

    // 2. Parent row, then its items
    let bill = state
        .store
        .create_bill(user.id, new_bill)
        .await
        .map_err(|e| port_failure(e, "Failed to create bill."))?;

    if let Err(e) = state
        .store
        .create_bill_items(user.id, bill.id, new_items)
        .await
    {
        error!(bill_id = %bill.id, "Bill saved without its items");
        return Err(port_failure(e, "Failed to create bill."));
    }
    info!(user_id = %user.id, bill_id = %bill.id, total = %bill.total, "Bill created");

    // 3. Text the receipt without holding up the response
    match state.notifier.clone() {
        Some(notifier) => {
            let message = receipt_message(&state.config.shop_name, &bill);
            let phone = bill.customer_phone.clone();
            let bill_id = bill.id;
            tokio::spawn(async move {
                if let Err(e) = notifier.send_receipt(&phone, &message).await {
                    error!(%bill_id, "Failed to send receipt message: {:?}", e);
                }
            });
        }
        None => warn!(bill_id = %bill.id, "Receipt messaging is not configured"),
    }

    let bills = load_bills(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(Mutation::success("Bill created successfully.", bills)),
    ))
}

/// GET /bills/{id}/receipt - Printable HTML receipt
#[utoipa::path(
    get,
    path = "/bills/{id}/receipt",
    params(("id" = Uuid, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Receipt page", content_type = "text/html", body = String),
        (status = 404, description = "No such bill", body = NoticeBody)
    )
)]
pub async fn receipt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(bill_id): Path<Uuid>,
) -> HandlerResult<Html<String>> {
    // Items are only fetched for a bill that belongs to the caller.
    let bill = state
        .store
        .get_bill(user.id, bill_id)
        .await
        .map_err(|e| port_failure(e, "Error fetching bill"))?;
    let items = state
        .store
        .list_bill_items(bill.id)
        .await
        .map_err(|e| port_failure(e, "Error fetching bill items"))?;

    Ok(Html(render_receipt_html(
        &state.config.shop_name,
        &BillWithItems { bill, items },
    )))
}
