//! services/api/src/web/stock.rs
//!
//! Stock transactions. Outbound movements are checked against the product's
//! current stock before anything is written; the stock level itself is kept
//! up to date by the backend.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use inventory_core::{stock::check_movement, NewStockTransaction, StockMovement};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::forms::StockForm;
use crate::web::notice::{
    port_failure, reject, stock_rejection, HandlerResult, Mutation, NoticeBody, ValidatedJson,
};
use crate::web::state::{AppState, CurrentUser};
use crate::web::views::{ProductView, StockTransactionView};

/// The stock screen: the transaction history plus the products for its form.
#[derive(Serialize, ToSchema)]
pub struct StockPage {
    pub transactions: Vec<StockTransactionView>,
    pub products: Vec<ProductView>,
}

async fn load_transactions(
    state: &AppState,
    user_id: Uuid,
) -> HandlerResult<Vec<StockTransactionView>> {
    let transactions = state
        .store
        .list_stock_transactions(user_id)
        .await
        .map_err(|e| port_failure(e, "Error fetching stock transactions"))?;
    Ok(transactions
        .into_iter()
        .map(StockTransactionView::from)
        .collect())
}

/// GET /stock - Transactions, newest first
#[utoipa::path(
    get,
    path = "/stock",
    responses(
        (status = 200, description = "Stock transactions and products", body = StockPage),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn list_stock_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<StockPage>> {
    let (transactions, products) = tokio::try_join!(
        state.store.list_stock_transactions(user.id),
        state.store.list_products(user.id),
    )
    .map_err(|e| port_failure(e, "Error fetching stock transactions"))?;

    Ok(Json(StockPage {
        transactions: transactions
            .into_iter()
            .map(StockTransactionView::from)
            .collect(),
        products: products.into_iter().map(ProductView::from).collect(),
    }))
}

/// POST /stock - Record a stock movement
#[utoipa::path(
    post,
    path = "/stock",
    request_body = StockForm,
    responses(
        (status = 201, description = "Transaction recorded; body carries the notice and reloaded transactions"),
        (status = 404, description = "No such product", body = NoticeBody),
        (status = 422, description = "Invalid input or quantity exceeds available stock", body = NoticeBody)
    )
)]
pub async fn create_stock_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(form): ValidatedJson<StockForm>,
) -> HandlerResult<(StatusCode, Json<Mutation<Vec<StockTransactionView>>>)> {
    let product_id = form
        .product_id
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "Product is required"))?;
    let movement = StockMovement::from(form.movement);

    let product = state
        .store
        .get_product(user.id, product_id)
        .await
        .map_err(|e| port_failure(e, "Error fetching product"))?;
    check_movement(&product, movement, form.quantity).map_err(stock_rejection)?;

    let transaction = state
        .store
        .create_stock_transaction(
            user.id,
            NewStockTransaction {
                product_id,
                sheet_number: form.sheet_number.trim().to_string(),
                quantity: form.quantity,
                movement,
                notes: form.notes(),
                transaction_date: Utc::now(),
            },
        )
        .await
        .map_err(|e| port_failure(e, "Error saving transaction"))?;
    info!(
        user_id = %user.id,
        transaction_id = %transaction.id,
        %movement,
        quantity = transaction.quantity,
        "Stock transaction recorded"
    );

    let transactions = load_transactions(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(Mutation::success(
            "Stock transaction created successfully",
            transactions,
        )),
    ))
}
