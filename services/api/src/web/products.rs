//! services/api/src/web/products.rs
//!
//! Product CRUD, the paged name search used by the bill form, and the
//! low-stock listing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::forms::ProductForm;
use crate::web::notice::{
    port_failure, reject, HandlerResult, Mutation, NoticeBody, ValidatedJson,
};
use crate::web::state::{AppState, CurrentUser};
use crate::web::views::{CategoryView, ProductView};

/// Products shown per page of the bill form's product picker.
pub const SEARCH_PAGE_SIZE: i64 = 4;

//=========================================================================================
// Payloads
//=========================================================================================

/// The products screen: every product plus the categories for its form.
#[derive(Serialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryView>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive fragment of the product name.
    #[serde(default)]
    pub q: String,
    /// 1-based page number.
    pub page: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchPage {
    pub products: Vec<ProductView>,
    pub page: i64,
    pub has_more: bool,
}

type ProductMutation = Json<Mutation<Vec<ProductView>>>;

async fn load_products(state: &AppState, user_id: Uuid) -> HandlerResult<Vec<ProductView>> {
    let products = state
        .store
        .list_products(user_id)
        .await
        .map_err(|e| port_failure(e, "Error fetching products"))?;
    Ok(products.into_iter().map(ProductView::from).collect())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /products - Products ordered by name, with their category names
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Products and categories", body = ProductPage),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn list_products_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<ProductPage>> {
    let (products, categories) = tokio::try_join!(
        state.store.list_products(user.id),
        state.store.list_categories(user.id),
    )
    .map_err(|e| port_failure(e, "Error fetching products"))?;

    Ok(Json(ProductPage {
        products: products.into_iter().map(ProductView::from).collect(),
        categories: categories.into_iter().map(CategoryView::from).collect(),
    }))
}

/// GET /products/search - One page of products whose name matches `q`
#[utoipa::path(
    get,
    path = "/products/search",
    params(SearchParams),
    responses(
        (status = 200, description = "A page of matching products", body = SearchPage),
        (status = 422, description = "Page is out of range", body = NoticeBody),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn search_products_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SearchParams>,
) -> HandlerResult<Json<SearchPage>> {
    let page = params.page.unwrap_or(1).max(1);
    let offset = (page - 1)
        .checked_mul(SEARCH_PAGE_SIZE)
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "Page is out of range"))?;

    // One extra row tells us whether a next page exists.
    let mut products = state
        .store
        .search_products(user.id, params.q.trim(), offset, SEARCH_PAGE_SIZE + 1)
        .await
        .map_err(|e| port_failure(e, "Error searching products"))?;
    let has_more = products.len() as i64 > SEARCH_PAGE_SIZE;
    products.truncate(SEARCH_PAGE_SIZE as usize);

    Ok(Json(SearchPage {
        products: products.into_iter().map(ProductView::from).collect(),
        page,
        has_more,
    }))
}

/// GET /products/low-stock - Products at or below their minimum stock
#[utoipa::path(
    get,
    path = "/products/low-stock",
    responses(
        (status = 200, description = "Low-stock products", body = [ProductView]),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn low_stock_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<Vec<ProductView>>> {
    let products = state
        .store
        .low_stock_products(user.id)
        .await
        .map_err(|e| port_failure(e, "Error fetching low-stock products"))?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// POST /products - Create a product
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductForm,
    responses(
        (status = 201, description = "Product created; body carries the notice and reloaded products"),
        (status = 422, description = "Invalid form input or duplicate SKU", body = NoticeBody)
    )
)]
pub async fn create_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(form): ValidatedJson<ProductForm>,
) -> HandlerResult<(StatusCode, ProductMutation)> {
    let new_product = form
        .into_new()
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "Category is required"))?;

    let product = state
        .store
        .create_product(user.id, new_product)
        .await
        .map_err(|e| port_failure(e, "Error saving product"))?;
    info!(user_id = %user.id, product_id = %product.id, sku = %product.sku, "Product created");

    let products = load_products(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(Mutation::success("Product created successfully", products)),
    ))
}

/// PUT /products/{id} - Update a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductForm,
    responses(
        (status = 200, description = "Product updated; body carries the notice and reloaded products"),
        (status = 404, description = "No such product", body = NoticeBody),
        (status = 422, description = "Invalid form input", body = NoticeBody)
    )
)]
pub async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<ProductForm>,
) -> HandlerResult<ProductMutation> {
    let new_product = form
        .into_new()
        .ok_or_else(|| reject(StatusCode::UNPROCESSABLE_ENTITY, "Category is required"))?;

    state
        .store
        .update_product(user.id, product_id, new_product)
        .await
        .map_err(|e| port_failure(e, "Error saving product"))?;

    let products = load_products(&state, user.id).await?;
    Ok(Json(Mutation::success(
        "Product updated successfully",
        products,
    )))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted; body carries the notice and reloaded products"),
        (status = 422, description = "Product is still referenced", body = NoticeBody)
    )
)]
pub async fn delete_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> HandlerResult<ProductMutation> {
    state
        .store
        .delete_product(user.id, product_id)
        .await
        .map_err(|e| port_failure(e, "Error deleting product"))?;
    info!(user_id = %user.id, %product_id, "Product deleted");

    let products = load_products(&state, user.id).await?;
    Ok(Json(Mutation::success(
        "Product deleted successfully",
        products,
    )))
}
