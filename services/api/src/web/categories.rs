//! services/api/src/web/categories.rs
//!
//! Category CRUD. Every successful write answers with the reloaded list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::web::forms::CategoryForm;
use crate::web::notice::{port_failure, HandlerResult, Mutation, NoticeBody, ValidatedJson};
use crate::web::state::{AppState, CurrentUser};
use crate::web::views::CategoryView;

type CategoryMutation = Json<Mutation<Vec<CategoryView>>>;

async fn load_categories(state: &AppState, user_id: Uuid) -> HandlerResult<Vec<CategoryView>> {
    let categories = state
        .store
        .list_categories(user_id)
        .await
        .map_err(|e| port_failure(e, "Error fetching categories"))?;
    Ok(categories.into_iter().map(CategoryView::from).collect())
}

/// GET /categories - All categories, ordered by name
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories of the signed-in user", body = [CategoryView]),
        (status = 401, description = "No active session", body = NoticeBody)
    )
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> HandlerResult<Json<Vec<CategoryView>>> {
    Ok(Json(load_categories(&state, user.id).await?))
}

/// POST /categories - Create a category
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryForm,
    responses(
        (status = 201, description = "Category created; body carries the notice and reloaded categories"),
        (status = 422, description = "Invalid form input", body = NoticeBody)
    )
)]
pub async fn create_category_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(form): ValidatedJson<CategoryForm>,
) -> HandlerResult<(StatusCode, CategoryMutation)> {
    let category = state
        .store
        .create_category(user.id, form.into_new())
        .await
        .map_err(|e| port_failure(e, "Error saving category"))?;
    info!(user_id = %user.id, category_id = %category.id, "Category created");

    let categories = load_categories(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(Mutation::success("Category created successfully", categories)),
    ))
}

/// PUT /categories/{id} - Rename or re-describe a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryForm,
    responses(
        (status = 200, description = "Category updated; body carries the notice and reloaded categories"),
        (status = 404, description = "No such category", body = NoticeBody),
        (status = 422, description = "Invalid form input", body = NoticeBody)
    )
)]
pub async fn update_category_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(category_id): Path<Uuid>,
    ValidatedJson(form): ValidatedJson<CategoryForm>,
) -> HandlerResult<CategoryMutation> {
    state
        .store
        .update_category(user.id, category_id, form.into_new())
        .await
        .map_err(|e| port_failure(e, "Error saving category"))?;

    let categories = load_categories(&state, user.id).await?;
    Ok(Json(Mutation::success(
        "Category updated successfully",
        categories,
    )))
}

/// DELETE /categories/{id}
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted; body carries the notice and reloaded categories"),
        (status = 422, description = "Category is still referenced by products", body = NoticeBody)
    )
)]
pub async fn delete_category_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(category_id): Path<Uuid>,
) -> HandlerResult<CategoryMutation> {
    state
        .store
        .delete_category(user.id, category_id)
        .await
        .map_err(|e| port_failure(e, "Error deleting category"))?;
    info!(user_id = %user.id, %category_id, "Category deleted");

    let categories = load_categories(&state, user.id).await?;
    Ok(Json(Mutation::success(
        "Category deleted successfully",
        categories,
    )))
}
