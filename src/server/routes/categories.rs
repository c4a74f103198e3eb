use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::categories::get_all_categories,
    listing::{category_map, CategoryFilter, CategoryMap, QuestionsPayload},
    server::{
        app::AppState,
        extract::{AppPath, AppQuery},
    },
};

use super::{questions::load_listing, ApiError, ApiResponse, PageQuery};

#[derive(Serialize)]
struct CategoriesBody {
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesBody>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesBody {
        categories: category_map(categories),
    }))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPayload>> {
    let payload = load_listing(&pool, Some(""), CategoryFilter::Id(id), query.page())
        .await
        .map_err(ApiError::Unprocessable)?;
    Ok(Json(payload))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
