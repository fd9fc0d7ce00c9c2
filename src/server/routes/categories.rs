use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{paginate, Page},
    },
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: Vec<Category>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

async fn list_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = get_all_categories(&pool)
        .await
        .map_err(ApiError::internal)?;

    // an empty category table is reported as missing, not as an empty list
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoriesList {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    page: Page,
) -> ApiResponse<Json<CategoryQuestions>> {
    let Path(category_id) = id?;
    let matching = get_questions_for_category(&pool, category_id)
        .await
        .map_err(ApiError::unprocessable)?;

    let total_questions = matching.len();
    let questions = paginate(matching, page);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        total_questions,
        current_category: category_id,
    }))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
}
