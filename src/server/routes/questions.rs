use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        Category, QueryError, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{paginate, Page},
    },
};

use super::ApiResponse;

#[derive(Deserialize)]
struct NewQuestion {
    question: Option<String>,
    answer: Option<String>,
    // form selects post these as strings
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl NewQuestion {
    /// Question and answer text are required and must not be blank.
    fn texts(&self) -> Option<(&str, &str)> {
        let question = self.question.as_deref().filter(|q| !q.trim().is_empty())?;
        let answer = self.answer.as_deref().filter(|a| !a.trim().is_empty())?;
        Some((question, answer))
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    #[serde(rename = "current category")]
    current_category: Option<i64>,
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: Question,
    deleted_id: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    page: Page,
) -> ApiResponse<Json<QuestionsPage>> {
    let all_questions = questions::get_all_questions(&pool)
        .await
        .map_err(ApiError::internal)?;
    let categories = get_all_categories(&pool)
        .await
        .map_err(ApiError::internal)?;

    let total_questions = all_questions.len();
    let questions = paginate(all_questions, page);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        current_category: None,
        categories,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = id?;
    let question = match questions::get_question_by_id(&pool, id).await {
        Ok(question) => question,
        Err(QueryError::NotFound) => {
            return Err(ApiError::unprocessable(format!("no question with id {id}")))
        }
        Err(e) => return Err(ApiError::unprocessable(e)),
    };
    questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;

    tracing::info!("Deleted question {id}");
    Ok(Json(Deleted {
        success: true,
        deleted: question,
        deleted_id: id,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<NewQuestion>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(new_question) = body?;
    let (question, answer) = new_question
        .texts()
        .ok_or_else(|| ApiError::unprocessable("question and answer are required"))?;

    let id = questions::create_question(
        &pool,
        question,
        answer,
        new_question.category,
        new_question.difficulty,
    )
    .await
    .map_err(ApiError::unprocessable)?;

    tracing::info!("Created question {id}");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    page: Page,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected search body: {rejection}");
        ApiError::BadRequest
    })?;
    let term = body.search_term.unwrap_or_default();

    let found = questions::search_questions(&pool, &term)
        .await
        .map_err(ApiError::internal)?;

    // an empty result is still a successful page
    Ok(Json(SearchResults {
        success: true,
        questions: paginate(found, page),
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions))
        .route("/questions/add", post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/search", post(search_questions))
}
