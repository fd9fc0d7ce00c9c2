use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::draw_unseen_question, Question},
    server::{app::AppState, error::ApiError},
    telemetry::QUIZ_DRAWS,
};

use super::ApiResponse;

/// Category id that stands for "every category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizCategory {
    // the quiz page sends ids from a select element, sometimes as strings
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

impl QuizRequest {
    fn category(&self) -> Option<i64> {
        Some(self.quiz_category.id).filter(|&id| id != ALL_CATEGORIES)
    }
}

/// `question` is `null` once every question of the selection has been asked.
#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizQuestion>> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected quiz body: {rejection}");
        ApiError::NotFound
    })?;

    let question = draw_unseen_question(&pool, request.category(), &request.previous_questions)
        .await
        .map_err(|e| {
            tracing::error!("Quiz draw failed: {e}");
            ApiError::NotFound
        })?;

    let outcome = if question.is_some() {
        "question"
    } else {
        "complete"
    };
    QUIZ_DRAWS.with_label_values(&[outcome]).inc();

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_question))
}
