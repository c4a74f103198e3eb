use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_all_questions, Question},
    listing::CategoryFilter,
    quiz::{pick_question, quiz_scope},
    server::{app::AppState, extract::AppJson},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiResponse};

#[derive(Deserialize, Debug)]
struct QuizBody {
    #[serde(default)]
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

// The frontend also sends the category name as `type`; only the id matters here.
#[derive(Deserialize, Debug)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

#[derive(Serialize)]
struct QuizResponse {
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<QuizBody>,
) -> ApiResponse<Json<QuizResponse>> {
    let questions = get_all_questions(&pool)
        .await
        .map_err(ApiError::Unprocessable)?;
    let scope = quiz_scope(body.quiz_category.id);
    let question = pick_question(
        questions,
        &body.previous_questions,
        scope,
        &mut rand::thread_rng(),
    );

    if question.is_some() {
        let label = match scope {
            CategoryFilter::All => "all".to_owned(),
            CategoryFilter::Id(id) => id.to_string(),
        };
        QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
    }
    tracing::debug!(
        asked = body.previous_questions.len(),
        exhausted = question.is_none(),
        "Quiz question selected"
    );
    Ok(Json(QuizResponse { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
