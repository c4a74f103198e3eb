use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    listing::{build_payload, CategoryFilter, QuestionsPayload},
    server::{
        app::AppState,
        extract::{AppJson, AppPath, AppQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{ApiError, ApiResponse, PageQuery};

#[derive(Deserialize, Debug)]
struct NewQuestionBody {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl TryFrom<NewQuestionBody> for NewQuestion {
    type Error = ApiError;

    fn try_from(body: NewQuestionBody) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        if body.question.is_none() {
            missing.push("question");
        }
        if body.answer.is_none() {
            missing.push("answer");
        }
        if body.category.is_none() {
            missing.push("category");
        }
        if body.difficulty.is_none() {
            missing.push("difficulty");
        }

        match body {
            NewQuestionBody {
                question: Some(question),
                answer: Some(answer),
                category: Some(category),
                difficulty: Some(difficulty),
            } => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(ApiError::Validation(missing.join(", "))),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SearchBody {
    #[serde(default, rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    message: &'static str,
    id: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

/// Full scan of both tables, narrowed down in memory.
pub(super) async fn load_listing(
    pool: &SqlitePool,
    search_term: Option<&str>,
    filter: CategoryFilter,
    page: u32,
) -> sqlx::Result<QuestionsPayload> {
    let questions = questions::get_all_questions(pool).await?;
    let categories = get_all_categories(pool).await?;
    Ok(build_payload(
        questions,
        categories,
        search_term,
        filter,
        page,
    ))
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPayload>> {
    let payload = load_listing(&pool, None, CategoryFilter::All, query.page()).await?;
    if payload.questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(payload))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<NewQuestionBody>,
) -> ApiResponse<(StatusCode, Json<Created>)> {
    let new_question = NewQuestion::try_from(body)?;
    let id = questions::create_question(&pool, &new_question).await?;

    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = new_question.category, "Question created");
    Ok((
        StatusCode::CREATED,
        Json(Created {
            success: true,
            message: "Question has been created",
            id,
        }),
    ))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResponse<Json<Deleted>> {
    let page = query.page();
    questions::get_question(&pool, id)
        .await
        .map_err(ApiError::Unprocessable)?
        .ok_or(ApiError::NotFound)?;
    let removed = questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::Unprocessable)?;
    // another request may have removed it since the lookup
    if removed == 0 {
        return Err(ApiError::NotFound);
    }

    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    let listing = load_listing(&pool, None, CategoryFilter::All, page)
        .await
        .map_err(ApiError::Unprocessable)?;
    Ok(Json(Deleted {
        success: true,
        deleted: id,
        questions: listing.questions,
        total_questions: listing.total_questions,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    AppQuery(query): AppQuery<PageQuery>,
    AppJson(body): AppJson<SearchBody>,
) -> ApiResponse<Json<QuestionsPayload>> {
    let page = query.page();
    let payload = load_listing(
        &pool,
        body.search_term.as_deref(),
        CategoryFilter::All,
        page,
    )
    .await
    .map_err(ApiError::Unprocessable)?;
    Ok(Json(payload))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> NewQuestionBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn complete_body_becomes_a_new_question() {
        let question = NewQuestion::try_from(body(
            r#"{"question": "Who?", "answer": "Me", "category": "3", "difficulty": 2}"#,
        ))
        .unwrap();
        assert_eq!(
            question,
            NewQuestion {
                question: "Who?".to_owned(),
                answer: "Me".to_owned(),
                category: 3,
                difficulty: 2,
            }
        );
    }

    #[test]
    fn missing_fields_are_named() {
        let error = NewQuestion::try_from(body(r#"{"question": "Who?", "category": 1}"#))
            .unwrap_err();
        match error {
            ApiError::Validation(fields) => assert_eq!(fields, "answer, difficulty"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let error = NewQuestion::try_from(body(
            r#"{"question": "Who?", "answer": null, "category": 1, "difficulty": 1}"#,
        ))
        .unwrap_err();
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn empty_answer_is_still_an_answer() {
        let question = NewQuestion::try_from(body(
            r#"{"question": "Who?", "answer": "", "category": 1, "difficulty": 1}"#,
        ));
        assert!(question.is_ok());
    }
}
