use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{categories_by_id, get_all_categories, get_category},
            questions::{
                self, count_questions, get_question_by_id, get_questions_page, search_questions,
            },
        },
        NewQuestion, Question, QuestionDraft,
    },
    pagination::PageQuery,
    server::{
        app::{AppState, BaseUrl},
        error::ApiError,
    },
    telemetry::QUESTIONS_CREATED,
};

use super::{url_root, ApiResponse};

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    next_page: String,
}

#[derive(Serialize)]
struct DeletedQuestion {
    success: bool,
    deleted_question: i64,
    total_questions: i64,
}

#[derive(Serialize)]
struct CreatedQuestion {
    success: bool,
    new_question: String,
    new_question_id: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_searched_items: usize,
    searched_term: String,
}

#[derive(Serialize)]
struct EmptySearch {
    empty_string: &'static str,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    State(base_url): State<BaseUrl>,
    headers: HeaderMap,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<QuestionsPage> {
    let Query(query) = query.map_err(|e| ApiError::NotFound.because(e))?;
    let page = query.page();
    let questions = get_questions_page(&pool, page)
        .await
        .map_err(|e| ApiError::NotFound.because(e))?;
    if questions.is_empty() {
        return Err(ApiError::NotFound.because(format!("page {} is empty", page.number())));
    }
    let total_questions = count_questions(&pool)
        .await
        .map_err(|e| ApiError::NotFound.because(e))?;
    let categories = get_all_categories(&pool)
        .await
        .map_err(|e| ApiError::NotFound.because(e))?;

    let next_page = page.next_link(&url_root(&headers, &base_url), questions.len());
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: categories_by_id(categories),
        next_page,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<DeletedQuestion> {
    let Path(id) = id.map_err(|e| ApiError::NotFound.because(e))?;
    // a missing id is reported the same way as a failed delete
    questions::delete_question(&pool, id)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;
    let total_questions = count_questions(&pool)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;

    tracing::info!(question_id = id, "Question deleted");
    Ok(Json(DeletedQuestion {
        success: true,
        deleted_question: id,
        total_questions,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
    payload: Result<Json<NewQuestion>, JsonRejection>,
) -> ApiResponse<CreatedQuestion> {
    let Query(query) = query.map_err(|e| ApiError::Unprocessable.because(e))?;
    let Json(payload) = payload.map_err(|e| ApiError::Unprocessable.because(e))?;
    let draft = QuestionDraft::try_from(payload).map_err(|e| ApiError::Unprocessable.because(e))?;

    if get_category(&pool, draft.category)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?
        .is_none()
    {
        return Err(ApiError::Unprocessable.because(format!(
            "category {} does not exist",
            draft.category
        )));
    }

    let id = questions::create_question(&pool, &draft)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;
    let created = get_question_by_id(&pool, id)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?
        .ok_or_else(|| ApiError::Unprocessable.because(format!("question {id} vanished")))?;
    QUESTIONS_CREATED.inc();
    tracing::info!(question_id = id, category = created.category, "Question created");

    let questions = get_questions_page(&pool, query.page())
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;
    let total_questions = count_questions(&pool)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;

    Ok(Json(CreatedQuestion {
        success: true,
        new_question: created.question,
        new_question_id: created.id,
        questions,
        total_questions,
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Unprocessable.because(e))?;
    let term = query
        .search
        .ok_or_else(|| ApiError::Unprocessable.because("search parameter is missing"))?;
    if term.is_empty() {
        return Ok(Json(EmptySearch {
            empty_string: "search requires a string input",
        })
        .into_response());
    }

    let questions = search_questions(&pool, &term)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;
    tracing::debug!(term = %term, found = questions.len(), "Searched questions");

    Ok(Json(SearchResults {
        success: true,
        total_searched_items: questions.len(),
        questions,
        searched_term: term,
    })
    .into_response())
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
