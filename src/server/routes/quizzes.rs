use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories::get_category, questions::get_quiz_candidates},
    quiz::{select_question, QuizCategory, QuizPick, QuizRequest},
    server::{app::AppState, error::ApiError},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    #[serde(flatten)]
    pick: QuizPick,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<QuizQuestion> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest.because(e))?;
    let category = request.category();

    if let QuizCategory::Specific(id) = category {
        get_category(&pool, id)
            .await
            .map_err(|e| ApiError::Internal.because(e))?
            .ok_or_else(|| ApiError::NotFound.because(format!("quiz category {id} not found")))?;
    }

    let candidates = get_quiz_candidates(&pool, &request.previous_questions, category)
        .await
        .map_err(|e| ApiError::Internal.because(e))?;
    let pick = select_question(&candidates, &mut rand::thread_rng());

    match &pick.question {
        Some(question) => {
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.label().as_str()])
                .inc();
            tracing::debug!(
                question_id = question.id,
                candidates = pick.total_questions,
                "Quiz question picked"
            );
        }
        None => tracing::debug!(category = %category.label(), "Quiz has no questions left"),
    }

    Ok(Json(QuizQuestion {
        success: true,
        pick,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
