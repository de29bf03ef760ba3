use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{categories_by_id, count_categories, get_all_categories, get_category},
            questions::{count_questions_for_category, get_questions_for_category},
        },
        Question,
    },
    pagination::PageQuery,
    server::{app::AppState, error::ApiError},
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: i64,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    category_id: i64,
    category_type: String,
    total_questions: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesList> {
    let categories = get_all_categories(&pool)
        .await
        .map_err(|e| ApiError::NotFound.because(e))?;
    let total_categories = count_categories(&pool)
        .await
        .map_err(|e| ApiError::NotFound.because(e))?;

    Ok(Json(CategoriesList {
        success: true,
        categories: categories_by_id(categories),
        total_categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<CategoryQuestions> {
    let Path(id) = id.map_err(|e| ApiError::NotFound.because(e))?;
    let Query(query) = query.map_err(|e| ApiError::Unprocessable.because(e))?;
    let category = get_category(&pool, id)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?
        .ok_or_else(|| ApiError::Unprocessable.because(format!("category {id} not found")))?;

    let questions = get_questions_for_category(&pool, category.id, query.page())
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;
    let total_questions = count_questions_for_category(&pool, category.id)
        .await
        .map_err(|e| ApiError::Unprocessable.because(e))?;

    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        category_id: category.id,
        category_type: category.kind,
        total_questions,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
