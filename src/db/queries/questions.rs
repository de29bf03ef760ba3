use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::error::{Result, TriviaError};
use crate::pagination::Page;
use crate::quiz::QuizCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Body of `POST /questions` as sent by clients; every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct NewQuestion {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub difficulty: Option<i64>,
}

/// A question that passed validation and can be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(TriviaError::validation(format!("{field} is required"))),
    }
}

impl TryFrom<NewQuestion> for QuestionDraft {
    type Error = TriviaError;

    fn try_from(value: NewQuestion) -> Result<Self> {
        let question = required_text(value.question, "question")?;
        let answer = required_text(value.answer, "answer")?;
        let category = value
            .category
            .ok_or_else(|| TriviaError::validation("category is required"))?;
        let difficulty = value
            .difficulty
            .ok_or_else(|| TriviaError::validation("difficulty is required"))?;
        if difficulty < 1 {
            return Err(TriviaError::validation(format!(
                "difficulty must be positive, got {difficulty}"
            )));
        }
        Ok(QuestionDraft {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

fn contains_ignoring_case(text: &str, lowered_term: &str) -> bool {
    text.to_lowercase().contains(lowered_term)
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_page(pool: &SqlitePool, page: Page) -> sqlx::Result<Vec<Question>> {
    if !page.is_addressable() {
        return Ok(vec![]);
    }
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        ORDER BY id
        LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
    page: Page,
) -> sqlx::Result<Vec<Question>> {
    if !page.is_addressable() {
        return Ok(vec![]);
    }
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(category_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await
}

pub async fn count_questions_for_category(pool: &SqlitePool, category_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE questions.category = ?1")
        .bind(category_id)
        .fetch_one(pool)
        .await
}

/// Questions whose text contains `term`, ignoring case. SQLite's `LIKE` only
/// folds ASCII, so the comparison happens here.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let lowered = term.to_lowercase();
    let mut questions = get_all_questions(pool).await?;
    questions.retain(|q| contains_ignoring_case(&q.question, &lowered));
    Ok(questions)
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, draft: &QuestionDraft) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&draft.question)
    .bind(&draft.answer)
    .bind(draft.category)
    .bind(draft.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, question_id: i64) -> Result<()> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(question_id)
    .execute(pool)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(TriviaError::not_found(format!("question {question_id}")));
    }
    Ok(())
}

/// Questions still eligible for a quiz round: not yet presented and, for a
/// specific category, belonging to it.
///
/// Seen ids are dropped after the fetch; a bound `NOT IN` list would hit
/// SQLite's host parameter limit on long rounds.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    previous: &[i64],
    category: QuizCategory,
) -> sqlx::Result<Vec<Question>> {
    let mut candidates = match category {
        QuizCategory::All => get_all_questions(pool).await?,
        QuizCategory::Specific(category_id) => {
            sqlx::query_as::<_, Question>(
                r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
                "#,
            )
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
    };
    let seen: HashSet<i64> = previous.iter().copied().collect();
    candidates.retain(|q| !seen.contains(&q.id));
    Ok(candidates)
}

/// Inserts rows with their own ids, overwriting rows whose ids already exist.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
