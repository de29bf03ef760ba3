//! CSV snapshots of the trivia dataset: `categories.csv` and `questions.csv`
//! in one directory.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};
use crate::error::Result;

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Categories go in first so imported questions can refer to them.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        dir.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::{categories::create_category, questions::create_question};
    use crate::db::test_support::memory_pool;
    use crate::db::QuestionDraft;
    use crate::error::TriviaError;

    #[tokio::test]
    async fn export_then_import_reproduces_rows() {
        let source = memory_pool().await;
        let science = create_category(&source, "Science").await.unwrap();
        create_category(&source, "Art").await.unwrap();
        create_question(
            &source,
            &QuestionDraft {
                question: "What is the heaviest organ in the human body?".to_owned(),
                answer: "The Liver".to_owned(),
                category: science,
                difficulty: 4,
            },
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot");
        export_data(&source, &snapshot).await.unwrap();

        let header = std::fs::read_to_string(snapshot.join(CATEGORIES_FILE)).unwrap();
        assert!(header.starts_with("id,type"));

        let target = memory_pool().await;
        import_data(&target, &snapshot).await.unwrap();
        assert_eq!(
            get_all_categories(&target).await.unwrap(),
            get_all_categories(&source).await.unwrap()
        );
        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
    }

    #[tokio::test]
    async fn import_from_missing_directory_fails() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let res = import_data(&pool, &dir.path().join("nope")).await;
        assert!(matches!(res, Err(TriviaError::Io(_))));
    }
}
