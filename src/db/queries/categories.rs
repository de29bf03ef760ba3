use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// `{id: type}` map as clients expect it, ordered by id.
pub fn categories_by_id(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_categories(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await
}

pub async fn create_category(pool: &SqlitePool, kind: &str) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO categories (type) VALUES (?1)
        "#,
    )
    .bind(kind)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Inserts rows with their own ids, overwriting the type of ids that already exist.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, type) VALUES (?1, ?2)
ON CONFLICT(id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    #[tokio::test]
    async fn categories_are_listed_by_id() {
        let pool = memory_pool().await;
        let art = create_category(&pool, "Art").await.unwrap();
        let science = create_category(&pool, "Science").await.unwrap();

        let all = get_all_categories(&pool).await.unwrap();
        assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![art, science]);
        assert_eq!(count_categories(&pool).await.unwrap(), 2);
        assert_eq!(get_category(&pool, science).await.unwrap().unwrap().kind, "Science");
        assert!(get_category(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn import_overwrites_existing_ids() {
        let pool = memory_pool().await;
        create_category(&pool, "Old").await.unwrap();
        import_categories(
            &pool,
            vec![
                Category { id: 1, kind: "History".to_owned() },
                Category { id: 6, kind: "Sports".to_owned() },
            ],
        )
        .await
        .unwrap();

        let map = categories_by_id(get_all_categories(&pool).await.unwrap());
        assert_eq!(map.get(&1).map(String::as_str), Some("History"));
        assert_eq!(map.get(&6).map(String::as_str), Some("Sports"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn wire_form_uses_type_key() {
        let json = serde_json::to_value(Category { id: 3, kind: "Geography".to_owned() }).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "type": "Geography"}));

        let map = categories_by_id(vec![
            Category { id: 2, kind: "Art".to_owned() },
            Category { id: 1, kind: "Science".to_owned() },
        ]);
        assert_eq!(
            serde_json::to_value(map).unwrap(),
            serde_json::json!({"1": "Science", "2": "Art"})
        );
    }
}
