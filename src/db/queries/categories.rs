use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::QueryResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> QueryResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Upserts the given categories by id in a single transaction.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> QueryResult<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, type) VALUES (?1, ?2)
            ON CONFLICT (id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn default_categories_are_seeded() {
        let pool = memory_pool().await;

        let names: Vec<String> = get_all_categories(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            names,
            ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        );
    }

    #[tokio::test]
    async fn import_renames_and_adds() {
        let pool = memory_pool().await;

        import_categories(
            &pool,
            vec![
                Category {
                    id: 2,
                    kind: "Fine Art".to_owned(),
                },
                Category {
                    id: 7,
                    kind: "Music".to_owned(),
                },
            ],
        )
        .await
        .unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[1].kind, "Fine Art");
        assert_eq!(categories[6].kind, "Music");
    }

    #[test]
    fn formats_with_type_key() {
        let category = Category {
            id: 1,
            kind: "Science".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&category).unwrap(),
            serde_json::json!({"id": 1, "type": "Science"})
        );
    }
}
