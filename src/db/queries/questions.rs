use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{QueryError, QueryResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

pub async fn get_all_questions(pool: &SqlitePool) -> QueryResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> QueryResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> QueryResult<Question> {
    let question = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(question)
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: Option<i64>,
    difficulty: Option<i64>,
) -> QueryResult<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> QueryResult<()> {
    let mut conn = pool.acquire().await?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(QueryError::NotFound);
    }
    Ok(())
}

/// Case-insensitive substring match on the question text, ordered by id.
///
/// Case is folded in Rust since SQLite's `lower` only knows ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> QueryResult<Vec<Question>> {
    let needle = term.to_lowercase();
    let questions = get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect();
    Ok(questions)
}

/// Picks a random question whose id is not in `previous_questions`.
///
/// `category` of `None` draws from every question. Returns `None` once every
/// candidate has been asked.
pub async fn draw_unseen_question(
    pool: &SqlitePool,
    category: Option<i64>,
    previous_questions: &[i64],
) -> QueryResult<Option<Question>> {
    let seen = format!("[{}]", previous_questions.iter().join(","));
    let question = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE (?1 IS NULL OR questions.category = ?1)
          AND questions.id NOT IN (SELECT value FROM json_each(?2))
        ORDER BY RANDOM()
        LIMIT 1
        "#,
    )
    .bind(category)
    .bind(seen)
    .fetch_optional(pool)
    .await?;
    Ok(question)
}

/// Upserts the given questions by id in a single transaction.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> QueryResult<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
