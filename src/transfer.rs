//! CSV export and import of the question bank, used by `trivia-cli`.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        "Exporting {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Categories are imported before questions; both are upserted by id.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        "Importing {} categories and {} questions from {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::queries::questions::create_question;

    #[tokio::test]
    async fn export_then_import_into_fresh_database() {
        let source = memory_pool().await;
        create_question(&source, "What is the capital of Peru?", "Lima", Some(3), Some(2))
            .await
            .unwrap();
        create_question(&source, "Who painted Guernica?", "Picasso", Some(2), None)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        export_data(&source, dir.path()).await.unwrap();
        assert!(dir.path().join(CATEGORIES_FILE).exists());

        let target = memory_pool().await;
        import_data(&target, dir.path()).await.unwrap();

        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
        assert_eq!(get_all_categories(&target).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn import_fails_without_files() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&pool, dir.path()).await.is_err());
    }

    #[test]
    fn categories_csv_uses_type_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATEGORIES_FILE);
        std::fs::write(&path, "id,type\n1,Science\n2,Art\n").unwrap();

        let categories: Vec<crate::db::Category> = read_from(&path).unwrap();
        assert_eq!(categories[1].kind, "Art");
    }
}
