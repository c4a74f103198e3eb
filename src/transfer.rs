//! CSV import and export of the whole question bank.
//!
//! A bank directory holds `categories.csv` (`id,type`) and `questions.csv`
//! (`id,question,answer,category,difficulty`).

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};

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
        let record: T = record.with_context(|| format!("Bad record in {}", path.display()))?;
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
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Categories go in first so every imported question has its category to reference.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        dir.display()
    );
    import_categories(pool, categories)
        .await
        .context("Failed to import categories")?;
    import_questions(pool, questions)
        .await
        .context("Failed to import questions")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn bank_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[tokio::test]
    async fn bundled_bank_imports() {
        let pool = db::in_memory().await.unwrap();
        import_data(&pool, &bank_dir()).await.unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        let questions = get_all_questions(&pool).await.unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].kind, "Science");
        assert_eq!(questions.len(), 19);
        assert!(questions.iter().any(|q| q.answer == "Tom Cruise"));
    }

    #[tokio::test]
    async fn export_then_import_keeps_the_bank() {
        let source = db::in_memory().await.unwrap();
        import_data(&source, &bank_dir()).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("bank");
        export_data(&source, &target_dir).await.unwrap();

        let target = db::in_memory().await.unwrap();
        import_data(&target, &target_dir).await.unwrap();
        assert_eq!(
            get_all_questions(&source).await.unwrap(),
            get_all_questions(&target).await.unwrap()
        );
        assert_eq!(
            get_all_categories(&source).await.unwrap(),
            get_all_categories(&target).await.unwrap()
        );
    }

    #[tokio::test]
    async fn missing_files_are_reported() {
        let pool = db::in_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let error = import_data(&pool, dir.path()).await.unwrap_err();
        assert!(error.to_string().contains(CATEGORIES_FILE));
    }
}
