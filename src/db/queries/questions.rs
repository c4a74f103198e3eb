use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// A question that has passed request validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of removed rows, zero when the id was unknown.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let removed = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(removed)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
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
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, queries::categories::import_categories, Category};

    async fn pool_with_categories() -> SqlitePool {
        let pool = db::in_memory().await.unwrap();
        import_categories(
            &pool,
            vec![
                Category {
                    id: 1,
                    kind: "Science".to_owned(),
                },
                Category {
                    id: 2,
                    kind: "Art".to_owned(),
                },
            ],
        )
        .await
        .unwrap();
        pool
    }

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: text.to_owned(),
            answer: "answer".to_owned(),
            category,
            difficulty: 2,
        }
    }

    #[tokio::test]
    async fn created_question_can_be_looked_up() {
        let pool = pool_with_categories().await;
        let id = create_question(&pool, &new_question("Who discovered penicillin?", 1))
            .await
            .unwrap();

        let stored = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.question, "Who discovered penicillin?");
        assert_eq!(stored.category, 1);
        assert_eq!(stored.difficulty, 2);
    }

    #[tokio::test]
    async fn questions_are_listed_by_ascending_id() {
        let pool = pool_with_categories().await;
        for text in ["first", "second", "third"] {
            create_question(&pool, &new_question(text, 2)).await.unwrap();
        }

        let ids: Vec<i64> = get_all_questions(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn delete_reports_unknown_ids() {
        let pool = pool_with_categories().await;
        let id = create_question(&pool, &new_question("gone soon", 1))
            .await
            .unwrap();

        assert_eq!(delete_question(&pool, id).await.unwrap(), 1);
        assert_eq!(delete_question(&pool, id).await.unwrap(), 0);
        assert!(get_question(&pool, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_by_the_store() {
        let pool = pool_with_categories().await;
        let result = create_question(&pool, &new_question("orphan", 42)).await;
        assert!(result.is_err());
    }
}
