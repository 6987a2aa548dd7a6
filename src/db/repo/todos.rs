//! Todo operations for the repository.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{now_ms, Repository};
use crate::domain::{NewTodo, Todo, TodoChanges};

fn todo_from_row(row: &SqliteRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Repository {
    /// All todos, ordered by id ascending.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_todos(&self) -> Result<Vec<Todo>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, completed, created_at
            FROM todos
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(todo_from_row).collect()
    }

    /// Get a todo by id. Returns `None` if no such todo exists.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_todo(&self, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, title, completed, created_at
            FROM todos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(todo_from_row).transpose()
    }

    /// Insert a todo and return the stored row.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_todo(&self, todo: &NewTodo) -> Result<Todo, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO todos (title, completed, created_at)
            VALUES (?, ?, ?)
            RETURNING id, title, completed, created_at
            "#,
        )
        .bind(todo.title.as_str())
        .bind(todo.completed)
        .bind(now_ms())
        .fetch_one(&self.pool)
        .await?;

        let todo = todo_from_row(&row)?;
        debug!(todo_id = todo.id, "todo inserted");
        Ok(todo)
    }

    /// Apply the supplied fields of `changes` to todo `id`.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_todo(
        &self,
        id: i64,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE todos
            SET title = COALESCE(?, title),
                completed = COALESCE(?, completed)
            WHERE id = ?
            RETURNING id, title, completed, created_at
            "#,
        )
        .bind(changes.title.as_deref())
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(todo_from_row).transpose()
    }

    /// Delete todo `id`. Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_todo(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repo::test_support::setup_test_db;

    #[tokio::test]
    async fn test_insert_defaults_to_not_completed() {
        let (repo, _temp) = setup_test_db().await;
        let todo = repo.insert_todo(&NewTodo::new("write tests")).await.unwrap();

        assert_eq!(todo.id, 1);
        assert_eq!(todo.title, "write tests");
        assert!(!todo.completed);
        assert_eq!(repo.get_todo(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn test_list_todos_in_id_order() {
        let (repo, _temp) = setup_test_db().await;
        for title in ["a", "b", "c"] {
            repo.insert_todo(&NewTodo::new(title)).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list_todos()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_completed_round_trip() {
        let (repo, _temp) = setup_test_db().await;
        let todo = repo.insert_todo(&NewTodo::new("ship it")).await.unwrap();

        let done = repo
            .update_todo(
                todo.id,
                &TodoChanges {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(done.completed);
        assert_eq!(done.title, "ship it");

        let undone = repo
            .update_todo(
                todo.id,
                &TodoChanges {
                    completed: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!undone.completed);
    }

    #[tokio::test]
    async fn test_missing_todo() {
        let (repo, _temp) = setup_test_db().await;
        assert!(repo.get_todo(5).await.unwrap().is_none());
        assert!(repo
            .update_todo(5, &TodoChanges {
                title: Some("x".into()),
                completed: None,
            })
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.delete_todo(5).await.unwrap(), 0);
    }
}
