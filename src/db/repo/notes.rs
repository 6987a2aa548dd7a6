//! Note operations for the repository.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{now_ms, Repository};
use crate::domain::{NewNote, Note, NoteChanges};

fn note_from_row(row: &SqliteRow) -> Result<Note, sqlx::Error> {
    Ok(Note {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Repository {
    /// All notes, ordered by id ascending.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_notes(&self) -> Result<Vec<Note>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, content, created_at
            FROM notes
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(note_from_row).collect()
    }

    /// Get a note by id. Returns `None` if no such note exists.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_note(&self, id: i64) -> Result<Option<Note>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, content, created_at
            FROM notes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    /// All notes owned by `user_id`, newest (highest id) first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_notes_by_user(&self, user_id: i64) -> Result<Vec<Note>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, content, created_at
            FROM notes
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(note_from_row).collect()
    }

    /// Insert a note and return the stored row, including its assigned id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_note(&self, note: &NewNote) -> Result<Note, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO notes (user_id, title, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, title, content, created_at
            "#,
        )
        .bind(note.user_id)
        .bind(note.title.as_str())
        .bind(note.content.as_str())
        .bind(now_ms())
        .fetch_one(&self.pool)
        .await?;

        let note = note_from_row(&row)?;
        debug!(note_id = note.id, "note inserted");
        Ok(note)
    }

    /// Apply the supplied fields of `changes` to note `id`.
    ///
    /// Returns the updated row, or `None` if no note has that id.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_note(
        &self,
        id: i64,
        changes: &NoteChanges,
    ) -> Result<Option<Note>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE notes
            SET user_id = COALESCE(?, user_id),
                title = COALESCE(?, title),
                content = COALESCE(?, content)
            WHERE id = ?
            RETURNING id, user_id, title, content, created_at
            "#,
        )
        .bind(changes.user_id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(note_from_row).transpose()
    }

    /// Delete note `id`. Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_note(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
