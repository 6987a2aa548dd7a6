//! Note records.

/// A stored note, as materialized from the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    /// Insert time in milliseconds since Unix epoch. Internal only.
    pub created_at: i64,
}

/// Fields required to insert a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

/// Partial update of a note. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteChanges {
    /// Number of fields this update supplies.
    pub fn supplied(&self) -> usize {
        [
            self.user_id.is_some(),
            self.title.is_some(),
            self.content.is_some(),
        ]
        .iter()
        .filter(|s| **s)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.supplied() == 0
    }
}
