//! Todo records.

/// A stored todo, as materialized from the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// Insert time in milliseconds since Unix epoch. Internal only.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    /// A new, not yet completed todo.
    pub fn new(title: impl Into<String>) -> Self {
        NewTodo {
            title: title.into(),
            completed: false,
        }
    }
}

/// Partial update of a todo. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}
