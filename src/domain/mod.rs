//! Domain types for the two record families: notes and todos.

pub mod note;
pub mod todo;

pub use note::{NewNote, Note, NoteChanges};
pub use todo::{NewTodo, Todo, TodoChanges};
