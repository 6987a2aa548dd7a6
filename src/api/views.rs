//! Client-facing projections of stored records.
//!
//! Views carry only whitelisted fields. Free-text fields pass through
//! [`escape_html`] so stored markup cannot be rendered by a client.

use serde::Serialize;

use crate::domain::{Note, Todo};

/// Neutralize markup by escaping angle brackets.
///
/// Other characters are kept as written, so escaping an escaped string is a
/// no-op.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        NoteView {
            id: note.id,
            user_id: note.user_id,
            title: escape_html(&note.title),
            content: escape_html(&note.content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoView {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        TodoView {
            id: todo.id,
            title: escape_html(&todo.title),
            completed: todo.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, content: &str) -> Note {
        Note {
            id: 1,
            user_id: 7,
            title: title.to_string(),
            content: content.to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_escape_neutralizes_script_tags() {
        assert_eq!(
            escape_html(r#"<script>alert("xss");</script>"#),
            r#"&lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
        assert_eq!(
            escape_html(r#"Bad image <img src="x" onerror="alert(1)">"#),
            r#"Bad image &lt;img src="x" onerror="alert(1)"&gt;"#
        );
    }

    #[test]
    fn test_escape_preserves_prose() {
        let prose = "3rd note's notes: milk & eggs, \"fresh\"";
        assert_eq!(escape_html(prose), prose);
    }

    #[test]
    fn test_escape_is_idempotent() {
        let once = escape_html("<b>hi</b> & bye");
        assert_eq!(escape_html(&once), once);
    }

    #[test]
    fn test_note_view_strips_internal_fields() {
        let json = serde_json::to_value(NoteView::from(&note("t", "c"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "user_id": 7, "title": "t", "content": "c"})
        );
    }

    #[test]
    fn test_note_view_escapes_and_leaves_source_untouched() {
        let source = note("<i>t</i>", "<p>c</p>");
        let view = NoteView::from(&source);
        assert_eq!(view.title, "&lt;i&gt;t&lt;/i&gt;");
        assert_eq!(view.content, "&lt;p&gt;c&lt;/p&gt;");
        assert_eq!(source.title, "<i>t</i>");
    }

    #[test]
    fn test_todo_view() {
        let todo = Todo {
            id: 3,
            title: "<u>x</u>".to_string(),
            completed: true,
            created_at: 0,
        };
        let json = serde_json::to_value(TodoView::from(&todo)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "title": "&lt;u&gt;x&lt;/u&gt;", "completed": true})
        );
    }
}
