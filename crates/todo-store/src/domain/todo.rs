//! Todo Entity

use super::entity::Entity;
use todo_sync::{NonEmptyText, Todo, TodoId};

impl Entity for Todo {
    type Id = TodoId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A todo ready for insertion; id 0 is replaced by the database
pub fn new_todo(text: &NonEmptyText) -> Todo {
    Todo {
        id: TodoId(0),
        text: text.as_str().to_string(),
        is_completed: false,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_defaults() {
        let todo = new_todo(&NonEmptyText::parse("Test todo").unwrap());
        assert_eq!(todo.id(), TodoId(0));
        assert_eq!(todo.text, "Test todo");
        assert!(!todo.is_completed);
        assert!(todo.created_at > 0);
    }
}
