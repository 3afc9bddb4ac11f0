//! The to-do list store: an ordered list of items, looked up by title, kept
//! on disk as a pretty-printed JSON array.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default backing file, relative to the working directory.
pub const DEFAULT_FILE: &str = "todo.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}
impl TodoItem {
    pub fn new(title: &str) -> TodoItem {
        TodoItem {
            title: title.to_string(),
            completed: false,
        }
    }
    pub fn status(&self) -> &'static str {
        if self.completed {
            "completed"
        } else {
            "pending"
        }
    }
}

/// Failures talking to the backing file.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {}: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode to-do list: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TodoError {
    /// The backing file simply does not exist yet.
    pub fn is_missing_file(&self) -> bool {
        match self {
            TodoError::Read { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// A title lookup that matched nothing. Not a fault, just an answer.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("item {0} was not found")]
pub struct NotFound(pub String);

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<TodoItem>,
}
impl TodoList {
    pub fn new() -> TodoList {
        TodoList { items: vec![] }
    }

    pub fn add(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    /// Index of the first item titled exactly `title`.
    pub fn find_index(&self, title: &str) -> Option<usize> {
        self.items.iter().position(|item| item.title == title)
    }

    pub fn complete(&mut self, title: &str) -> Result<(), NotFound> {
        let index = self.lookup(title)?;
        self.items[index].completed = true;
        Ok(())
    }

    pub fn rename(&mut self, title: &str, new_title: &str) -> Result<(), NotFound> {
        let index = self.lookup(title)?;
        self.items[index].title = new_title.to_string();
        Ok(())
    }

    pub fn remove(&mut self, title: &str) -> Result<TodoItem, NotFound> {
        let index = self.lookup(title)?;
        Ok(self.items.remove(index))
    }

    fn lookup(&self, title: &str) -> Result<usize, NotFound> {
        self.find_index(title)
            .ok_or_else(|| NotFound(title.to_string()))
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }
    pub fn iter(&self) -> std::slice::Iter<'_, TodoItem> {
        self.items.iter()
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    pub fn load(path: &Path) -> Result<TodoList, TodoError> {
        let data = fs::read_to_string(path).map_err(|source| TodoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| TodoError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces whatever `path` held with the indented JSON form of the list.
    pub fn save(&self, path: &Path) -> Result<(), TodoError> {
        let json = serde_json::to_string_pretty(self).map_err(TodoError::Encode)?;
        fs::write(path, json).map_err(|source| TodoError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
impl From<Vec<TodoItem>> for TodoList {
    fn from(items: Vec<TodoItem>) -> TodoList {
        TodoList { items }
    }
}
impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a TodoItem;
    type IntoIter = std::slice::Iter<'a, TodoItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
