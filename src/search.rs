use crate::todo::{TodoItem, TodoList};

/// Patterns for searching item titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Keyword(String),
    Regex(String),
}
impl Pattern {
    pub fn compile(&self) -> Result<Matcher, PatternErr> {
        match self {
            Pattern::Keyword(word) => Ok(Matcher::Keyword(word.to_lowercase())),
            Pattern::Regex(rx) => Ok(Matcher::Regex(regex::Regex::new(rx)?)),
        }
    }
}

/// Some patterns may have syntax errors.
#[derive(Debug, thiserror::Error)]
pub enum PatternErr {
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// A compiled [`Pattern`].
#[derive(Debug)]
pub enum Matcher {
    Keyword(String),
    Regex(regex::Regex),
}

/// Trait for how anything could be matched against a pattern.
pub trait Matchable {
    fn matches(&self, matcher: &Matcher) -> bool;
}

impl Matchable for TodoItem {
    fn matches(&self, matcher: &Matcher) -> bool {
        match matcher {
            Matcher::Keyword(word) => self.title.to_lowercase().contains(word.as_str()),
            Matcher::Regex(rx) => rx.is_match(&self.title),
        }
    }
}

impl TodoList {
    /// Matching items with their positions, in list order.
    pub fn search(&self, matcher: &Matcher) -> Vec<(usize, &TodoItem)> {
        self.iter()
            .enumerate()
            .filter(|(_, item)| item.matches(matcher))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> TodoList {
        let mut list = TodoList::new();
        list.add(TodoItem::new("Buy milk"));
        list.add(TodoItem::new("Walk dog"));
        list.add(TodoItem::new("buy stamps"));
        list
    }

    #[test]
    fn keyword_ignores_case() {
        let matcher = Pattern::Keyword("BUY".to_string()).compile().unwrap();
        let hits: Vec<usize> = list().search(&matcher).iter().map(|(i, _)| *i).collect();
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn regex_is_case_sensitive_unless_asked() {
        let list = list();
        let matcher = Pattern::Regex("^B".to_string()).compile().unwrap();
        assert_eq!(list.search(&matcher).len(), 1);
        let matcher = Pattern::Regex("(?i)^b".to_string()).compile().unwrap();
        assert_eq!(list.search(&matcher).len(), 2);
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = Pattern::Regex("(unclosed".to_string()).compile().unwrap_err();
        assert!(matches!(err, PatternErr::InvalidRegex(_)));
    }

    #[test]
    fn no_hits_on_empty_list() {
        let matcher = Pattern::Keyword("milk".to_string()).compile().unwrap();
        assert!(TodoList::new().search(&matcher).is_empty());
    }
}
