//! The quote record.

use crate::{error::Result, Category, Error};
use serde::{Deserialize, Serialize};

/// A single quote.
///
/// There is no separate ID: `text` is the identity key. Two quotes with the
/// same text are the same quote, whatever their category. Text comparison is
/// exact (case and whitespace sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself; doubles as the identity key
    pub text: String,
    /// Free-form category label
    pub category: Category,
}

impl Quote {
    /// Create a quote without validating it.
    pub fn new(text: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Check that both text and category carry something other than whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }
        Ok(())
    }

    /// Whether `other` has the same identity as this quote.
    pub fn same_text(&self, other: &Quote) -> bool {
        self.text == other.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_regular_quote() {
        let quote = Quote::new("The only way out is through.", "resilience");
        assert!(quote.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(Quote::new("", "work").validate(), Err(Error::EmptyText));
        assert_eq!(Quote::new("  \t", "work").validate(), Err(Error::EmptyText));
        assert_eq!(Quote::new("T1", "").validate(), Err(Error::EmptyCategory));
        assert_eq!(Quote::new("T1", " ").validate(), Err(Error::EmptyCategory));
    }

    #[test]
    fn identity_is_exact_text() {
        let a = Quote::new("Hello", "a");
        assert!(a.same_text(&Quote::new("Hello", "b")));
        assert!(!a.same_text(&Quote::new("hello", "a")));
        assert!(!a.same_text(&Quote::new("Hello ", "a")));
    }

    #[test]
    fn serialization_format() {
        let quote = Quote::new("T1", "work");
        let json = serde_json::to_string(&quote).unwrap();
        assert_eq!(json, r#"{"text":"T1","category":"work"}"#);
    }
}
