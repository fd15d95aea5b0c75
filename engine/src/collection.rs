//! Ordered quote collection and its JSON representation.
//!
//! The persisted form is a bare JSON array of `{text, category}` objects:
//! compact for storage, pretty-printed for export.

use crate::{error::Result, Error, Quote};
use serde::{Deserialize, Serialize};

/// An ordered list of quotes.
///
/// Order only matters for display. No index is kept; lookups by text are
/// linear scans, which is fine at the sizes a quote collection reaches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    quotes: Vec<Quote>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { quotes: Vec::new() }
    }

    /// Append a quote. No validation or duplicate check happens here.
    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Append a validated quote whose text is not yet present.
    pub fn add(&mut self, quote: Quote) -> Result<()> {
        quote.validate()?;
        if self.contains_text(&quote.text) {
            return Err(Error::DuplicateText(quote.text));
        }
        self.quotes.push(quote);
        Ok(())
    }

    /// Look up the first quote with the given text.
    pub fn get(&self, text: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.text == text)
    }

    /// Whether any quote carries exactly this text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.quotes.iter()
    }

    pub fn as_slice(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for quote in &self.quotes {
            if !seen.contains(&quote.category) {
                seen.push(quote.category.clone());
            }
        }
        seen
    }

    /// Quotes in the given category, or all quotes when `category` is `None`.
    pub fn filter_by_category<'a>(
        &'a self,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Quote> + 'a {
        self.quotes
            .iter()
            .filter(move |q| match category {
                Some(c) => q.category == c,
                None => true,
            })
    }

    /// Serialize to compact JSON (storage form).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidJson(e.to_string()))
    }

    /// Serialize to pretty JSON (export form).
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidJson(e.to_string()))
    }

    /// Parse a JSON array of quotes.
    ///
    /// Anything other than an array is rejected with [`Error::NotAnArray`],
    /// and each element must be a valid quote.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidJson(e.to_string()))?;

        let serde_json::Value::Array(items) = value else {
            return Err(Error::NotAnArray);
        };

        let mut quotes = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let quote: Quote = serde_json::from_value(item).map_err(|e| Error::InvalidQuote {
                index,
                reason: e.to_string(),
            })?;
            quote.validate().map_err(|e| Error::InvalidQuote {
                index,
                reason: e.to_string(),
            })?;
            quotes.push(quote);
        }

        Ok(Self { quotes })
    }
}

impl From<Vec<Quote>> for Collection {
    fn from(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }
}

impl FromIterator<Quote> for Collection {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Collection {
    type Item = Quote;
    type IntoIter = std::vec::IntoIter<Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.iter()
    }
}

impl Extend<Quote> for Collection {
    fn extend<I: IntoIterator<Item = Quote>>(&mut self, iter: I) {
        self.quotes.extend(iter);
    }
}
