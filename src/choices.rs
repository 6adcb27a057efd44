//! Choice tables: declared enumerations with prefix matching.

use std::collections::BTreeMap;

use crate::args::normalize;
use crate::error::CaptureError;

/// One declared choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The input as declared, used in help output
    pub text: String,
    /// The value the input resolves to
    pub value: String,
}

/// A table from normalized input to resolved value.
///
/// Lookup ignores case and punctuation. An input that is a prefix of exactly
/// one declared key resolves to that key's value.
///
/// ```
/// use argprompt::Choices;
///
/// let choices = Choices::from_tag("apple:1,blue:2,banana:3");
/// assert_eq!(choices.convert("ba").unwrap(), "3");
/// assert!(choices.convert("b").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices(BTreeMap<String, Choice>);

impl Choices {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `"a:1,b:2"` or `"a,b,c"` (each key is its own value).
    pub fn from_tag(tag: &str) -> Self {
        let mut choices = Self::new();
        for option in tag.split(',') {
            let mut parts = option.splitn(2, ':');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or(key);
            choices.add(key, value);
        }
        choices
    }

    /// Add an input and the value it resolves to.
    pub fn add(&mut self, input: impl Into<String>, value: impl Into<String>) {
        let text = input.into();
        self.0.insert(
            normalize(&text),
            Choice {
                text,
                value: value.into(),
            },
        );
    }

    /// Builder form of [`Choices::add`].
    pub fn with(mut self, input: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(input, value);
        self
    }

    /// Resolve `input` to its declared value.
    ///
    /// An empty table passes the input through unchanged. Otherwise an exact
    /// normalized match wins, then a unique prefix match; anything else is
    /// [`CaptureError::InvalidConversion`].
    pub fn convert(&self, input: &str) -> Result<String, CaptureError> {
        if self.is_empty() {
            return Ok(input.to_string());
        }

        let key = normalize(input);
        if let Some(choice) = self.0.get(&key) {
            return Ok(choice.value.clone());
        }

        if !key.is_empty() {
            let mut possible = self
                .0
                .iter()
                .filter(|(option, _)| option.starts_with(&key))
                .map(|(_, choice)| &choice.value);
            if let (Some(only), None) = (possible.next(), possible.next()) {
                return Ok(only.clone());
            }
        }

        Err(CaptureError::InvalidConversion {
            value: input.to_string(),
        })
    }

    /// Whether any choices are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared choices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(normalized key, choice)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Choice)> {
        self.0.iter()
    }

    /// The declared resolved values, in key order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(|c| c.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> Choices {
        Choices::new()
            .with("apple", "1")
            .with("blue", "2")
            .with("banana", "3")
    }

    #[test]
    fn test_exact_match_ignores_case() {
        let choices = Choices::from_tag("a,b,c");
        assert_eq!(choices.convert("A").unwrap(), "a");
    }

    #[test]
    fn test_unique_prefix_match() {
        assert_eq!(fruit().convert("A").unwrap(), "1");
        assert_eq!(fruit().convert("ba").unwrap(), "3");
    }

    #[test]
    fn test_ambiguous_prefix_fails() {
        let err = fruit().convert("b").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConversion { value } if value == "b"));
    }

    #[test]
    fn test_no_match_fails() {
        assert!(fruit().convert("zebra").is_err());
        assert!(fruit().convert("").is_err());
    }

    #[test]
    fn test_empty_table_passes_through() {
        assert_eq!(Choices::new().convert("anything").unwrap(), "anything");
    }

    #[test]
    fn test_from_tag_pairs() {
        let choices = Choices::from_tag("Small:s,Large:l");
        assert_eq!(choices.len(), 2);
        assert_eq!(choices.convert("large").unwrap(), "l");
        let texts: Vec<&str> = choices.iter().map(|(_, c)| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Large", "Small"]);
    }
}
