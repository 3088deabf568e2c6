//! Attribute scanning for a single tag body.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+(?:-\w+)*)\s*=\s*["']([^"']*)["']"#)
        .expect("attribute pattern is a valid regular expression")
});

/// Name/value pairs found in a tag body.
///
/// Only `name="value"` and `name='value'` forms are recognized; anything else
/// in the body is ignored. When a name repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    /// Returns the raw value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the raw value of `name`, or `default` when absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Parses `name` as a number.
    ///
    /// Returns `Ok(None)` when the attribute is absent and `Err` with the raw
    /// value when it is present but not a number. Surrounding whitespace is
    /// ignored.
    pub fn number(&self, name: &str) -> Result<Option<f32>, String> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<f32>().map(Some).map_err(|_| raw.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Scans a tag body for quoted attributes.
///
/// # Examples
///
/// ```
/// # use penstroke_parser::attributes::parse_attributes;
/// let attrs = parse_attributes(r#"cx="50" stroke-width='2' checked"#);
/// assert_eq!(attrs.get("cx"), Some("50"));
/// assert_eq!(attrs.get("stroke-width"), Some("2"));
/// assert_eq!(attrs.get("checked"), None);
/// ```
pub fn parse_attributes(body: &str) -> Attributes {
    let values = ATTRIBUTE
        .captures_iter(body)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();
    Attributes { values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_around_equals() {
        let attrs = parse_attributes(r#"x = "1"  y= '2'"#);
        assert_eq!(attrs.get("x"), Some("1"));
        assert_eq!(attrs.get("y"), Some("2"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let attrs = parse_attributes(r#"fill="red" fill="blue""#);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("fill"), Some("blue"));
    }

    #[test]
    fn test_unquoted_values_are_ignored() {
        let attrs = parse_attributes("r=5 cx=\"3\"");
        assert_eq!(attrs.get("r"), None);
        assert_eq!(attrs.get("cx"), Some("3"));
    }

    #[test]
    fn test_number() {
        let attrs = parse_attributes(r#"a=" 4.5 " b="abc""#);
        assert_eq!(attrs.number("a"), Ok(Some(4.5)));
        assert_eq!(attrs.number("b"), Err("abc".to_string()));
        assert_eq!(attrs.number("c"), Ok(None));
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_attributes("").is_empty());
        assert!(parse_attributes("   /").is_empty());
    }
}
