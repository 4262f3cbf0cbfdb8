//! Paths into a JSON response body.

use std::fmt;

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// Parsed field path such as `monthlyPayment` or `data.items[0].id`.
///
/// A leading `$` or `$.` is accepted and ignored, so `$.apr` and `apr`
/// address the same field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parses a dotted path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFieldPath` for empty paths, empty
    /// segments, unbalanced brackets or non-numeric indices.
    pub fn parse(path: &str) -> DomainResult<Self> {
        let invalid = |reason: &str| DomainError::InvalidFieldPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = path.trim();
        let body = trimmed
            .strip_prefix("$.")
            .or_else(|| trimmed.strip_prefix('$'))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        for part in body.split('.') {
            let (name, mut rest) = match part.find('[') {
                Some(bracket) => part.split_at(bracket),
                None => (part, ""),
            };

            if !name.is_empty() {
                segments.push(Segment::Key(name.to_string()));
            } else if rest.is_empty() {
                return Err(invalid("empty segment"));
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("array index must be a non-negative integer"))?;
                segments.push(Segment::Index(index));

                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after ']'"));
                }
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Looks the path up in `value`; `None` if any step is missing.
    #[must_use]
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                Segment::Key(key) => current.get(key),
                Segment::Index(index) => current.get(index),
            })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_simple_key() {
        let path = FieldPath::parse("monthlyPayment").unwrap();
        assert_eq!(path.segments(), &[Segment::Key("monthlyPayment".into())]);
    }

    #[test]
    fn test_dollar_prefix_is_ignored() {
        assert_eq!(
            FieldPath::parse("$.apr").unwrap().segments(),
            FieldPath::parse("apr").unwrap().segments()
        );
    }

    #[test]
    fn test_nested_with_index() {
        let path = FieldPath::parse("data.items[0].id").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("data".into()),
                Segment::Key("items".into()),
                Segment::Index(0),
                Segment::Key("id".into()),
            ]
        );

        let body = json!({"data": {"items": [{"id": 7}]}});
        assert_eq!(path.lookup(&body), Some(&json!(7)));
    }

    #[test]
    fn test_missing_field() {
        let path = FieldPath::parse("schedule[3]").unwrap();
        assert_eq!(path.lookup(&json!({"schedule": [1, 2]})), None);
        assert_eq!(path.lookup(&json!({"other": 1})), None);
    }

    #[test]
    fn test_null_is_found() {
        let path = FieldPath::parse("apr").unwrap();
        assert_eq!(path.lookup(&json!({"apr": null})), Some(&Value::Null));
    }

    #[test]
    fn test_invalid_paths() {
        for raw in ["", "$", "a..b", "items[", "items[x]", "items[0]x"] {
            let err = FieldPath::parse(raw).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidFieldPath { .. }),
                "{raw}: {err}"
            );
        }
    }
}
