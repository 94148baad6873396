//! JSON path lookups
//!
//! Status payloads nest the field of interest at different depths depending on
//! the API (`status`, `agentAlias.agentAliasStatus`, `documentDetails[0].status`).
//! A [`JsonPath`] is parsed once and then walked against each payload.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CoreError;

/// A single step of a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member lookup
    Key(String),
    /// Array element lookup
    Index(usize),
}

/// Dotted path into a JSON document, with optional `[n]` array indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse a path such as `documentDetails[0].status`
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut segments = Vec::new();

        for part in raw.split('.') {
            parse_part(part, raw, &mut segments)?;
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Path consisting of a single top-level field
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: name.clone(),
            segments: vec![Segment::Key(name)],
        }
    }

    /// Walk the path, returning `None` as soon as a step is missing
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                Segment::Key(key) => current.get(key.as_str()),
                Segment::Index(index) => current.get(*index),
            })
    }

    /// Walk the path and return the value only if it is a string
    pub fn lookup_str<'a>(&self, value: &'a Value) -> Option<&'a str> {
        self.lookup(value).and_then(Value::as_str)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_part(part: &str, raw: &str, segments: &mut Vec<Segment>) -> Result<(), CoreError> {
    let (key, mut rest) = match part.find('[') {
        Some(pos) => (&part[..pos], &part[pos..]),
        None => (part, ""),
    };

    if key.is_empty() && rest.is_empty() {
        return Err(CoreError::EmptyPathSegment(raw.to_string()));
    }
    if !key.is_empty() {
        if key.contains(']') {
            return Err(CoreError::TrailingCharacters(raw.to_string()));
        }
        segments.push(Segment::Key(key.to_string()));
    }

    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(CoreError::TrailingCharacters(raw.to_string()));
        }
        let close = rest
            .find(']')
            .ok_or_else(|| CoreError::UnclosedIndex(raw.to_string()))?;
        let index_str = &rest[1..close];
        let index = index_str
            .parse::<usize>()
            .map_err(|_| CoreError::InvalidIndex {
                path: raw.to_string(),
                index: index_str.to_string(),
            })?;
        segments.push(Segment::Index(index));
        rest = &rest[close + 1..];
    }

    Ok(())
}

impl FromStr for JsonPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_path_with_index() {
        let path = JsonPath::parse("documentDetails[0].status").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("documentDetails".to_string()),
                Segment::Index(0),
                Segment::Key("status".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "documentDetails[0].status");
    }

    #[test]
    fn test_parse_consecutive_indices() {
        let path: JsonPath = "matrix[1][2]".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("matrix".to_string()),
                Segment::Index(1),
                Segment::Index(2),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        assert!(matches!(
            JsonPath::parse("a..b"),
            Err(CoreError::EmptyPathSegment(_))
        ));
        assert!(matches!(JsonPath::parse(""), Err(CoreError::EmptyPathSegment(_))));
        assert!(matches!(
            JsonPath::parse("items[0"),
            Err(CoreError::UnclosedIndex(_))
        ));
        assert!(matches!(
            JsonPath::parse("items[-1]"),
            Err(CoreError::InvalidIndex { .. })
        ));
        assert!(matches!(
            JsonPath::parse("items[0]x"),
            Err(CoreError::TrailingCharacters(_))
        ));
    }

    #[test]
    fn test_lookup() {
        let doc = json!({
            "agentAlias": { "agentAliasStatus": "PREPARED" },
            "documentDetails": [{ "status": "INDEXED" }],
            "count": 3
        });

        let alias = JsonPath::parse("agentAlias.agentAliasStatus").unwrap();
        assert_eq!(alias.lookup_str(&doc), Some("PREPARED"));

        let doc_status = JsonPath::parse("documentDetails[0].status").unwrap();
        assert_eq!(doc_status.lookup_str(&doc), Some("INDEXED"));

        let out_of_range = JsonPath::parse("documentDetails[3].status").unwrap();
        assert_eq!(out_of_range.lookup(&doc), None);

        // Present but not a string
        let count = JsonPath::field("count");
        assert_eq!(count.lookup(&doc), Some(&json!(3)));
        assert_eq!(count.lookup_str(&doc), None);
    }
}
