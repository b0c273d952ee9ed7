//! Candidate labels derived from a structured record
//!
//! Every key of the record whose value carries content becomes a lower-cased
//! label that page text is matched against. Iteration order follows the key
//! order of the record.

use serde_json::{Map, Value};

/// Ordered, duplicate-free set of lower-cased labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    labels: Vec<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, lower-casing it; returns false if it was blank or already present
    pub fn insert(&mut self, label: &str) -> bool {
        if label.trim().is_empty() {
            return false;
        }
        let label = label.to_lowercase();
        if self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// Whether a record value counts as present
///
/// Non-empty arrays, strings with non-whitespace content and non-empty
/// objects are present. Null, numbers, booleans and empty containers are not.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Candidate labels for a record
pub fn candidate_set(record: &Map<String, Value>) -> CandidateSet {
    record
        .iter()
        .filter(|(_, value)| is_present(value))
        .map(|(key, _)| key.as_str())
        .collect()
}

/// Candidate labels for any JSON value; non-objects yield an empty set
pub fn candidate_set_from_value(record: &Value) -> CandidateSet {
    match record {
        Value::Object(map) => candidate_set(map),
        _ => CandidateSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_of(value: Value) -> Vec<String> {
        candidate_set_from_value(&value).iter().map(String::from).collect()
    }

    #[test]
    fn test_empty_values_excluded() {
        let record = json!({"summary": "", "skills": ["Python"]});
        assert_eq!(set_of(record), vec!["skills"]);
    }

    #[test]
    fn test_scalars_and_null_excluded() {
        let record = json!({
            "age": 31,
            "remote": true,
            "photo": null,
            "tags": [],
            "meta": {},
            "bio": "   ",
            "education": {"school": "MIT"},
        });
        assert_eq!(set_of(record), vec!["education"]);
    }

    #[test]
    fn test_keys_lower_cased_in_record_order() {
        let record = json!({"Skills": ["Rust"], "EXPERIENCE": [{"role": "dev"}], "Name": "Ada"});
        assert_eq!(set_of(record), vec!["skills", "experience", "name"]);
    }

    #[test]
    fn test_case_collisions_keep_first() {
        let record = json!({"Skills": ["Rust"], "skills": ["Go"]});
        assert_eq!(set_of(record), vec!["skills"]);
    }

    #[test]
    fn test_blank_key_ignored() {
        let record = json!({"": "x", "  ": ["y"], "projects": ["z"]});
        assert_eq!(set_of(record), vec!["projects"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let record = json!({"skills": ["Rust"], "education": {"school": "MIT"}});
        let map = record.as_object().unwrap();
        assert_eq!(candidate_set(map), candidate_set(map));
    }

    #[test]
    fn test_non_object_record() {
        assert!(candidate_set_from_value(&json!(["skills"])).is_empty());
        assert!(candidate_set_from_value(&Value::Null).is_empty());
    }
}
