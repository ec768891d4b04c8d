//! Field projection

use crate::document::{TaskDocument, fields};
use std::collections::BTreeSet;

/// The set of fields returned per task.
///
/// The identifier field is always part of the set, whether or not the
/// caller listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProjection {
    fields: BTreeSet<String>,
}

impl FieldProjection {
    /// Build a projection from caller-requested names.
    ///
    /// Returns `None` for an empty request, which means "all fields".
    pub fn from_requested<I, S>(requested: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: BTreeSet<String> = requested
            .into_iter()
            .map(Into::into)
            .filter(|f| !f.trim().is_empty())
            .collect();
        if fields.is_empty() {
            return None;
        }
        fields.insert(fields::ID.to_string());
        Some(Self { fields })
    }

    /// Sorted field names, identifier included
    pub fn names(&self) -> Vec<String> {
        self.fields.iter().cloned().collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn apply(&self, document: &TaskDocument) -> TaskDocument {
        document.retain_fields(self.fields.iter().map(|f| f.as_str()))
    }

    /// Projection as sent to the document store.
    ///
    /// `type` is fetched even when not requested so container documents can
    /// still be excluded after the query; [`FieldProjection::apply`] trims it
    /// again before results leave the reconciliation layer.
    pub fn store_fields(&self) -> Vec<String> {
        let mut wire = self.fields.clone();
        wire.insert(fields::TYPE.to_string());
        wire.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_always_included() {
        let projection = FieldProjection::from_requested(["title", "day"]).unwrap();
        assert_eq!(projection.names(), vec!["_id", "day", "title"]);
    }

    #[test]
    fn test_empty_request_means_all_fields() {
        assert!(FieldProjection::from_requested(Vec::<String>::new()).is_none());
        assert!(FieldProjection::from_requested([" "]).is_none());
    }

    #[test]
    fn test_apply_keeps_requested_and_identifier() {
        let projection = FieldProjection::from_requested(["title"]).unwrap();
        let doc = TaskDocument::from_value(json!({"_id": "a", "title": "T", "note": "N"})).unwrap();
        let projected = projection.apply(&doc);
        assert_eq!(projected.id(), Some("a"));
        assert_eq!(projected.title(), Some("T"));
        assert!(projected.note().is_none());
    }

    #[test]
    fn test_store_fields_carry_type() {
        let projection = FieldProjection::from_requested(["title"]).unwrap();
        assert_eq!(projection.store_fields(), vec!["_id", "title", "type"]);
        assert!(!projection.contains("type"));
    }
}
