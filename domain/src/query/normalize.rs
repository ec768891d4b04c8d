//! Result normalization shared by both access paths.

use super::projection::FieldProjection;
use crate::document::TaskDocument;
use std::collections::HashSet;

/// Documents after normalization, plus the projected field set if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub tasks: Vec<TaskDocument>,
    pub fields_returned: Option<Vec<String>>,
}

/// Drop container documents and duplicate identifiers, then project fields.
///
/// Classification happens before projection, so a projection that omits
/// `type` cannot let a container through.
pub fn normalize_documents(
    documents: Vec<TaskDocument>,
    projection: Option<&FieldProjection>,
) -> Normalized {
    let mut seen = HashSet::new();
    let tasks = documents
        .into_iter()
        .filter(|doc| !doc.is_container())
        .filter(|doc| match doc.id() {
            Some(id) => seen.insert(id.to_string()),
            None => true,
        })
        .map(|doc| match projection {
            Some(projection) => projection.apply(&doc),
            None => doc,
        })
        .collect();

    Normalized {
        tasks,
        fields_returned: projection.map(FieldProjection::names),
    }
}
