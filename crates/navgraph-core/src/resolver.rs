//! Record resolution: raw record + schema -> node + pending references

use crate::edge::EdgeKind;
use crate::error::RecordError;
use crate::node::{Node, NodeId};
use crate::record::RawRecord;
use crate::schema::EntityTypeSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reference waiting for its target to be looked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRef {
    /// Node holding the reference
    pub from: NodeId,

    /// Reference field or matcher name
    pub relation: String,

    /// Raw target: an id, or a name for text-derived references
    pub raw_target: String,

    /// Expected type of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,

    pub kind: EdgeKind,

    /// Edge runs from the target back to `from`
    #[serde(default)]
    pub reversed: bool,

    /// Drop instead of keeping a dangling edge
    #[serde(default)]
    pub skip_unresolved: bool,
}

impl PendingRef {
    pub fn new(
        from: impl Into<NodeId>,
        relation: impl Into<String>,
        raw_target: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            relation: relation.into(),
            raw_target: raw_target.into(),
            type_hint: None,
            kind: EdgeKind::Reference,
            reversed: false,
            skip_unresolved: false,
        }
    }

    pub fn with_type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn from_text(mut self) -> Self {
        self.kind = EdgeKind::Text;
        self
    }
}

/// Translate one record into a node and its outgoing references
///
/// Missing source fields leave the attribute absent. A list-valued
/// reference field yields one reference per non-empty element, in order.
pub fn resolve(
    record: &RawRecord,
    schema: &EntityTypeSchema,
) -> Result<(Node, Vec<PendingRef>), RecordError> {
    let attributes: BTreeMap<_, _> = schema
        .field_map
        .iter()
        .filter_map(|(canonical, source)| {
            record
                .raw_fields
                .get(source)
                .map(|value| (canonical.clone(), value.clone()))
        })
        .collect();

    let name = attributes
        .get(&schema.name_field)
        .and_then(|v| v.first())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let id = match attributes.get(&schema.id_field).and_then(|v| v.first()) {
        Some(id) => NodeId::new(id.trim()),
        None if !name.is_empty() => NodeId::synthesize(&schema.type_name, &name, &record.origin),
        None => {
            return Err(RecordError::MissingIdentifier {
                type_name: schema.type_name.clone(),
                origin: record.origin.clone(),
            })
        }
    };

    let mut refs = Vec::new();
    for reference in &schema.reference_fields {
        let Some(value) = attributes.get(&reference.field) else {
            continue;
        };
        for target in value.values() {
            refs.push(PendingRef {
                from: id.clone(),
                relation: reference.field.clone(),
                raw_target: target.trim().to_string(),
                type_hint: reference.target_type.clone(),
                kind: EdgeKind::Reference,
                reversed: reference.reversed,
                skip_unresolved: reference.skip_unresolved,
            });
        }
    }

    tracing::trace!(
        "Resolved {} '{}' from {} with {} references",
        schema.type_name,
        id,
        record.origin,
        refs.len()
    );

    let node = Node {
        id,
        node_type: schema.type_name.clone().into(),
        name,
        attributes,
        origin: record.origin.clone(),
    };
    Ok((node, refs))
}
