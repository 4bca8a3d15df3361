//! Text-pattern references: named regexes applied to free-text records
//!
//! Each matcher is run over the whole text block in declared order and
//! every match contributes one candidate name. The first named group that
//! participates in a match supplies the name; a group called `ignore`
//! marks the occurrence as excluded instead. Candidates resolve by name
//! only, never by id.

use crate::node::{Node, NodeId};
use crate::record::{FieldValue, RawRecord};
use crate::resolver::PendingRef;
use crate::schema::{SchemaRegistry, IGNORE_CAPTURE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A match recorded for annotation but excluded from the edge set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredMatch {
    pub from: NodeId,
    pub matcher: String,
    pub text: String,
}

/// Everything a text block yields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextExtraction {
    pub refs: Vec<PendingRef>,
    pub ignored: Vec<IgnoredMatch>,
    /// Canonical field -> captured names, in match order
    pub captured: BTreeMap<String, Vec<String>>,
}

impl TextExtraction {
    /// Record captured names on the node's attributes
    pub fn apply_to(&self, node: &mut Node) {
        for (field, names) in &self.captured {
            node.attributes
                .insert(field.clone(), FieldValue::List(names.clone()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty() && self.ignored.is_empty()
    }
}

/// Text held by a record under the schema's text field
pub fn text_of(record: &RawRecord, registry: &SchemaRegistry) -> Option<String> {
    let schema = registry.get(&record.source_type)?;
    let source = schema.source_field(&schema.text_field)?;
    let value = record.raw_fields.get(source)?;
    Some(value.values().collect::<Vec<_>>().join("\n"))
}

/// Run a record's matchers over its text and collect candidate references
pub fn extract(record: &RawRecord, registry: &SchemaRegistry, from: &NodeId) -> TextExtraction {
    let mut out = TextExtraction::default();
    let matchers = registry.matchers(&record.source_type);
    if matchers.is_empty() {
        return out;
    }
    let Some(text) = text_of(record, registry) else {
        return out;
    };

    for matcher in matchers {
        let groups: Vec<&str> = matcher.regex.capture_names().flatten().collect();
        for caps in matcher.regex.captures_iter(&text) {
            let Some((group, m)) = groups
                .iter()
                .find_map(|g| caps.name(g).map(|m| (*g, m)))
            else {
                continue;
            };
            let candidate = m.as_str().trim();
            if candidate.is_empty() {
                continue;
            }

            if group == IGNORE_CAPTURE {
                out.ignored.push(IgnoredMatch {
                    from: from.clone(),
                    matcher: matcher.name.clone(),
                    text: candidate.to_string(),
                });
                continue;
            }

            let type_hint = matcher
                .target_type
                .clone()
                .or_else(|| registry.contains(group).then(|| group.to_string()));

            out.captured
                .entry(matcher.field.clone())
                .or_default()
                .push(candidate.to_string());

            let mut pending = PendingRef::new(from.clone(), matcher.name.clone(), candidate).from_text();
            pending.type_hint = type_hint;
            out.refs.push(pending);
        }
    }

    tracing::trace!(
        "Text of {} yielded {} references, {} ignored",
        record.origin,
        out.refs.len(),
        out.ignored.len()
    );
    out
}
