//! Graph construction from raw records
//!
//! ```text
//! RawRecord[] ──> group by type ──> resolve + extract (per type, parallel)
//!                                        │
//!                                        v
//!                       link: dedupe ids, index names, resolve refs
//!                                        │
//!                                        v
//!                                  Graph + Diagnostics
//! ```

use crate::diagnostics::{Diagnostics, DuplicateIdWarning, UnresolvedReferenceWarning};
use crate::edge::{Edge, EdgeKind};
use crate::error::RecordError;
use crate::graph::Graph;
use crate::node::{Node, NodeId};
use crate::record::RawRecord;
use crate::resolver::{self, PendingRef};
use crate::schema::{EntityTypeSchema, SchemaRegistry};
use crate::text;
use rayon::prelude::*;
use std::collections::HashMap;

/// A node together with the references it holds
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub node: Node,
    pub refs: Vec<PendingRef>,
}

/// Result of a build: the frozen graph and everything recoverable that went wrong
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: Graph,
    pub diagnostics: Diagnostics,
}

/// Builds graphs against one schema registry
///
/// Holds no state between builds; each call to `build` is an isolated
/// snapshot.
pub struct GraphBuilder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Build a graph from a complete record set
    pub fn build(&self, records: &[RawRecord]) -> BuildOutput {
        let mut diagnostics = Diagnostics::new();

        let mut groups: HashMap<&str, Vec<&RawRecord>> = HashMap::new();
        for record in records {
            if self.registry.contains(&record.source_type) {
                groups.entry(record.source_type.as_str()).or_default().push(record);
            } else {
                tracing::warn!(
                    "Dropping record from {}: unknown type '{}'",
                    record.origin,
                    record.source_type
                );
                diagnostics.dropped_records.push(RecordError::UnknownType {
                    type_name: record.source_type.clone(),
                    origin: record.origin.clone(),
                });
            }
        }

        let batches: Vec<(&EntityTypeSchema, Vec<&RawRecord>)> = self
            .registry
            .iter()
            .map(|schema| {
                let records = groups.remove(schema.type_name.as_str()).unwrap_or_default();
                (schema, records)
            })
            .collect();

        let resolved: Vec<(Vec<Resolved>, Diagnostics)> = batches
            .par_iter()
            .map(|(schema, records)| self.resolve_type(schema, records))
            .collect();

        let mut all = Vec::with_capacity(records.len());
        for (batch, batch_diagnostics) in resolved {
            all.extend(batch);
            diagnostics.extend(batch_diagnostics);
        }

        let graph = Self::link(all, &mut diagnostics);
        tracing::debug!(
            "Built graph: {} nodes, {} edges; {}",
            graph.node_count(),
            graph.edge_count(),
            diagnostics.summary()
        );
        BuildOutput { graph, diagnostics }
    }

    /// Resolve every record of one type; needs only that type's schema
    fn resolve_type(
        &self,
        schema: &EntityTypeSchema,
        records: &[&RawRecord],
    ) -> (Vec<Resolved>, Diagnostics) {
        let mut out = Vec::with_capacity(records.len());
        let mut diagnostics = Diagnostics::new();

        for record in records {
            match resolver::resolve(record, schema) {
                Ok((mut node, mut refs)) => {
                    if schema.has_matchers() {
                        let extraction = text::extract(record, self.registry, &node.id);
                        extraction.apply_to(&mut node);
                        refs.extend(extraction.refs);
                        diagnostics.ignored_matches.extend(extraction.ignored);
                    }
                    out.push(Resolved { node, refs });
                }
                Err(e) => {
                    tracing::warn!("Dropping record: {}", e);
                    diagnostics.dropped_records.push(e);
                }
            }
        }

        tracing::debug!("Resolved {} {} records", out.len(), schema.type_name);
        (out, diagnostics)
    }

    /// Index nodes and resolve references into edges
    ///
    /// Duplicate ids keep the first occurrence; the later record and its
    /// references are dropped and reported. References resolve by id first,
    /// then by name within the hinted type. Text-derived references resolve
    /// by name only.
    pub fn link(resolved: Vec<Resolved>, diagnostics: &mut Diagnostics) -> Graph {
        let mut kept: HashMap<NodeId, usize> = HashMap::with_capacity(resolved.len());
        let mut nodes = Vec::with_capacity(resolved.len());
        let mut pending = Vec::new();

        for Resolved { node, refs } in resolved {
            if let Some(&first) = kept.get(&node.id) {
                let first: &Node = &nodes[first];
                tracing::warn!(
                    "Duplicate id '{}' in {}, keeping {}",
                    node.id,
                    node.origin,
                    first.origin
                );
                diagnostics.duplicates.push(DuplicateIdWarning {
                    id: node.id.clone(),
                    kept_type: first.node_type.0.clone(),
                    kept_origin: first.origin.clone(),
                    dropped_type: node.node_type.0.clone(),
                    dropped_origin: node.origin.clone(),
                });
                continue;
            }
            kept.insert(node.id.clone(), nodes.len());
            nodes.push(node);
            pending.extend(refs);
        }

        let graph = Graph::with_nodes(nodes);
        let mut edges = Vec::with_capacity(pending.len());

        for r in pending {
            match Self::resolve_target(&graph, &r) {
                Some(target) => {
                    let edge = if r.reversed {
                        Edge::new(target, r.from, r.relation, r.kind).reversed()
                    } else {
                        Edge::new(r.from, target, r.relation, r.kind)
                    };
                    edges.push(edge);
                }
                None => {
                    if !r.skip_unresolved {
                        let raw = NodeId::new(r.raw_target.clone());
                        let edge = if r.reversed {
                            Edge::new(raw, r.from.clone(), r.relation.clone(), r.kind).reversed()
                        } else {
                            Edge::new(r.from.clone(), raw, r.relation.clone(), r.kind)
                        };
                        edges.push(edge.dangling());
                    }
                    tracing::trace!("Unresolved {} reference {} -> {}", r.relation, r.from, r.raw_target);
                    diagnostics.unresolved.push(UnresolvedReferenceWarning {
                        from: r.from,
                        relation: r.relation,
                        target: r.raw_target,
                        type_hint: r.type_hint,
                        skipped: r.skip_unresolved,
                    });
                }
            }
        }

        graph.freeze(edges)
    }

    fn resolve_target(graph: &Graph, r: &PendingRef) -> Option<NodeId> {
        let by_name = || match &r.type_hint {
            Some(hint) => graph.lookup_name(hint, &r.raw_target).map(|n| n.id.clone()),
            None => match graph.lookup_name_any(&r.raw_target).as_slice() {
                [only] => Some(only.id.clone()),
                _ => None,
            },
        };

        match r.kind {
            EdgeKind::Text => by_name(),
            EdgeKind::Reference => {
                if let Some(node) = graph.node(&r.raw_target) {
                    return Some(node.id.clone());
                }
                r.type_hint.as_ref().and_then(|_| by_name())
            }
        }
    }
}
