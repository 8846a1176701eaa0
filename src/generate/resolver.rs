use crate::foundation::error::{CodegenError, CodegenResult};
use crate::foundation::ids::NodeIdx;
use crate::graph::object_graph::{ObjectGraph, Vertex};
use serde::Serialize;
use std::collections::HashMap;

/// How a reference from one factory to another node is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    /// Call the callee's factory.
    Construct,
    /// Read the callee's field; it is already populated.
    ReadField,
    /// Write the callee's construction expression in place.
    Inline,
}

/// One decision made while emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    /// Position of the factory the reference is written in.
    pub caller: u32,
    /// Position of the referenced node.
    pub callee: u32,
    /// The decision.
    pub resolution: Resolution,
}

/// Decides, per reference site, whether the callee still has to be constructed.
///
/// Positions stand in for construction order: if another node reaches the callee through an
/// edge discovered earlier than the caller's own edge, the callee was built by then.
pub struct CallResolver<'g> {
    graph: &'g ObjectGraph,
    disable_field_optimization: bool,
    cache: HashMap<(NodeIdx, NodeIdx), Resolution>,
    log: Vec<ResolvedReference>,
}

impl<'g> CallResolver<'g> {
    /// A resolver with an empty cache over an analyzed, named graph.
    pub fn new(graph: &'g ObjectGraph, disable_field_optimization: bool) -> Self {
        Self {
            graph,
            disable_field_optimization,
            cache: HashMap::new(),
            log: Vec::new(),
        }
    }

    /// Resolves a reference written in `caller`'s factory to `callee`.
    ///
    /// `edge_source` is the node whose outgoing edge the reference corresponds to. It differs from
    /// `caller` when the factory writes code on behalf of something without its own factory: an
    /// owned property set's animators, or an unshared expression animation's parameters.
    pub fn resolve(
        &mut self,
        caller: NodeIdx,
        edge_source: NodeIdx,
        callee: NodeIdx,
    ) -> CodegenResult<Resolution> {
        let resolution = self.decide(caller, edge_source, callee)?;
        self.log.push(ResolvedReference {
            caller: self.graph.node(caller).position().0,
            callee: self.graph.node(callee).position().0,
            resolution,
        });
        Ok(resolution)
    }

    fn decide(
        &mut self,
        caller: NodeIdx,
        edge_source: NodeIdx,
        callee: NodeIdx,
    ) -> CodegenResult<Resolution> {
        let g = self.graph;
        let node = g.node(callee);

        if node.inlined() {
            if let Some(Resolution::Inline) = self.cache.insert((caller, callee), Resolution::Inline)
            {
                return Err(CodegenError::cache_consistency(format!(
                    "inlined {} is used twice from {}",
                    g.describe(callee),
                    g.describe(caller)
                )));
            }
            return Ok(Resolution::Inline);
        }
        if callee == g.root() || node.shared() {
            return self.read_field(caller, callee);
        }

        match self.cache.get(&(caller, callee)).copied() {
            Some(Resolution::Construct) if self.disable_field_optimization => {
                // The factory guards itself, but only a stored node can be guarded.
                self.read_field(caller, callee)?;
                self.cache.insert((caller, callee), Resolution::Construct);
                return Ok(Resolution::Construct);
            }
            Some(Resolution::Construct) => return self.read_field(caller, callee),
            Some(other) => return Ok(other),
            None => {}
        }

        if self.disable_field_optimization {
            self.cache.insert((caller, callee), Resolution::Construct);
            return Ok(Resolution::Construct);
        }

        let own = self.edge_into(edge_source, callee).ok_or_else(|| {
            CodegenError::precondition(format!(
                "{} references {} without a recorded edge",
                g.describe(edge_source),
                g.describe(callee)
            ))
        })?;
        let earliest = node.first_ref().map_or(own.position, |v| v.position);

        if earliest < own.position {
            self.read_field(caller, callee)
        } else {
            self.cache.insert((caller, callee), Resolution::Construct);
            Ok(Resolution::Construct)
        }
    }

    /// `from`'s earliest edge into `callee`, falling back to its edge into `callee`'s property set.
    fn edge_into(&self, from: NodeIdx, callee: NodeIdx) -> Option<Vertex> {
        let g = self.graph;
        if let Some(v) = g.node(callee).first_ref_from(from) {
            return Some(*v);
        }
        let ps = g.object(callee).properties.and_then(|id| g.node_for(id))?;
        g.node(ps).first_ref_from(from).copied()
    }

    fn read_field(&mut self, caller: NodeIdx, callee: NodeIdx) -> CodegenResult<Resolution> {
        let g = self.graph;
        if !g.node(callee).requires_storage() {
            return Err(CodegenError::cache_consistency(format!(
                "{} is needed again by {} but has no field",
                g.describe(callee),
                g.describe(caller)
            )));
        }
        self.cache.insert((caller, callee), Resolution::ReadField);
        Ok(Resolution::ReadField)
    }

    /// Decisions in the order they were made.
    pub fn into_log(self) -> Vec<ResolvedReference> {
        self.log
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/resolver.rs"]
mod tests;
