use crate::analyze::storage::{AnalysisReport, analyze};
use crate::canonicalize::pass::{CanonicalizeReport, canonical_document, canonicalize};
use crate::foundation::error::CodegenResult;
use crate::foundation::ids::ObjectId;
use crate::generate::emitter::EmittedVariant;
use crate::generate::fingerprint::{FactoryDecision, VariantDecisions};
use crate::graph::object_graph::ObjectGraph;
use crate::model::object::NodeFamily;
use crate::model::source::{CodegenOpts, VariantDef};
use crate::naming::namer::name_nodes;
use serde::Serialize;
use std::collections::HashMap;

/// Per-variant counts, printed by the `stats` subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Minimum API version of the variant.
    pub api_version: u32,
    /// Reachable nodes before canonicalization.
    pub nodes: usize,
    /// Reachable nodes of the canonical graph.
    pub canonical_nodes: usize,
    /// Canonical composition objects, property sets and animations included.
    pub composition_objects: usize,
    /// Canonical composition paths.
    pub composition_paths: usize,
    /// Canonical canvas geometries.
    pub canvas_geometries: usize,
    /// Canonical image surfaces.
    pub image_surfaces: usize,
    /// Rounds canonicalization took to settle.
    pub canonicalize_rounds: u32,
    /// Nodes merged into another.
    pub merged: usize,
    /// Nodes with a field.
    pub stored: usize,
    /// Nodes with a read-only field.
    pub readonly: usize,
    /// Nodes constructed at their use site.
    pub inlined: usize,
    /// Nodes with a factory method.
    pub factories: usize,
}

/// One variant carried through build, canonicalization, analysis and naming.
///
/// The graph held here is the canonical one: it was rebuilt from the canonical document so that
/// positions and edges describe the objects that are actually emitted.
#[derive(Debug)]
pub struct VariantPlan {
    /// Minimum API version.
    pub api_version: u32,
    /// Analyzed and named canonical graph.
    pub graph: ObjectGraph,
    /// What canonicalization merged.
    pub canonicalization: CanonicalizeReport,
    /// What storage analysis decided.
    pub analysis: AnalysisReport,
    /// Original group size per canonical object.
    group_sizes: HashMap<ObjectId, u32>,
    canonicalized: ObjectGraph,
}

impl VariantPlan {
    /// Runs every per-variant stage up to emission.
    #[tracing::instrument(skip(variant, opts), fields(api_version = variant.api_version))]
    pub fn build(variant: &VariantDef, opts: &CodegenOpts) -> CodegenResult<Self> {
        let mut first = ObjectGraph::build(variant.document.clone())?;
        let canonicalization = canonicalize(&mut first, opts.ignore_comments)?;

        // Object ids survive into the canonical document, so group sizes can be carried over.
        let group_sizes: HashMap<ObjectId, u32> = first
            .nodes()
            .filter(|(idx, _)| first.canonical(*idx) == *idx)
            .map(|(_, n)| (n.object(), n.nodes_in_group().len().max(1) as u32))
            .collect();

        let mut graph = ObjectGraph::build(canonical_document(&first))?;
        let analysis = analyze(&mut graph)?;
        name_nodes(&mut graph);

        Ok(Self {
            api_version: variant.api_version,
            graph,
            canonicalization,
            analysis,
            group_sizes,
            canonicalized: first,
        })
    }

    /// The graph canonicalization ran on. Merged-away nodes are still here, reachable through
    /// their representative's [`Node::nodes_in_group`](crate::Node::nodes_in_group).
    pub fn canonicalized(&self) -> &ObjectGraph {
        &self.canonicalized
    }

    /// How many original nodes the canonical node of `object` stands for.
    pub fn group_size(&self, object: ObjectId) -> u32 {
        self.group_sizes.get(&object).copied().unwrap_or(1)
    }

    /// Counts for reporting.
    pub fn stats(&self) -> GraphStats {
        let family = |f: NodeFamily| self.graph.nodes_of(f).count();
        GraphStats {
            api_version: self.api_version,
            nodes: self.canonicalized.len(),
            canonical_nodes: self.graph.len(),
            composition_objects: family(NodeFamily::CompositionObject),
            composition_paths: family(NodeFamily::CompositionPath),
            canvas_geometries: family(NodeFamily::CanvasGeometry),
            image_surfaces: family(NodeFamily::LoadedImageSurface),
            canonicalize_rounds: self.canonicalization.rounds,
            merged: self.canonicalization.merged_nodes(),
            stored: self.analysis.stored,
            readonly: self.analysis.readonly,
            inlined: self.analysis.inlined,
            factories: self.analysis.factories,
        }
    }

    /// The decision set of this plan once it has been emitted.
    pub fn decisions(&self, emitted: &EmittedVariant) -> VariantDecisions {
        let g = &self.graph;
        let factories = emitted
            .factories
            .iter()
            .map(|idx| {
                let n = g.node(*idx);
                FactoryDecision {
                    name: n.name().unwrap_or_default().to_owned(),
                    type_name: g.kind(*idx).type_name().to_owned(),
                    position: n.position().0,
                    requires_storage: n.requires_storage(),
                    requires_readonly_storage: n.requires_readonly_storage(),
                    inlined: n.inlined(),
                    group_size: self.group_size(n.object()),
                }
            })
            .collect();

        VariantDecisions {
            class_name: emitted.class_name.clone(),
            api_version: self.api_version,
            factories,
            resolutions: emitted.resolutions.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/plan.rs"]
mod tests;
