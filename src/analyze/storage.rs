use crate::foundation::error::CodegenResult;
use crate::foundation::ids::NodeIdx;
use crate::graph::object_graph::ObjectGraph;
use crate::model::object::{NodeFamily, ObjectKind};

/// Name of the unowned property set in every variant.
pub const THEME_PROPERTIES_NAME: &str = "ThemeProperties";

/// Counts produced by [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Nodes with a field.
    pub stored: usize,
    /// Nodes with a read-only field.
    pub readonly: usize,
    /// Nodes constructed at their single use site.
    pub inlined: usize,
    /// Nodes that get a factory method.
    pub factories: usize,
    /// Whether an unowned theme property set is reachable.
    pub themed: bool,
}

/// Inbound edges that represent an independent use of `idx`.
///
/// An edge from an expression animation is not a use when the animation is referenced from a
/// single place and is one of the animations running on `idx` itself (or on its property set):
/// the animation is then created inside `idx`'s own factory.
pub fn filtered_in_refs(graph: &ObjectGraph, idx: NodeIdx) -> Vec<NodeIdx> {
    let node = graph.node(idx);
    let mut out = Vec::with_capacity(node.in_refs().len());

    for v in node.in_refs() {
        let ObjectKind::ExpressionAnimation(expr) = graph.kind(v.from) else {
            out.push(v.from);
            continue;
        };

        if graph.node(v.from).in_refs().len() > 1 {
            out.push(v.from);
            continue;
        }

        if !animates_with_expression(graph, idx, &expr.expression) {
            out.push(v.from);
        }
    }
    out
}

/// Number of [`filtered_in_refs`].
pub fn filtered_inbound_count(graph: &ObjectGraph, idx: NodeIdx) -> usize {
    filtered_in_refs(graph, idx).len()
}

fn animates_with_expression(graph: &ObjectGraph, idx: NodeIdx, expression: &str) -> bool {
    let doc = graph.document();
    let obj = graph.object(idx);
    let own = obj.animators.iter();
    let of_properties = obj
        .properties
        .and_then(|ps| doc.objects.get(ps.index()))
        .map(|ps| ps.animators.as_slice())
        .unwrap_or_default()
        .iter();

    own.chain(of_properties).any(|a| {
        matches!(
            doc.objects.get(a.animation.index()).map(|o| &o.kind),
            Some(ObjectKind::ExpressionAnimation(e)) if e.expression == expression
        )
    })
}

/// Whether the node gets its own factory method.
pub fn needs_a_factory(graph: &ObjectGraph, idx: NodeIdx) -> bool {
    let node = graph.node(idx);
    if node.inlined() {
        return false;
    }
    match graph.kind(idx) {
        // Only custom controllers are created explicitly; all controllers in the model are custom.
        ObjectKind::AnimationController { .. } => true,
        // Property sets exist on their owner.
        ObjectKind::PropertySet { .. } => false,
        // Unshared expression animations reuse a single instance.
        ObjectKind::ExpressionAnimation(_) => node.in_refs().len() > 1,
        _ => true,
    }
}

/// Decides inlining, sharing and storage for every node of a canonical graph.
#[tracing::instrument(skip(graph), fields(nodes = graph.len()))]
pub fn analyze(graph: &mut ObjectGraph) -> CodegenResult<AnalysisReport> {
    let counts: Vec<usize> = graph
        .nodes()
        .map(|(idx, _)| filtered_inbound_count(graph, idx))
        .collect();
    let root = graph.root();

    // Paths first, then easings.
    let paths: Vec<NodeIdx> = graph
        .nodes_of(NodeFamily::CompositionPath)
        .filter(|(idx, _)| counts[idx.index()] == 1)
        .map(|(idx, _)| idx)
        .collect();
    for idx in paths {
        force_inline(graph, idx);
    }

    let beziers: Vec<NodeIdx> = graph
        .nodes()
        .filter(|(idx, _)| {
            *idx != root
                && counts[idx.index()] == 1
                && matches!(
                    graph.kind(*idx),
                    ObjectKind::CubicBezierEasingFunction { .. }
                )
                && graph.object(*idx).properties.is_none()
        })
        .map(|(idx, _)| idx)
        .collect();
    for idx in beziers {
        force_inline(graph, idx);
    }

    let mut themed = false;
    if let Some(ps) = graph.unowned_property_set() {
        let node = graph.node_mut(ps);
        node.shared = true;
        node.name = Some(THEME_PROPERTIES_NAME.to_owned());
        themed = true;
    }
    let images: Vec<NodeIdx> = graph
        .nodes_of(NodeFamily::LoadedImageSurface)
        .map(|(idx, _)| idx)
        .collect();
    for idx in images {
        graph.node_mut(idx).shared = true;
    }

    let all: Vec<NodeIdx> = graph.nodes().map(|(idx, _)| idx).collect();
    for idx in all {
        let node = graph.node(idx);
        if node.shared() {
            let node = graph.node_mut(idx);
            node.requires_storage = true;
            node.requires_readonly_storage = true;
        } else if counts[idx.index()] > 1 {
            if matches!(graph.kind(idx), ObjectKind::PropertySet { .. }) {
                // Reached through its owner's `Properties`.
                if let Some(owner) = node.owner()
                    && !graph.node(owner).inlined()
                {
                    graph.node_mut(owner).requires_storage = true;
                }
            } else if !node.inlined() {
                graph.node_mut(idx).requires_storage = true;
            }
        } else if matches!(graph.kind(idx), ObjectKind::AnimationController { .. }) {
            graph.node_mut(idx).requires_storage = true;
        }
    }

    graph.node_mut(root).requires_storage = true;

    let mut report = AnalysisReport {
        themed,
        ..AnalysisReport::default()
    };
    for (idx, node) in graph.nodes() {
        report.stored += usize::from(node.requires_storage());
        report.readonly += usize::from(node.requires_readonly_storage());
        report.inlined += usize::from(node.inlined());
        report.factories += usize::from(needs_a_factory(graph, idx));
    }

    tracing::debug!(
        stored = report.stored,
        readonly = report.readonly,
        inlined = report.inlined,
        factories = report.factories,
        themed,
        "storage analyzed"
    );
    Ok(report)
}

fn force_inline(graph: &mut ObjectGraph, idx: NodeIdx) {
    let node = graph.node_mut(idx);
    node.inlined = true;
    node.requires_storage = false;
    node.requires_readonly_storage = false;
}

#[cfg(test)]
#[path = "../../tests/unit/analyze/storage.rs"]
mod tests;
