use crate::foundation::error::{CodegenError, CodegenResult};
use crate::foundation::ids::{NodeIdx, ObjectId, Position};
use crate::model::object::{NodeFamily, ObjectDef, ObjectKind};
use crate::model::source::Document;
use crate::model::validate::{Ownership, validate_document};

/// An incoming reference: the referencing node and the edge's discovery rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    /// Referencing node.
    pub from: NodeIdx,
    /// Edge position, from a counter separate from node positions.
    pub position: Position,
}

/// One distinct object reachable from the root.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) object: ObjectId,
    pub(crate) family: NodeFamily,
    pub(crate) position: Position,
    pub(crate) in_refs: Vec<Vertex>,
    pub(crate) owner: Option<NodeIdx>,
    pub(crate) canonical: NodeIdx,
    pub(crate) group: Vec<NodeIdx>,
    pub(crate) requires_storage: bool,
    pub(crate) requires_readonly_storage: bool,
    pub(crate) inlined: bool,
    pub(crate) shared: bool,
    pub(crate) name: Option<String>,
}

impl Node {
    /// Object this node stands for.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Identity map family.
    pub fn family(&self) -> NodeFamily {
        self.family
    }

    /// Discovery rank.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Incoming edges in recording order, which is also edge position order.
    pub fn in_refs(&self) -> &[Vertex] {
        &self.in_refs
    }

    /// Owner of a property set node.
    pub fn owner(&self) -> Option<NodeIdx> {
        self.owner
    }

    /// Representative of this node's equivalence group.
    pub fn canonical(&self) -> NodeIdx {
        self.canonical
    }

    /// Members of this node's equivalence group, in position order. Empty when the node was
    /// never merged with anything.
    pub fn nodes_in_group(&self) -> &[NodeIdx] {
        &self.group
    }

    /// Whether the node must be cached in a field after first construction.
    pub fn requires_storage(&self) -> bool {
        self.requires_storage
    }

    /// Whether that field is read-only.
    pub fn requires_readonly_storage(&self) -> bool {
        self.requires_readonly_storage
    }

    /// Whether the node is constructed at its single use site.
    pub fn inlined(&self) -> bool {
        self.inlined
    }

    /// Whether the node is shared with other variants of the same source.
    pub fn shared(&self) -> bool {
        self.shared
    }

    /// Assigned name, once naming ran.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The earliest edge into this node.
    pub(crate) fn first_ref(&self) -> Option<&Vertex> {
        self.in_refs.first()
    }

    /// The earliest edge into this node from `from`.
    pub(crate) fn first_ref_from(&self, from: NodeIdx) -> Option<&Vertex> {
        self.in_refs.iter().find(|v| v.from == from)
    }
}

/// Arena of nodes reachable from a document's root, in discovery order.
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    doc: Document,
    nodes: Vec<Node>,
    node_by_object: Vec<Option<NodeIdx>>,
    root: NodeIdx,
    unowned_property_set: Option<NodeIdx>,
}

impl ObjectGraph {
    /// Validates `doc` and traverses it from the root.
    ///
    /// Traversal order is fixed per kind so an unchanged document always yields the same
    /// positions.
    #[tracing::instrument(skip(doc), fields(objects = doc.objects.len()))]
    pub fn build(doc: Document) -> CodegenResult<Self> {
        let ownership = validate_document(&doc)?;

        let (nodes, node_by_object, root, unowned_property_set) = {
            let mut b = GraphBuilder {
                doc: &doc,
                ownership: &ownership,
                nodes: Vec::new(),
                node_by_object: vec![None; doc.objects.len()],
                next_edge: 0,
                unowned_property_set: None,
            };
            let root = b.reference(None, doc.root)?;
            b.check_owners()?;
            (b.nodes, b.node_by_object, root, b.unowned_property_set)
        };

        tracing::debug!(
            nodes = nodes.len(),
            themed = unowned_property_set.is_some(),
            "object graph built"
        );

        Ok(Self {
            doc,
            nodes,
            node_by_object,
            root,
            unowned_property_set,
        })
    }

    /// The document the graph was built from.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Root node. Always position 0.
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    /// The single unowned (theme) property set, if one is reachable.
    pub fn unowned_property_set(&self) -> Option<NodeIdx> {
        self.unowned_property_set
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the graph has no nodes. Never the case for a built graph.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by index.
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx.index()]
    }

    /// Object behind a node.
    pub fn object(&self, idx: NodeIdx) -> &ObjectDef {
        &self.doc.objects[self.nodes[idx.index()].object.index()]
    }

    /// Kind of the object behind a node.
    pub fn kind(&self, idx: NodeIdx) -> &ObjectKind {
        &self.object(idx).kind
    }

    /// Node of a reachable object.
    pub fn node_for(&self, id: ObjectId) -> Option<NodeIdx> {
        self.node_by_object.get(id.index()).copied().flatten()
    }

    /// Node of an object that must be reachable because something reachable references it.
    pub(crate) fn expect_node(&self, id: ObjectId) -> CodegenResult<NodeIdx> {
        self.node_for(id)
            .ok_or_else(|| CodegenError::precondition(format!("object {id} is not in the graph")))
    }

    /// All nodes in position order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIdx, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIdx(i as u32), n))
    }

    /// Nodes of one identity map family, in position order.
    pub fn nodes_of(&self, family: NodeFamily) -> impl Iterator<Item = (NodeIdx, &Node)> + '_ {
        self.nodes().filter(move |(_, n)| n.family == family)
    }

    /// Canonical representative of a node.
    pub fn canonical(&self, idx: NodeIdx) -> NodeIdx {
        self.nodes[idx.index()].canonical
    }

    /// Short diagnostic label: kind, object id and position.
    pub(crate) fn describe(&self, idx: NodeIdx) -> String {
        let n = self.node(idx);
        format!(
            "{} {} at position {}",
            self.kind(idx).type_name(),
            n.object,
            n.position.0
        )
    }
}

struct GraphBuilder<'a> {
    doc: &'a Document,
    ownership: &'a Ownership,
    nodes: Vec<Node>,
    node_by_object: Vec<Option<NodeIdx>>,
    next_edge: u32,
    unowned_property_set: Option<NodeIdx>,
}

impl<'a> GraphBuilder<'a> {
    fn reference(&mut self, from: Option<NodeIdx>, target: ObjectId) -> CodegenResult<NodeIdx> {
        if let Some(idx) = self.node_by_object[target.index()] {
            self.add_vertex(from, idx);
            return Ok(idx);
        }

        let obj = self.doc.get(target)?;
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(Node {
            object: target,
            family: obj.kind.family(),
            position: Position(idx.0),
            in_refs: Vec::new(),
            owner: None,
            canonical: idx,
            group: Vec::new(),
            requires_storage: false,
            requires_readonly_storage: false,
            inlined: false,
            shared: false,
            name: None,
        });
        self.node_by_object[target.index()] = Some(idx);
        self.add_vertex(from, idx);

        self.visit(idx, target)?;
        Ok(idx)
    }

    fn add_vertex(&mut self, from: Option<NodeIdx>, to: NodeIdx) {
        let Some(from) = from else {
            return;
        };
        let position = Position(self.next_edge);
        self.next_edge += 1;
        self.nodes[to.index()]
            .in_refs
            .push(Vertex { from, position });
    }

    fn visit(&mut self, node: NodeIdx, id: ObjectId) -> CodegenResult<()> {
        let doc = self.doc;
        let obj = &doc.objects[id.index()];
        let is_property_set = matches!(obj.kind, ObjectKind::PropertySet { .. });

        let mut owned_set = None;
        if is_property_set {
            if self.ownership.owner(id).is_none() {
                if let Some(prev) = self.unowned_property_set {
                    return Err(CodegenError::precondition(format!(
                        "two unowned property sets are reachable: {} and {id}",
                        self.nodes[prev.index()].object
                    )));
                }
                // The theme set is created once per source, outside every variant.
                if !obj.animators.is_empty() {
                    return Err(CodegenError::precondition(format!(
                        "unowned property set {id} has animators; only owned property sets \
                         can be animated"
                    )));
                }
                self.unowned_property_set = Some(node);
            }
        } else if let Some(ps) = obj.properties {
            let ps_node = self.reference(Some(node), ps)?;
            self.nodes[ps_node.index()].owner = Some(node);
            owned_set = Some((ps_node, ps));
        }

        for r in obj.kind.references() {
            self.reference(Some(node), r.target)?;
        }

        // An owned property set's animators are started by its owner.
        if !is_property_set {
            self.reference_animators(node, id)?;
        }

        if let Some((ps_node, ps)) = owned_set {
            self.reference_animators(ps_node, ps)?;
        }

        Ok(())
    }

    fn reference_animators(&mut self, from: NodeIdx, id: ObjectId) -> CodegenResult<()> {
        let doc = self.doc;
        for a in &doc.objects[id.index()].animators {
            self.reference(Some(from), a.animation)?;
            if let Some(c) = a.controller {
                self.reference(Some(from), c)?;
            }
        }
        Ok(())
    }

    fn check_owners(&self) -> CodegenResult<()> {
        for n in &self.nodes {
            if let Some(owner) = self.ownership.owner(n.object)
                && n.owner.is_none()
            {
                return Err(CodegenError::precondition(format!(
                    "property set {} is reachable but its owner {owner} is not",
                    n.object
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/object_graph.rs"]
mod tests;
