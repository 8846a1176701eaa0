use crate::foundation::error::{CodegenError, CodegenResult};
use crate::foundation::ids::ObjectId;
use crate::model::object::{ObjectKind, Slot};
use crate::model::source::Document;

/// Property set ownership derived from `properties` links.
#[derive(Debug, Clone, Default)]
pub struct Ownership {
    owner_of: Vec<Option<ObjectId>>,
}

impl Ownership {
    /// Owner of a property set, `None` for the unowned theme property set (and for anything that
    /// is not a property set).
    pub fn owner(&self, property_set: ObjectId) -> Option<ObjectId> {
        self.owner_of.get(property_set.index()).copied().flatten()
    }
}

/// Checks that a document is well formed and computes property set ownership.
///
/// Reachability-dependent rules (a single unowned property set) are checked by the graph builder.
pub fn validate_document(doc: &Document) -> CodegenResult<Ownership> {
    let root = doc.get(doc.root)?;
    if !root.kind.is_visual() {
        return Err(CodegenError::precondition(format!(
            "root {} is a {}, expected a visual",
            doc.root,
            root.kind.type_name()
        )));
    }

    let mut owner_of = vec![None; doc.objects.len()];

    for (i, obj) in doc.objects.iter().enumerate() {
        let id = ObjectId(i as u32);

        if let Some(ps) = obj.properties {
            check_slot(doc, id, Slot::Properties, ps)?;
            if matches!(obj.kind, ObjectKind::PropertySet { .. }) {
                return Err(CodegenError::precondition(format!(
                    "property set {id} cannot own another property set"
                )));
            }
            if let Some(prev) = owner_of[ps.index()] {
                return Err(CodegenError::precondition(format!(
                    "property set {ps} is owned by both {prev} and {id}"
                )));
            }
            owner_of[ps.index()] = Some(id);
        }

        for r in obj.kind.references() {
            check_slot(doc, id, r.slot, r.target)?;
        }

        for a in &obj.animators {
            check_slot(doc, id, Slot::Animation, a.animation)?;
            if let Some(c) = a.controller {
                check_slot(doc, id, Slot::Controller, c)?;
            }
        }
    }

    Ok(Ownership { owner_of })
}

fn check_slot(doc: &Document, holder: ObjectId, slot: Slot, target: ObjectId) -> CodegenResult<()> {
    let obj = doc.get(target).map_err(|_| {
        CodegenError::precondition(format!(
            "{holder} references {target} in slot {slot:?}, which is out of range"
        ))
    })?;
    if !slot.accepts(&obj.kind) {
        return Err(CodegenError::precondition(format!(
            "{holder} holds a {} ({target}) in slot {slot:?}",
            obj.kind.type_name()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/validate.rs"]
mod tests;
