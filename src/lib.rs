//! Code generation backend for composition object graphs.
//!
//! A source is one class with one or more variants, each variant an object table rooted at a
//! visual. Generation runs per variant:
//!
//! - build an [`ObjectGraph`]: deterministic traversal, node and edge positions
//! - [`canonicalize`] structurally equivalent nodes into one representative
//! - rebuild the graph from the [`canonical_document`] and [`analyze`] storage and sharing
//! - [`name_nodes`] with stable, disambiguated names
//! - emit factories through a [`Stringifier`], resolving every reference with a [`CallResolver`]
//!
//! [`generate_source`] drives all of it and returns the text together with the decision set and
//! its [`DecisionFingerprint`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod analyze;
pub(crate) mod canonicalize;
pub(crate) mod foundation;
pub(crate) mod generate;
pub(crate) mod graph;
pub(crate) mod model;
pub(crate) mod naming;
pub(crate) mod session;

pub use crate::foundation::color::Color;
pub use crate::foundation::error::{CodegenError, CodegenResult};
pub use crate::foundation::ids::{NodeIdx, ObjectId, Position};
pub use crate::foundation::math::{Matrix3x2, Vec2, Vec3, Vec4};

pub use crate::model::object::{
    AnimatorDef, CombineMode, EffectSourceDef, ExpressionAnimationDef, FillMode, ImageSource,
    KeyFrameAnimationDef, KeyFrameDef, KeyFrameValue, NodeFamily, ObjectDef, ObjectKind,
    PathCommand, PropertySetValue, PropertyValue, Reference, ReferenceParameterDef, References,
    ShapeProps, Slot, Trim, VisualProps,
};
pub use crate::model::source::{CodegenOpts, Document, SourceDef, Target, VariantDef};
pub use crate::model::validate::{Ownership, validate_document};

pub use crate::graph::object_graph::{Node, ObjectGraph, Vertex};

pub use crate::canonicalize::key::CanonKey;
pub use crate::canonicalize::pass::{
    CanonPass, CanonicalizeReport, EquivalenceKey, canonical_document, canonicalize,
    equivalence_keys,
};

pub use crate::analyze::storage::{
    AnalysisReport, THEME_PROPERTIES_NAME, analyze, filtered_in_refs, filtered_inbound_count,
    needs_a_factory,
};

pub use crate::naming::alphanumeric::alphanumeric_cmp;
pub use crate::naming::namer::{
    describe, factory_nodes_by_name, float_as_id, generate_node_names, name_nodes, vector2_as_id,
};

pub use crate::generate::cppwinrt::CppwinrtStringifier;
pub use crate::generate::csharp::CSharpStringifier;
pub use crate::generate::emitter::{
    EmittedVariant, SharedImage, SharedObjects, SourceHeader, emit_source, emit_variant,
    variant_class_name,
};
pub use crate::generate::fingerprint::{
    DecisionFingerprint, FactoryDecision, VariantDecisions, fingerprint_decisions,
};
pub use crate::generate::resolver::{CallResolver, Resolution, ResolvedReference};
pub use crate::generate::stringifier::{Stringifier, camel_case, hex_byte};

pub use crate::session::generate::{GeneratedSource, generate_source, stringifier_for};
pub use crate::session::plan::{GraphStats, VariantPlan};
