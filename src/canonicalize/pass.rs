use crate::canonicalize::key::{CanonKey, KeyValue, KeyWriter};
use crate::foundation::error::CodegenResult;
use crate::foundation::ids::{NodeIdx, ObjectId};
use crate::graph::object_graph::ObjectGraph;
use crate::model::object::{
    ImageSource, KeyFrameAnimationDef, KeyFrameValue, ObjectDef, ObjectKind, PropertyValue,
};
use crate::model::source::Document;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One canonicalization pass. Passes run in declaration order because later keys read the
/// canonical nodes chosen by earlier passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonPass {
    /// Inset clips.
    InsetClips,
    /// Ellipse geometries.
    Ellipses,
    /// Rectangle geometries.
    Rectangles,
    /// Rounded rectangle geometries.
    RoundedRectangles,
    /// Canvas paths, by value.
    CanvasPaths,
    /// Composition paths, by canonical source.
    CompositionPaths,
    /// Static path geometries.
    PathGeometries,
    /// Linear easings; all equivalent.
    LinearEasings,
    /// Cubic bezier easings.
    CubicBeziers,
    /// Step easings.
    StepEasings,
    /// Expression animations with exactly one reference parameter.
    ExpressionAnimations,
    /// Key frame animations of every value type.
    KeyFrameAnimations,
    /// Path geometries whose only animator animates `Path`.
    AnimatedPathGeometries,
    /// Color brushes, static or with a single `Color` animator.
    ColorBrushes,
    /// Color brushes bound to a property set by an expression.
    ThemeBrushes,
    /// Image surfaces loaded from a stream, by content.
    StreamImages,
    /// Image surfaces loaded from a URI.
    UriImages,
    /// Surface brushes, by canonical surface.
    SurfaceBrushes,
    /// Gradient stops, shared across brushes but never within one.
    GradientStops,
}

impl CanonPass {
    /// Every pass, in run order.
    pub const ALL: [CanonPass; 19] = [
        Self::InsetClips,
        Self::Ellipses,
        Self::Rectangles,
        Self::RoundedRectangles,
        Self::CanvasPaths,
        Self::CompositionPaths,
        Self::PathGeometries,
        Self::LinearEasings,
        Self::CubicBeziers,
        Self::StepEasings,
        Self::ExpressionAnimations,
        Self::KeyFrameAnimations,
        Self::AnimatedPathGeometries,
        Self::ColorBrushes,
        Self::ThemeBrushes,
        Self::StreamImages,
        Self::UriImages,
        Self::SurfaceBrushes,
        Self::GradientStops,
    ];

    fn tag(self) -> u8 {
        self as u8
    }
}

/// A candidate's equivalence key under one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceKey {
    /// Candidate node.
    pub node: NodeIdx,
    /// Pass that keyed it.
    pub pass: CanonPass,
    /// The key.
    pub key: CanonKey,
}

/// What canonicalization did.
#[derive(Debug, Clone, Default)]
pub struct CanonicalizeReport {
    /// Rounds of the pass list run until nothing changed, including the final quiet round.
    pub rounds: u32,
    /// Nodes redirected to another canonical node, per pass.
    pub merged: BTreeMap<CanonPass, usize>,
    /// Groups with more than one member.
    pub groups: usize,
}

impl CanonicalizeReport {
    /// Total number of nodes that are no longer their own canonical node.
    pub fn merged_nodes(&self) -> usize {
        self.merged.values().sum()
    }
}

/// Merges structurally equivalent nodes into canonical representatives.
///
/// The pass list is repeated until a round changes nothing, so a merge made by a later pass
/// is seen by the keys of earlier passes. Re-running on the result is a no-op.
#[tracing::instrument(skip(graph), fields(nodes = graph.len()))]
pub fn canonicalize(
    graph: &mut ObjectGraph,
    ignore_comments: bool,
) -> CodegenResult<CanonicalizeReport> {
    let mut report = CanonicalizeReport::default();

    loop {
        report.rounds += 1;
        let mut changed = 0;
        for pass in CanonPass::ALL {
            let keyed = pass_keys(graph, pass, ignore_comments)?;
            let n = apply_grouping(graph, keyed);
            if n > 0 {
                *report.merged.entry(pass).or_default() += n;
            }
            changed += n;
        }
        if changed == 0 {
            break;
        }
    }

    report.groups = record_groups(graph);

    tracing::debug!(
        rounds = report.rounds,
        groups = report.groups,
        merged = report.merged_nodes(),
        "canonicalized"
    );
    Ok(report)
}

/// Keys of every candidate of every pass, computed against the graph's current canonical
/// assignment.
pub fn equivalence_keys(
    graph: &ObjectGraph,
    ignore_comments: bool,
) -> CodegenResult<Vec<EquivalenceKey>> {
    let mut out = Vec::new();
    for pass in CanonPass::ALL {
        for (node, key) in pass_keys(graph, pass, ignore_comments)? {
            out.push(EquivalenceKey { node, pass, key });
        }
    }
    Ok(out)
}

/// A copy of the graph's document whose references all point at canonical objects.
///
/// Objects merged away stay in the table but are no longer reachable from the root.
pub fn canonical_document(graph: &ObjectGraph) -> Document {
    let mut doc = graph.document().clone();
    let mut map = |id: ObjectId| canonical_object(graph, id);
    for obj in &mut doc.objects {
        obj.kind.remap_references(&mut map);
        for a in &mut obj.animators {
            a.animation = map(a.animation);
            a.controller = a.controller.map(&mut map);
        }
    }
    doc
}

fn canonical_object(graph: &ObjectGraph, id: ObjectId) -> ObjectId {
    let Some(node) = graph.node_for(id) else {
        return id;
    };
    let canonical = graph.canonical(node);
    if canonical != node {
        return graph.node(canonical).object();
    }
    // A property set whose owner merged away follows the surviving owner.
    if let Some(owner) = graph.node(node).owner() {
        let surviving = graph.canonical(owner);
        if surviving != owner
            && let Some(ps) = graph.object(surviving).properties
        {
            return ps;
        }
    }
    id
}

fn apply_grouping(graph: &mut ObjectGraph, keyed: Vec<(NodeIdx, CanonKey)>) -> usize {
    let mut groups: HashMap<CanonKey, Vec<NodeIdx>> = HashMap::new();
    for (node, key) in keyed {
        groups.entry(key).or_default().push(node);
    }

    let mut changed = 0;
    for members in groups.values() {
        if members.len() < 2 {
            continue;
        }
        let Some(canonical) = members
            .iter()
            .copied()
            .min_by_key(|n| graph.node(*n).position())
        else {
            continue;
        };
        for m in members {
            let node = graph.node_mut(*m);
            if node.canonical != canonical {
                node.canonical = canonical;
                changed += 1;
            }
        }
    }
    changed
}

fn record_groups(graph: &mut ObjectGraph) -> usize {
    let mut by_canonical: BTreeMap<NodeIdx, Vec<NodeIdx>> = BTreeMap::new();
    for (idx, node) in graph.nodes() {
        by_canonical.entry(node.canonical()).or_default().push(idx);
    }

    let mut groups = 0;
    for members in by_canonical.into_values() {
        if members.len() < 2 {
            for m in &members {
                graph.node_mut(*m).group.clear();
            }
            continue;
        }
        groups += 1;
        for m in &members {
            graph.node_mut(*m).group = members.clone();
        }
    }
    groups
}

/// No comment (unless ignored) and no owned property set carrying values or animators.
fn no_instance_state(graph: &ObjectGraph, obj: &ObjectDef, ignore_comments: bool) -> bool {
    if !ignore_comments && obj.comment.is_some() {
        return false;
    }
    let Some(ps) = obj.properties else {
        return true;
    };
    let Some(ps_obj) = graph.document().objects.get(ps.index()) else {
        return false;
    };
    match &ps_obj.kind {
        ObjectKind::PropertySet { values } => values.is_empty() && ps_obj.animators.is_empty(),
        _ => false,
    }
}

fn plain(graph: &ObjectGraph, obj: &ObjectDef, ignore_comments: bool) -> bool {
    no_instance_state(graph, obj, ignore_comments) && obj.animators.is_empty()
}

fn pass_keys(
    graph: &ObjectGraph,
    pass: CanonPass,
    ignore_comments: bool,
) -> CodegenResult<Vec<(NodeIdx, CanonKey)>> {
    if pass == CanonPass::GradientStops {
        return gradient_stop_keys(graph, ignore_comments);
    }

    let mut out = Vec::new();
    for (idx, _) in graph.nodes() {
        if let Some(key) = key_for(graph, pass, idx, ignore_comments)? {
            out.push((idx, key));
        }
    }
    Ok(out)
}

fn key_for(
    graph: &ObjectGraph,
    pass: CanonPass,
    idx: NodeIdx,
    ignore_comments: bool,
) -> CodegenResult<Option<CanonKey>> {
    use CanonPass as P;
    use ObjectKind as K;

    let obj = graph.object(idx);
    let is_plain = plain(graph, obj, ignore_comments);
    let mut w = KeyWriter::new(graph, pass.tag());

    match (pass, &obj.kind) {
        (
            P::InsetClips,
            K::InsetClip {
                left,
                top,
                right,
                bottom,
                center_point,
                scale,
            },
        ) if is_plain => {
            w.write_f32(*bottom);
            w.write_f32(*left);
            w.write_f32(*right);
            w.write_f32(*top);
            w.write_vec2(*center_point);
            w.write_vec2(*scale);
        }
        (
            P::Ellipses,
            K::EllipseGeometry {
                center,
                radius,
                trim,
            },
        ) if is_plain => {
            w.write_vec2(*center);
            w.write_vec2(*radius);
            w.write_trim(trim);
        }
        (P::Rectangles, K::RectangleGeometry { offset, size, trim }) if is_plain => {
            w.write_opt_vec2(*offset);
            w.write_vec2(*size);
            w.write_trim(trim);
        }
        (
            P::RoundedRectangles,
            K::RoundedRectangleGeometry {
                offset,
                size,
                corner_radius,
                trim,
            },
        ) if is_plain => {
            w.write_opt_vec2(*offset);
            w.write_vec2(*size);
            w.write_vec2(*corner_radius);
            w.write_trim(trim);
        }
        (P::CanvasPaths, K::CanvasPath { fill_mode, commands }) => {
            w.write_fill_mode(*fill_mode);
            w.write_path_commands(commands);
        }
        (P::CompositionPaths, K::CompositionPath { source }) => {
            w.write_ref(*source)?;
        }
        (P::PathGeometries, K::PathGeometry { path, trim }) if is_plain => {
            w.write_opt_ref(*path)?;
            w.write_trim(trim);
        }
        (P::LinearEasings, K::LinearEasingFunction) if is_plain => {}
        (
            P::CubicBeziers,
            K::CubicBezierEasingFunction {
                control_point1,
                control_point2,
            },
        ) if is_plain => {
            w.write_vec2(*control_point1);
            w.write_vec2(*control_point2);
        }
        (
            P::StepEasings,
            K::StepEasingFunction {
                step_count,
                initial_step,
                final_step,
                is_initial_step_single_frame,
                is_final_step_single_frame,
            },
        ) if is_plain => {
            w.write_i32(*final_step);
            w.write_i32(*initial_step);
            w.write_bool(*is_final_step_single_frame);
            w.write_bool(*is_initial_step_single_frame);
            w.write_i32(*step_count);
        }
        (P::ExpressionAnimations, K::ExpressionAnimation(a))
            if is_plain && a.reference_parameters.len() == 1 =>
        {
            let rp = &a.reference_parameters[0];
            w.write_str(&a.expression);
            w.write_opt_str(a.target.as_deref());
            w.write_str(&rp.name);
            w.write_ref(rp.object)?;
        }
        (P::KeyFrameAnimations, K::BooleanKeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 0, a)?
        }
        (P::KeyFrameAnimations, K::ColorKeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 1, a)?
        }
        (P::KeyFrameAnimations, K::ScalarKeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 2, a)?
        }
        (P::KeyFrameAnimations, K::Vector2KeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 3, a)?
        }
        (P::KeyFrameAnimations, K::Vector3KeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 4, a)?
        }
        (P::KeyFrameAnimations, K::Vector4KeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 5, a)?
        }
        (P::KeyFrameAnimations, K::PathKeyFrameAnimation(a)) if is_plain => {
            key_frame_key(&mut w, 6, a)?
        }
        (P::AnimatedPathGeometries, K::PathGeometry { trim, .. })
            if no_instance_state(graph, obj, ignore_comments)
                && obj.animators.len() == 1
                && obj.animators[0].property == "Path"
                && obj.animators[0].controller.is_none() =>
        {
            w.write_ref(obj.animators[0].animation)?;
            w.write_trim(trim);
        }
        (P::ColorBrushes, K::ColorBrush { color })
            if no_instance_state(graph, obj, ignore_comments) =>
        {
            let animation = match obj.animators.as_slice() {
                [] => None,
                [a] if a.property == "Color" && a.controller.is_none() => Some(a.animation),
                _ => return Ok(None),
            };
            match color {
                Some(c) => {
                    w.write_u8(1);
                    w.write_color(*c);
                }
                None => w.write_u8(0),
            }
            w.write_opt_ref(animation)?;
        }
        (P::ThemeBrushes, K::ColorBrush { color: None }) => {
            if !theme_brush_key(&mut w, graph, idx, obj, ignore_comments)? {
                return Ok(None);
            }
        }
        (
            P::StreamImages,
            K::LoadedImageSurface {
                source: ImageSource::Stream { bytes },
                ..
            },
        ) => {
            w.write_bytes(bytes);
        }
        (
            P::UriImages,
            K::LoadedImageSurface {
                source: ImageSource::Uri { uri },
                ..
            },
        ) => {
            w.write_str(uri);
        }
        (P::SurfaceBrushes, K::SurfaceBrush { surface }) if is_plain => {
            w.write_opt_ref(*surface)?;
        }
        _ => return Ok(None),
    }

    Ok(Some(w.finish()))
}

fn key_frame_key<T: KeyValue>(
    w: &mut KeyWriter<'_>,
    value_kind: u8,
    a: &KeyFrameAnimationDef<T>,
) -> CodegenResult<()> {
    w.write_u8(value_kind);
    w.write_i64(a.duration_ticks);
    w.write_len(a.key_frames.len());
    w.write_opt_str(a.target.as_deref());

    w.write_len(a.reference_parameters.len());
    for rp in &a.reference_parameters {
        w.write_str(&rp.name);
        w.write_ref(rp.object)?;
    }

    for kf in &a.key_frames {
        w.write_f32(kf.progress);
        match &kf.value {
            KeyFrameValue::Value(v) => {
                w.write_u8(0);
                v.write_key(w)?;
            }
            KeyFrameValue::Expression(e) => {
                w.write_u8(1);
                w.write_str(e);
            }
        }
        w.write_opt_ref(kf.easing)?;
    }
    Ok(())
}

/// Keys a brush with no color, a one-value property set, and a single `Color` expression
/// animator. Returns `false` when the brush is not such a brush.
///
/// Reference parameters pointing back at the brush, or at its own property set, compare
/// structurally so that two otherwise identical themed brushes merge.
fn theme_brush_key(
    w: &mut KeyWriter<'_>,
    graph: &ObjectGraph,
    idx: NodeIdx,
    obj: &ObjectDef,
    ignore_comments: bool,
) -> CodegenResult<bool> {
    if !ignore_comments && obj.comment.is_some() {
        return Ok(false);
    }
    let Some(ps) = obj.properties else {
        return Ok(false);
    };
    let ps_obj = graph.document().get(ps)?;
    let ObjectKind::PropertySet { values } = &ps_obj.kind else {
        return Ok(false);
    };
    let [value] = values.as_slice() else {
        return Ok(false);
    };
    let [animator] = obj.animators.as_slice() else {
        return Ok(false);
    };
    if animator.property != "Color" || animator.controller.is_some() {
        return Ok(false);
    }
    let ObjectKind::ExpressionAnimation(animation) = &graph.document().get(animator.animation)?.kind
    else {
        return Ok(false);
    };

    let brush = graph.node(idx).object();

    w.write_str(&animation.expression);
    w.write_opt_str(animation.target.as_deref());
    w.write_str(&value.name);
    write_property_value(w, &value.value);

    w.write_len(animation.reference_parameters.len());
    for rp in &animation.reference_parameters {
        w.write_str(&rp.name);
        if rp.object == brush {
            w.write_u8(0);
        } else if rp.object == ps {
            match ps_obj.animators.as_slice() {
                [] => w.write_u8(4),
                [a] => {
                    w.write_u8(1);
                    w.write_str(&a.property);
                    w.write_ref(a.animation)?;
                    w.write_opt_ref(a.controller)?;
                }
                _ => {
                    // More than one animator is never compared; the brush stays unique.
                    w.write_u8(2);
                    w.write_node(idx);
                }
            }
        } else {
            w.write_u8(3);
            w.write_ref(rp.object)?;
        }
    }
    Ok(true)
}

fn write_property_value(w: &mut KeyWriter<'_>, v: &PropertyValue) {
    match v {
        PropertyValue::Boolean(b) => {
            w.write_u8(0);
            w.write_bool(*b);
        }
        PropertyValue::Scalar(s) => {
            w.write_u8(1);
            w.write_f32(*s);
        }
        PropertyValue::Vector2(v) => {
            w.write_u8(2);
            w.write_vec2(*v);
        }
        PropertyValue::Vector3(v) => {
            w.write_u8(3);
            w.write_f32(v.x);
            w.write_f32(v.y);
            w.write_f32(v.z);
        }
        PropertyValue::Vector4(v) => {
            w.write_u8(4);
            w.write_f32(v.x);
            w.write_f32(v.y);
            w.write_f32(v.z);
            w.write_f32(v.w);
        }
        PropertyValue::Color(c) => {
            w.write_u8(5);
            w.write_color(*c);
        }
    }
}

/// A stop collection may not hold the same stop twice, so each stop is keyed with its index
/// among equal stops of the same brush. A stop shared by several brushes is keyed by the first.
fn gradient_stop_keys(
    graph: &ObjectGraph,
    ignore_comments: bool,
) -> CodegenResult<Vec<(NodeIdx, CanonKey)>> {
    let tag = CanonPass::GradientStops.tag();
    let mut out = Vec::new();
    let mut keyed = HashSet::new();

    for (idx, _) in graph.nodes() {
        let stops = match graph.kind(idx) {
            ObjectKind::LinearGradientBrush { stops, .. }
            | ObjectKind::RadialGradientBrush { stops, .. } => stops,
            _ => continue,
        };

        let mut seen_in_brush: HashMap<CanonKey, u32> = HashMap::new();
        for stop_id in stops {
            let stop_node = graph.expect_node(*stop_id)?;
            let stop = graph.object(stop_node);
            let ObjectKind::ColorGradientStop { color, offset } = &stop.kind else {
                continue;
            };
            if !plain(graph, stop, ignore_comments) {
                continue;
            }

            let mut base = KeyWriter::new(graph, tag);
            base.write_color(*color);
            base.write_f32(*offset);
            let counter = seen_in_brush.entry(base.finish()).or_insert(0);
            let index = *counter;
            *counter += 1;

            if !keyed.insert(stop_node) {
                continue;
            }

            let mut w = KeyWriter::new(graph, tag);
            w.write_color(*color);
            w.write_f32(*offset);
            w.write_u32(index);
            out.push((stop_node, w.finish()));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/canonicalize/pass.rs"]
mod tests;
