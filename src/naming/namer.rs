use crate::analyze::storage::needs_a_factory;
use crate::foundation::color::Color;
use crate::foundation::ids::NodeIdx;
use crate::foundation::math::Vec2;
use crate::graph::object_graph::ObjectGraph;
use crate::model::object::{
    ImageSource, KeyFrameAnimationDef, KeyFrameValue, NodeFamily, ObjectKind, PropertyValue,
};
use crate::naming::alphanumeric::alphanumeric_cmp;
use std::collections::HashMap;

/// Descriptive base name of a node, before disambiguation.
pub fn describe(graph: &ObjectGraph, idx: NodeIdx) -> String {
    let kind = graph.kind(idx);
    match kind.family() {
        NodeFamily::CompositionPath => return "CompositionPath".to_owned(),
        NodeFamily::CanvasGeometry => return "Geometry".to_owned(),
        NodeFamily::LoadedImageSurface => {
            if let ObjectKind::LoadedImageSurface { source, .. } = kind {
                return describe_image(source);
            }
        }
        NodeFamily::CompositionObject => {}
    }

    let name = describe_object(graph, idx);
    match name.strip_prefix("Composition") {
        Some(rest) if !rest.is_empty() => rest.to_owned(),
        _ => name,
    }
}

fn describe_object(graph: &ObjectGraph, idx: NodeIdx) -> String {
    let kind = graph.kind(idx);
    match kind {
        ObjectKind::ColorKeyFrameAnimation(a) => {
            with_description("ColorAnimation", describe_range(a, |c| c.name()))
        }
        ObjectKind::ScalarKeyFrameAnimation(a) => {
            let prop = animated_property_name(graph, idx)
                .map(|p| p.replace('.', ""))
                .unwrap_or_default();
            with_description(
                &format!("{prop}ScalarAnimation"),
                describe_range(a, |v| float_as_id(*v)),
            )
        }
        ObjectKind::Vector2KeyFrameAnimation(_) => vector_animation(graph, idx, "Vector2"),
        ObjectKind::Vector3KeyFrameAnimation(_) => vector_animation(graph, idx, "Vector3"),
        ObjectKind::Vector4KeyFrameAnimation(_) => vector_animation(graph, idx, "Vector4"),
        ObjectKind::ColorBrush { color } => {
            if graph.object(idx).animators.is_empty() {
                match color {
                    Some(c) => format!("ColorBrush_{}", c.name()),
                    None => "ColorBrush".to_owned(),
                }
            } else {
                match color_key_frames(graph, idx) {
                    Some(a) => with_description("AnimatedColorBrush", describe_range(a, |c| c.name())),
                    None => "ThemeColorBrush".to_owned(),
                }
            }
        }
        ObjectKind::ColorGradientStop { color, .. } => {
            if graph.object(idx).animators.is_empty() {
                format!("GradientStop_{}", color.name())
            } else {
                match color_key_frames(graph, idx) {
                    Some(a) => {
                        with_description("AnimatedGradientStop", describe_range(a, |c| c.name()))
                    }
                    None => "BoundColorStop".to_owned(),
                }
            }
        }
        ObjectKind::RectangleGeometry { size, .. } => {
            format!("Rectangle_{}", vector2_as_id(*size))
        }
        ObjectKind::RoundedRectangleGeometry { size, .. } => {
            format!("RoundedRectangle_{}", vector2_as_id(*size))
        }
        ObjectKind::EllipseGeometry { radius, .. } => {
            format!("Ellipse_{}", vector2_as_id(*radius))
        }
        ObjectKind::ExpressionAnimation(_) => match expression_type(graph, idx) {
            Some(ty) => format!("{ty}ExpressionAnimation"),
            None => "ExpressionAnimation".to_owned(),
        },
        ObjectKind::StepEasingFunction {
            step_count: 1,
            is_initial_step_single_frame,
            is_final_step_single_frame,
            ..
        } if *is_final_step_single_frame && !*is_initial_step_single_frame => {
            "HoldThenStepEasingFunction".to_owned()
        }
        ObjectKind::StepEasingFunction {
            step_count: 1,
            is_initial_step_single_frame,
            is_final_step_single_frame,
            ..
        } if *is_initial_step_single_frame && !*is_final_step_single_frame => {
            "StepThenHoldEasingFunction".to_owned()
        }
        _ => kind.type_name().to_owned(),
    }
}

fn vector_animation(graph: &ObjectGraph, idx: NodeIdx, dims: &str) -> String {
    let prop = animated_property_name(graph, idx)
        .map(|p| p.replace('.', ""))
        .unwrap_or_default();
    format!("{prop}{dims}Animation")
}

fn with_description(base: &str, description: Option<String>) -> String {
    match description {
        Some(d) if !d.trim().is_empty() => format!("{base}_{d}"),
        _ => base.to_owned(),
    }
}

/// `{first}_to_{last}`, or `to_{last}` for a single key frame. `None` when the last key frame
/// is an expression.
fn describe_range<T>(
    animation: &KeyFrameAnimationDef<T>,
    fmt: impl Fn(&T) -> String,
) -> Option<String> {
    let value = |kf: &crate::model::object::KeyFrameDef<T>| match &kf.value {
        KeyFrameValue::Value(v) => Some(fmt(v)),
        KeyFrameValue::Expression(_) => None,
    };
    let last = animation.key_frames.last().and_then(&value)?;
    let first = if animation.key_frames.len() > 1 {
        animation.key_frames.first().and_then(&value)
    } else {
        None
    };
    Some(match first {
        Some(first) => format!("{first}_to_{last}"),
        None => format!("to_{last}"),
    })
}

/// The first color key frame animation running on a brush or stop.
fn color_key_frames(graph: &ObjectGraph, idx: NodeIdx) -> Option<&KeyFrameAnimationDef<Color>> {
    let doc = graph.document();
    graph.object(idx).animators.iter().find_map(|a| {
        match doc.objects.get(a.animation.index()).map(|o| &o.kind) {
            Some(ObjectKind::ColorKeyFrameAnimation(k)) => Some(k),
            _ => None,
        }
    })
}

fn describe_image(source: &ImageSource) -> String {
    match source {
        ImageSource::Stream { .. } => "ImageFromStream".to_owned(),
        ImageSource::Uri { uri } => {
            let path = uri.split(['?', '#']).next().unwrap_or_default();
            let file = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
            let stem = file.rfind('.').map_or(file, |dot| &file[..dot]);
            let cleaned: String = stem
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!("Image_{}", cleaned.replace("__", "_"))
        }
    }
}

/// The single property animated by `idx`, across every animator that runs it.
pub(crate) fn animated_property_name(graph: &ObjectGraph, idx: NodeIdx) -> Option<String> {
    animator_sites(graph, idx)
        .map(|(_, prop)| prop)
        .try_fold(None::<&str>, |acc, prop| match acc {
            Some(seen) if seen != prop => Err(()),
            _ => Ok(Some(prop)),
        })
        .ok()
        .flatten()
        .map(str::to_owned)
}

/// `(holder, property)` for each animator whose animation is the object behind `idx`.
fn animator_sites<'g>(
    graph: &'g ObjectGraph,
    idx: NodeIdx,
) -> impl Iterator<Item = (NodeIdx, &'g str)> + 'g {
    let object = graph.node(idx).object();
    let mut seen = Vec::new();
    graph
        .node(idx)
        .in_refs()
        .iter()
        .filter(move |v| {
            if seen.contains(&v.from) {
                return false;
            }
            seen.push(v.from);
            true
        })
        .flat_map(move |v| {
            graph
                .object(v.from)
                .animators
                .iter()
                .filter(move |a| a.animation == object)
                .map(move |a| (v.from, a.property.as_str()))
        })
}

/// Value type produced by an expression animation, from the property it animates.
fn expression_type(graph: &ObjectGraph, idx: NodeIdx) -> Option<&'static str> {
    let prop = animated_property_name(graph, idx)?;
    let (holder, _) = animator_sites(graph, idx).next()?;
    let kind = graph.kind(holder);

    if let ObjectKind::PropertySet { values } = kind {
        let value = values.iter().find(|v| v.name == prop)?;
        return Some(match value.value {
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::Scalar(_) => "Scalar",
            PropertyValue::Vector2(_) => "Vector2",
            PropertyValue::Vector3(_) => "Vector3",
            PropertyValue::Vector4(_) => "Vector4",
            PropertyValue::Color(_) => "Color",
        });
    }

    if prop.contains('.') {
        // A single channel of a vector or matrix.
        return Some("Scalar");
    }
    let visual = kind.is_visual();
    Some(match prop.as_str() {
        "Color" => "Color",
        "Opacity" | "RotationAngleInDegrees" | "TrimStart" | "TrimEnd" | "TrimOffset"
        | "StrokeThickness" | "Progress" | "BlurRadius" | "LeftInset" | "TopInset"
        | "RightInset" | "BottomInset" => "Scalar",
        "Offset" | "Scale" | "CenterPoint" if visual => "Vector3",
        "Offset" | "Scale" | "CenterPoint" | "Size" | "Radius" | "Center" => "Vector2",
        "TransformMatrix" if visual => "Matrix4x4",
        "TransformMatrix" => "Matrix3x2",
        "IsVisible" => "Boolean",
        _ => return None,
    })
}

/// Identifier-safe form of a float: at most three decimals, `.` as `p`, `-` as `m`.
pub fn float_as_id(value: f32) -> String {
    let rounded = (f64::from(value) * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}").replace('.', "p").replace('-', "m")
}

/// `X` when both components are equal, else `XxY`.
pub fn vector2_as_id(v: Vec2) -> String {
    if v.x == v.y {
        float_as_id(v.x)
    } else {
        format!("{}x{}", float_as_id(v.x), float_as_id(v.y))
    }
}

/// Unique names for `nodes`, in input order.
///
/// Nodes sharing a base name are numbered in input order with a zero-padded counter as wide as
/// the group's size needs. The counter is appended even to single-member groups.
pub fn generate_node_names(
    graph: &ObjectGraph,
    nodes: impl IntoIterator<Item = NodeIdx>,
) -> Vec<(NodeIdx, String)> {
    let (nodes, bases): (Vec<NodeIdx>, Vec<String>) = nodes
        .into_iter()
        .map(|idx| (idx, describe(graph, idx)))
        .unzip();
    nodes.into_iter().zip(number_names(&bases)).collect()
}

/// Appends the group counter to each base name; see [`generate_node_names`].
pub(crate) fn number_names(bases: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for base in bases {
        *counts.entry(base.as_str()).or_default() += 1;
    }

    let mut next: HashMap<&str, usize> = HashMap::new();
    bases
        .iter()
        .map(|base| {
            let width = counter_width(counts[base.as_str()]);
            let n = next.entry(base.as_str()).or_default();
            let name = format!("{base}_{:0width$}", *n);
            *n += 1;
            name
        })
        .collect()
}

/// `ceil(log10(count + 1))`, which is the number of decimal digits in `count`.
fn counter_width(count: usize) -> usize {
    count.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Names every non-shared node that gets a factory. Returns the number of names assigned.
#[tracing::instrument(skip(graph), fields(nodes = graph.len()))]
pub fn name_nodes(graph: &mut ObjectGraph) -> usize {
    let targets: Vec<NodeIdx> = graph
        .nodes()
        .filter(|(idx, n)| !n.shared() && needs_a_factory(graph, *idx))
        .map(|(idx, _)| idx)
        .collect();

    let names = generate_node_names(graph, targets);
    let named = names.len();
    for (idx, name) in names {
        graph.node_mut(idx).name = Some(name);
    }
    tracing::debug!(named, "nodes named");
    named
}

/// Factory nodes in emission order: by name, alphanumerically.
pub fn factory_nodes_by_name(graph: &ObjectGraph) -> Vec<NodeIdx> {
    let mut nodes: Vec<NodeIdx> = graph
        .nodes()
        .filter(|(idx, n)| !n.shared() && needs_a_factory(graph, *idx))
        .map(|(idx, _)| idx)
        .collect();
    nodes.sort_by(|a, b| {
        alphanumeric_cmp(
            graph.node(*a).name().unwrap_or_default(),
            graph.node(*b).name().unwrap_or_default(),
        )
    });
    nodes
}

#[cfg(test)]
#[path = "../../tests/unit/naming/namer.rs"]
mod tests;
