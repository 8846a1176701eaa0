use crate::analyze::storage::{THEME_PROPERTIES_NAME, needs_a_factory};
use crate::foundation::error::{CodegenError, CodegenResult};
use crate::foundation::ids::{NodeIdx, ObjectId};
use crate::foundation::math::{Vec2, Vec3};
use crate::generate::code_builder::CodeBuilder;
use crate::generate::resolver::{CallResolver, Resolution, ResolvedReference};
use crate::generate::stringifier::{Stringifier, camel_case};
use crate::graph::object_graph::ObjectGraph;
use crate::model::object::{
    AnimatorDef, FillMode, ImageSource, KeyFrameAnimationDef, KeyFrameValue, NodeFamily,
    ObjectKind, PathCommand, PropertySetValue, PropertyValue, ReferenceParameterDef, ShapeProps,
    Trim, VisualProps,
};
use crate::naming::alphanumeric::alphanumeric_cmp;
use crate::naming::namer::factory_nodes_by_name;

const RESULT: &str = "result";
const COMPOSITOR: &str = "C";
const COMPOSITOR_PARAM: &str = "compositor";
const REUSABLE_EXPRESSION: &str = "ReusableExpressionAnimation";
const ROOT_ACCESSOR: &str = "RootVisual";

/// Objects created once per source and handed to every variant.
#[derive(Debug, Clone, Default)]
pub struct SharedObjects {
    /// Initial values of the theme property set, when any variant is themed.
    pub theme: Option<Vec<PropertySetValue>>,
    /// One entry per distinct image, in first-use order.
    pub images: Vec<SharedImage>,
}

/// An image surface loaded once for the whole source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedImage {
    /// Name shared by every node that loads this image.
    pub name: String,
    /// Where the pixels come from.
    pub source: ImageSource,
}

/// The class text of one variant plus what was decided while writing it.
#[derive(Debug, Clone)]
pub struct EmittedVariant {
    /// Class name.
    pub class_name: String,
    /// Class text at indentation zero.
    pub text: String,
    /// Factory nodes in emission order.
    pub factories: Vec<NodeIdx>,
    /// Names of the shared objects the constructor takes after the compositor.
    pub shared_args: Vec<String>,
    /// Every call resolution, in emission order.
    pub resolutions: Vec<ResolvedReference>,
}

/// Name of the class generated for a variant.
pub fn variant_class_name(api_version: u32) -> String {
    format!("AnimatedVisual_UAPv{api_version}")
}

/// Writes the class for one analyzed and named variant graph.
#[tracing::instrument(skip(graph, s), fields(nodes = graph.len()))]
pub fn emit_variant(
    graph: &ObjectGraph,
    class_name: &str,
    s: &dyn Stringifier,
    disable_field_optimization: bool,
) -> CodegenResult<EmittedVariant> {
    let mut w = VariantWriter {
        graph,
        s,
        resolver: CallResolver::new(graph, disable_field_optimization),
        disable_field_optimization,
        reusable_used: false,
    };

    let factories = factory_nodes_by_name(graph);
    let mut methods = CodeBuilder::new();
    for idx in &factories {
        w.factory(&mut methods, *idx)?;
        methods.blank();
    }

    let shared_args = shared_args(graph);
    let mut fields = w.fields(&shared_args)?;
    fields.sort_by(|a, b| {
        b.readonly
            .cmp(&a.readonly)
            .then_with(|| a.type_name.cmp(&b.type_name))
            .then_with(|| alphanumeric_cmp(&a.name, &b.name))
    });

    let mut out = CodeBuilder::new();
    out.line(&s.class_declaration(class_name, false));
    let root_name = w.name_of(graph.root())?;
    out.scope(s.class_close(), |b| {
        for f in &fields {
            b.line(&s.field_declaration(&f.type_name, &s.field_name(&f.name), f.readonly));
        }
        b.blank();
        b.append(&methods);

        let mut params = vec![("Compositor".to_owned(), COMPOSITOR_PARAM.to_owned())];
        let mut inits = vec![(s.field_name(COMPOSITOR), COMPOSITOR_PARAM.to_owned())];
        for name in &shared_args {
            params.push((shared_type(graph, name).to_owned(), camel_case(name)));
            inits.push((s.field_name(name), camel_case(name)));
        }
        b.lines(s.constructor_head(class_name, &params, &inits));
        b.scope("}", |b| {
            b.lines(s.constructor_body_inits(&inits));
            if w.reusable_used {
                b.line(&format!(
                    "{} = {};",
                    s.field_name(REUSABLE_EXPRESSION),
                    w.create("ExpressionAnimation", "")
                ));
            }
            b.line(&format!("{root_name}();"));
        });
        b.blank();
        b.line(&s.visible_method_signature("Visual", ROOT_ACCESSOR));
        b.scope("}", |b| {
            b.line(&format!("return {};", s.field_name(&root_name)));
        });
    });

    let resolutions = w.resolver.into_log();
    tracing::debug!(
        factories = factories.len(),
        resolutions = resolutions.len(),
        "variant emitted"
    );
    Ok(EmittedVariant {
        class_name: class_name.to_owned(),
        text: out.finish(),
        factories,
        shared_args,
        resolutions,
    })
}

/// Theme first, then distinct image names in alphanumeric order.
fn shared_args(graph: &ObjectGraph) -> Vec<String> {
    let mut out = Vec::new();
    if graph.unowned_property_set().is_some() {
        out.push(THEME_PROPERTIES_NAME.to_owned());
    }
    let mut images: Vec<String> = graph
        .nodes_of(NodeFamily::LoadedImageSurface)
        .filter_map(|(_, n)| n.name().map(str::to_owned))
        .collect();
    images.sort_by(|a, b| alphanumeric_cmp(a, b));
    images.dedup();
    out.extend(images);
    out
}

fn shared_type(graph: &ObjectGraph, name: &str) -> &'static str {
    match graph.unowned_property_set() {
        Some(_) if name == THEME_PROPERTIES_NAME => "CompositionPropertySet",
        _ => "LoadedImageSurface",
    }
}

struct Field {
    type_name: String,
    name: String,
    readonly: bool,
}

struct VariantWriter<'g> {
    graph: &'g ObjectGraph,
    s: &'g dyn Stringifier,
    resolver: CallResolver<'g>,
    disable_field_optimization: bool,
    reusable_used: bool,
}

impl<'g> VariantWriter<'g> {
    fn fields(&self, shared_args: &[String]) -> CodegenResult<Vec<Field>> {
        let g = self.graph;
        let mut out = vec![Field {
            type_name: "Compositor".to_owned(),
            name: COMPOSITOR.to_owned(),
            readonly: true,
        }];
        for name in shared_args {
            out.push(Field {
                type_name: shared_type(g, name).to_owned(),
                name: name.clone(),
                readonly: true,
            });
        }
        if self.reusable_used {
            out.push(Field {
                type_name: "ExpressionAnimation".to_owned(),
                name: REUSABLE_EXPRESSION.to_owned(),
                readonly: false,
            });
        }
        for (idx, n) in g.nodes() {
            if n.requires_storage() && !n.shared() && !n.inlined() {
                out.push(Field {
                    type_name: g.kind(idx).type_name().to_owned(),
                    name: self.name_of(idx)?,
                    readonly: n.requires_readonly_storage(),
                });
            }
        }
        Ok(out)
    }

    fn name_of(&self, idx: NodeIdx) -> CodegenResult<String> {
        self.graph.node(idx).name().map(str::to_owned).ok_or_else(|| {
            CodegenError::precondition(format!("{} was never named", self.graph.describe(idx)))
        })
    }

    /// `_c.Create{what}({args})`.
    fn create(&self, what: &str, args: &str) -> String {
        format!(
            "{}{}Create{what}({args})",
            self.s.field_name(COMPOSITOR),
            self.s.deref()
        )
    }

    fn set(&self, b: &mut CodeBuilder, property: &str, value: &str) {
        b.line(&format!("{};", self.s.property_set(RESULT, property, value)));
    }

    fn call(&self, b: &mut CodeBuilder, target: &str, method: &str, args: &str) {
        b.line(&format!("{target}{}{method}({args});", self.s.deref()));
    }

    fn add_to(&self, b: &mut CodeBuilder, collection: &str, value: &str) {
        let list = self.s.property_get(RESULT, collection);
        self.call(b, &list, self.s.ilist_add(), value);
    }

    fn factory(&mut self, b: &mut CodeBuilder, idx: NodeIdx) -> CodegenResult<()> {
        let g = self.graph;
        let s = self.s;
        let node = g.node(idx);
        let obj = g.object(idx);
        let name = self.name_of(idx)?;

        if let Some(comment) = &obj.comment {
            for l in comment.lines() {
                b.line(&format!("// {l}"));
            }
        }
        b.line(&s.factory_signature(obj.kind.type_name(), &name));

        let mut body = CodeBuilder::new();
        let field = s.field_name(&name);
        if self.disable_field_optimization && node.requires_storage() {
            body.line(&format!("if ({field} != {})", s.null()));
            body.scope("}", |b| b.line(&format!("return {field};")));
        }

        let (prelude, create) = self.create_expression(idx)?;
        body.lines(prelude);
        let assign = if node.requires_storage() {
            format!("{field} = ")
        } else {
            String::new()
        };
        body.line(&format!("{} {RESULT} = {assign}{create};", s.const_var()));
        self.initialize(&mut body, idx)?;
        body.line(&format!("return {RESULT};"));

        b.scope("}", |b| b.append(&body));
        Ok(())
    }

    fn reference(
        &mut self,
        caller: NodeIdx,
        edge_source: NodeIdx,
        id: ObjectId,
    ) -> CodegenResult<String> {
        let callee = self.graph.expect_node(id)?;
        match self.resolver.resolve(caller, edge_source, callee)? {
            Resolution::Construct => Ok(format!("{}()", self.name_of(callee)?)),
            Resolution::ReadField => Ok(self.s.field_name(&self.name_of(callee)?)),
            Resolution::Inline => self.inline_expression(callee),
        }
    }

    fn opt_reference(&mut self, idx: NodeIdx, id: Option<ObjectId>) -> CodegenResult<String> {
        match id {
            Some(id) => self.reference(idx, idx, id),
            None => Ok(String::new()),
        }
    }

    fn inline_expression(&mut self, idx: NodeIdx) -> CodegenResult<String> {
        let g = self.graph;
        match g.kind(idx) {
            ObjectKind::CompositionPath { source } => self.path_expression(idx, *source),
            ObjectKind::CubicBezierEasingFunction {
                control_point1,
                control_point2,
            } => Ok(self.create(
                "CubicBezierEasingFunction",
                &format!(
                    "{}, {}",
                    self.s.vector2(*control_point1),
                    self.s.vector2(*control_point2)
                ),
            )),
            _ => Err(CodegenError::precondition(format!(
                "{} cannot be inlined",
                g.describe(idx)
            ))),
        }
    }

    fn path_expression(&mut self, path: NodeIdx, source: ObjectId) -> CodegenResult<String> {
        let geometry = self.reference(path, path, source)?;
        Ok(format!(
            "{}({})",
            self.s.new_object("CompositionPath"),
            self.s.canvas_geometry_factory_call(&geometry)
        ))
    }

    /// Statements preceding the creation, and the creation expression.
    fn create_expression(&mut self, idx: NodeIdx) -> CodegenResult<(Vec<String>, String)> {
        let g = self.graph;
        let s = self.s;
        let kind = g.kind(idx);
        let short = kind
            .type_name()
            .strip_prefix("Composition")
            .unwrap_or(kind.type_name());

        let expr = match kind {
            ObjectKind::PathGeometry { path, .. } => {
                let path = self.opt_reference(idx, *path)?;
                self.create("PathGeometry", &path)
            }
            ObjectKind::CompositionPath { source } => self.path_expression(idx, *source)?,
            k if k.is_canvas_geometry() => return self.canvas_expression(idx),
            ObjectKind::ColorBrush { color } => {
                self.create("ColorBrush", &color.map(|c| s.color(c)).unwrap_or_default())
            }
            ObjectKind::ColorGradientStop { color, offset } => self.create(
                "ColorGradientStop",
                &format!("{}, {}", s.float(*offset), s.color(*color)),
            ),
            ObjectKind::SurfaceBrush { surface } => {
                let surface = self.opt_reference(idx, *surface)?;
                self.create("SurfaceBrush", &surface)
            }
            ObjectKind::EffectBrush { factory, .. } => {
                format!("{}{}CreateBrush()", self.reference(idx, idx, *factory)?, s.deref())
            }
            ObjectKind::EffectFactory { effect } => {
                self.create("EffectFactory", &format!("{}()", s.new_object(effect)))
            }
            ObjectKind::ExpressionAnimation(def) => {
                self.create("ExpressionAnimation", &s.string(&def.expression))
            }
            ObjectKind::CubicBezierEasingFunction { .. } => self.inline_expression(idx)?,
            ObjectKind::LoadedImageSurface { .. } | ObjectKind::PropertySet { .. } => {
                return Err(CodegenError::precondition(format!(
                    "{} has no factory in a variant",
                    g.describe(idx)
                )));
            }
            _ => self.create(short, ""),
        };
        Ok((Vec::new(), expr))
    }

    fn canvas_expression(&mut self, idx: NodeIdx) -> CodegenResult<(Vec<String>, String)> {
        let g = self.graph;
        let s = self.s;
        let d = s.deref();
        let factory = format!("CanvasGeometry{}", s.scope_resolve());

        let out = match g.kind(idx) {
            ObjectKind::CanvasPath {
                fill_mode,
                commands,
            } => {
                let mut pre = vec![format!(
                    "{} builder = {}({});",
                    s.const_var(),
                    s.new_object("CanvasPathBuilder"),
                    s.null()
                )];
                if *fill_mode != FillMode::Alternate {
                    pre.push(format!(
                        "builder{d}SetFilledRegionDetermination({});",
                        s.fill_mode(*fill_mode)
                    ));
                }
                for c in commands {
                    pre.push(match c {
                        PathCommand::BeginFigure { start } => {
                            format!("builder{d}BeginFigure({});", s.vector2(*start))
                        }
                        PathCommand::AddLine { end } => {
                            format!("builder{d}AddLine({});", s.vector2(*end))
                        }
                        PathCommand::AddCubicBezier {
                            control_point1,
                            control_point2,
                            end,
                        } => format!(
                            "builder{d}AddCubicBezier({}, {}, {});",
                            s.vector2(*control_point1),
                            s.vector2(*control_point2),
                            s.vector2(*end)
                        ),
                        PathCommand::EndFigure { closed } => {
                            format!("builder{d}EndFigure({});", s.figure_loop(*closed))
                        }
                    });
                }
                (pre, format!("{factory}CreatePath(builder)"))
            }
            ObjectKind::CanvasEllipse {
                x,
                y,
                radius_x,
                radius_y,
            } => (
                Vec::new(),
                format!(
                    "{factory}CreateEllipse({}, {}, {}, {}, {})",
                    s.null(),
                    s.float(*x),
                    s.float(*y),
                    s.float(*radius_x),
                    s.float(*radius_y)
                ),
            ),
            ObjectKind::CanvasRoundedRectangle {
                x,
                y,
                w,
                h,
                radius_x,
                radius_y,
            } => (
                Vec::new(),
                format!(
                    "{factory}CreateRoundedRectangle({}, {}, {}, {}, {}, {}, {})",
                    s.null(),
                    s.float(*x),
                    s.float(*y),
                    s.float(*w),
                    s.float(*h),
                    s.float(*radius_x),
                    s.float(*radius_y)
                ),
            ),
            ObjectKind::CanvasCombination { a, b, mode, matrix } => {
                let a = self.reference(idx, idx, *a)?;
                let b = self.reference(idx, idx, *b)?;
                (
                    Vec::new(),
                    format!(
                        "{a}{d}CombineWith({b}, {}, {})",
                        s.matrix3x2(matrix),
                        s.combine_mode(*mode)
                    ),
                )
            }
            ObjectKind::CanvasGroup {
                geometries,
                fill_mode,
            } => {
                let items = geometries
                    .iter()
                    .map(|g| self.reference(idx, idx, *g))
                    .collect::<CodegenResult<Vec<_>>>()?;
                (
                    Vec::new(),
                    format!(
                        "{factory}CreateGroup({}, {}, {})",
                        s.null(),
                        s.array("CanvasGeometry", &items),
                        s.fill_mode(*fill_mode)
                    ),
                )
            }
            ObjectKind::CanvasTransformed { source, matrix } => {
                let source = self.reference(idx, idx, *source)?;
                (
                    Vec::new(),
                    format!("{source}{d}Transform({})", s.matrix3x2(matrix)),
                )
            }
            _ => {
                return Err(CodegenError::precondition(format!(
                    "{} is not a canvas geometry",
                    g.describe(idx)
                )));
            }
        };
        Ok(out)
    }

    /// Everything after creation: property set values, properties, references, animations.
    fn initialize(&mut self, b: &mut CodeBuilder, idx: NodeIdx) -> CodegenResult<()> {
        let g = self.graph;
        let s = self.s;
        let obj = g.object(idx);

        let owned_set = match obj.properties {
            Some(ps) => Some(g.expect_node(ps)?),
            None => None,
        };
        if let Some(ps) = owned_set
            && let ObjectKind::PropertySet { values } = g.kind(ps)
        {
            insert_values(s, b, &s.property_get(RESULT, "Properties"), values);
        }

        self.kind_properties(b, idx)?;

        for a in &obj.animators {
            self.start_animation(b, idx, idx, RESULT, a)?;
        }
        if let Some(ps) = owned_set {
            let target = s.property_get(RESULT, "Properties");
            for a in &g.object(ps).animators {
                self.start_animation(b, idx, ps, &target, a)?;
            }
        }
        Ok(())
    }

    fn kind_properties(&mut self, b: &mut CodeBuilder, idx: NodeIdx) -> CodegenResult<()> {
        let g = self.graph;
        let s = self.s;

        match g.kind(idx) {
            ObjectKind::ContainerVisual { visual } => {
                self.visual_values(b, visual);
                self.clip(b, idx, visual)?;
                self.children(b, idx, visual)?;
            }
            ObjectKind::ShapeVisual {
                visual,
                view_box,
                shapes,
            } => {
                self.visual_values(b, visual);
                self.clip(b, idx, visual)?;
                if let Some(v) = view_box {
                    let v = self.reference(idx, idx, *v)?;
                    self.set(b, "ViewBox", &v);
                }
                for shape in shapes {
                    let shape = self.reference(idx, idx, *shape)?;
                    self.add_to(b, "Shapes", &shape);
                }
                self.children(b, idx, visual)?;
            }
            ObjectKind::SpriteVisual { visual, brush } => {
                self.visual_values(b, visual);
                self.clip(b, idx, visual)?;
                if let Some(brush) = brush {
                    let brush = self.reference(idx, idx, *brush)?;
                    self.set(b, "Brush", &brush);
                }
                self.children(b, idx, visual)?;
            }
            ObjectKind::LayerVisual { visual, shadow } => {
                self.visual_values(b, visual);
                self.clip(b, idx, visual)?;
                self.children(b, idx, visual)?;
                if let Some(shadow) = shadow {
                    let shadow = self.reference(idx, idx, *shadow)?;
                    self.set(b, "Shadow", &shadow);
                }
            }
            ObjectKind::ContainerShape { shape, shapes } => {
                self.shape_values(b, shape);
                for child in shapes {
                    let child = self.reference(idx, idx, *child)?;
                    self.add_to(b, "Shapes", &child);
                }
            }
            ObjectKind::SpriteShape {
                shape,
                geometry,
                fill_brush,
                stroke_brush,
                stroke_thickness,
            } => {
                self.shape_values(b, shape);
                for (property, id) in [
                    ("Geometry", geometry),
                    ("FillBrush", fill_brush),
                    ("StrokeBrush", stroke_brush),
                ] {
                    if let Some(id) = id {
                        let r = self.reference(idx, idx, *id)?;
                        self.set(b, property, &r);
                    }
                }
                if let Some(t) = stroke_thickness {
                    self.set(b, "StrokeThickness", &s.float(*t));
                }
            }
            ObjectKind::InsetClip {
                left,
                top,
                right,
                bottom,
                center_point,
                scale,
            } => {
                for (property, v) in [
                    ("LeftInset", left),
                    ("TopInset", top),
                    ("RightInset", right),
                    ("BottomInset", bottom),
                ] {
                    if *v != 0.0 {
                        self.set(b, property, &s.float(*v));
                    }
                }
                if *center_point != Vec2::default() {
                    self.set(b, "CenterPoint", &s.vector2(*center_point));
                }
                if *scale != Vec2::new(1.0, 1.0) {
                    self.set(b, "Scale", &s.vector2(*scale));
                }
            }
            ObjectKind::GeometricClip { geometry } => {
                if let Some(geometry) = geometry {
                    let r = self.reference(idx, idx, *geometry)?;
                    self.set(b, "Geometry", &r);
                }
            }
            ObjectKind::ViewBox { size, offset } => {
                self.set(b, "Size", &s.vector2(*size));
                if *offset != Vec2::default() {
                    self.set(b, "Offset", &s.vector2(*offset));
                }
            }
            ObjectKind::DropShadow {
                mask,
                blur_radius,
                color,
                opacity,
            } => {
                if let Some(mask) = mask {
                    let r = self.reference(idx, idx, *mask)?;
                    self.set(b, "Mask", &r);
                }
                if let Some(v) = blur_radius {
                    self.set(b, "BlurRadius", &s.float(*v));
                }
                if let Some(c) = color {
                    self.set(b, "Color", &s.color(*c));
                }
                if let Some(v) = opacity {
                    self.set(b, "Opacity", &s.float(*v));
                }
            }
            ObjectKind::RectangleGeometry { offset, size, trim } => {
                if let Some(o) = offset {
                    self.set(b, "Offset", &s.vector2(*o));
                }
                self.set(b, "Size", &s.vector2(*size));
                self.trim(b, trim);
            }
            ObjectKind::RoundedRectangleGeometry {
                offset,
                size,
                corner_radius,
                trim,
            } => {
                if let Some(o) = offset {
                    self.set(b, "Offset", &s.vector2(*o));
                }
                self.set(b, "Size", &s.vector2(*size));
                self.set(b, "CornerRadius", &s.vector2(*corner_radius));
                self.trim(b, trim);
            }
            ObjectKind::EllipseGeometry {
                center,
                radius,
                trim,
            } => {
                if *center != Vec2::default() {
                    self.set(b, "Center", &s.vector2(*center));
                }
                self.set(b, "Radius", &s.vector2(*radius));
                self.trim(b, trim);
            }
            ObjectKind::PathGeometry { trim, .. } => self.trim(b, trim),
            ObjectKind::LinearGradientBrush {
                stops,
                start_point,
                end_point,
            } => {
                self.stops(b, idx, stops)?;
                if *start_point != Vec2::default() {
                    self.set(b, "StartPoint", &s.vector2(*start_point));
                }
                if *end_point != Vec2::default() {
                    self.set(b, "EndPoint", &s.vector2(*end_point));
                }
            }
            ObjectKind::RadialGradientBrush {
                stops,
                ellipse_center,
                ellipse_radius,
            } => {
                self.stops(b, idx, stops)?;
                if *ellipse_center != Vec2::default() {
                    self.set(b, "EllipseCenter", &s.vector2(*ellipse_center));
                }
                if *ellipse_radius != Vec2::default() {
                    self.set(b, "EllipseRadius", &s.vector2(*ellipse_radius));
                }
            }
            ObjectKind::EffectBrush { sources, .. } => {
                for src in sources {
                    let brush = self.reference(idx, idx, src.brush)?;
                    self.call(
                        b,
                        RESULT,
                        "SetSourceParameter",
                        &format!("{}, {brush}", s.string(&src.name)),
                    );
                }
            }
            ObjectKind::MaskBrush { mask, source } => {
                for (property, id) in [("Mask", mask), ("Source", source)] {
                    if let Some(id) = id {
                        let r = self.reference(idx, idx, *id)?;
                        self.set(b, property, &r);
                    }
                }
            }
            ObjectKind::VisualSurface {
                source_visual,
                source_size,
            } => {
                if let Some(v) = source_visual {
                    let r = self.reference(idx, idx, *v)?;
                    self.set(b, "SourceVisual", &r);
                }
                self.set(b, "SourceSize", &s.vector2(*source_size));
            }
            ObjectKind::ExpressionAnimation(def) => {
                if let Some(t) = &def.target {
                    self.set(b, "Target", &s.string(t));
                }
                self.reference_parameters(b, idx, idx, RESULT, &def.reference_parameters)?;
            }
            ObjectKind::BooleanKeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, v| Ok(w.s.bool_literal(*v).to_owned()))?;
            }
            ObjectKind::ColorKeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, v| Ok(w.s.color(*v)))?;
            }
            ObjectKind::ScalarKeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, v| Ok(w.s.float(*v)))?;
            }
            ObjectKind::Vector2KeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, v| Ok(w.s.vector2(*v)))?;
            }
            ObjectKind::Vector3KeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, v| Ok(w.s.vector3(*v)))?;
            }
            ObjectKind::Vector4KeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, v| Ok(w.s.vector4(*v)))?;
            }
            ObjectKind::PathKeyFrameAnimation(a) => {
                self.key_frames(b, idx, a, |w, p| w.reference(idx, idx, *p))?;
            }
            ObjectKind::AnimationController { paused } => {
                if *paused {
                    self.call(b, RESULT, "Pause", "");
                }
            }
            ObjectKind::StepEasingFunction {
                step_count,
                initial_step,
                final_step,
                is_initial_step_single_frame,
                is_final_step_single_frame,
            } => {
                if *step_count != 1 {
                    self.set(b, "StepCount", &step_count.to_string());
                }
                if *initial_step != 0 {
                    self.set(b, "InitialStep", &initial_step.to_string());
                }
                if *final_step != 1 {
                    self.set(b, "FinalStep", &final_step.to_string());
                }
                if *is_initial_step_single_frame {
                    self.set(b, "IsInitialStepSingleFrame", s.bool_literal(true));
                }
                if *is_final_step_single_frame {
                    self.set(b, "IsFinalStepSingleFrame", s.bool_literal(true));
                }
            }
            // Fully described by their creation expression.
            ObjectKind::CompositionPath { .. }
            | ObjectKind::CanvasPath { .. }
            | ObjectKind::CanvasEllipse { .. }
            | ObjectKind::CanvasRoundedRectangle { .. }
            | ObjectKind::CanvasCombination { .. }
            | ObjectKind::CanvasGroup { .. }
            | ObjectKind::CanvasTransformed { .. }
            | ObjectKind::ColorBrush { .. }
            | ObjectKind::ColorGradientStop { .. }
            | ObjectKind::SurfaceBrush { .. }
            | ObjectKind::EffectFactory { .. }
            | ObjectKind::LinearEasingFunction
            | ObjectKind::CubicBezierEasingFunction { .. } => {}
            ObjectKind::LoadedImageSurface { .. } | ObjectKind::PropertySet { .. } => {
                return Err(CodegenError::precondition(format!(
                    "{} has no factory in a variant",
                    g.describe(idx)
                )));
            }
        }
        Ok(())
    }

    fn visual_values(&self, b: &mut CodeBuilder, visual: &VisualProps) {
        if let Some(size) = visual.size {
            self.set(b, "Size", &self.s.vector2(size));
        }
        if let Some(offset) = visual.offset
            && offset != Vec3::default()
        {
            self.set(b, "Offset", &self.s.vector3(offset));
        }
    }

    fn shape_values(&self, b: &mut CodeBuilder, shape: &ShapeProps) {
        if let Some(offset) = shape.offset {
            self.set(b, "Offset", &self.s.vector2(offset));
        }
        if let Some(m) = &shape.transform_matrix {
            self.set(b, "TransformMatrix", &self.s.matrix3x2(m));
        }
    }

    fn trim(&self, b: &mut CodeBuilder, trim: &Trim) {
        if trim.trim_start != 0.0 {
            self.set(b, "TrimStart", &self.s.float(trim.trim_start));
        }
        if trim.trim_end != 1.0 {
            self.set(b, "TrimEnd", &self.s.float(trim.trim_end));
        }
        if trim.trim_offset != 0.0 {
            self.set(b, "TrimOffset", &self.s.float(trim.trim_offset));
        }
    }

    fn clip(&mut self, b: &mut CodeBuilder, idx: NodeIdx, visual: &VisualProps) -> CodegenResult<()> {
        if let Some(clip) = visual.clip {
            let clip = self.reference(idx, idx, clip)?;
            self.set(b, "Clip", &clip);
        }
        Ok(())
    }

    fn children(
        &mut self,
        b: &mut CodeBuilder,
        idx: NodeIdx,
        visual: &VisualProps,
    ) -> CodegenResult<()> {
        let children = self.s.property_get(RESULT, "Children");
        for child in &visual.children {
            let child = self.reference(idx, idx, *child)?;
            self.call(b, &children, "InsertAtTop", &child);
        }
        Ok(())
    }

    fn stops(&mut self, b: &mut CodeBuilder, idx: NodeIdx, stops: &[ObjectId]) -> CodegenResult<()> {
        for stop in stops {
            let stop = self.reference(idx, idx, *stop)?;
            self.add_to(b, "ColorStops", &stop);
        }
        Ok(())
    }

    fn key_frames<T>(
        &mut self,
        b: &mut CodeBuilder,
        idx: NodeIdx,
        a: &KeyFrameAnimationDef<T>,
        mut value: impl FnMut(&mut Self, &T) -> CodegenResult<String>,
    ) -> CodegenResult<()> {
        let s = self.s;
        self.set(b, "Duration", &s.time_span(a.duration_ticks));
        if let Some(t) = &a.target {
            self.set(b, "Target", &s.string(t));
        }
        self.reference_parameters(b, idx, idx, RESULT, &a.reference_parameters)?;

        // Easings resolve before values, matching edge discovery order.
        let easings = a
            .key_frames
            .iter()
            .map(|kf| kf.easing.map(|e| self.reference(idx, idx, e)).transpose())
            .collect::<CodegenResult<Vec<_>>>()?;

        for (kf, easing) in a.key_frames.iter().zip(easings) {
            let easing = easing.map(|e| format!(", {e}")).unwrap_or_default();
            let progress = s.float(kf.progress);
            match &kf.value {
                KeyFrameValue::Value(v) => {
                    let v = value(self, v)?;
                    self.call(b, RESULT, "InsertKeyFrame", &format!("{progress}, {v}{easing}"));
                }
                KeyFrameValue::Expression(e) => self.call(
                    b,
                    RESULT,
                    "InsertExpressionKeyFrame",
                    &format!("{progress}, {}{easing}", s.string(e)),
                ),
            }
        }
        Ok(())
    }

    fn reference_parameters(
        &mut self,
        b: &mut CodeBuilder,
        caller: NodeIdx,
        edge_source: NodeIdx,
        target: &str,
        params: &[ReferenceParameterDef],
    ) -> CodegenResult<()> {
        for rp in params {
            let value = self.reference_parameter_value(caller, edge_source, rp.object)?;
            self.call(
                b,
                target,
                "SetReferenceParameter",
                &format!("{}, {value}", self.s.string(&rp.name)),
            );
        }
        Ok(())
    }

    fn reference_parameter_value(
        &mut self,
        caller: NodeIdx,
        edge_source: NodeIdx,
        object: ObjectId,
    ) -> CodegenResult<String> {
        let g = self.graph;
        let s = self.s;
        if object == g.node(caller).object() {
            return Ok(RESULT.to_owned());
        }
        if g.object(caller).properties == Some(object) {
            return Ok(s.property_get(RESULT, "Properties"));
        }

        let node = g.expect_node(object)?;
        if !matches!(g.kind(node), ObjectKind::PropertySet { .. }) {
            return self.reference(caller, edge_source, object);
        }
        if g.unowned_property_set() == Some(node) {
            return Ok(s.field_name(THEME_PROPERTIES_NAME));
        }
        let owner = g.node(node).owner().ok_or_else(|| {
            CodegenError::precondition(format!("{} has no owner", g.describe(node)))
        })?;
        let owner = self.reference(caller, edge_source, g.node(owner).object())?;
        Ok(s.property_get(&owner, "Properties"))
    }

    fn start_animation(
        &mut self,
        b: &mut CodeBuilder,
        caller: NodeIdx,
        edge_source: NodeIdx,
        target: &str,
        animator: &AnimatorDef,
    ) -> CodegenResult<()> {
        let g = self.graph;
        let s = self.s;
        let anim = g.expect_node(animator.animation)?;

        let animation = if let ObjectKind::ExpressionAnimation(def) = g.kind(anim)
            && !needs_a_factory(g, anim)
        {
            self.reusable_used = true;
            let r = s.field_name(REUSABLE_EXPRESSION);
            self.call(b, &r, "ClearAllParameters", "");
            b.line(&format!(
                "{};",
                s.property_set(&r, "Expression", &s.string(&def.expression))
            ));
            if let Some(t) = &def.target {
                b.line(&format!("{};", s.property_set(&r, "Target", &s.string(t))));
            }
            self.reference_parameters(b, caller, anim, &r, &def.reference_parameters)?;
            r
        } else {
            self.reference(caller, edge_source, animator.animation)?
        };

        let mut args = format!("{}, {animation}", s.string(&animator.property));
        if let Some(c) = animator.controller {
            let controller = self.reference(caller, edge_source, c)?;
            args.push_str(&format!(", {controller}"));
        }
        self.call(b, target, "StartAnimation", &args);
        Ok(())
    }
}

fn insert_values(s: &dyn Stringifier, b: &mut CodeBuilder, target: &str, values: &[PropertySetValue]) {
    for v in values {
        let (method, value) = match &v.value {
            PropertyValue::Boolean(x) => ("InsertBoolean", s.bool_literal(*x).to_owned()),
            PropertyValue::Scalar(x) => ("InsertScalar", s.float(*x)),
            PropertyValue::Vector2(x) => ("InsertVector2", s.vector2(*x)),
            PropertyValue::Vector3(x) => ("InsertVector3", s.vector3(*x)),
            PropertyValue::Vector4(x) => ("InsertVector4", s.vector4(*x)),
            PropertyValue::Color(x) => ("InsertColor", s.color(*x)),
        };
        b.line(&format!(
            "{target}{}{method}({}, {value});",
            s.deref(),
            s.string(&v.name)
        ));
    }
}

/// Everything [`emit_source`] needs besides the variant classes.
pub struct SourceHeader<'a> {
    /// Source class name.
    pub class_name: &'a str,
    /// Namespace of the generated code.
    pub namespace: &'a str,
    /// Label of the target language for the header comment.
    pub target: &'a str,
}

/// Writes the whole file: header, source class with shared objects, and every variant class.
#[tracing::instrument(skip_all, fields(class = header.class_name, variants = variants.len()))]
pub fn emit_source(
    header: &SourceHeader<'_>,
    shared: &SharedObjects,
    variants: &[EmittedVariant],
    s: &dyn Stringifier,
) -> String {
    let mut out = CodeBuilder::new();
    let labels: Vec<&str> = variants
        .iter()
        .map(|v| v.class_name.trim_start_matches("AnimatedVisual_"))
        .collect();
    out.lines([
        "//------------------------------------------------------------------------------".to_owned(),
        "// <auto-generated>".to_owned(),
        format!(
            "//     Generated by wavyte-codegen {} ({}).",
            env!("CARGO_PKG_VERSION"),
            header.target
        ),
        format!("//     Source: {}", header.class_name),
        format!("//     Variants: {}", labels.join(", ")),
        "// </auto-generated>".to_owned(),
        "//------------------------------------------------------------------------------".to_owned(),
    ]);
    out.lines(s.prelude());
    out.blank();

    out.lines(s.namespace_open(header.namespace));
    out.indent();
    out.line(&s.class_declaration(header.class_name, true));
    out.scope(s.class_close(), |b| {
        let compositor = s.field_name(COMPOSITOR);
        b.line(&s.field_declaration("Compositor", &compositor, true));
        if shared.theme.is_some() {
            b.line(&s.field_declaration(
                "CompositionPropertySet",
                &s.field_name(THEME_PROPERTIES_NAME),
                true,
            ));
        }
        for image in &shared.images {
            b.line(&s.field_declaration("LoadedImageSurface", &s.field_name(&image.name), true));
        }
        b.blank();

        let mut inits = vec![(compositor.clone(), COMPOSITOR_PARAM.to_owned())];
        if shared.theme.is_some() {
            inits.push((
                s.field_name(THEME_PROPERTIES_NAME),
                format!("{THEME_PROPERTIES_NAME}()"),
            ));
        }
        for image in &shared.images {
            inits.push((s.field_name(&image.name), format!("{}()", image.name)));
        }
        b.lines(s.constructor_head(
            header.class_name,
            &[("Compositor".to_owned(), COMPOSITOR_PARAM.to_owned())],
            &inits,
        ));
        b.scope("}", |b| b.lines(s.constructor_body_inits(&inits)));
        b.blank();

        if let Some(values) = &shared.theme {
            b.line(&s.factory_signature("CompositionPropertySet", THEME_PROPERTIES_NAME));
            b.scope("}", |b| {
                b.line(&format!(
                    "{} {RESULT} = {compositor}{}CreatePropertySet();",
                    s.const_var(),
                    s.deref()
                ));
                insert_values(s, b, RESULT, values);
                b.line(&format!("return {RESULT};"));
            });
            b.blank();
        }

        for image in &shared.images {
            b.line(&s.factory_signature("LoadedImageSurface", &image.name));
            let load = match &image.source {
                ImageSource::Uri { uri } => s.load_image_from_uri(uri),
                ImageSource::Stream { bytes } => s.load_image_from_stream(&s.byte_array(bytes)),
            };
            b.scope("}", |b| b.line(&format!("return {load};")));
            b.blank();
        }

        for v in variants {
            let mut args = vec![compositor.clone()];
            args.extend(v.shared_args.iter().map(|n| s.field_name(n)));
            b.line(&s.visible_method_signature("Visual", &format!("Create{}", v.class_name)));
            b.scope("}", |b| {
                b.line(&format!(
                    "return {}({}){}{ROOT_ACCESSOR}();",
                    s.new_object(&v.class_name),
                    args.join(", "),
                    s.deref()
                ));
            });
            b.blank();
        }

        for (i, v) in variants.iter().enumerate() {
            if i > 0 {
                b.blank();
            }
            b.lines(v.text.lines());
        }
    });
    out.dedent();
    out.line(s.namespace_close());
    out.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/generate/emitter.rs"]
mod tests;
