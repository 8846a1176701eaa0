use crate::foundation::color::Color;
use crate::foundation::ids::ObjectId;
use crate::foundation::math::{Matrix3x2, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One entry of a variant's object table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    /// Diagnostic comment carried into generated code. Blocks canonicalization unless ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Owned property set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ObjectId>,
    /// Running animations, in start order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animators: Vec<AnimatorDef>,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: ObjectKind,
}

/// An animation bound to a named property of its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorDef {
    /// Animated property path, e.g. `Offset` or `TrimEnd`.
    pub property: String,
    /// The animation object.
    pub animation: ObjectId,
    /// Custom controller, if the animation is driven by one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<ObjectId>,
}

/// Properties common to every visual.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualProps {
    /// Child visuals, in z-order.
    #[serde(default)]
    pub children: Vec<ObjectId>,
    /// Clip.
    #[serde(default)]
    pub clip: Option<ObjectId>,
    /// Size.
    #[serde(default)]
    pub size: Option<Vec2>,
    /// Offset.
    #[serde(default)]
    pub offset: Option<Vec3>,
}

/// Properties common to every shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeProps {
    /// Offset.
    #[serde(default)]
    pub offset: Option<Vec2>,
    /// Transform matrix.
    #[serde(default)]
    pub transform_matrix: Option<Matrix3x2>,
}

/// Trim path parameters shared by all composition geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trim {
    /// Start of the visible segment in `[0, 1]`.
    #[serde(default)]
    pub trim_start: f32,
    /// End of the visible segment in `[0, 1]`.
    #[serde(default = "one")]
    pub trim_end: f32,
    /// Offset applied to both ends.
    #[serde(default)]
    pub trim_offset: f32,
}

impl Default for Trim {
    fn default() -> Self {
        Self {
            trim_start: 0.0,
            trim_end: 1.0,
            trim_offset: 0.0,
        }
    }
}

/// Fill rule for canvas geometries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Even-odd.
    #[default]
    Alternate,
    /// Non-zero.
    Winding,
}

/// Boolean operation of a canvas combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMode {
    /// Union.
    #[default]
    Union,
    /// Intersection.
    Intersect,
    /// Exclusive or.
    Xor,
    /// Difference.
    Exclude,
}

/// One command of a canvas path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PathCommand {
    /// Start a new figure.
    BeginFigure {
        /// Start point.
        start: Vec2,
    },
    /// Straight segment.
    AddLine {
        /// End point.
        end: Vec2,
    },
    /// Cubic bezier segment.
    AddCubicBezier {
        /// First control point.
        control_point1: Vec2,
        /// Second control point.
        control_point2: Vec2,
        /// End point.
        end: Vec2,
    },
    /// Finish the current figure.
    EndFigure {
        /// Whether the figure is closed.
        #[serde(default)]
        closed: bool,
    },
}

/// Where a loaded image surface gets its pixels from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Encoded image bytes embedded into the generated code.
    Stream {
        /// Encoded bytes.
        bytes: Vec<u8>,
    },
    /// An image loaded from a URI at runtime.
    Uri {
        /// Source URI.
        uri: String,
    },
}

/// A named source of an effect brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSourceDef {
    /// Source parameter name.
    pub name: String,
    /// The brush bound to it.
    pub brush: ObjectId,
}

/// A named object made available to an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParameterDef {
    /// Name used inside the expression text.
    pub name: String,
    /// Referenced object.
    pub object: ObjectId,
}

/// An expression animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionAnimationDef {
    /// Expression text.
    pub expression: String,
    /// Optional target.
    #[serde(default)]
    pub target: Option<String>,
    /// Reference parameters, in declaration order.
    #[serde(default)]
    pub reference_parameters: Vec<ReferenceParameterDef>,
}

/// Value of a key frame: either a literal or an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFrameValue<T> {
    /// Literal value.
    Value(T),
    /// Expression evaluated at the key frame.
    Expression(String),
}

/// One key frame of a key frame animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrameDef<T> {
    /// Normalized progress in `[0, 1]`.
    pub progress: f32,
    /// Easing into this key frame.
    #[serde(default)]
    pub easing: Option<ObjectId>,
    /// Value or expression.
    #[serde(flatten)]
    pub value: KeyFrameValue<T>,
}

/// A key frame animation over values of type `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrameAnimationDef<T> {
    /// Duration in 100ns ticks.
    pub duration_ticks: i64,
    /// Optional target.
    #[serde(default)]
    pub target: Option<String>,
    /// Key frames in progress order.
    pub key_frames: Vec<KeyFrameDef<T>>,
    /// Reference parameters, in declaration order.
    #[serde(default)]
    pub reference_parameters: Vec<ReferenceParameterDef>,
}

/// Initial value of a property set entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Boolean.
    Boolean(bool),
    /// Scalar.
    Scalar(f32),
    /// Two-component vector.
    Vector2(Vec2),
    /// Three-component vector.
    Vector3(Vec3),
    /// Four-component vector.
    Vector4(Vec4),
    /// Color.
    Color(Color),
}

/// A named property set entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySetValue {
    /// Property name.
    pub name: String,
    /// Initial value.
    pub value: PropertyValue,
}

/// The closed set of object kinds the generator understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ObjectKind {
    ContainerVisual {
        #[serde(flatten)]
        visual: VisualProps,
    },
    ShapeVisual {
        #[serde(flatten)]
        visual: VisualProps,
        #[serde(default)]
        view_box: Option<ObjectId>,
        #[serde(default)]
        shapes: Vec<ObjectId>,
    },
    SpriteVisual {
        #[serde(flatten)]
        visual: VisualProps,
        #[serde(default)]
        brush: Option<ObjectId>,
    },
    LayerVisual {
        #[serde(flatten)]
        visual: VisualProps,
        #[serde(default)]
        shadow: Option<ObjectId>,
    },
    ContainerShape {
        #[serde(flatten)]
        shape: ShapeProps,
        #[serde(default)]
        shapes: Vec<ObjectId>,
    },
    SpriteShape {
        #[serde(flatten)]
        shape: ShapeProps,
        #[serde(default)]
        geometry: Option<ObjectId>,
        #[serde(default)]
        fill_brush: Option<ObjectId>,
        #[serde(default)]
        stroke_brush: Option<ObjectId>,
        #[serde(default)]
        stroke_thickness: Option<f32>,
    },
    InsetClip {
        #[serde(default)]
        left: f32,
        #[serde(default)]
        top: f32,
        #[serde(default)]
        right: f32,
        #[serde(default)]
        bottom: f32,
        #[serde(default)]
        center_point: Vec2,
        #[serde(default = "unit_scale")]
        scale: Vec2,
    },
    GeometricClip {
        #[serde(default)]
        geometry: Option<ObjectId>,
    },
    ViewBox {
        size: Vec2,
        #[serde(default)]
        offset: Vec2,
    },
    DropShadow {
        #[serde(default)]
        mask: Option<ObjectId>,
        #[serde(default)]
        blur_radius: Option<f32>,
        #[serde(default)]
        color: Option<Color>,
        #[serde(default)]
        opacity: Option<f32>,
    },
    RectangleGeometry {
        #[serde(default)]
        offset: Option<Vec2>,
        size: Vec2,
        #[serde(flatten)]
        trim: Trim,
    },
    RoundedRectangleGeometry {
        #[serde(default)]
        offset: Option<Vec2>,
        size: Vec2,
        #[serde(default)]
        corner_radius: Vec2,
        #[serde(flatten)]
        trim: Trim,
    },
    EllipseGeometry {
        #[serde(default)]
        center: Vec2,
        radius: Vec2,
        #[serde(flatten)]
        trim: Trim,
    },
    PathGeometry {
        #[serde(default)]
        path: Option<ObjectId>,
        #[serde(flatten)]
        trim: Trim,
    },
    CompositionPath {
        source: ObjectId,
    },
    CanvasPath {
        #[serde(default)]
        fill_mode: FillMode,
        commands: Vec<PathCommand>,
    },
    CanvasEllipse {
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
    },
    CanvasRoundedRectangle {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius_x: f32,
        radius_y: f32,
    },
    CanvasCombination {
        a: ObjectId,
        b: ObjectId,
        #[serde(default)]
        mode: CombineMode,
        #[serde(default)]
        matrix: Matrix3x2,
    },
    CanvasGroup {
        geometries: Vec<ObjectId>,
        #[serde(default)]
        fill_mode: FillMode,
    },
    CanvasTransformed {
        source: ObjectId,
        matrix: Matrix3x2,
    },
    ColorBrush {
        #[serde(default)]
        color: Option<Color>,
    },
    LinearGradientBrush {
        #[serde(default)]
        stops: Vec<ObjectId>,
        #[serde(default)]
        start_point: Vec2,
        #[serde(default)]
        end_point: Vec2,
    },
    RadialGradientBrush {
        #[serde(default)]
        stops: Vec<ObjectId>,
        #[serde(default)]
        ellipse_center: Vec2,
        #[serde(default)]
        ellipse_radius: Vec2,
    },
    ColorGradientStop {
        color: Color,
        offset: f32,
    },
    SurfaceBrush {
        #[serde(default)]
        surface: Option<ObjectId>,
    },
    EffectBrush {
        factory: ObjectId,
        #[serde(default)]
        sources: Vec<EffectSourceDef>,
    },
    EffectFactory {
        effect: String,
    },
    MaskBrush {
        #[serde(default)]
        mask: Option<ObjectId>,
        #[serde(default)]
        source: Option<ObjectId>,
    },
    VisualSurface {
        #[serde(default)]
        source_visual: Option<ObjectId>,
        #[serde(default)]
        source_size: Vec2,
    },
    LoadedImageSurface {
        source: ImageSource,
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
    },
    ExpressionAnimation(ExpressionAnimationDef),
    BooleanKeyFrameAnimation(KeyFrameAnimationDef<bool>),
    ColorKeyFrameAnimation(KeyFrameAnimationDef<Color>),
    ScalarKeyFrameAnimation(KeyFrameAnimationDef<f32>),
    Vector2KeyFrameAnimation(KeyFrameAnimationDef<Vec2>),
    Vector3KeyFrameAnimation(KeyFrameAnimationDef<Vec3>),
    Vector4KeyFrameAnimation(KeyFrameAnimationDef<Vec4>),
    PathKeyFrameAnimation(KeyFrameAnimationDef<ObjectId>),
    AnimationController {
        #[serde(default)]
        paused: bool,
    },
    LinearEasingFunction,
    CubicBezierEasingFunction {
        control_point1: Vec2,
        control_point2: Vec2,
    },
    StepEasingFunction {
        #[serde(default = "one_step")]
        step_count: i32,
        #[serde(default)]
        initial_step: i32,
        #[serde(default = "one_step")]
        final_step: i32,
        #[serde(default)]
        is_initial_step_single_frame: bool,
        #[serde(default)]
        is_final_step_single_frame: bool,
    },
    PropertySet {
        #[serde(default)]
        values: Vec<PropertySetValue>,
    },
}

fn one() -> f32 {
    1.0
}

fn one_step() -> i32 {
    1
}

fn unit_scale() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

/// Identity map family a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeFamily {
    /// Any composition object, including property sets and animations.
    CompositionObject,
    /// A composition path wrapping a canvas geometry.
    CompositionPath,
    /// A canvas geometry.
    CanvasGeometry,
    /// A loaded image surface.
    LoadedImageSurface,
}

/// The role a reference plays inside its holder. Drives slot validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A visual's child.
    Child,
    /// A visual's clip.
    Clip,
    /// A shape visual's view box.
    ViewBox,
    /// A shape in a shape container.
    Shape,
    /// A brush held by a sprite, a drop shadow mask, a mask brush, or an effect source.
    Brush,
    /// A layer visual's shadow.
    Shadow,
    /// A composition geometry.
    Geometry,
    /// A composition path held by a path geometry.
    Path,
    /// A canvas geometry held by a path or another canvas geometry.
    CanvasSource,
    /// A gradient stop.
    Stop,
    /// A surface held by a surface brush.
    Surface,
    /// An effect factory.
    EffectFactory,
    /// The visual captured by a visual surface.
    SourceVisual,
    /// An expression reference parameter. Accepts anything.
    ReferenceParameter,
    /// A key frame easing function.
    Easing,
    /// A composition path used as a path key frame value.
    PathValue,
    /// An owned property set.
    Properties,
    /// An animator's animation.
    Animation,
    /// An animator's controller.
    Controller,
}

/// One outgoing reference of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Role of the reference.
    pub slot: Slot,
    /// Referenced object.
    pub target: ObjectId,
}

impl Reference {
    fn new(slot: Slot, target: ObjectId) -> Self {
        Self { slot, target }
    }
}

/// Outgoing references; most objects have only a handful.
pub type References = SmallVec<[Reference; 4]>;

impl ObjectKind {
    /// Runtime type name of the object.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ContainerVisual { .. } => "ContainerVisual",
            Self::ShapeVisual { .. } => "ShapeVisual",
            Self::SpriteVisual { .. } => "SpriteVisual",
            Self::LayerVisual { .. } => "LayerVisual",
            Self::ContainerShape { .. } => "CompositionContainerShape",
            Self::SpriteShape { .. } => "CompositionSpriteShape",
            Self::InsetClip { .. } => "InsetClip",
            Self::GeometricClip { .. } => "CompositionGeometricClip",
            Self::ViewBox { .. } => "CompositionViewBox",
            Self::DropShadow { .. } => "DropShadow",
            Self::RectangleGeometry { .. } => "CompositionRectangleGeometry",
            Self::RoundedRectangleGeometry { .. } => "CompositionRoundedRectangleGeometry",
            Self::EllipseGeometry { .. } => "CompositionEllipseGeometry",
            Self::PathGeometry { .. } => "CompositionPathGeometry",
            Self::CompositionPath { .. } => "CompositionPath",
            Self::CanvasPath { .. }
            | Self::CanvasEllipse { .. }
            | Self::CanvasRoundedRectangle { .. }
            | Self::CanvasCombination { .. }
            | Self::CanvasGroup { .. }
            | Self::CanvasTransformed { .. } => "CanvasGeometry",
            Self::ColorBrush { .. } => "CompositionColorBrush",
            Self::LinearGradientBrush { .. } => "CompositionLinearGradientBrush",
            Self::RadialGradientBrush { .. } => "CompositionRadialGradientBrush",
            Self::ColorGradientStop { .. } => "CompositionColorGradientStop",
            Self::SurfaceBrush { .. } => "CompositionSurfaceBrush",
            Self::EffectBrush { .. } => "CompositionEffectBrush",
            Self::EffectFactory { .. } => "CompositionEffectFactory",
            Self::MaskBrush { .. } => "CompositionMaskBrush",
            Self::VisualSurface { .. } => "CompositionVisualSurface",
            Self::LoadedImageSurface { .. } => "LoadedImageSurface",
            Self::ExpressionAnimation(_) => "ExpressionAnimation",
            Self::BooleanKeyFrameAnimation(_) => "BooleanKeyFrameAnimation",
            Self::ColorKeyFrameAnimation(_) => "ColorKeyFrameAnimation",
            Self::ScalarKeyFrameAnimation(_) => "ScalarKeyFrameAnimation",
            Self::Vector2KeyFrameAnimation(_) => "Vector2KeyFrameAnimation",
            Self::Vector3KeyFrameAnimation(_) => "Vector3KeyFrameAnimation",
            Self::Vector4KeyFrameAnimation(_) => "Vector4KeyFrameAnimation",
            Self::PathKeyFrameAnimation(_) => "PathKeyFrameAnimation",
            Self::AnimationController { .. } => "AnimationController",
            Self::LinearEasingFunction => "LinearEasingFunction",
            Self::CubicBezierEasingFunction { .. } => "CubicBezierEasingFunction",
            Self::StepEasingFunction { .. } => "StepEasingFunction",
            Self::PropertySet { .. } => "CompositionPropertySet",
        }
    }

    /// Identity map family.
    pub fn family(&self) -> NodeFamily {
        match self {
            Self::CompositionPath { .. } => NodeFamily::CompositionPath,
            Self::LoadedImageSurface { .. } => NodeFamily::LoadedImageSurface,
            k if k.is_canvas_geometry() => NodeFamily::CanvasGeometry,
            _ => NodeFamily::CompositionObject,
        }
    }

    /// Visual properties, for the four visual kinds.
    pub fn visual(&self) -> Option<&VisualProps> {
        match self {
            Self::ContainerVisual { visual }
            | Self::ShapeVisual { visual, .. }
            | Self::SpriteVisual { visual, .. }
            | Self::LayerVisual { visual, .. } => Some(visual),
            _ => None,
        }
    }

    /// `true` for the four visual kinds.
    pub fn is_visual(&self) -> bool {
        self.visual().is_some()
    }

    /// `true` for canvas geometries.
    pub fn is_canvas_geometry(&self) -> bool {
        matches!(
            self,
            Self::CanvasPath { .. }
                | Self::CanvasEllipse { .. }
                | Self::CanvasRoundedRectangle { .. }
                | Self::CanvasCombination { .. }
                | Self::CanvasGroup { .. }
                | Self::CanvasTransformed { .. }
        )
    }

    /// `true` for composition geometries.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::RectangleGeometry { .. }
                | Self::RoundedRectangleGeometry { .. }
                | Self::EllipseGeometry { .. }
                | Self::PathGeometry { .. }
        )
    }

    /// `true` for brushes.
    pub fn is_brush(&self) -> bool {
        matches!(
            self,
            Self::ColorBrush { .. }
                | Self::LinearGradientBrush { .. }
                | Self::RadialGradientBrush { .. }
                | Self::SurfaceBrush { .. }
                | Self::EffectBrush { .. }
                | Self::MaskBrush { .. }
        )
    }

    /// `true` for expression and key frame animations.
    pub fn is_animation(&self) -> bool {
        matches!(
            self,
            Self::ExpressionAnimation(_)
                | Self::BooleanKeyFrameAnimation(_)
                | Self::ColorKeyFrameAnimation(_)
                | Self::ScalarKeyFrameAnimation(_)
                | Self::Vector2KeyFrameAnimation(_)
                | Self::Vector3KeyFrameAnimation(_)
                | Self::Vector4KeyFrameAnimation(_)
                | Self::PathKeyFrameAnimation(_)
        )
    }

    /// `true` for easing functions.
    pub fn is_easing(&self) -> bool {
        matches!(
            self,
            Self::LinearEasingFunction
                | Self::CubicBezierEasingFunction { .. }
                | Self::StepEasingFunction { .. }
        )
    }

    /// Reference parameters of an animation, empty for anything else.
    pub fn reference_parameters(&self) -> &[ReferenceParameterDef] {
        match self {
            Self::ExpressionAnimation(a) => &a.reference_parameters,
            Self::BooleanKeyFrameAnimation(a) => &a.reference_parameters,
            Self::ColorKeyFrameAnimation(a) => &a.reference_parameters,
            Self::ScalarKeyFrameAnimation(a) => &a.reference_parameters,
            Self::Vector2KeyFrameAnimation(a) => &a.reference_parameters,
            Self::Vector3KeyFrameAnimation(a) => &a.reference_parameters,
            Self::Vector4KeyFrameAnimation(a) => &a.reference_parameters,
            Self::PathKeyFrameAnimation(a) => &a.reference_parameters,
            _ => &[],
        }
    }

    /// Kind-specific outgoing references in traversal order.
    ///
    /// Owned property sets and animators are not included; they belong to [`ObjectDef`].
    pub fn references(&self) -> References {
        let mut out = References::new();
        let mut push = |slot: Slot, id: ObjectId| out.push(Reference::new(slot, id));

        match self {
            Self::ContainerVisual { visual } => {
                visual_refs(visual, &mut push, |_| {});
            }
            Self::ShapeVisual {
                visual,
                view_box,
                shapes,
            } => {
                visual_refs(visual, &mut push, |push| {
                    if let Some(v) = view_box {
                        push(Slot::ViewBox, *v);
                    }
                    for s in shapes {
                        push(Slot::Shape, *s);
                    }
                });
            }
            Self::SpriteVisual { visual, brush } => {
                visual_refs(visual, &mut push, |push| {
                    if let Some(b) = brush {
                        push(Slot::Brush, *b);
                    }
                });
            }
            Self::LayerVisual { visual, shadow } => {
                // Children are created before the shadow is attached.
                if let Some(c) = visual.clip {
                    push(Slot::Clip, c);
                }
                for c in &visual.children {
                    push(Slot::Child, *c);
                }
                if let Some(s) = shadow {
                    push(Slot::Shadow, *s);
                }
            }
            Self::ContainerShape { shapes, .. } => {
                for s in shapes {
                    push(Slot::Shape, *s);
                }
            }
            Self::SpriteShape {
                geometry,
                fill_brush,
                stroke_brush,
                ..
            } => {
                if let Some(g) = geometry {
                    push(Slot::Geometry, *g);
                }
                if let Some(b) = fill_brush {
                    push(Slot::Brush, *b);
                }
                if let Some(b) = stroke_brush {
                    push(Slot::Brush, *b);
                }
            }
            Self::GeometricClip { geometry } => {
                if let Some(g) = geometry {
                    push(Slot::Geometry, *g);
                }
            }
            Self::DropShadow { mask, .. } => {
                if let Some(m) = mask {
                    push(Slot::Brush, *m);
                }
            }
            Self::PathGeometry { path, .. } => {
                if let Some(p) = path {
                    push(Slot::Path, *p);
                }
            }
            Self::CompositionPath { source } => push(Slot::CanvasSource, *source),
            Self::CanvasCombination { a, b, .. } => {
                push(Slot::CanvasSource, *a);
                push(Slot::CanvasSource, *b);
            }
            Self::CanvasGroup { geometries, .. } => {
                for g in geometries {
                    push(Slot::CanvasSource, *g);
                }
            }
            Self::CanvasTransformed { source, .. } => push(Slot::CanvasSource, *source),
            Self::LinearGradientBrush { stops, .. } | Self::RadialGradientBrush { stops, .. } => {
                for s in stops {
                    push(Slot::Stop, *s);
                }
            }
            Self::SurfaceBrush { surface } => {
                if let Some(s) = surface {
                    push(Slot::Surface, *s);
                }
            }
            Self::EffectBrush { factory, sources } => {
                push(Slot::EffectFactory, *factory);
                for s in sources {
                    push(Slot::Brush, s.brush);
                }
            }
            Self::MaskBrush { mask, source } => {
                if let Some(m) = mask {
                    push(Slot::Brush, *m);
                }
                if let Some(s) = source {
                    push(Slot::Brush, *s);
                }
            }
            Self::VisualSurface { source_visual, .. } => {
                if let Some(v) = source_visual {
                    push(Slot::SourceVisual, *v);
                }
            }
            Self::ExpressionAnimation(a) => {
                for rp in &a.reference_parameters {
                    push(Slot::ReferenceParameter, rp.object);
                }
            }
            Self::BooleanKeyFrameAnimation(a) => key_frame_refs(a, &mut push),
            Self::ColorKeyFrameAnimation(a) => key_frame_refs(a, &mut push),
            Self::ScalarKeyFrameAnimation(a) => key_frame_refs(a, &mut push),
            Self::Vector2KeyFrameAnimation(a) => key_frame_refs(a, &mut push),
            Self::Vector3KeyFrameAnimation(a) => key_frame_refs(a, &mut push),
            Self::Vector4KeyFrameAnimation(a) => key_frame_refs(a, &mut push),
            Self::PathKeyFrameAnimation(a) => {
                key_frame_refs(a, &mut push);
                for kf in &a.key_frames {
                    if let KeyFrameValue::Value(p) = kf.value {
                        push(Slot::PathValue, p);
                    }
                }
            }
            Self::InsetClip { .. }
            | Self::ViewBox { .. }
            | Self::RectangleGeometry { .. }
            | Self::RoundedRectangleGeometry { .. }
            | Self::EllipseGeometry { .. }
            | Self::CanvasPath { .. }
            | Self::CanvasEllipse { .. }
            | Self::CanvasRoundedRectangle { .. }
            | Self::ColorBrush { .. }
            | Self::ColorGradientStop { .. }
            | Self::EffectFactory { .. }
            | Self::LoadedImageSurface { .. }
            | Self::AnimationController { .. }
            | Self::LinearEasingFunction
            | Self::CubicBezierEasingFunction { .. }
            | Self::StepEasingFunction { .. }
            | Self::PropertySet { .. } => {}
        }

        out
    }

    /// Rewrites every kind-specific reference in place. Visits exactly the ids [`references`]
    /// yields, in the same order.
    ///
    /// [`references`]: ObjectKind::references
    pub fn remap_references(&mut self, f: &mut impl FnMut(ObjectId) -> ObjectId) {
        let mut map = |id: &mut ObjectId| *id = f(*id);
        let map_opt = |id: &mut Option<ObjectId>, map: &mut dyn FnMut(&mut ObjectId)| {
            if let Some(id) = id {
                map(id);
            }
        };

        match self {
            Self::ContainerVisual { visual } => remap_visual(visual, &mut map),
            Self::ShapeVisual {
                visual,
                view_box,
                shapes,
            } => {
                remap_visual(visual, &mut map);
                map_opt(view_box, &mut map);
                shapes.iter_mut().for_each(&mut map);
            }
            Self::SpriteVisual { visual, brush } => {
                remap_visual(visual, &mut map);
                map_opt(brush, &mut map);
            }
            Self::LayerVisual { visual, shadow } => {
                remap_visual(visual, &mut map);
                map_opt(shadow, &mut map);
            }
            Self::ContainerShape { shapes, .. } => shapes.iter_mut().for_each(&mut map),
            Self::SpriteShape {
                geometry,
                fill_brush,
                stroke_brush,
                ..
            } => {
                map_opt(geometry, &mut map);
                map_opt(fill_brush, &mut map);
                map_opt(stroke_brush, &mut map);
            }
            Self::GeometricClip { geometry } => map_opt(geometry, &mut map),
            Self::DropShadow { mask, .. } => map_opt(mask, &mut map),
            Self::PathGeometry { path, .. } => map_opt(path, &mut map),
            Self::CompositionPath { source } | Self::CanvasTransformed { source, .. } => {
                map(source)
            }
            Self::CanvasCombination { a, b, .. } => {
                map(a);
                map(b);
            }
            Self::CanvasGroup { geometries, .. } => geometries.iter_mut().for_each(&mut map),
            Self::LinearGradientBrush { stops, .. } | Self::RadialGradientBrush { stops, .. } => {
                stops.iter_mut().for_each(&mut map)
            }
            Self::SurfaceBrush { surface } => map_opt(surface, &mut map),
            Self::EffectBrush { factory, sources } => {
                map(factory);
                for s in sources {
                    map(&mut s.brush);
                }
            }
            Self::MaskBrush { mask, source } => {
                map_opt(mask, &mut map);
                map_opt(source, &mut map);
            }
            Self::VisualSurface { source_visual, .. } => map_opt(source_visual, &mut map),
            Self::ExpressionAnimation(a) => {
                for rp in &mut a.reference_parameters {
                    map(&mut rp.object);
                }
            }
            Self::BooleanKeyFrameAnimation(a) => remap_key_frames(a, &mut map),
            Self::ColorKeyFrameAnimation(a) => remap_key_frames(a, &mut map),
            Self::ScalarKeyFrameAnimation(a) => remap_key_frames(a, &mut map),
            Self::Vector2KeyFrameAnimation(a) => remap_key_frames(a, &mut map),
            Self::Vector3KeyFrameAnimation(a) => remap_key_frames(a, &mut map),
            Self::Vector4KeyFrameAnimation(a) => remap_key_frames(a, &mut map),
            Self::PathKeyFrameAnimation(a) => {
                remap_key_frames(a, &mut map);
                for kf in &mut a.key_frames {
                    if let KeyFrameValue::Value(p) = &mut kf.value {
                        map(p);
                    }
                }
            }
            Self::InsetClip { .. }
            | Self::ViewBox { .. }
            | Self::RectangleGeometry { .. }
            | Self::RoundedRectangleGeometry { .. }
            | Self::EllipseGeometry { .. }
            | Self::CanvasPath { .. }
            | Self::CanvasEllipse { .. }
            | Self::CanvasRoundedRectangle { .. }
            | Self::ColorBrush { .. }
            | Self::ColorGradientStop { .. }
            | Self::EffectFactory { .. }
            | Self::LoadedImageSurface { .. }
            | Self::AnimationController { .. }
            | Self::LinearEasingFunction
            | Self::CubicBezierEasingFunction { .. }
            | Self::StepEasingFunction { .. }
            | Self::PropertySet { .. } => {}
        }
    }
}

fn visual_refs(
    visual: &VisualProps,
    push: &mut impl FnMut(Slot, ObjectId),
    kind_specific: impl FnOnce(&mut dyn FnMut(Slot, ObjectId)),
) {
    if let Some(c) = visual.clip {
        push(Slot::Clip, c);
    }
    kind_specific(&mut *push);
    for c in &visual.children {
        push(Slot::Child, *c);
    }
}

fn key_frame_refs<T>(a: &KeyFrameAnimationDef<T>, push: &mut impl FnMut(Slot, ObjectId)) {
    for rp in &a.reference_parameters {
        push(Slot::ReferenceParameter, rp.object);
    }
    for kf in &a.key_frames {
        if let Some(e) = kf.easing {
            push(Slot::Easing, e);
        }
    }
}

fn remap_visual(visual: &mut VisualProps, map: &mut impl FnMut(&mut ObjectId)) {
    if let Some(c) = &mut visual.clip {
        map(c);
    }
    visual.children.iter_mut().for_each(map);
}

fn remap_key_frames<T>(a: &mut KeyFrameAnimationDef<T>, map: &mut impl FnMut(&mut ObjectId)) {
    for rp in &mut a.reference_parameters {
        map(&mut rp.object);
    }
    for kf in &mut a.key_frames {
        if let Some(e) = &mut kf.easing {
            map(e);
        }
    }
}

impl Slot {
    /// Whether an object of `kind` may sit in this slot.
    pub fn accepts(self, kind: &ObjectKind) -> bool {
        match self {
            Self::Child | Self::SourceVisual => kind.is_visual(),
            Self::Clip => matches!(
                kind,
                ObjectKind::InsetClip { .. } | ObjectKind::GeometricClip { .. }
            ),
            Self::ViewBox => matches!(kind, ObjectKind::ViewBox { .. }),
            Self::Shape => matches!(
                kind,
                ObjectKind::ContainerShape { .. } | ObjectKind::SpriteShape { .. }
            ),
            Self::Brush => kind.is_brush(),
            Self::Shadow => matches!(kind, ObjectKind::DropShadow { .. }),
            Self::Geometry => kind.is_geometry(),
            Self::Path | Self::PathValue => matches!(kind, ObjectKind::CompositionPath { .. }),
            Self::CanvasSource => kind.is_canvas_geometry(),
            Self::Stop => matches!(kind, ObjectKind::ColorGradientStop { .. }),
            Self::Surface => matches!(
                kind,
                ObjectKind::VisualSurface { .. } | ObjectKind::LoadedImageSurface { .. }
            ),
            Self::EffectFactory => matches!(kind, ObjectKind::EffectFactory { .. }),
            Self::ReferenceParameter => true,
            Self::Easing => kind.is_easing(),
            Self::Properties => matches!(kind, ObjectKind::PropertySet { .. }),
            Self::Animation => kind.is_animation(),
            Self::Controller => matches!(kind, ObjectKind::AnimationController { .. }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/object.rs"]
mod tests;
