pub mod geometry {
    use glam::{DVec2, DVec3};
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量，用于缩放、方向等字段。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 三维点，供 3DFACE、MESH 等实体使用。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub DVec3);

    impl Point3 {
        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f64 {
            self.0.z
        }
    }

    impl From<DVec3> for Point3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }
}

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DocumentError {
        #[error("entry {name:?} not found in {table} table")]
        RecordNotFound { table: String, name: String },
        #[error("entry {name:?} already exists in {table} table")]
        DuplicateRecord { table: String, name: String },
        #[error("block {0:?} already exists")]
        DuplicateBlock(String),
        #[error("layout {0:?} already exists")]
        DuplicateLayout(String),
        #[error("unknown target space: {0}")]
        UnknownSpace(String),
        #[error("invalid handle seed {0:?}")]
        InvalidHandleSeed(String),
    }
}

pub mod handle {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::error::DocumentError;

    /// 文档内唯一标识符，序列化时以十六进制显示。
    #[derive(
        Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    pub struct Handle(u64);

    impl Handle {
        pub const NULL: Handle = Handle(0);

        #[inline]
        pub fn new(raw: u64) -> Self {
            Self(raw)
        }

        #[inline]
        pub fn get(self) -> u64 {
            self.0
        }

        #[inline]
        pub fn is_null(self) -> bool {
            self.0 == 0
        }
    }

    impl fmt::Display for Handle {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:X}", self.0)
        }
    }

    /// 单调递增的标识符生成器。每个文档持有一个实例，
    /// 所有实体、表项、块与布局都从这里领取句柄。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct HandleGenerator {
        next: u64,
    }

    impl HandleGenerator {
        /// 默认起始值避开保留句柄区段。
        pub fn new() -> Self {
            Self { next: 0x10 }
        }

        /// 从十六进制种子构造，供测试与文档装载使用。
        pub fn from_seed(seed: &str) -> Result<Self, DocumentError> {
            let next = u64::from_str_radix(seed, 16)
                .map_err(|_| DocumentError::InvalidHandleSeed(seed.to_string()))?;
            Ok(Self { next })
        }

        /// 返回当前句柄并前进一步。
        pub fn next_handle(&mut self) -> Handle {
            let handle = Handle(self.next);
            self.next += 1;
            handle
        }

        /// 下一个待分配句柄的十六进制形式。
        pub fn seed(&self) -> String {
            format!("{:X}", self.next)
        }

        pub fn reset(&mut self, seed: &str) -> Result<(), DocumentError> {
            self.next = u64::from_str_radix(seed, 16)
                .map_err(|_| DocumentError::InvalidHandleSeed(seed.to_string()))?;
            Ok(())
        }
    }

    impl Default for HandleGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn handles_are_monotonic_and_hex_formatted() {
            let mut generator = HandleGenerator::from_seed("FF").expect("valid seed");
            assert_eq!(generator.seed(), "FF");
            let first = generator.next_handle();
            let second = generator.next_handle();
            assert_eq!(first.to_string(), "FF");
            assert_eq!(second.to_string(), "100");
            assert!(first < second);
            assert_eq!(generator.seed(), "101");
        }

        #[test]
        fn invalid_seed_is_rejected() {
            assert!(HandleGenerator::from_seed("XYZ").is_err());
            let mut generator = HandleGenerator::new();
            assert!(generator.reset("not hex").is_err());
        }
    }
}

pub mod entity {
    use serde::{Deserialize, Serialize};

    use crate::geometry::{Point2, Point3, Vector2};
    use crate::handle::Handle;

    /// 跨文档无意义的扩展属性数据，按来源应用分组。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct XData {
        pub app_id: String,
        pub values: Vec<String>,
    }

    /// 应用自定义数据段，仅在来源文档内有解释。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AppData {
        pub tag: String,
        pub values: Vec<String>,
    }

    /// 所有实体共享的扁平属性集。可选字段缺省时按格式约定回退。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct EntityCommon {
        pub handle: Option<Handle>,
        pub owner: Option<Handle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub layer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub linetype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub plot_style_handle: Option<Handle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub material_handle: Option<Handle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub visual_style_handle: Option<Handle>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub xdata: Vec<XData>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub app_data: Vec<AppData>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub reactors: Vec<Handle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub extension_dict: Option<Handle>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Line {
        pub start: Point2,
        pub end: Point2,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Point {
        pub location: Point2,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Circle {
        pub center: Point2,
        pub radius: f64,
    }

    /// 圆弧，角度以弧度存储。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Arc {
        pub center: Point2,
        pub radius: f64,
        pub start_angle: f64,
        pub end_angle: f64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Ellipse {
        pub center: Point2,
        pub major_axis: Vector2,
        pub ratio: f64,
        pub start_parameter: f64,
        pub end_parameter: f64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Text {
        pub insert: Point2,
        pub content: String,
        pub height: f64,
        pub rotation: f64,
        pub style: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MText {
        pub insert: Point2,
        pub content: String,
        pub height: f64,
        pub style: Option<String>,
    }

    /// SOLID 与 TRACE 共享同一种四角形数据。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Solid {
        pub corners: [Point2; 4],
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Trace {
        pub corners: [Point2; 4],
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Face3d {
        pub vertices: [Point3; 4],
        pub invisible_edges: [bool; 4],
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Shape {
        pub insert: Point2,
        pub name: String,
        pub size: f64,
        pub rotation: f64,
    }

    /// 重量级多段线：顶点是独立的 VERTEX 子实体。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Polyline {
        pub vertices: Vec<Entity>,
        pub is_closed: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Vertex {
        pub location: Point2,
        pub bulge: f64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PolylineVertex {
        pub position: Point2,
        pub bulge: f64,
    }

    impl PolylineVertex {
        #[inline]
        pub fn new(position: Point2) -> Self {
            Self {
                position,
                bulge: 0.0,
            }
        }
    }

    /// 轻量多段线：顶点内联存储，没有子实体。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LwPolyline {
        pub points: Vec<PolylineVertex>,
        pub is_closed: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Spline {
        pub degree: i32,
        pub control_points: Vec<Point2>,
        pub knots: Vec<f64>,
        pub weights: Vec<f64>,
        pub is_closed: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Attrib {
        pub tag: String,
        pub value: String,
        pub insert: Point2,
        pub height: f64,
        pub style: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AttDef {
        pub tag: String,
        pub prompt: String,
        pub default_value: String,
        pub insert: Point2,
        pub height: f64,
        pub style: Option<String>,
    }

    /// 块参照。属性子实体完整保留在参照上，不经过普通实体导入路径。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Insert {
        pub name: String,
        pub insert: Point2,
        pub scale: Vector2,
        pub rotation: f64,
        pub attribs: Vec<Entity>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct HatchLoop {
        pub vertices: Vec<PolylineVertex>,
        pub is_closed: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Hatch {
        pub pattern_name: String,
        pub is_solid: bool,
        /// 关联边界标志；跨文档导入时边界实体不会跟随，标志必须清除。
        pub associative: bool,
        pub loops: Vec<HatchLoop>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Mesh {
        pub vertices: Vec<Point3>,
        pub faces: Vec<[u32; 4]>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct XLine {
        pub base: Point2,
        pub direction: Vector2,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Ray {
        pub base: Point2,
        pub direction: Vector2,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum DimensionKind {
        Linear,
        Aligned,
        Angular,
        Diameter,
        Radius,
        Angular3Point,
        Ordinate,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Dimension {
        pub kind: DimensionKind,
        pub definition_point: Point2,
        pub text_midpoint: Point2,
        /// 匿名几何块名称，由渲染器生成并在导入时重写。
        pub geometry: Option<String>,
        pub dim_style: Option<String>,
        pub text: Option<String>,
        pub measurement: Option<f64>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Leader {
        pub vertices: Vec<Point2>,
        pub dim_style: Option<String>,
        pub has_arrowhead: bool,
    }

    /// 图纸空间视口。句柄字段全部指向文档内部对象，脱离原文档即失效。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Viewport {
        pub center: Point2,
        pub width: f64,
        pub height: f64,
        pub view_center: Vector2,
        pub view_height: f64,
        pub sun_handle: Option<Handle>,
        pub clipping_boundary_handle: Option<Handle>,
        pub ucs_handle: Option<Handle>,
        pub ucs_base_handle: Option<Handle>,
        pub background_handle: Option<Handle>,
        pub shade_plot_handle: Option<Handle>,
        pub ref_object_handles: [Option<Handle>; 4],
    }

    impl Viewport {
        /// 清除所有文档内部对象引用。
        pub fn clear_document_links(&mut self) {
            self.sun_handle = None;
            self.clipping_boundary_handle = None;
            self.ucs_handle = None;
            self.ucs_base_handle = None;
            self.background_handle = None;
            self.shade_plot_handle = None;
            self.ref_object_handles = [None; 4];
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RasterImage {
        pub insert: Point2,
        pub size: Vector2,
        pub image_def_handle: Option<Handle>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Wipeout {
        pub vertices: Vec<Point2>,
    }

    /// 代理实体：载荷由生成它的应用解释，绑定在原文档上，无法复制。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Proxy {
        pub class_name: String,
        pub graphics: Vec<u8>,
    }

    /// 封闭的实体类型集合。新增类型必须在这里补上标签，
    /// 否则导入分派的 match 无法编译。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum EntityKind {
        Line(Line),
        Point(Point),
        Circle(Circle),
        Arc(Arc),
        Ellipse(Ellipse),
        Text(Text),
        MText(MText),
        Solid(Solid),
        Trace(Trace),
        Face3d(Face3d),
        Shape(Shape),
        Polyline(Polyline),
        Vertex(Vertex),
        LwPolyline(LwPolyline),
        Spline(Spline),
        Attrib(Attrib),
        AttDef(AttDef),
        Insert(Insert),
        Hatch(Hatch),
        Mesh(Mesh),
        XLine(XLine),
        Ray(Ray),
        Dimension(Dimension),
        Leader(Leader),
        Viewport(Viewport),
        RasterImage(RasterImage),
        Wipeout(Wipeout),
        Proxy(Proxy),
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Entity {
        pub common: EntityCommon,
        pub kind: EntityKind,
    }

    impl Entity {
        pub fn new(kind: EntityKind) -> Self {
            Self {
                common: EntityCommon::default(),
                kind,
            }
        }

        pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
            self.common.layer = Some(layer.into());
            self
        }

        pub fn with_linetype(mut self, linetype: impl Into<String>) -> Self {
            self.common.linetype = Some(linetype.into());
            self
        }

        /// 实体的类型标签，用于日志输出。
        pub fn kind_name(&self) -> &'static str {
            match &self.kind {
                EntityKind::Line(_) => "LINE",
                EntityKind::Point(_) => "POINT",
                EntityKind::Circle(_) => "CIRCLE",
                EntityKind::Arc(_) => "ARC",
                EntityKind::Ellipse(_) => "ELLIPSE",
                EntityKind::Text(_) => "TEXT",
                EntityKind::MText(_) => "MTEXT",
                EntityKind::Solid(_) => "SOLID",
                EntityKind::Trace(_) => "TRACE",
                EntityKind::Face3d(_) => "3DFACE",
                EntityKind::Shape(_) => "SHAPE",
                EntityKind::Polyline(_) => "POLYLINE",
                EntityKind::Vertex(_) => "VERTEX",
                EntityKind::LwPolyline(_) => "LWPOLYLINE",
                EntityKind::Spline(_) => "SPLINE",
                EntityKind::Attrib(_) => "ATTRIB",
                EntityKind::AttDef(_) => "ATTDEF",
                EntityKind::Insert(_) => "INSERT",
                EntityKind::Hatch(_) => "HATCH",
                EntityKind::Mesh(_) => "MESH",
                EntityKind::XLine(_) => "XLINE",
                EntityKind::Ray(_) => "RAY",
                EntityKind::Dimension(_) => "DIMENSION",
                EntityKind::Leader(_) => "LEADER",
                EntityKind::Viewport(_) => "VIEWPORT",
                EntityKind::RasterImage(_) => "IMAGE",
                EntityKind::Wipeout(_) => "WIPEOUT",
                EntityKind::Proxy(_) => "ACAD_PROXY_ENTITY",
            }
        }

        /// 图层名，缺省回退到 `"0"`。
        #[inline]
        pub fn layer(&self) -> &str {
            self.common.layer.as_deref().unwrap_or("0")
        }

        /// 线型名，缺省回退到 `"BYLAYER"`。
        #[inline]
        pub fn linetype(&self) -> &str {
            self.common.linetype.as_deref().unwrap_or("BYLAYER")
        }

        /// 文字样式名。仅文字类实体支持该字段，其余类型返回 `None`。
        pub fn text_style(&self) -> Option<&str> {
            match &self.kind {
                EntityKind::Text(text) => Some(text.style.as_deref().unwrap_or("Standard")),
                EntityKind::MText(mtext) => Some(mtext.style.as_deref().unwrap_or("Standard")),
                EntityKind::Attrib(attrib) => Some(attrib.style.as_deref().unwrap_or("Standard")),
                EntityKind::AttDef(attdef) => Some(attdef.style.as_deref().unwrap_or("Standard")),
                _ => None,
            }
        }

        /// 标注样式名。仅 DIMENSION 与 LEADER 支持该字段。
        pub fn dimension_style(&self) -> Option<&str> {
            match &self.kind {
                EntityKind::Dimension(dimension) => {
                    Some(dimension.dim_style.as_deref().unwrap_or("Standard"))
                }
                EntityKind::Leader(leader) => {
                    Some(leader.dim_style.as_deref().unwrap_or("Standard"))
                }
                _ => None,
            }
        }
    }
}

pub mod tables {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use crate::error::DocumentError;
    use crate::handle::Handle;

    /// 四张支持表的记录共同接口。
    pub trait TableRecord: Clone {
        fn name(&self) -> &str;

        fn set_handle(&mut self, handle: Handle);

        /// 切断与原文档的关联：句柄与所有者一并清除。
        fn detach(&mut self);

        /// 将文档内部的装饰性句柄重置为目标文档的默认对象。
        /// 仅对格式定义了这些字段的记录有意义。
        fn reset_decorative_handles(&mut self, _plot_style: Handle, _material: Handle) {}
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Layer {
        pub name: String,
        pub handle: Option<Handle>,
        pub owner: Option<Handle>,
        pub color: i16,
        pub linetype: String,
        pub is_frozen: bool,
        pub is_locked: bool,
        pub plot_style_handle: Option<Handle>,
        pub material_handle: Option<Handle>,
    }

    impl Layer {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                handle: None,
                owner: None,
                color: 7,
                linetype: "Continuous".to_string(),
                is_frozen: false,
                is_locked: false,
                plot_style_handle: None,
                material_handle: None,
            }
        }

        pub fn with_linetype(mut self, linetype: impl Into<String>) -> Self {
            self.linetype = linetype.into();
            self
        }
    }

    impl TableRecord for Layer {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_handle(&mut self, handle: Handle) {
            self.handle = Some(handle);
        }

        fn detach(&mut self) {
            self.handle = None;
            self.owner = None;
        }

        fn reset_decorative_handles(&mut self, plot_style: Handle, material: Handle) {
            self.plot_style_handle = Some(plot_style);
            self.material_handle = Some(material);
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Linetype {
        pub name: String,
        pub handle: Option<Handle>,
        pub owner: Option<Handle>,
        pub description: String,
        pub pattern: Vec<f64>,
    }

    impl Linetype {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                handle: None,
                owner: None,
                description: String::new(),
                pattern: Vec::new(),
            }
        }

        pub fn with_pattern(mut self, pattern: impl Into<Vec<f64>>) -> Self {
            self.pattern = pattern.into();
            self
        }
    }

    impl TableRecord for Linetype {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_handle(&mut self, handle: Handle) {
            self.handle = Some(handle);
        }

        fn detach(&mut self) {
            self.handle = None;
            self.owner = None;
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TextStyle {
        pub name: String,
        pub handle: Option<Handle>,
        pub owner: Option<Handle>,
        pub font: String,
        pub width_factor: f64,
        pub oblique_angle: f64,
    }

    impl TextStyle {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                handle: None,
                owner: None,
                font: "txt".to_string(),
                width_factor: 1.0,
                oblique_angle: 0.0,
            }
        }
    }

    impl TableRecord for TextStyle {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_handle(&mut self, handle: Handle) {
            self.handle = Some(handle);
        }

        fn detach(&mut self) {
            self.handle = None;
            self.owner = None;
        }
    }

    /// 标注样式。文字样式、延伸线线型与四个箭头符号
    /// 都是指向其他表或块的名称，导入时会进一步展开需求。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DimStyle {
        pub name: String,
        pub handle: Option<Handle>,
        pub owner: Option<Handle>,
        pub text_style: Option<String>,
        pub linetype: Option<String>,
        pub ext1_linetype: Option<String>,
        pub ext2_linetype: Option<String>,
        pub arrow_block: Option<String>,
        pub arrow_block1: Option<String>,
        pub arrow_block2: Option<String>,
        pub leader_arrow_block: Option<String>,
        pub arrow_size: f64,
        pub text_height: f64,
        pub extension_offset: f64,
    }

    impl DimStyle {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                handle: None,
                owner: None,
                text_style: None,
                linetype: None,
                ext1_linetype: None,
                ext2_linetype: None,
                arrow_block: None,
                arrow_block1: None,
                arrow_block2: None,
                leader_arrow_block: None,
                arrow_size: 0.18,
                text_height: 0.18,
                extension_offset: 0.0625,
            }
        }
    }

    impl TableRecord for DimStyle {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_handle(&mut self, handle: Handle) {
            self.handle = Some(handle);
        }

        fn detach(&mut self) {
            self.handle = None;
            self.owner = None;
        }
    }

    /// 按名称索引的表。键不区分大小写，记录保留原始写法。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Table<R> {
        name: String,
        records: BTreeMap<String, R>,
    }

    fn key_of(name: &str) -> String {
        name.to_ascii_uppercase()
    }

    impl<R: TableRecord> Table<R> {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                records: BTreeMap::new(),
            }
        }

        #[inline]
        pub fn contains(&self, name: &str) -> bool {
            self.records.contains_key(&key_of(name))
        }

        pub fn get(&self, name: &str) -> Result<&R, DocumentError> {
            self.records
                .get(&key_of(name))
                .ok_or_else(|| DocumentError::RecordNotFound {
                    table: self.name.clone(),
                    name: name.to_string(),
                })
        }

        pub fn get_mut(&mut self, name: &str) -> Result<&mut R, DocumentError> {
            self.records
                .get_mut(&key_of(name))
                .ok_or_else(|| DocumentError::RecordNotFound {
                    table: self.name.clone(),
                    name: name.to_string(),
                })
        }

        pub fn add(&mut self, record: R) -> Result<(), DocumentError> {
            let key = key_of(record.name());
            if self.records.contains_key(&key) {
                return Err(DocumentError::DuplicateRecord {
                    table: self.name.clone(),
                    name: record.name().to_string(),
                });
            }
            self.records.insert(key, record);
            Ok(())
        }

        pub fn remove(&mut self, name: &str) -> Result<R, DocumentError> {
            self.records
                .remove(&key_of(name))
                .ok_or_else(|| DocumentError::RecordNotFound {
                    table: self.name.clone(),
                    name: name.to_string(),
                })
        }

        /// 记录名称，按键序稳定输出。
        pub fn names(&self) -> impl Iterator<Item = &str> {
            self.records.values().map(|record| record.name())
        }

        pub fn iter(&self) -> impl Iterator<Item = &R> {
            self.records.values()
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.records.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.records.is_empty()
        }
    }

}

pub mod document {
    use std::collections::BTreeMap;
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::arrows;
    use crate::entity::{Entity, EntityKind};
    use crate::error::DocumentError;
    use crate::geometry::Point2;
    use crate::handle::{Handle, HandleGenerator};
    use crate::tables::{DimStyle, Layer, Linetype, Table, TableRecord, TextStyle};

    /// 实体的归属位置：布局或块定义。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Space {
        Layout(String),
        Block(String),
    }

    impl Space {
        pub fn layout(name: impl Into<String>) -> Self {
            Space::Layout(name.into())
        }

        pub fn block(name: impl Into<String>) -> Self {
            Space::Block(name.into())
        }
    }

    impl fmt::Display for Space {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Space::Layout(name) => write!(f, "layout {name:?}"),
                Space::Block(name) => write!(f, "block {name:?}"),
            }
        }
    }

    /// 块定义：命名的实体容器加描述性元数据。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Block {
        pub name: String,
        pub handle: Option<Handle>,
        pub owner: Option<Handle>,
        pub base_point: Point2,
        pub description: String,
        pub flags: i32,
        pub xref_path: String,
        pub entities: Vec<Handle>,
    }

    impl Block {
        pub fn new(name: impl Into<String>, base_point: Point2) -> Self {
            Self {
                name: name.into(),
                handle: None,
                owner: None,
                base_point,
                description: String::new(),
                flags: 0,
                xref_path: String::new(),
                entities: Vec::new(),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum LayoutKind {
        Model,
        Paper,
    }

    /// 布局的描述属性与文档内部句柄字段。
    /// 跨文档重建布局时句柄字段全部丢弃。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct LayoutSettings {
        pub paper_width: f64,
        pub paper_height: f64,
        pub plot_rotation: i16,
        pub plot_scale: f64,
        pub shade_plot_handle: Option<Handle>,
        pub block_record_handle: Option<Handle>,
        pub viewport_handle: Option<Handle>,
        pub ucs_handle: Option<Handle>,
        pub base_ucs_handle: Option<Handle>,
    }

    impl LayoutSettings {
        /// 清除所有文档内部对象引用，保留描述属性。
        pub fn clear_document_links(&mut self) {
            self.shade_plot_handle = None;
            self.block_record_handle = None;
            self.viewport_handle = None;
            self.ucs_handle = None;
            self.base_ucs_handle = None;
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Layout {
        pub name: String,
        pub kind: LayoutKind,
        pub handle: Option<Handle>,
        pub tab_order: i32,
        pub settings: LayoutSettings,
        pub entities: Vec<Handle>,
    }

    /// 内存中的 CAD 文档：实体库、四张支持表、块集合与布局集合。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Document {
        entities: Vec<(Handle, Entity)>,
        pub layers: Table<Layer>,
        pub linetypes: Table<Linetype>,
        pub text_styles: Table<TextStyle>,
        pub dim_styles: Table<DimStyle>,
        blocks: BTreeMap<String, Block>,
        layouts: Vec<Layout>,
        handles: HandleGenerator,
        plot_style_handle: Handle,
        material_handle: Handle,
    }

    impl Document {
        pub const MODEL_SPACE: &'static str = "Model";

        /// 新文档带上格式保证存在的默认记录。
        pub fn new() -> Self {
            let mut handles = HandleGenerator::new();
            let plot_style_handle = handles.next_handle();
            let material_handle = handles.next_handle();

            let mut doc = Self {
                entities: Vec::new(),
                layers: Table::new("layers"),
                linetypes: Table::new("linetypes"),
                text_styles: Table::new("styles"),
                dim_styles: Table::new("dimstyles"),
                blocks: BTreeMap::new(),
                layouts: Vec::new(),
                handles,
                plot_style_handle,
                material_handle,
            };
            doc.initialize_defaults();
            doc
        }

        // 新文档为空，播种时的重名错误不可能发生
        fn initialize_defaults(&mut self) {
            let mut layer0 = Layer::new("0");
            layer0.set_handle(self.handles.next_handle());
            layer0.plot_style_handle = Some(self.plot_style_handle);
            layer0.material_handle = Some(self.material_handle);
            let _ = self.layers.add(layer0);

            for name in ["BYLAYER", "BYBLOCK", "CONTINUOUS"] {
                let mut linetype = Linetype::new(name);
                linetype.set_handle(self.handles.next_handle());
                let _ = self.linetypes.add(linetype);
            }

            let mut standard = TextStyle::new("Standard");
            standard.set_handle(self.handles.next_handle());
            let _ = self.text_styles.add(standard);

            let mut dim_standard = DimStyle::new("Standard");
            dim_standard.set_handle(self.handles.next_handle());
            let _ = self.dim_styles.add(dim_standard);

            let model_handle = self.handles.next_handle();
            self.layouts.push(Layout {
                name: Self::MODEL_SPACE.to_string(),
                kind: LayoutKind::Model,
                handle: Some(model_handle),
                tab_order: 0,
                settings: LayoutSettings::default(),
                entities: Vec::new(),
            });
        }

        /// 文档级默认打印样式对象（"Normal"）的句柄。
        #[inline]
        pub fn default_plot_style_handle(&self) -> Handle {
            self.plot_style_handle
        }

        /// 文档级默认材质对象（"Global"）的句柄。
        #[inline]
        pub fn default_material_handle(&self) -> Handle {
            self.material_handle
        }

        /// 领取一个新句柄。表项注册等需要先于插入拿到标识时使用。
        #[inline]
        pub fn next_handle(&mut self) -> Handle {
            self.handles.next_handle()
        }

        /// 注册实体并分配新句柄；子实体（属性、顶点）一并编号。
        pub fn add_entity(&mut self, mut entity: Entity) -> Handle {
            let handle = self.handles.next_handle();
            entity.common.handle = Some(handle);
            assign_sub_handles(&mut self.handles, &mut entity);
            self.entities.push((handle, entity));
            handle
        }

        #[inline]
        pub fn entity(&self, handle: Handle) -> Option<&Entity> {
            self.entities
                .iter()
                .find(|(id, _)| *id == handle)
                .map(|(_, entity)| entity)
        }

        #[inline]
        pub fn entity_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
            self.entities
                .iter_mut()
                .find(|(id, _)| *id == handle)
                .map(|(_, entity)| entity)
        }

        #[inline]
        pub fn entity_count(&self) -> usize {
            self.entities.len()
        }

        pub fn entities(&self) -> impl Iterator<Item = &(Handle, Entity)> {
            self.entities.iter()
        }

        /// 判断空间是否属于本文档。
        pub fn contains_space(&self, space: &Space) -> bool {
            match space {
                Space::Layout(name) => self.layout(name).is_some(),
                Space::Block(name) => self.blocks.contains_key(name),
            }
        }

        /// 把已注册实体挂到布局或块下，并把所有者指向该容器。
        pub fn attach(&mut self, space: &Space, entity: Handle) -> Result<(), DocumentError> {
            let owner = match space {
                Space::Layout(name) => {
                    let layout = self
                        .layouts
                        .iter_mut()
                        .find(|layout| layout.name == *name)
                        .ok_or_else(|| DocumentError::UnknownSpace(space.to_string()))?;
                    layout.entities.push(entity);
                    layout.handle
                }
                Space::Block(name) => {
                    let block = self
                        .blocks
                        .get_mut(name)
                        .ok_or_else(|| DocumentError::UnknownSpace(space.to_string()))?;
                    block.entities.push(entity);
                    block.handle
                }
            };
            if let Some(entry) = self.entity_mut(entity) {
                entry.common.owner = owner;
            }
            Ok(())
        }

        /// 空间内实体句柄的快照。
        pub fn space_entities(&self, space: &Space) -> Option<&[Handle]> {
            match space {
                Space::Layout(name) => self.layout(name).map(|layout| layout.entities.as_slice()),
                Space::Block(name) => self
                    .blocks
                    .get(name)
                    .map(|block| block.entities.as_slice()),
            }
        }

        #[inline]
        pub fn modelspace(&self) -> &Layout {
            self.layouts
                .iter()
                .find(|layout| layout.kind == LayoutKind::Model)
                .expect("document always owns a model space")
        }

        pub fn layout(&self, name: &str) -> Option<&Layout> {
            self.layouts.iter().find(|layout| layout.name == name)
        }

        /// 布局名按标签顺序排列，模型空间排在最前。
        pub fn layout_names_in_tab_order(&self) -> Vec<String> {
            let mut layouts: Vec<&Layout> = self.layouts.iter().collect();
            layouts.sort_by(|a, b| a.tab_order.cmp(&b.tab_order).then(a.name.cmp(&b.name)));
            layouts.into_iter().map(|layout| layout.name.clone()).collect()
        }

        /// 新建图纸空间布局。模型空间在构造时创建，之后不可重建。
        pub fn create_layout(
            &mut self,
            name: &str,
            settings: LayoutSettings,
        ) -> Result<&Layout, DocumentError> {
            if self.layout(name).is_some() {
                return Err(DocumentError::DuplicateLayout(name.to_string()));
            }
            let handle = self.handles.next_handle();
            let tab_order = self
                .layouts
                .iter()
                .map(|layout| layout.tab_order)
                .max()
                .unwrap_or(0)
                + 1;
            self.layouts.push(Layout {
                name: name.to_string(),
                kind: LayoutKind::Paper,
                handle: Some(handle),
                tab_order,
                settings,
                entities: Vec::new(),
            });
            Ok(self.layouts.last().expect("layout was just pushed"))
        }

        #[inline]
        pub fn block(&self, name: &str) -> Option<&Block> {
            self.blocks.get(name)
        }

        #[inline]
        pub fn block_mut(&mut self, name: &str) -> Option<&mut Block> {
            self.blocks.get_mut(name)
        }

        #[inline]
        pub fn has_block(&self, name: &str) -> bool {
            self.blocks.contains_key(name)
        }

        pub fn blocks(&self) -> impl Iterator<Item = &Block> {
            self.blocks.values()
        }

        /// 注册新的块定义，分配句柄。重名是调用方错误。
        pub fn add_block(&mut self, mut block: Block) -> Result<Handle, DocumentError> {
            if self.blocks.contains_key(&block.name) {
                return Err(DocumentError::DuplicateBlock(block.name));
            }
            let handle = self.handles.next_handle();
            block.handle = Some(handle);
            self.blocks.insert(block.name.clone(), block);
            Ok(handle)
        }

        /// 确保标准箭头符号的块存在，返回块名。重复调用无副作用。
        pub fn acquire_arrow(&mut self, arrow: &str) -> String {
            let block_name = arrows::block_name(arrow);
            if self.has_block(&block_name) {
                return block_name;
            }
            let block = Block::new(block_name.clone(), Point2::new(0.0, 0.0));
            // 块名刚检查过不存在
            let _ = self.add_block(block);
            for entity in arrows::synthesize(arrow) {
                let handle = self.add_entity(entity);
                if let Some(block) = self.blocks.get_mut(&block_name) {
                    block.entities.push(handle);
                }
            }
            block_name
        }
    }

    impl Default for Document {
        fn default() -> Self {
            Self::new()
        }
    }

    fn assign_sub_handles(handles: &mut HandleGenerator, entity: &mut Entity) {
        match &mut entity.kind {
            EntityKind::Insert(insert) => {
                for attrib in &mut insert.attribs {
                    attrib.common.handle = Some(handles.next_handle());
                }
            }
            EntityKind::Polyline(polyline) => {
                for vertex in &mut polyline.vertices {
                    vertex.common.handle = Some(handles.next_handle());
                }
            }
            _ => {}
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::entity::{EntityKind, Line};

        fn line(x: f64) -> Entity {
            Entity::new(EntityKind::Line(Line {
                start: Point2::new(0.0, 0.0),
                end: Point2::new(x, 0.0),
            }))
        }

        #[test]
        fn new_document_is_seeded_with_format_defaults() {
            let doc = Document::new();
            assert!(doc.layers.contains("0"));
            assert!(doc.linetypes.contains("BYLAYER"));
            assert!(doc.linetypes.contains("BYBLOCK"));
            assert!(doc.linetypes.contains("CONTINUOUS"));
            assert!(doc.text_styles.contains("Standard"));
            assert!(doc.dim_styles.contains("Standard"));
            assert_eq!(doc.modelspace().name, "Model");
            assert!(!doc.default_plot_style_handle().is_null());
            assert!(!doc.default_material_handle().is_null());
        }

        #[test]
        fn attach_rejects_unknown_space() {
            let mut doc = Document::new();
            let handle = doc.add_entity(line(1.0));
            let missing = Space::layout("Sheet Z");
            assert!(doc.attach(&missing, handle).is_err());

            let model = Space::layout(Document::MODEL_SPACE);
            doc.attach(&model, handle).expect("attach to model space");
            assert_eq!(doc.modelspace().entities, vec![handle]);
            let owner = doc.entity(handle).expect("entity").common.owner;
            assert_eq!(owner, doc.modelspace().handle);
        }

        #[test]
        fn layouts_are_ordered_by_tab_order() {
            let mut doc = Document::new();
            doc.create_layout("Sheet B", LayoutSettings::default())
                .expect("create layout");
            doc.create_layout("Sheet A", LayoutSettings::default())
                .expect("create layout");
            assert_eq!(
                doc.layout_names_in_tab_order(),
                vec!["Model", "Sheet B", "Sheet A"]
            );
            assert!(
                doc.create_layout("Sheet A", LayoutSettings::default())
                    .is_err()
            );
        }

        #[test]
        fn acquire_arrow_is_idempotent() {
            let mut doc = Document::new();
            let name = doc.acquire_arrow("DOT");
            assert_eq!(name, "_DOT");
            let block_len = doc.block("_DOT").expect("arrow block").entities.len();
            assert!(block_len > 0);

            let again = doc.acquire_arrow("DOT");
            assert_eq!(again, "_DOT");
            assert_eq!(
                doc.block("_DOT").expect("arrow block").entities.len(),
                block_len
            );
        }
    }
}

pub mod arrows {
    //! 标准箭头符号目录。知名符号在目标文档中直接合成，
    //! 非标准符号按普通块处理。

    use crate::entity::{Circle, Entity, EntityKind, Line, Solid};
    use crate::geometry::Point2;

    /// 格式预定义的箭头符号名。空名表示默认实心终结符，不需要块定义。
    pub const STANDARD_ARROWS: &[&str] = &[
        "CLOSED",
        "CLOSEDBLANK",
        "DOT",
        "DOTSMALL",
        "DOTBLANK",
        "ORIGIN",
        "ORIGIN2",
        "OPEN",
        "OPEN30",
        "OPEN90",
        "SMALL",
        "NONE",
        "OBLIQUE",
        "ARCHTICK",
        "BOX",
        "BOXFILLED",
        "DATUM",
        "DATUMFILLED",
        "INTEGRAL",
    ];

    pub fn is_standard(name: &str) -> bool {
        STANDARD_ARROWS
            .iter()
            .any(|arrow| arrow.eq_ignore_ascii_case(name))
    }

    /// 箭头符号对应的块名。
    pub fn block_name(name: &str) -> String {
        format!("_{}", name.to_ascii_uppercase())
    }

    /// 合成箭头块的占位几何。尺寸按单位箭头长度缩放。
    pub fn synthesize(name: &str) -> Vec<Entity> {
        let canonical = name.to_ascii_uppercase();
        match canonical.as_str() {
            "DOT" | "DOTSMALL" | "DOTBLANK" | "ORIGIN" | "ORIGIN2" => {
                let radius = if canonical == "DOTSMALL" { 0.25 } else { 0.5 };
                vec![Entity::new(EntityKind::Circle(Circle {
                    center: Point2::new(0.0, 0.0),
                    radius,
                }))]
            }
            "OBLIQUE" | "ARCHTICK" | "INTEGRAL" => vec![Entity::new(EntityKind::Line(Line {
                start: Point2::new(-0.5, -0.5),
                end: Point2::new(0.5, 0.5),
            }))],
            "OPEN" | "OPEN30" | "OPEN90" => vec![
                Entity::new(EntityKind::Line(Line {
                    start: Point2::new(-1.0, 0.1667),
                    end: Point2::new(0.0, 0.0),
                })),
                Entity::new(EntityKind::Line(Line {
                    start: Point2::new(-1.0, -0.1667),
                    end: Point2::new(0.0, 0.0),
                })),
            ],
            "BOX" | "BOXFILLED" => vec![Entity::new(EntityKind::Solid(Solid {
                corners: [
                    Point2::new(-0.5, -0.5),
                    Point2::new(0.5, -0.5),
                    Point2::new(-0.5, 0.5),
                    Point2::new(0.5, 0.5),
                ],
            }))],
            "NONE" => Vec::new(),
            _ => vec![Entity::new(EntityKind::Solid(Solid {
                corners: [
                    Point2::new(-1.0, 0.1667),
                    Point2::new(0.0, 0.0),
                    Point2::new(-1.0, -0.1667),
                    Point2::new(0.0, 0.0),
                ],
            }))],
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn standard_arrow_lookup_ignores_case() {
            assert!(is_standard("open30"));
            assert!(is_standard("ArchTick"));
            assert!(!is_standard(""));
            assert!(!is_standard("MY_CUSTOM_ARROW"));
        }

        #[test]
        fn block_names_are_prefixed_and_uppercased() {
            assert_eq!(block_name("open30"), "_OPEN30");
            assert_eq!(block_name("DOT"), "_DOT");
        }
    }
}
