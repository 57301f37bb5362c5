//! 自包含的合并演示：在内存中构造一份源文档，覆盖引擎的全部
//! 导入面（实体、块、嵌套块参照、标注几何块、图纸空间布局），
//! 然后执行一次完整的导入会话。

use tracing::info;
use zmerge_config::ImportConfig;
use zmerge_core::document::{Block, Document, LayoutSettings, Space};
use zmerge_core::entity::{
    Arc, Attrib, Circle, Dimension, DimensionKind, Entity, EntityKind, Insert, Leader, Line, Solid,
    Text, Viewport,
};
use zmerge_core::geometry::{Point2, Vector2};
use zmerge_core::tables::{DimStyle, Layer, Linetype, TextStyle};
use zmerge_import::{ImportError, ImportOptions, Importer, Selection};

#[derive(Debug)]
pub struct MergeSummary {
    pub entities: usize,
    pub blocks: usize,
    pub layers: usize,
    pub linetypes: usize,
    pub text_styles: usize,
    pub dim_styles: usize,
    pub layouts: Vec<String>,
}

pub fn run(config: &ImportConfig) -> Result<MergeSummary, ImportError> {
    let source = build_source_document()?;
    let mut target = Document::new();
    // 目标文档里预置一个同名块，演示冲突改名
    target.add_block(Block::new("Door", Point2::new(0.0, 0.0)))?;
    // 标准箭头在目标文档中已存在时会被直接复用
    target.acquire_arrow("DOT");

    let options = ImportOptions {
        keep_xdata: config.keep_xdata,
    };
    let mut importer = Importer::with_options(&source, &mut target, options);
    importer.import_tables(Selection::All, config.replace_table_entries)?;
    importer.import_modelspace(None)?;
    importer.import_paperspace_layouts()?;
    let detail = importer.import_block("Detail", config.rename_blocks)?;
    info!(block = %detail, "显式导入块完成");
    importer.finalize()?;

    Ok(MergeSummary {
        entities: target.entity_count(),
        blocks: target.blocks().count(),
        layers: target.layers.len(),
        linetypes: target.linetypes.len(),
        text_styles: target.text_styles.len(),
        dim_styles: target.dim_styles.len(),
        layouts: target.layout_names_in_tab_order(),
    })
}

fn build_source_document() -> Result<Document, ImportError> {
    let mut doc = Document::new();

    doc.linetypes
        .add(Linetype::new("DASHED").with_pattern([0.5, -0.25]))?;
    doc.linetypes
        .add(Linetype::new("CENTER").with_pattern([1.25, -0.25, 0.25, -0.25]))?;
    doc.layers.add(Layer::new("WALLS").with_linetype("DASHED"))?;
    doc.layers.add(Layer::new("DIMS"))?;
    doc.text_styles.add(TextStyle::new("NOTES"))?;

    let mut dim_style = DimStyle::new("DIM100");
    dim_style.text_style = Some("NOTES".to_string());
    dim_style.linetype = Some("CENTER".to_string());
    dim_style.arrow_block = Some("DOT".to_string());
    doc.dim_styles.add(dim_style)?;

    // 可复用的门块，模型空间里通过块参照实例化
    doc.add_block(Block::new("Door", Point2::new(0.0, 0.0)))?;
    let panel = doc.add_entity(
        Entity::new(EntityKind::Line(Line {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(0.9, 0.0),
        }))
        .with_layer("WALLS"),
    );
    let swing = doc.add_entity(
        Entity::new(EntityKind::Arc(Arc {
            center: Point2::new(0.0, 0.0),
            radius: 0.9,
            start_angle: 0.0,
            end_angle: std::f64::consts::FRAC_PI_2,
        }))
        .with_layer("WALLS"),
    );
    doc.attach(&Space::block("Door"), panel)?;
    doc.attach(&Space::block("Door"), swing)?;

    // 未被引用的块，演示显式块导入
    doc.add_block(Block::new("Detail", Point2::new(0.0, 0.0)))?;
    let knob = doc.add_entity(Entity::new(EntityKind::Circle(Circle {
        center: Point2::new(0.0, 0.0),
        radius: 0.05,
    })));
    doc.attach(&Space::block("Detail"), knob)?;

    // 标注的匿名几何块：图形加一个标准箭头符号的块参照
    doc.acquire_arrow("DOT");
    doc.add_block(Block::new("*D1", Point2::new(0.0, 0.0)))?;
    let tick = doc.add_entity(
        Entity::new(EntityKind::Solid(Solid {
            corners: [
                Point2::new(0.0, 0.0),
                Point2::new(0.1, 0.0),
                Point2::new(0.0, 0.1),
                Point2::new(0.1, 0.1),
            ],
        }))
        .with_layer("DIMS"),
    );
    let arrow_ref = doc.add_entity(Entity::new(EntityKind::Insert(Insert {
        name: "_DOT".to_string(),
        insert: Point2::new(5.0, 0.0),
        scale: Vector2::new(1.0, 1.0),
        rotation: 0.0,
        attribs: Vec::new(),
    })));
    doc.attach(&Space::block("*D1"), tick)?;
    doc.attach(&Space::block("*D1"), arrow_ref)?;

    let model = Space::layout(Document::MODEL_SPACE);

    let wall = doc.add_entity(
        Entity::new(EntityKind::Line(Line {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(10.0, 0.0),
        }))
        .with_layer("WALLS")
        .with_linetype("DASHED"),
    );
    doc.attach(&model, wall)?;

    let label = doc.add_entity(
        Entity::new(EntityKind::Text(Text {
            insert: Point2::new(1.0, 1.0),
            content: "平面图".to_string(),
            height: 0.35,
            rotation: 0.0,
            style: Some("NOTES".to_string()),
        }))
        .with_layer("0"),
    );
    doc.attach(&model, label)?;

    let door_ref = doc.add_entity(
        Entity::new(EntityKind::Insert(Insert {
            name: "Door".to_string(),
            insert: Point2::new(4.0, 0.0),
            scale: Vector2::new(1.0, 1.0),
            rotation: 0.0,
            attribs: vec![Entity::new(EntityKind::Attrib(Attrib {
                tag: "NUM".to_string(),
                value: "D-01".to_string(),
                insert: Point2::new(4.0, -0.3),
                height: 0.2,
                style: Some("NOTES".to_string()),
            }))],
        }))
        .with_layer("WALLS"),
    );
    doc.attach(&model, door_ref)?;

    let dimension = doc.add_entity(
        Entity::new(EntityKind::Dimension(Dimension {
            kind: DimensionKind::Linear,
            definition_point: Point2::new(0.0, -1.0),
            text_midpoint: Point2::new(5.0, -1.2),
            geometry: Some("*D1".to_string()),
            dim_style: Some("DIM100".to_string()),
            text: None,
            measurement: Some(10.0),
        }))
        .with_layer("DIMS"),
    );
    doc.attach(&model, dimension)?;

    let callout = doc.add_entity(
        Entity::new(EntityKind::Leader(Leader {
            vertices: vec![Point2::new(4.5, 0.5), Point2::new(6.0, 1.5)],
            dim_style: Some("DIM100".to_string()),
            has_arrowhead: true,
        }))
        .with_layer("DIMS"),
    );
    doc.attach(&model, callout)?;

    doc.create_layout("Sheet 1", LayoutSettings::default())?;
    let viewport = doc.add_entity(Entity::new(EntityKind::Viewport(Viewport {
        center: Point2::new(148.5, 105.0),
        width: 297.0,
        height: 210.0,
        view_center: Vector2::new(5.0, 0.0),
        view_height: 12.0,
        sun_handle: None,
        clipping_boundary_handle: None,
        ucs_handle: None,
        ucs_base_handle: None,
        background_handle: None,
        shade_plot_handle: None,
        ref_object_handles: [None; 4],
    })));
    doc.attach(&Space::layout("Sheet 1"), viewport)?;

    Ok(doc)
}
