use zmerge_core::document::{Block, Document, LayoutSettings, Space};
use zmerge_core::entity::{
    Attrib, Dimension, DimensionKind, Entity, EntityKind, Hatch, HatchLoop, Insert, Leader, Line,
    PolylineVertex, Proxy, Solid, Vertex, Viewport, XData,
};
use zmerge_core::geometry::{Point2, Vector2};
use zmerge_core::handle::Handle;
use zmerge_core::tables::{DimStyle, Layer, Linetype, TextStyle};
use zmerge_import::{ImportError, ImportOptions, Importer, Selection};

fn line(layer: &str, linetype: &str) -> Entity {
    Entity::new(EntityKind::Line(Line {
        start: Point2::new(0.0, 0.0),
        end: Point2::new(1.0, 0.0),
    }))
    .with_layer(layer)
    .with_linetype(linetype)
}

fn insert_of(name: &str) -> Entity {
    Entity::new(EntityKind::Insert(Insert {
        name: name.to_string(),
        insert: Point2::new(0.0, 0.0),
        scale: Vector2::new(1.0, 1.0),
        rotation: 0.0,
        attribs: Vec::new(),
    }))
}

fn add_block_with_line(doc: &mut Document, name: &str) {
    doc.add_block(Block::new(name, Point2::new(0.0, 0.0)))
        .expect("创建块");
    let handle = doc.add_entity(line("0", "BYLAYER"));
    doc.attach(&Space::block(name), handle).expect("挂接实体");
}

fn add_block_with_insert(doc: &mut Document, name: &str, referenced: &str) {
    doc.add_block(Block::new(name, Point2::new(0.0, 0.0)))
        .expect("创建块");
    let handle = doc.add_entity(insert_of(referenced));
    doc.attach(&Space::block(name), handle).expect("挂接实体");
}

fn first_insert_name(doc: &Document, handles: &[Handle]) -> Option<String> {
    handles.iter().find_map(|handle| match doc.entity(*handle) {
        Some(entity) => match &entity.kind {
            EntityKind::Insert(insert) => Some(insert.name.clone()),
            _ => None,
        },
        None => None,
    })
}

#[test]
fn used_resources_exist_after_finalize() {
    let mut source = Document::new();
    source
        .linetypes
        .add(Linetype::new("DASHED").with_pattern([0.5, -0.25]))
        .expect("添加线型");
    source
        .layers
        .add(Layer::new("L1").with_linetype("DASHED"))
        .expect("添加图层");

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer
        .import_entity(&line("L1", "DASHED"), None)
        .expect("导入实体");
    importer.finalize().expect("收尾");

    assert!(target.layers.contains("L1"));
    assert!(target.linetypes.contains("DASHED"));
    assert_eq!(target.modelspace().entities.len(), 1);
}

#[test]
fn imported_layer_records_point_at_target_defaults() {
    let mut source = Document::new();
    source.layers.add(Layer::new("L1")).expect("添加图层");

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer
        .import_table("layers", Selection::names(["L1"]), false)
        .expect("导入表项");

    let layer = target.layers.get("L1").expect("目标图层");
    assert_eq!(
        layer.plot_style_handle,
        Some(target.default_plot_style_handle())
    );
    assert_eq!(
        layer.material_handle,
        Some(target.default_material_handle())
    );
    assert!(layer.handle.is_some());
    assert!(layer.owner.is_none());
}

#[test]
fn import_block_is_idempotent() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "Door");

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    let first = importer.import_block("Door", true).expect("首次导入");
    let second = importer.import_block("Door", true).expect("再次导入");

    assert_eq!(first, "Door");
    assert_eq!(second, "Door");
    assert_eq!(importer.imported_blocks().len(), 1);
    assert_eq!(
        target
            .blocks()
            .filter(|block| block.name.starts_with("Door"))
            .count(),
        1
    );
}

#[test]
fn colliding_block_names_probe_suffixes_deterministically() {
    let mut source_a = Document::new();
    add_block_with_line(&mut source_a, "Door");
    let mut source_b = Document::new();
    add_block_with_line(&mut source_b, "Door");

    let mut target = Document::new();
    target
        .add_block(Block::new("Door", Point2::new(0.0, 0.0)))
        .expect("预置块");

    {
        let mut importer = Importer::new(&source_a, &mut target);
        assert_eq!(importer.import_block("Door", true).expect("导入"), "Door0");
    }
    {
        let mut importer = Importer::new(&source_b, &mut target);
        assert_eq!(importer.import_block("Door", true).expect("导入"), "Door1");
    }
    assert!(target.has_block("Door0"));
    assert!(target.has_block("Door1"));
}

#[test]
fn same_named_blocks_are_reused_without_rename() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "Door");

    let mut target = Document::new();
    target
        .add_block(Block::new("Door", Point2::new(0.0, 0.0)))
        .expect("预置块");

    let mut importer = Importer::new(&source, &mut target);
    importer.import_blocks(["Door"], false).expect("导入");
    assert_eq!(
        importer.imported_blocks().get("Door"),
        Some(&"Door".to_string())
    );
    // 复用目标块，内容不被复制
    assert!(target.block("Door").expect("目标块").entities.is_empty());
}

#[test]
fn missing_source_block_is_an_error() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    assert!(matches!(
        importer.import_block("Ghost", true),
        Err(ImportError::BlockNotFound(name)) if name == "Ghost"
    ));
}

#[test]
fn nested_block_references_resolve_in_one_finalize() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "C");
    add_block_with_insert(&mut source, "B", "C");
    add_block_with_insert(&mut source, "A", "B");
    let top = source.add_entity(insert_of("A"));
    source
        .attach(&Space::layout(Document::MODEL_SPACE), top)
        .expect("挂接实体");

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer.import_modelspace(None).expect("导入模型空间");
    importer.finalize().expect("收尾");

    assert_eq!(importer.imported_blocks().len(), 3);
    assert_eq!(importer.pending_reference_count(), 0);
    assert!(target.has_block("A"));
    assert!(target.has_block("B"));
    assert!(target.has_block("C"));
    assert_eq!(
        first_insert_name(&target, target.modelspace().entities.as_slice()),
        Some("A".to_string())
    );
}

#[test]
fn nested_references_are_rewritten_to_renamed_blocks() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "B");
    add_block_with_insert(&mut source, "A", "B");
    let top = source.add_entity(insert_of("A"));
    source
        .attach(&Space::layout(Document::MODEL_SPACE), top)
        .expect("挂接实体");

    let mut target = Document::new();
    target
        .add_block(Block::new("B", Point2::new(0.0, 0.0)))
        .expect("预置冲突块");

    let mut importer = Importer::new(&source, &mut target);
    importer.import_modelspace(None).expect("导入模型空间");
    importer.finalize().expect("收尾");

    assert_eq!(
        importer.imported_blocks().get("B"),
        Some(&"B0".to_string())
    );
    assert!(target.has_block("B0"));
    let inner = target.block("A").expect("导入的块 A");
    assert_eq!(
        first_insert_name(&target, inner.entities.as_slice()),
        Some("B0".to_string())
    );
}

#[test]
fn dimension_geometry_reuses_existing_arrow_blocks() {
    let mut source = Document::new();
    source.acquire_arrow("DOT");
    source
        .add_block(Block::new("*D1", Point2::new(0.0, 0.0)))
        .expect("创建几何块");
    let tick = source.add_entity(Entity::new(EntityKind::Solid(Solid {
        corners: [
            Point2::new(0.0, 0.0),
            Point2::new(0.1, 0.0),
            Point2::new(0.0, 0.1),
            Point2::new(0.1, 0.1),
        ],
    })));
    let arrow_ref = source.add_entity(insert_of("_DOT"));
    source.attach(&Space::block("*D1"), tick).expect("挂接");
    source
        .attach(&Space::block("*D1"), arrow_ref)
        .expect("挂接");

    let dimension = Entity::new(EntityKind::Dimension(Dimension {
        kind: DimensionKind::Linear,
        definition_point: Point2::new(0.0, -1.0),
        text_midpoint: Point2::new(0.5, -1.2),
        geometry: Some("*D1".to_string()),
        dim_style: Some("Standard".to_string()),
        text: None,
        measurement: Some(1.0),
    }));

    let mut target = Document::new();
    target.acquire_arrow("DOT");

    let mut importer = Importer::new(&source, &mut target);
    importer.import_entity(&dimension, None).expect("导入标注");
    // 装饰块在局部队列里解析完毕，不进入会话队列
    assert_eq!(importer.pending_reference_count(), 0);
    importer.finalize().expect("收尾");

    assert!(target.has_block("*D1"));
    assert!(!target.has_block("_DOT0"));
    let geometry_block = target.block("*D1").expect("几何块");
    assert_eq!(geometry_block.entities.len(), 2);
    assert_eq!(
        first_insert_name(&target, geometry_block.entities.as_slice()),
        Some("_DOT".to_string())
    );
    let handle = target.modelspace().entities[0];
    match &target.entity(handle).expect("标注实体").kind {
        EntityKind::Dimension(dimension) => {
            assert_eq!(dimension.geometry.as_deref(), Some("*D1"));
        }
        other => panic!("期望标注实体，实际是 {other:?}"),
    }
}

#[test]
fn dimension_without_valid_geometry_is_non_fatal() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);

    let without_name = Entity::new(EntityKind::Dimension(Dimension {
        kind: DimensionKind::Linear,
        definition_point: Point2::new(0.0, 0.0),
        text_midpoint: Point2::new(0.0, 0.0),
        geometry: None,
        dim_style: None,
        text: None,
        measurement: None,
    }));
    importer
        .import_entity(&without_name, None)
        .expect("缺名非致命");

    let with_missing_block = Entity::new(EntityKind::Dimension(Dimension {
        kind: DimensionKind::Linear,
        definition_point: Point2::new(0.0, 0.0),
        text_midpoint: Point2::new(0.0, 0.0),
        geometry: Some("*MISSING".to_string()),
        dim_style: None,
        text: None,
        measurement: None,
    }));
    importer
        .import_entity(&with_missing_block, None)
        .expect("块缺失非致命");

    assert_eq!(target.entity_count(), 2);
    let handle = target.modelspace().entities[1];
    match &target.entity(handle).expect("标注实体").kind {
        EntityKind::Dimension(dimension) => {
            // 几何引用保持原样，留待调用方处理
            assert_eq!(dimension.geometry.as_deref(), Some("*MISSING"));
        }
        other => panic!("期望标注实体，实际是 {other:?}"),
    }
}

#[test]
fn table_import_respects_duplicate_policy() {
    let mut source = Document::new();
    source
        .linetypes
        .add(Linetype::new("DASHED").with_pattern([0.5, -0.25]))
        .expect("添加线型");

    let mut target = Document::new();
    target
        .linetypes
        .add(Linetype::new("DASHED"))
        .expect("预置线型");

    {
        let mut importer = Importer::new(&source, &mut target);
        importer
            .import_table("linetypes", Selection::names(["DASHED"]), false)
            .expect("skip 策略导入");
    }
    assert!(
        target
            .linetypes
            .get("DASHED")
            .expect("目标线型")
            .pattern
            .is_empty(),
        "skip 策略必须保留目标表项"
    );

    {
        let mut importer = Importer::new(&source, &mut target);
        importer
            .import_table("linetypes", Selection::names(["DASHED"]), true)
            .expect("replace 策略导入");
    }
    assert_eq!(
        target.linetypes.get("DASHED").expect("目标线型").pattern,
        vec![0.5, -0.25]
    );
}

#[test]
fn missing_table_entries_are_logged_not_fatal() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer
        .import_table("layers", Selection::names(["GHOST"]), false)
        .expect("缺失表项仅告警");
    assert!(!target.layers.contains("GHOST"));
}

#[test]
fn unsupported_table_kind_is_a_type_error() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    assert!(matches!(
        importer.import_table("blocks", Selection::All, false),
        Err(ImportError::UnsupportedTable(name)) if name == "blocks"
    ));
}

#[test]
fn modelspace_cannot_be_imported_as_paperspace() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    for name in ["Model", "MODEL", "model"] {
        assert!(matches!(
            importer.import_paperspace_layout(name),
            Err(ImportError::ModelspaceImport)
        ));
    }
}

#[test]
fn foreign_target_space_is_a_structural_error() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    let ghost = Space::layout("Ghost");
    assert!(matches!(
        importer.import_entity(&line("0", "BYLAYER"), Some(&ghost)),
        Err(ImportError::ForeignSpace(_))
    ));
}

#[test]
fn unsupported_entity_types_are_silent_noops() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    let vertex = Entity::new(EntityKind::Vertex(Vertex {
        location: Point2::new(0.0, 0.0),
        bulge: 0.0,
    }));
    importer.import_entity(&vertex, None).expect("静默跳过");
    assert_eq!(target.entity_count(), 0);
}

#[test]
fn uncopyable_entities_degrade_to_skip_inside_a_batch() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    let proxy = Entity::new(EntityKind::Proxy(Proxy {
        class_name: "AecWall".to_string(),
        graphics: vec![0xFF],
    }));
    let good = line("0", "BYLAYER");
    importer
        .import_entities([&proxy, &good], None)
        .expect("批量导入不中断");
    assert_eq!(target.entity_count(), 1);
}

#[test]
fn imported_entities_lose_cross_document_references() {
    let source = Document::new();
    let mut target = Document::new();

    let mut dirty = line("0", "BYLAYER");
    dirty.common.owner = Some(Handle::new(0xDEAD));
    dirty.common.reactors.push(Handle::new(0xBEEF));
    dirty.common.extension_dict = Some(Handle::new(0xCAFE));
    dirty.common.plot_style_handle = Some(Handle::new(0x91));
    dirty.common.material_handle = Some(Handle::new(0x92));
    dirty.common.visual_style_handle = Some(Handle::new(0x93));
    dirty.common.xdata.push(XData {
        app_id: "ACAD".to_string(),
        values: vec!["payload".to_string()],
    });

    let mut importer = Importer::new(&source, &mut target);
    importer.import_entity(&dirty, None).expect("导入实体");
    importer.finalize().expect("收尾");

    let handle = target.modelspace().entities[0];
    let imported = target.entity(handle).expect("导入的实体");
    assert_ne!(imported.common.owner, Some(Handle::new(0xDEAD)));
    assert_eq!(imported.common.owner, target.modelspace().handle);
    assert!(imported.common.reactors.is_empty());
    assert!(imported.common.extension_dict.is_none());
    assert!(imported.common.xdata.is_empty());
    assert!(imported.common.plot_style_handle.is_none());
    assert!(imported.common.material_handle.is_none());
    assert!(imported.common.visual_style_handle.is_none());
}

#[test]
fn xdata_can_be_retained_on_request() {
    let source = Document::new();
    let mut target = Document::new();

    let mut entity = line("0", "BYLAYER");
    entity.common.xdata.push(XData {
        app_id: "ACAD".to_string(),
        values: vec!["payload".to_string()],
    });

    let options = ImportOptions { keep_xdata: true };
    let mut importer = Importer::with_options(&source, &mut target, options);
    importer.import_entity(&entity, None).expect("导入实体");

    let handle = target.modelspace().entities[0];
    assert_eq!(
        target.entity(handle).expect("实体").common.xdata.len(),
        1
    );
}

#[test]
fn insert_attribs_are_stripped_and_reference_is_queued() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "Door");

    let mut attrib = Entity::new(EntityKind::Attrib(Attrib {
        tag: "NUM".to_string(),
        value: "D-01".to_string(),
        insert: Point2::new(0.0, 0.0),
        height: 0.2,
        style: None,
    }));
    attrib.common.owner = Some(Handle::new(0xDEAD));
    attrib.common.xdata.push(XData {
        app_id: "ACAD".to_string(),
        values: vec!["payload".to_string()],
    });
    let reference = Entity::new(EntityKind::Insert(Insert {
        name: "Door".to_string(),
        insert: Point2::new(2.0, 2.0),
        scale: Vector2::new(1.0, 1.0),
        rotation: 0.0,
        attribs: vec![attrib],
    }));

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer.import_entity(&reference, None).expect("导入块参照");
    assert_eq!(importer.pending_reference_count(), 1);
    importer.finalize().expect("收尾");
    assert_eq!(importer.pending_reference_count(), 0);

    let handle = target.modelspace().entities[0];
    match &target.entity(handle).expect("块参照").kind {
        EntityKind::Insert(insert) => {
            assert_eq!(insert.name, "Door");
            let attrib = &insert.attribs[0];
            assert!(attrib.common.owner.is_none());
            assert!(attrib.common.xdata.is_empty());
            assert!(attrib.common.handle.is_some());
        }
        other => panic!("期望块参照实体，实际是 {other:?}"),
    }
    assert!(target.has_block("Door"));
}

#[test]
fn hatch_and_viewport_lose_document_links() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);

    let hatch = Entity::new(EntityKind::Hatch(Hatch {
        pattern_name: "SOLID".to_string(),
        is_solid: true,
        associative: true,
        loops: vec![HatchLoop {
            vertices: vec![
                PolylineVertex::new(Point2::new(0.0, 0.0)),
                PolylineVertex::new(Point2::new(1.0, 0.0)),
                PolylineVertex::new(Point2::new(1.0, 1.0)),
            ],
            is_closed: true,
        }],
    }));
    let viewport = Entity::new(EntityKind::Viewport(Viewport {
        center: Point2::new(0.0, 0.0),
        width: 100.0,
        height: 50.0,
        view_center: Vector2::new(0.0, 0.0),
        view_height: 10.0,
        sun_handle: Some(Handle::new(0x51)),
        clipping_boundary_handle: Some(Handle::new(0x52)),
        ucs_handle: Some(Handle::new(0x53)),
        ucs_base_handle: Some(Handle::new(0x54)),
        background_handle: Some(Handle::new(0x55)),
        shade_plot_handle: Some(Handle::new(0x56)),
        ref_object_handles: [Some(Handle::new(0x57)); 4],
    }));
    importer.import_entities([&hatch, &viewport], None).expect("导入");

    let handles = target.modelspace().entities.clone();
    match &target.entity(handles[0]).expect("填充实体").kind {
        EntityKind::Hatch(hatch) => assert!(!hatch.associative),
        other => panic!("期望填充实体，实际是 {other:?}"),
    }
    match &target.entity(handles[1]).expect("视口实体").kind {
        EntityKind::Viewport(viewport) => {
            assert!(viewport.sun_handle.is_none());
            assert!(viewport.clipping_boundary_handle.is_none());
            assert!(viewport.ucs_handle.is_none());
            assert!(viewport.ucs_base_handle.is_none());
            assert!(viewport.background_handle.is_none());
            assert!(viewport.shade_plot_handle.is_none());
            assert!(viewport.ref_object_handles.iter().all(Option::is_none));
        }
        other => panic!("期望视口实体，实际是 {other:?}"),
    }
}

#[test]
fn dim_style_import_pulls_transitive_resources() {
    let mut source = Document::new();
    source.text_styles.add(TextStyle::new("NOTES")).expect("添加样式");
    source
        .linetypes
        .add(Linetype::new("CENTER").with_pattern([1.25, -0.25, 0.25, -0.25]))
        .expect("添加线型");
    let mut dim_style = DimStyle::new("DIM50");
    dim_style.text_style = Some("NOTES".to_string());
    dim_style.linetype = Some("CENTER".to_string());
    dim_style.arrow_block = Some("DOT".to_string());
    source.dim_styles.add(dim_style).expect("添加标注样式");

    let leader = Entity::new(EntityKind::Leader(Leader {
        vertices: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
        dim_style: Some("DIM50".to_string()),
        has_arrowhead: true,
    }));

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer.import_entity(&leader, None).expect("导入引线");
    importer.finalize().expect("收尾");

    assert!(target.dim_styles.contains("DIM50"));
    assert!(target.text_styles.contains("NOTES"));
    assert!(target.linetypes.contains("CENTER"));
    // 标准箭头直接在目标文档中合成
    assert!(target.has_block("_DOT"));
}

#[test]
fn custom_arrow_blocks_are_imported_without_rename() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "MY_ARROW");
    let mut dim_style = DimStyle::new("DIM60");
    dim_style.leader_arrow_block = Some("MY_ARROW".to_string());
    source.dim_styles.add(dim_style).expect("添加标注样式");

    let leader = Entity::new(EntityKind::Leader(Leader {
        vertices: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
        dim_style: Some("DIM60".to_string()),
        has_arrowhead: true,
    }));

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer.import_entity(&leader, None).expect("导入引线");
    importer.finalize().expect("收尾");

    assert!(target.has_block("MY_ARROW"));
    assert!(!target.has_block("MY_ARROW0"));
}

#[test]
fn paperspace_layouts_preserve_tab_order_and_rename_on_collision() {
    let mut source = Document::new();
    source
        .create_layout(
            "Sheet A",
            LayoutSettings {
                block_record_handle: Some(Handle::new(0xAA)),
                ..LayoutSettings::default()
            },
        )
        .expect("创建布局");
    source
        .create_layout("Sheet B", LayoutSettings::default())
        .expect("创建布局");
    for name in ["Sheet A", "Sheet B"] {
        let handle = source.add_entity(line("0", "BYLAYER"));
        source.attach(&Space::layout(name), handle).expect("挂接");
    }

    let mut target = Document::new();
    target
        .create_layout("Sheet A", LayoutSettings::default())
        .expect("预置布局");

    let mut importer = Importer::new(&source, &mut target);
    importer.import_paperspace_layouts().expect("导入布局");
    importer.finalize().expect("收尾");

    assert_eq!(
        target.layout_names_in_tab_order(),
        vec!["Model", "Sheet A", "Sheet A0", "Sheet B"]
    );
    let renamed = target.layout("Sheet A0").expect("改名布局");
    assert_eq!(renamed.entities.len(), 1);
    // 布局记录上的文档内部句柄不随重建携带
    assert!(renamed.settings.block_record_handle.is_none());
    assert_eq!(target.layout("Sheet B").expect("布局").entities.len(), 1);
}

#[test]
fn recreate_source_layout_returns_modelspace_for_model() {
    let source = Document::new();
    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    assert_eq!(
        importer.recreate_source_layout("model").expect("模型空间"),
        "Model"
    );
    assert!(matches!(
        importer.recreate_source_layout("Ghost"),
        Err(ImportError::LayoutNotFound(name)) if name == "Ghost"
    ));
}

#[test]
fn finalize_can_run_again_after_further_imports() {
    let mut source = Document::new();
    source.layers.add(Layer::new("L1")).expect("添加图层");
    source.layers.add(Layer::new("L2")).expect("添加图层");

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer
        .import_entity(&line("L1", "BYLAYER"), None)
        .expect("导入实体");
    importer.finalize().expect("首次收尾");
    importer
        .import_entity(&line("L2", "BYLAYER"), None)
        .expect("导入实体");
    importer.finalize().expect("再次收尾");

    assert!(target.layers.contains("L1"));
    assert!(target.layers.contains("L2"));
    assert_eq!(target.entity_count(), 2);
}

#[test]
fn merged_document_stays_serializable() {
    let mut source = Document::new();
    add_block_with_line(&mut source, "Door");
    let top = source.add_entity(insert_of("Door"));
    source
        .attach(&Space::layout(Document::MODEL_SPACE), top)
        .expect("挂接实体");

    let mut target = Document::new();
    let mut importer = Importer::new(&source, &mut target);
    importer.import_modelspace(None).expect("导入模型空间");
    importer.finalize().expect("收尾");

    let json = serde_json::to_string(&target).expect("目标文档可序列化");
    assert!(json.contains("Door"));
}
