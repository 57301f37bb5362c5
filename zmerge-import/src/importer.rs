use std::collections::HashMap;
use std::mem;

use tracing::{debug, error, warn};

use zmerge_core::arrows;
use zmerge_core::document::{Block, Document, Space};
use zmerge_core::entity::{Entity, EntityKind};
use zmerge_core::handle::Handle;
use zmerge_core::tables::{DimStyle, Layer, Linetype, Table, TableRecord, TextStyle};

use crate::error::ImportError;
use crate::session::{SessionState, sorted_names};
use crate::strip::{clean_copy, remove_dependencies};

/// 支持导入的四张表。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Layers,
    Linetypes,
    TextStyles,
    DimStyles,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Linetypes,
        TableKind::Layers,
        TableKind::TextStyles,
        TableKind::DimStyles,
    ];

    /// 按外部表名解析。未知表名是调用方错误。
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "layers" => Some(TableKind::Layers),
            "linetypes" => Some(TableKind::Linetypes),
            "styles" => Some(TableKind::TextStyles),
            "dimstyles" => Some(TableKind::DimStyles),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TableKind::Layers => "layers",
            TableKind::Linetypes => "linetypes",
            TableKind::TextStyles => "styles",
            TableKind::DimStyles => "dimstyles",
        }
    }
}

/// 表或表项的选择方式：全部，或显式名单。
#[derive(Debug, Clone)]
pub enum Selection {
    All,
    Names(Vec<String>),
}

impl Selection {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Names(names.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        if value == "*" {
            Selection::All
        } else {
            Selection::Names(vec![value.to_string()])
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// 保留实体上的扩展属性数据。缺省剥除。
    pub keep_xdata: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { keep_xdata: false }
    }
}

/// 一次导入会话：绑定只读源文档与可变目标文档。
///
/// 实体、表、块与布局导入可以任意穿插调用，期间资源需求与待
/// 解析的块参照在会话状态中累积；[`Importer::finalize`] 排空队列
/// 并补齐全部依赖，此后会话即可丢弃。
pub struct Importer<'a> {
    source: &'a Document,
    target: &'a mut Document,
    options: ImportOptions,
    state: SessionState,
    default_plot_style: Handle,
    default_material: Handle,
}

/// 类型专属后处理器。封闭集合：新实体类型必须在分派表中表态。
enum Handler {
    Insert,
    Polyline,
    Hatch,
    Viewport,
    Dimension,
    None,
}

impl<'a> Importer<'a> {
    pub fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self::with_options(source, target, ImportOptions::default())
    }

    pub fn with_options(
        source: &'a Document,
        target: &'a mut Document,
        options: ImportOptions,
    ) -> Self {
        // 目标文档的默认装饰对象在会话期间不会变化，构造时解析一次
        let default_plot_style = target.default_plot_style_handle();
        let default_material = target.default_material_handle();
        Self {
            source,
            target,
            options,
            state: SessionState::default(),
            default_plot_style,
            default_material,
        }
    }

    /// 已导入块的名称映射（源块名 → 目标块名）。
    pub fn imported_blocks(&self) -> &HashMap<String, String> {
        &self.state.imported_blocks
    }

    /// 尚未解析的块参照数量。
    pub fn pending_reference_count(&self) -> usize {
        self.state.pending_inserts.len()
    }

    // ------------------------------------------------------------------
    // 实体导入
    // ------------------------------------------------------------------

    /// 导入单个实体到目标布局，缺省为目标文档的模型空间。
    ///
    /// 不在白名单内的类型静默跳过；无法复制的类型跳过并记录日志。
    /// 传入不属于目标文档的空间是调用方错误。
    pub fn import_entity(
        &mut self,
        entity: &Entity,
        target_layout: Option<&Space>,
    ) -> Result<(), ImportError> {
        let space = self.resolve_target_space(target_layout)?;
        let mut pending = mem::take(&mut self.state.pending_inserts);
        let result = self.import_entity_with(entity, &space, &mut pending);
        self.state.pending_inserts.append(&mut pending);
        result
    }

    /// 批量导入实体。单个实体的跳过不会中断整批。
    pub fn import_entities<'e>(
        &mut self,
        entities: impl IntoIterator<Item = &'e Entity>,
        target_layout: Option<&Space>,
    ) -> Result<(), ImportError> {
        let space = self.resolve_target_space(target_layout)?;
        let mut pending = mem::take(&mut self.state.pending_inserts);
        let mut result = Ok(());
        for entity in entities {
            result = self.import_entity_with(entity, &space, &mut pending);
            if result.is_err() {
                break;
            }
        }
        self.state.pending_inserts.append(&mut pending);
        result
    }

    /// 导入源文档模型空间的全部实体。
    pub fn import_modelspace(&mut self, target_layout: Option<&Space>) -> Result<(), ImportError> {
        let source = self.source;
        let space = self.resolve_target_space(target_layout)?;
        let handles: Vec<Handle> = source.modelspace().entities.clone();
        let mut pending = mem::take(&mut self.state.pending_inserts);
        let mut result = Ok(());
        for handle in handles {
            if let Some(entity) = source.entity(handle) {
                result = self.import_entity_with(entity, &space, &mut pending);
                if result.is_err() {
                    break;
                }
            }
        }
        self.state.pending_inserts.append(&mut pending);
        result
    }

    fn resolve_target_space(&self, target_layout: Option<&Space>) -> Result<Space, ImportError> {
        match target_layout {
            Some(space) => {
                if self.target.contains_space(space) {
                    Ok(space.clone())
                } else {
                    Err(ImportError::ForeignSpace(space.to_string()))
                }
            }
            None => Ok(Space::layout(Document::MODEL_SPACE)),
        }
    }

    fn import_entity_with(
        &mut self,
        entity: &Entity,
        space: &Space,
        pending: &mut Vec<Handle>,
    ) -> Result<(), ImportError> {
        if !is_importable(&entity.kind) {
            debug!(kind = entity.kind_name(), "不支持导入的实体类型，跳过");
            return Ok(());
        }
        // 资源使用在任何改写之前，从原始实体上登记
        self.state.record_entity(entity);

        let mut copy = match clean_copy(entity, self.options.keep_xdata) {
            Ok(copy) => copy,
            Err(err) => {
                debug!(kind = entity.kind_name(), error = %err, "实体无法复制，跳过");
                return Ok(());
            }
        };
        // 指向目标文档内部对象的装饰句柄无法跨文档携带，丢弃后回落默认值
        copy.common.plot_style_handle = None;
        copy.common.material_handle = None;
        copy.common.visual_style_handle = None;

        let handle = self.target.add_entity(copy);
        self.target.attach(space, handle)?;
        self.post_process(handle, pending)
    }

    fn post_process(&mut self, handle: Handle, pending: &mut Vec<Handle>) -> Result<(), ImportError> {
        let handler = match self.target.entity(handle) {
            Some(entity) => handler_for(&entity.kind),
            None => Handler::None,
        };
        match handler {
            Handler::Insert => {
                self.strip_sub_entities(handle);
                pending.push(handle);
                Ok(())
            }
            Handler::Polyline => {
                self.strip_sub_entities(handle);
                Ok(())
            }
            Handler::Hatch => {
                // 关联的边界实体不会被导入，标志必须清除
                if let Some(entity) = self.target.entity_mut(handle) {
                    if let EntityKind::Hatch(hatch) = &mut entity.kind {
                        hatch.associative = false;
                    }
                }
                Ok(())
            }
            Handler::Viewport => {
                if let Some(entity) = self.target.entity_mut(handle) {
                    if let EntityKind::Viewport(viewport) = &mut entity.kind {
                        viewport.clear_document_links();
                    }
                }
                Ok(())
            }
            Handler::Dimension => self.post_process_dimension(handle),
            Handler::None => Ok(()),
        }
    }

    fn strip_sub_entities(&mut self, handle: Handle) {
        let keep_xdata = self.options.keep_xdata;
        if let Some(entity) = self.target.entity_mut(handle) {
            match &mut entity.kind {
                EntityKind::Insert(insert) => {
                    for attrib in &mut insert.attribs {
                        remove_dependencies(attrib, keep_xdata);
                    }
                }
                EntityKind::Polyline(polyline) => {
                    for vertex in &mut polyline.vertices {
                        remove_dependencies(vertex, keep_xdata);
                    }
                }
                _ => {}
            }
        }
    }

    /// 标注的匿名几何块导入。
    ///
    /// 几何块本身按缺省策略（冲突改名）导入；块内发现的块参照
    /// （箭头符号）则不改名解析，目标文档中已有的同名块直接复用。
    /// 整个过程使用独立的局部队列，与会话队列互不影响。
    fn post_process_dimension(&mut self, handle: Handle) -> Result<(), ImportError> {
        let geometry = match self.target.entity(handle) {
            Some(entity) => match &entity.kind {
                EntityKind::Dimension(dimension) => dimension.geometry.clone(),
                _ => return Ok(()),
            },
            None => return Ok(()),
        };
        let Some(block_name) = geometry else {
            error!("标注缺少必需的匿名几何块名称");
            return Ok(());
        };
        if self.source.block(&block_name).is_none() {
            error!(block = %block_name, "标注的匿名几何块在源文档中不存在");
            return Ok(());
        }

        let mut decoration = Vec::new();
        let resolved = self.import_block_with(&block_name, true, &mut decoration)?;
        if let Some(entity) = self.target.entity_mut(handle) {
            if let EntityKind::Dimension(dimension) = &mut entity.kind {
                dimension.geometry = Some(resolved);
            }
        }
        self.resolve_block_references(&mut decoration, false)
    }

    // ------------------------------------------------------------------
    // 块导入
    // ------------------------------------------------------------------

    /// 导入一个块定义，返回目标文档中的块名。
    ///
    /// 已导入过的块直接返回备忘中的映射。目标文档已有同名块时，
    /// `rename` 为真则探测空闲名（`name`、`name0`、`name1`……），
    /// 为假则把已有块视为等价并登记恒等映射。
    pub fn import_block(&mut self, name: &str, rename: bool) -> Result<String, ImportError> {
        let mut pending = mem::take(&mut self.state.pending_inserts);
        let result = self.import_block_with(name, rename, &mut pending);
        self.state.pending_inserts.append(&mut pending);
        result
    }

    /// 批量导入块定义。缺省不改名：已有同名块被复用。
    pub fn import_blocks<I, S>(&mut self, names: I, rename: bool) -> Result<(), ImportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.import_block(name.as_ref(), rename)?;
        }
        Ok(())
    }

    fn import_block_with(
        &mut self,
        name: &str,
        rename: bool,
        pending: &mut Vec<Handle>,
    ) -> Result<String, ImportError> {
        if let Some(mapped) = self.state.imported_blocks.get(name) {
            return Ok(mapped.clone());
        }
        let source = self.source;
        let Some(source_block) = source.block(name) else {
            return Err(ImportError::BlockNotFound(name.to_string()));
        };
        if self.target.has_block(name) && !rename {
            // 同名目标块视为等价；箭头等装饰块依赖这一约定
            self.state
                .imported_blocks
                .insert(name.to_string(), name.to_string());
            return Ok(name.to_string());
        }

        let new_name = free_name(name, |candidate| self.target.has_block(candidate));
        let mut block = Block::new(new_name.clone(), source_block.base_point);
        block.description = source_block.description.clone();
        block.flags = source_block.flags;
        block.xref_path = source_block.xref_path.clone();
        self.target.add_block(block)?;

        let space = Space::block(new_name.clone());
        for handle in source_block.entities.iter().copied() {
            if let Some(entity) = source.entity(handle) {
                self.import_entity_with(entity, &space, pending)?;
            }
        }
        self.state
            .imported_blocks
            .insert(name.to_string(), new_name.clone());
        Ok(new_name)
    }

    /// 不动点解析：排空队列里的块参照，重写其块名为目标文档中
    /// 解析后的名字。嵌套块导入会向队列追加新的参照，因此按批
    /// 快照迭代。备忘保证每个源块名最多导入一次，循环必然终止。
    fn resolve_block_references(
        &mut self,
        queue: &mut Vec<Handle>,
        rename: bool,
    ) -> Result<(), ImportError> {
        while !queue.is_empty() {
            let batch = mem::take(queue);
            for handle in batch {
                let name = match self.target.entity(handle) {
                    Some(entity) => match &entity.kind {
                        EntityKind::Insert(insert) => insert.name.clone(),
                        _ => continue,
                    },
                    None => continue,
                };
                let resolved = self.import_block_with(&name, rename, queue)?;
                if let Some(entity) = self.target.entity_mut(handle) {
                    if let EntityKind::Insert(insert) = &mut entity.kind {
                        insert.name = resolved;
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 表导入
    // ------------------------------------------------------------------

    /// 导入多张表。`Selection::All` 即四张支持表。
    pub fn import_tables(&mut self, tables: Selection, replace: bool) -> Result<(), ImportError> {
        match tables {
            Selection::All => {
                for kind in TableKind::ALL {
                    self.import_table_kind(kind, Selection::All, replace)?;
                }
                Ok(())
            }
            Selection::Names(names) => {
                for name in names {
                    self.import_table(&name, Selection::All, replace)?;
                }
                Ok(())
            }
        }
    }

    /// 导入指定表的表项。
    ///
    /// 源文档中缺失的表项仅告警跳过；目标文档已有同名表项时按
    /// `replace` 决定保留还是覆盖。
    pub fn import_table(
        &mut self,
        table: &str,
        entries: Selection,
        replace: bool,
    ) -> Result<(), ImportError> {
        let kind = TableKind::parse(table)
            .ok_or_else(|| ImportError::UnsupportedTable(table.to_string()))?;
        self.import_table_kind(kind, entries, replace)
    }

    fn import_table_kind(
        &mut self,
        kind: TableKind,
        entries: Selection,
        replace: bool,
    ) -> Result<(), ImportError> {
        match kind {
            TableKind::Layers => self.import_records(
                kind,
                layers_of,
                layers_of_mut,
                entries,
                replace,
                collect_layer_resources,
            ),
            TableKind::Linetypes => self.import_records(
                kind,
                linetypes_of,
                linetypes_of_mut,
                entries,
                replace,
                collect_nothing,
            ),
            TableKind::TextStyles => self.import_records(
                kind,
                text_styles_of,
                text_styles_of_mut,
                entries,
                replace,
                collect_nothing,
            ),
            TableKind::DimStyles => self.import_records(
                kind,
                dim_styles_of,
                dim_styles_of_mut,
                entries,
                replace,
                collect_dim_style_resources,
            ),
        }
    }

    fn import_records<R: TableRecord>(
        &mut self,
        kind: TableKind,
        table_of: fn(&Document) -> &Table<R>,
        table_of_mut: fn(&mut Document) -> &mut Table<R>,
        entries: Selection,
        replace: bool,
        collect_extra: fn(&R, &mut SessionState),
    ) -> Result<(), ImportError> {
        let source = self.source;
        let source_table = table_of(source);
        let names: Vec<String> = match entries {
            Selection::All => source_table.names().map(str::to_string).collect(),
            Selection::Names(names) => names,
        };
        for requested in names {
            let record = match source_table.get(&requested) {
                Ok(record) => record,
                Err(_) => {
                    warn!(table = kind.label(), entry = %requested, "源文档中找不到请求的表项");
                    continue;
                }
            };
            let name = record.name().to_string();
            if table_of(&*self.target).contains(&name) {
                if replace {
                    debug!(table = kind.label(), entry = %name, "替换目标文档中已有的表项");
                    table_of_mut(&mut *self.target).remove(&name)?;
                } else {
                    debug!(table = kind.label(), entry = %name, "保留目标文档中已有的表项，丢弃导入");
                    continue;
                }
            }
            collect_extra(record, &mut self.state);

            let mut copy = record.clone();
            copy.detach();
            copy.reset_decorative_handles(self.default_plot_style, self.default_material);
            copy.set_handle(self.target.next_handle());
            table_of_mut(&mut *self.target).add(copy)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 布局
    // ------------------------------------------------------------------

    /// 在目标文档中重建源布局的记录（不含实体）。
    ///
    /// 模型空间名直接返回目标文档现成的模型空间，绝不重建；其余
    /// 名称冲突时按整数后缀探测改名。布局记录上的文档内部句柄
    /// 字段不随重建携带。
    pub fn recreate_source_layout(&mut self, name: &str) -> Result<String, ImportError> {
        if name.eq_ignore_ascii_case(Document::MODEL_SPACE) {
            return Ok(self.target.modelspace().name.clone());
        }
        let source = self.source;
        let Some(source_layout) = source.layout(name) else {
            return Err(ImportError::LayoutNotFound(name.to_string()));
        };
        let target_name = free_name(name, |candidate| self.target.layout(candidate).is_some());
        let mut settings = source_layout.settings.clone();
        settings.clear_document_links();
        self.target.create_layout(&target_name, settings)?;
        Ok(target_name)
    }

    /// 重建并导入一个图纸空间布局，返回目标布局名。
    /// 模型空间必须走 [`Importer::import_modelspace`]。
    pub fn import_paperspace_layout(&mut self, name: &str) -> Result<String, ImportError> {
        if name.eq_ignore_ascii_case(Document::MODEL_SPACE) {
            return Err(ImportError::ModelspaceImport);
        }
        let source = self.source;
        let Some(source_layout) = source.layout(name) else {
            return Err(ImportError::LayoutNotFound(name.to_string()));
        };
        let handles: Vec<Handle> = source_layout.entities.clone();
        let target_name = self.recreate_source_layout(name)?;
        let space = Space::layout(target_name.clone());

        let mut pending = mem::take(&mut self.state.pending_inserts);
        let mut result = Ok(());
        for handle in handles {
            if let Some(entity) = source.entity(handle) {
                result = self.import_entity_with(entity, &space, &mut pending);
                if result.is_err() {
                    break;
                }
            }
        }
        self.state.pending_inserts.append(&mut pending);
        result.map(|_| target_name)
    }

    /// 按源文档的标签顺序导入全部图纸空间布局。
    pub fn import_paperspace_layouts(&mut self) -> Result<(), ImportError> {
        let source = self.source;
        for name in source.layout_names_in_tab_order() {
            if !name.eq_ignore_ascii_case(Document::MODEL_SPACE) {
                self.import_paperspace_layout(&name)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 收尾
    // ------------------------------------------------------------------

    /// 关闭当前积累的全部依赖。导入流程的最后一步；不调用则目标
    /// 文档可能缺表项、缺块定义。之后继续导入并再次收尾也可以，
    /// 每次调用只负责排空当时待处理的内容。
    pub fn finalize(&mut self) -> Result<(), ImportError> {
        let mut pending = mem::take(&mut self.state.pending_inserts);
        let result = self.run_finalize(&mut pending);
        self.state.pending_inserts.append(&mut pending);
        result
    }

    fn run_finalize(&mut self, pending: &mut Vec<Handle>) -> Result<(), ImportError> {
        self.resolve_block_references(pending, true)?;
        self.import_required_table_entries()?;
        self.create_missing_arrows()
    }

    /// 固定的依赖顺序：标注样式会追加文字样式、线型与箭头需求，
    /// 图层会追加线型需求，线型与文字样式不再扩张，必须最后。
    fn import_required_table_entries(&mut self) -> Result<(), ImportError> {
        let dim_styles = sorted_names(&self.state.used_dim_styles);
        if !dim_styles.is_empty() {
            self.import_table_kind(TableKind::DimStyles, Selection::Names(dim_styles), false)?;
        }
        let layers = sorted_names(&self.state.used_layers);
        if !layers.is_empty() {
            self.import_table_kind(TableKind::Layers, Selection::Names(layers), false)?;
        }
        let linetypes = sorted_names(&self.state.used_linetypes);
        if !linetypes.is_empty() {
            self.import_table_kind(TableKind::Linetypes, Selection::Names(linetypes), false)?;
        }
        let styles = sorted_names(&self.state.used_text_styles);
        if !styles.is_empty() {
            self.import_table_kind(TableKind::TextStyles, Selection::Names(styles), false)?;
        }
        Ok(())
    }

    /// 补齐标注样式引用而匿名几何块里未实际出现的箭头符号：
    /// 标准符号直接在目标文档中合成，非标准符号按不改名策略
    /// 导入为普通块。空名是默认终结符，无需任何块。
    fn create_missing_arrows(&mut self) -> Result<(), ImportError> {
        self.state.used_arrows.remove("");
        let mut decoration = Vec::new();
        for arrow in sorted_names(&self.state.used_arrows) {
            if arrows::is_standard(&arrow) {
                self.target.acquire_arrow(&arrow);
            } else {
                self.import_block_with(&arrow, false, &mut decoration)?;
            }
        }
        self.resolve_block_references(&mut decoration, false)
    }
}

/// 可导入类型白名单。穷举匹配：新增类型必须在这里表态，
/// 不会出现悄悄漏掉的分支。
fn is_importable(kind: &EntityKind) -> bool {
    match kind {
        EntityKind::Line(_)
        | EntityKind::Point(_)
        | EntityKind::Circle(_)
        | EntityKind::Arc(_)
        | EntityKind::Ellipse(_)
        | EntityKind::Text(_)
        | EntityKind::MText(_)
        | EntityKind::Solid(_)
        | EntityKind::Trace(_)
        | EntityKind::Face3d(_)
        | EntityKind::Shape(_)
        | EntityKind::Polyline(_)
        | EntityKind::LwPolyline(_)
        | EntityKind::Spline(_)
        | EntityKind::Attrib(_)
        | EntityKind::AttDef(_)
        | EntityKind::Insert(_)
        | EntityKind::Hatch(_)
        | EntityKind::Mesh(_)
        | EntityKind::XLine(_)
        | EntityKind::Ray(_)
        | EntityKind::Dimension(_)
        | EntityKind::Leader(_)
        | EntityKind::Viewport(_)
        | EntityKind::Proxy(_) => true,
        // VERTEX 只作为多段线子实体出现；IMAGE 与 WIPEOUT 依赖
        // 图形域之外的图像定义对象，不在导入范围内
        EntityKind::Vertex(_) | EntityKind::RasterImage(_) | EntityKind::Wipeout(_) => false,
    }
}

fn handler_for(kind: &EntityKind) -> Handler {
    match kind {
        EntityKind::Insert(_) => Handler::Insert,
        EntityKind::Polyline(_) => Handler::Polyline,
        EntityKind::Hatch(_) => Handler::Hatch,
        EntityKind::Viewport(_) => Handler::Viewport,
        EntityKind::Dimension(_) => Handler::Dimension,
        EntityKind::Line(_)
        | EntityKind::Point(_)
        | EntityKind::Circle(_)
        | EntityKind::Arc(_)
        | EntityKind::Ellipse(_)
        | EntityKind::Text(_)
        | EntityKind::MText(_)
        | EntityKind::Solid(_)
        | EntityKind::Trace(_)
        | EntityKind::Face3d(_)
        | EntityKind::Shape(_)
        | EntityKind::Vertex(_)
        | EntityKind::LwPolyline(_)
        | EntityKind::Spline(_)
        | EntityKind::Attrib(_)
        | EntityKind::AttDef(_)
        | EntityKind::Mesh(_)
        | EntityKind::XLine(_)
        | EntityKind::Ray(_)
        | EntityKind::Leader(_)
        | EntityKind::RasterImage(_)
        | EntityKind::Wipeout(_)
        | EntityKind::Proxy(_) => Handler::None,
    }
}

fn layers_of(doc: &Document) -> &Table<Layer> {
    &doc.layers
}

fn layers_of_mut(doc: &mut Document) -> &mut Table<Layer> {
    &mut doc.layers
}

fn linetypes_of(doc: &Document) -> &Table<Linetype> {
    &doc.linetypes
}

fn linetypes_of_mut(doc: &mut Document) -> &mut Table<Linetype> {
    &mut doc.linetypes
}

fn text_styles_of(doc: &Document) -> &Table<TextStyle> {
    &doc.text_styles
}

fn text_styles_of_mut(doc: &mut Document) -> &mut Table<TextStyle> {
    &mut doc.text_styles
}

fn dim_styles_of(doc: &Document) -> &Table<DimStyle> {
    &doc.dim_styles
}

fn dim_styles_of_mut(doc: &mut Document) -> &mut Table<DimStyle> {
    &mut doc.dim_styles
}

/// 图层导入追加线型需求。
fn collect_layer_resources(layer: &Layer, state: &mut SessionState) {
    state.used_linetypes.insert(layer.linetype.clone());
}

/// 标注样式导入追加文字样式、线型与箭头需求。
fn collect_dim_style_resources(style: &DimStyle, state: &mut SessionState) {
    state.record_dim_style(style);
}

fn collect_nothing<R>(_record: &R, _state: &mut SessionState) {}

/// 整数后缀探测：`base`、`base0`、`base1`……直到空闲。
/// 块与布局的改名共用同一方案。
fn free_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix = 0usize;
    loop {
        let candidate = format!("{base}{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_name_probes_integer_suffixes() {
        let taken = ["Door", "Door0"];
        let probe = |name: &str| taken.contains(&name);
        assert_eq!(free_name("Door", probe), "Door1");
        assert_eq!(free_name("Window", probe), "Window");
    }

    #[test]
    fn table_kind_parsing_is_closed() {
        assert_eq!(TableKind::parse("layers"), Some(TableKind::Layers));
        assert_eq!(TableKind::parse("styles"), Some(TableKind::TextStyles));
        assert_eq!(TableKind::parse("blocks"), None);
        assert_eq!(TableKind::parse("viewports"), None);
    }

    #[test]
    fn selection_from_str_distinguishes_wildcard() {
        assert!(matches!(Selection::from("*"), Selection::All));
        match Selection::from("layers") {
            Selection::Names(names) => assert_eq!(names, vec!["layers".to_string()]),
            Selection::All => panic!("expected explicit selection"),
        }
    }
}
