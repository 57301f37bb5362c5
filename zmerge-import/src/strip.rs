use zmerge_core::entity::{Entity, EntityKind};

use crate::error::ImportError;

/// 复制实体并切断与原文档的全部关联：句柄、所有者、反应器、
/// 扩展字典与应用数据无条件清除，扩展属性数据按需保留。
/// 代理实体的载荷绑定在原文档上，无法复制。
pub fn clean_copy(entity: &Entity, keep_xdata: bool) -> Result<Entity, ImportError> {
    if matches!(entity.kind, EntityKind::Proxy(_)) {
        return Err(ImportError::NotCopyable(entity.kind_name()));
    }
    let mut copy = entity.clone();
    copy.common.handle = None;
    remove_dependencies(&mut copy, keep_xdata);
    Ok(copy)
}

/// 就地剥除跨文档回引。子实体（块参照的属性、多段线的顶点）
/// 不经过普通导入路径，需要单独走这里。
pub fn remove_dependencies(entity: &mut Entity, keep_xdata: bool) {
    entity.common.owner = None;
    entity.common.reactors.clear();
    entity.common.extension_dict = None;
    entity.common.app_data.clear();
    if !keep_xdata {
        entity.common.xdata.clear();
    }
}
