use thiserror::Error;

use zmerge_core::error::DocumentError;

#[derive(Debug, Error)]
pub enum ImportError {
    /// 请求的块在源文档中不存在。
    #[error("source block {0:?} not found")]
    BlockNotFound(String),
    /// 请求的布局在源文档中不存在。
    #[error("source layout {0:?} not found")]
    LayoutNotFound(String),
    /// 调用方传入的目标空间不属于目标文档。
    #[error("target space does not belong to the target document: {0}")]
    ForeignSpace(String),
    /// 只支持 layers、linetypes、styles 与 dimstyles 四张表。
    #[error("table {0:?} import not supported")]
    UnsupportedTable(String),
    #[error("cannot import modelspace as a paperspace layout, use import_modelspace()")]
    ModelspaceImport,
    /// 实体类型不支持复制。批量导入时降级为跳过并记录日志。
    #[error("duplication of {0} entities is not supported")]
    NotCopyable(&'static str),
    #[error(transparent)]
    Document(#[from] DocumentError),
}
