//! 跨文档导入引擎。
//!
//! 把一份图纸文档中的图形实体、块定义与图纸空间布局合并进另一份
//! 文档，并保证合并结束后目标文档自洽：实体引用的图层、线型、
//! 文字样式与标注样式都有对应表项，块参照都指向目标文档中真实
//! 存在的块定义，且任何导入实体不再携带指回源文档的引用。
//!
//! 扩展字典、应用数据与扩展属性数据在复制时剥除，因此导入结果
//! 不承诺与源文档在视觉上完全一致，但几何内容保持不变，目标
//! 文档始终有效。
//!
//! 使用方式：任意穿插调用实体、表、块与布局导入；最后必须调用
//! 一次 [`Importer::finalize`]，否则待解析的块参照与表项需求不会
//! 被关闭。

pub mod error;
pub mod importer;
mod session;
mod strip;

pub use error::ImportError;
pub use importer::{ImportOptions, Importer, Selection, TableKind};
