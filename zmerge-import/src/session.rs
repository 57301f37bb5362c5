use std::collections::{HashMap, HashSet};

use zmerge_core::entity::Entity;
use zmerge_core::handle::Handle;
use zmerge_core::tables::DimStyle;

/// 一次导入会话累积的全部可变状态，由 [`crate::Importer`] 独占
/// 持有：已发现但尚未满足的资源名称集合、待解析的块参照队列，
/// 以及块导入备忘（源块名 → 目标块名）。集合只增不减，队列在
/// 收尾阶段排空后可能被嵌套导入重新填充。
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) used_layers: HashSet<String>,
    pub(crate) used_linetypes: HashSet<String>,
    pub(crate) used_text_styles: HashSet<String>,
    pub(crate) used_dim_styles: HashSet<String>,
    pub(crate) used_arrows: HashSet<String>,
    pub(crate) pending_inserts: Vec<Handle>,
    pub(crate) imported_blocks: HashMap<String, String>,
}

impl SessionState {
    /// 记录实体引用的资源名。图层与线型无条件记录（带缺省回退），
    /// 文字样式与标注样式仅在实体类型支持该字段时记录。
    pub(crate) fn record_entity(&mut self, entity: &Entity) {
        self.used_layers.insert(entity.layer().to_string());
        self.used_linetypes.insert(entity.linetype().to_string());
        if let Some(style) = entity.text_style() {
            self.used_text_styles.insert(style.to_string());
        }
        if let Some(style) = entity.dimension_style() {
            self.used_dim_styles.insert(style.to_string());
        }
    }

    /// 标注样式传递性地引入更多需求：标注文字样式、延伸线线型
    /// 与四个箭头符号。收尾时标注样式必须先于其他表导入。
    pub(crate) fn record_dim_style(&mut self, style: &DimStyle) {
        self.used_text_styles.insert(
            style
                .text_style
                .clone()
                .unwrap_or_else(|| "Standard".to_string()),
        );
        for linetype in [&style.linetype, &style.ext1_linetype, &style.ext2_linetype] {
            self.used_linetypes
                .insert(linetype.clone().unwrap_or_else(|| "BYLAYER".to_string()));
        }
        for arrow in [
            &style.arrow_block,
            &style.arrow_block1,
            &style.arrow_block2,
            &style.leader_arrow_block,
        ] {
            self.used_arrows.insert(arrow.clone().unwrap_or_default());
        }
    }
}

/// 集合无序，排序后再导入，保证合并结果可复现。
pub(crate) fn sorted_names(set: &HashSet<String>) -> Vec<String> {
    let mut names: Vec<String> = set.iter().cloned().collect();
    names.sort();
    names
}
