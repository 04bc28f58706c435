use crate::catalog::Catalog;
use serde::Serialize;
use std::collections::BTreeSet;
use utils_common::models::{CategoryMap, TagId};

/// 标签选项 - 渲染筛选下拉框所需的数据
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TagOption {
    pub id: TagId,
    pub name: String,
}

/// 收集目录中出现过的所有标签，去重后按数值升序
pub fn collect_tags(catalog: &Catalog) -> Vec<TagId> {
    catalog
        .posts()
        .iter()
        .flat_map(|post| post.tags.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 标签显示名称，分类索引中没有时使用 "Tag {id}"
pub fn resolve_name(tag: TagId, categories: &CategoryMap) -> String {
    categories
        .get(tag)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Tag {}", tag))
}

pub fn tag_options(catalog: &Catalog, categories: &CategoryMap) -> Vec<TagOption> {
    collect_tags(catalog)
        .into_iter()
        .map(|id| TagOption {
            id,
            name: resolve_name(id, categories),
        })
        .collect()
}
