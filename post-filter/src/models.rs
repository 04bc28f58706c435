use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use utils_common::models::{Post, TagId};

/// 当前选择的标签
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagSelection {
    /// 显示全部文章
    #[default]
    All,
    /// 只显示包含该标签的文章
    Tag(TagId),
    /// 无法转换为数字的标签值，不匹配任何文章
    Unmatched(String),
}

impl TagSelection {
    /// 解析用户选择的标签值
    pub fn parse(input: &str) -> Self {
        let value = input.trim();
        if value.eq_ignore_ascii_case("all") {
            return TagSelection::All;
        }

        if let Ok(id) = value.parse::<TagId>() {
            return TagSelection::Tag(id);
        }

        // "5.0" 这类整数值的浮点写法也视为数字
        match value.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => TagSelection::Tag(f as TagId),
            _ => TagSelection::Unmatched(value.to_string()),
        }
    }
}

impl fmt::Display for TagSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TagSelection::All => f.write_str("all"),
            TagSelection::Tag(id) => write!(f, "{}", id),
            TagSelection::Unmatched(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for TagSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 筛选状态 - 只由用户的筛选和翻页操作改变
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// 当前选择的标签
    pub selected: TagSelection,
    /// 当前页码（从0开始）
    pub current_page: usize,
}

/// 分页结果
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PageResult<'a> {
    /// 本页的文章
    pub items: Vec<&'a Post>,
    /// 到本页为止累计显示的文章数
    pub total_shown: usize,
    /// 筛选结果总数
    pub total: usize,
    /// 是否还有下一页
    pub has_more: bool,
}

/// 列表操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// 目录重新加载
    Reset,
    /// 选择标签
    SelectTag(TagSelection),
    /// 加载下一页
    NextPage,
}

/// 渲染方式
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// 清空已显示的内容后显示
    Replace,
    /// 追加到已显示的内容之后
    Append,
}

/// 列表更新 - 交给渲染层执行
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListUpdate<'a> {
    pub mode: RenderMode,
    #[serde(flatten)]
    pub page: PageResult<'a>,
}
