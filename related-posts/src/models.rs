use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utils_common::models::{Post, TagId};

/// 默认返回的相关文章数量
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// 相关文章查询 - 每次打开文章页时创建一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedQuery {
    /// 当前文章的标签
    pub current_tags: BTreeSet<TagId>,
    /// 当前文章路径，结果中排除该文章
    pub exclude_path: String,
    /// 最多返回的文章数
    pub max_results: usize,
}

impl RelatedQuery {
    pub fn new(current_tags: impl IntoIterator<Item = TagId>, exclude_path: impl Into<String>) -> Self {
        Self {
            current_tags: current_tags.into_iter().collect(),
            exclude_path: exclude_path.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// 相关文章请求 - 客户端传递的JSON参数
#[derive(Deserialize, Debug, Clone)]
pub struct RelatedRequest {
    /// 当前文章的标签
    #[serde(default)]
    pub current_tags: Vec<TagId>,
    /// 当前文章路径
    #[serde(default)]
    pub exclude_path: String,
    /// 最多返回的文章数
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl From<RelatedRequest> for RelatedQuery {
    fn from(req: RelatedRequest) -> Self {
        RelatedQuery::new(req.current_tags, req.exclude_path).with_max_results(req.max_results)
    }
}

/// 带分数的候选文章
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoredPost<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    /// 相关度分数，没有标签查询时为0
    pub score: f64,
}

/// 默认返回数量
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
