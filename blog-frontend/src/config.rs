use post_filter::{PublicationMode, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

/// 站点配置 - 由页面脚本传入
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// 文章索引地址
    #[serde(default = "default_posts_url")]
    pub posts_url: String,
    /// 备用文章索引地址，只在第一个地址失败后使用
    #[serde(default)]
    pub fallback_posts_url: Option<String>,
    /// 分类索引地址，设为 null 时不加载
    #[serde(default = "default_categories_url")]
    pub categories_url: Option<String>,
    /// 每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// 发布状态处理方式
    #[serde(default)]
    pub publication: PublicationMode,
}

impl SiteConfig {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// 每页条数，至少为1
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_url: default_posts_url(),
            fallback_posts_url: None,
            categories_url: default_categories_url(),
            page_size: default_page_size(),
            publication: PublicationMode::default(),
        }
    }
}

fn default_posts_url() -> String {
    "data/BlogData/posts.json".to_string()
}

fn default_categories_url() -> Option<String> {
    Some("data/BlogData/category.json".to_string())
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
