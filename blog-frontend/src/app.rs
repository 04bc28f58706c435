use crate::config::SiteConfig;
use crate::render::{self, RenderedList};
use crate::source::{DataSource, LoadError, Transport};
use post_filter::{reduce, tag_options, Catalog, FilterState, ListAction, TagOption, TagSelection};
use related_posts::RelatedQuery;
use serde_json::Value;
use utils_common::models::{CategoryMap, Post};
use utils_common::{console_error, console_log, console_warn};

/// 文章索引的加载结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// 加载成功，至少有一篇已发布文章
    Ready,
    /// 加载成功，但没有已发布文章
    Empty,
    /// 加载失败，不显示任何文章
    Failed(String),
}

/// 博客页面状态 - 目录、分类和当前筛选状态
///
/// 所有用户操作都通过这里的方法进行，每个方法都返回需要渲染的内容。
pub struct BlogApp {
    config: SiteConfig,
    catalog: Catalog,
    categories: CategoryMap,
    state: FilterState,
    status: LoadStatus,
}

impl BlogApp {
    /// 加载分类和文章索引
    ///
    /// 先加载分类，保证渲染标签名时分类映射已经就绪。分类加载失败只影响标签名称。
    /// 文章索引加载失败时尝试备用地址。
    pub async fn load<T: Transport>(source: &DataSource<T>, config: SiteConfig) -> Self {
        let categories = match &config.categories_url {
            Some(url) => match source.load(url).await {
                Ok(document) => CategoryMap::from_document(&document),
                Err(err) => {
                    console_warn!("分类索引加载失败，使用默认标签名: {}", err);
                    CategoryMap::default()
                }
            },
            None => CategoryMap::default(),
        };

        let posts = Self::load_posts(source, &config).await;
        match posts {
            Ok(document) => Self::from_parts(config, &document, categories),
            Err(err) => {
                console_error!("文章索引加载失败: {}", err);
                Self::failed(config, categories, err.to_string())
            }
        }
    }

    async fn load_posts<T: Transport>(
        source: &DataSource<T>,
        config: &SiteConfig,
    ) -> Result<Value, LoadError> {
        match source.load(&config.posts_url).await {
            Ok(document) => Ok(document),
            Err(err) => match &config.fallback_posts_url {
                Some(fallback) => {
                    console_warn!("{}，改用备用地址 {}", err, fallback);
                    source.load(fallback).await
                }
                None => Err(err),
            },
        }
    }

    /// 从已经获取的文档构建
    pub fn from_parts(config: SiteConfig, posts: &Value, categories: CategoryMap) -> Self {
        let catalog = Catalog::from_document(posts, config.publication);
        let status = if catalog.is_empty() {
            LoadStatus::Empty
        } else {
            LoadStatus::Ready
        };

        console_log!(
            "博客数据加载完成，文章: {}，分类: {}",
            catalog.len(),
            categories.len()
        );

        Self {
            catalog,
            categories,
            state: FilterState::default(),
            status,
            config,
        }
    }

    pub fn failed(config: SiteConfig, categories: CategoryMap, message: String) -> Self {
        Self {
            catalog: Catalog::empty(config.publication),
            categories,
            state: FilterState::default(),
            status: LoadStatus::Failed(message),
            config,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// 显示第一页，筛选条件回到 "all"
    pub fn reset(&mut self) -> RenderedList {
        self.dispatch(ListAction::Reset)
    }

    /// 选择标签
    pub fn select_tag(&mut self, raw: &str) -> RenderedList {
        self.dispatch(ListAction::SelectTag(TagSelection::parse(raw)))
    }

    /// 加载下一页
    pub fn request_next_page(&mut self) -> RenderedList {
        self.dispatch(ListAction::NextPage)
    }

    pub fn tag_options(&self) -> Vec<TagOption> {
        tag_options(&self.catalog, &self.categories)
    }

    /// 当前文章的相关文章
    pub fn related(&self, query: &RelatedQuery) -> Vec<&Post> {
        related_posts::rank(&self.catalog, query)
    }

    fn dispatch(&mut self, action: ListAction) -> RenderedList {
        let (state, update) = reduce(&self.catalog, &self.state, action, self.config.page_size());
        let rendered = render::render_list(&update, &self.categories, &self.status);
        self.state = state;
        rendered
    }
}
