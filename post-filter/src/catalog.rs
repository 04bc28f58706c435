use serde::{Deserialize, Serialize};
use serde_json::Value;
use utils_common::console_log;
use utils_common::models::Post;

/// 发布状态处理方式
///
/// 不同版本的文章索引对 `published` 字段的约定不同，由调用方显式选择。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublicationMode {
    /// 只保留 `published` 恰好为 true 的文章
    #[default]
    RequireFlag,
    /// 索引不带 `published` 字段，除明确标记为 false 的文章外都视为已发布
    AllPublished,
}

impl PublicationMode {
    pub fn is_visible(self, post: &Post) -> bool {
        match self {
            PublicationMode::RequireFlag => post.is_published(),
            PublicationMode::AllPublished => post.published != Some(false),
        }
    }
}

/// 文章目录 - 已筛选发布状态、按ID降序排列的文章列表
///
/// 构建完成后不可变，重新加载时整体替换。
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    posts: Vec<Post>,
    mode: PublicationMode,
}

impl Catalog {
    /// 创建空目录
    pub fn empty(mode: PublicationMode) -> Self {
        Self {
            posts: Vec::new(),
            mode,
        }
    }

    /// 从文章索引文档构建目录
    ///
    /// 接受 `{ "posts": [...] }` 或直接的数组；其他格式得到空目录。
    pub fn from_document(document: &Value, mode: PublicationMode) -> Self {
        let records: &[Value] = match document {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map.get("posts") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        };

        let mut builder = CatalogBuilder::new(mode);
        for record in records {
            builder.add_record(record);
        }
        builder.build()
    }

    /// 所有文章，按ID降序
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// 文章在当前发布模式下是否可见
    pub fn is_visible(&self, post: &Post) -> bool {
        self.mode.is_visible(post)
    }
}

/// 目录构建器
pub struct CatalogBuilder {
    posts: Vec<Post>,
    mode: PublicationMode,
    skipped: usize,
}

impl CatalogBuilder {
    /// 创建新的目录构建器
    pub fn new(mode: PublicationMode) -> Self {
        Self {
            posts: Vec::new(),
            mode,
            skipped: 0,
        }
    }

    /// 添加一条原始记录，未发布的记录被丢弃
    pub fn add_record(&mut self, record: &Value) {
        self.add_post(Post::from_value(record));
    }

    /// 添加一篇文章，未发布的文章被丢弃
    pub fn add_post(&mut self, post: Post) {
        if self.mode.is_visible(&post) {
            self.posts.push(post);
        } else {
            self.skipped += 1;
        }
    }

    /// 构建目录
    pub fn build(self) -> Catalog {
        let mut posts = self.posts;

        // 稳定排序：ID相同的文章保持原有顺序，缺少ID的排在最后
        posts.sort_by(|a, b| b.id.cmp(&a.id));

        console_log!(
            "文章目录构建完成，保留 {} 篇，跳过未发布 {} 篇",
            posts.len(),
            self.skipped
        );

        Catalog {
            posts,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn ids(catalog: &Catalog) -> Vec<Option<i64>> {
        catalog.posts().iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_build_keeps_published_sorted_desc() {
        let catalog = Catalog::from_document(
            &json!({
                "posts": [
                    { "id": 3, "published": true, "tags": [1] },
                    { "id": 1, "published": false },
                    { "id": 2, "published": true, "tags": [1, 2] }
                ]
            }),
            PublicationMode::RequireFlag,
        );

        assert_eq!(ids(&catalog), vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_absent_published_is_hidden_when_flag_required() {
        let catalog = Catalog::from_document(
            &json!({ "posts": [ { "id": 1 }, { "id": 2, "published": true } ] }),
            PublicationMode::RequireFlag,
        );
        assert_eq!(ids(&catalog), vec![Some(2)]);
    }

    #[test]
    fn test_all_published_mode_keeps_unflagged_posts() {
        let catalog = Catalog::from_document(
            &json!({ "posts": [ { "id": 1 }, { "id": 5, "published": false }, { "id": 3, "published": true } ] }),
            PublicationMode::AllPublished,
        );
        assert_eq!(ids(&catalog), vec![Some(3), Some(1)]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_ids() {
        let catalog = Catalog::from_document(
            &json!([
                { "id": 2, "title": "first", "published": true },
                { "id": 9, "published": true },
                { "id": 2, "title": "second", "published": true },
                { "id": 2, "title": "third", "published": true }
            ]),
            PublicationMode::RequireFlag,
        );

        let titles: Vec<&str> = catalog.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Post 9", "first", "second", "third"]);

        let ids: Vec<i64> = catalog.posts().iter().filter_map(|p| p.id).collect();
        assert!(ids.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_missing_id_sorts_last() {
        let catalog = Catalog::from_document(
            &json!([
                { "title": "no id", "published": true },
                { "id": 1, "published": true }
            ]),
            PublicationMode::RequireFlag,
        );
        assert_eq!(ids(&catalog), vec![Some(1), None]);
    }

    #[test]
    fn test_malformed_documents_give_empty_catalog() {
        for document in [json!({}), json!(null), json!("posts"), json!({ "posts": 3 })] {
            let catalog = Catalog::from_document(&document, PublicationMode::RequireFlag);
            assert!(catalog.is_empty());
        }
    }

    #[test]
    fn test_bad_record_does_not_abort_build() {
        let catalog = Catalog::from_document(
            &json!({ "posts": [ 42, "junk", { "id": 1, "published": true, "tags": {} } ] }),
            PublicationMode::RequireFlag,
        );
        assert_eq!(catalog.len(), 1);
        assert!(catalog.posts()[0].tags.is_empty());
    }
}
