use crate::app::LoadStatus;
use post_filter::{resolve_name, ListUpdate, RenderMode, TagOption};
use serde::Serialize;
use utils_common::escape_html;
use utils_common::models::{CategoryMap, Post};

/// 没有已发布文章时的提示
pub const NO_POSTS_MESSAGE: &str = "投稿が見つかりません。";
/// 文章索引加载失败时的提示
pub const LOAD_FAILED_MESSAGE: &str = "投稿一覧を読み込めませんでした。";
/// 没有相关文章时的提示
pub const NO_RELATED_MESSAGE: &str = "関連する投稿はありません。";
/// "全部" 选项的显示名称
pub const ALL_TAGS_LABEL: &str = "すべて";

/// 渲染后的列表片段
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RenderedList {
    /// 替换还是追加
    pub mode: RenderMode,
    /// 列表 HTML
    pub html: String,
    /// 分页信息文本
    pub info: String,
    /// 累计显示的文章数
    pub total_shown: usize,
    /// 筛选结果总数
    pub total: usize,
    /// 是否显示 "加载更多" 按钮
    pub has_more: bool,
}

/// 渲染列表更新
pub fn render_list(update: &ListUpdate, categories: &CategoryMap, status: &LoadStatus) -> RenderedList {
    if let LoadStatus::Failed(_) = status {
        return notice_list(LOAD_FAILED_MESSAGE);
    }

    let page = &update.page;
    if page.total == 0 && update.mode == RenderMode::Replace {
        return notice_list(NO_POSTS_MESSAGE);
    }

    let html = page
        .items
        .iter()
        .map(|post| render_post_item(post, categories))
        .collect::<Vec<_>>()
        .join("\n");

    RenderedList {
        mode: update.mode,
        html,
        info: pagination_info(page.total_shown, page.total),
        total_shown: page.total_shown,
        total: page.total,
        has_more: page.has_more,
    }
}

/// 单篇文章的列表项
pub fn render_post_item(post: &Post, categories: &CategoryMap) -> String {
    let id = post.id.map(|id| id.to_string()).unwrap_or_default();
    let tags = post
        .tags
        .iter()
        .map(|tag| resolve_name(*tag, categories))
        .collect::<Vec<_>>()
        .join(" ");

    let mut meta = format!("ID: {}", escape_html(&id));
    if !tags.is_empty() {
        meta.push_str(&format!(" | tags: {}", escape_html(&tags)));
    }

    format!(
        r#"<article class="blog-item">
  <h3 class="blog-item-title"><a href="{href}">{title}</a></h3>
  <div class="blog-item-meta small muted">{meta}</div>
  <p class="blog-item-summary">{summary}</p>
</article>"#,
        href = escape_html(&post.href()),
        title = escape_html(&post.title),
        meta = meta,
        summary = escape_html(&post.summary),
    )
}

/// 分页信息，例如 "表示中: 20 / 45"
pub fn pagination_info(total_shown: usize, total: usize) -> String {
    format!("表示中: {} / {}", total_shown, total)
}

pub fn render_notice(message: &str) -> String {
    format!(r#"<div class="muted">{}</div>"#, escape_html(message))
}

/// 标签筛选下拉框的选项
pub fn render_tag_options(options: &[TagOption]) -> String {
    let mut html = format!(r#"<option value="all">{}</option>"#, ALL_TAGS_LABEL);
    for option in options {
        html.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            option.id,
            escape_html(&option.name)
        ));
    }
    html
}

/// 相关文章列表
pub fn render_related(posts: &[&Post]) -> String {
    if posts.is_empty() {
        return render_notice(NO_RELATED_MESSAGE);
    }

    let items = posts
        .iter()
        .map(|post| {
            let date = post
                .timestamp
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            format!(
                r#"  <li class="related-item"><a href="{}">{}</a> <span class="small muted">{}</span></li>"#,
                escape_html(&post.href()),
                escape_html(&post.title),
                date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("<ul class=\"related-posts\">\n{}\n</ul>", items)
}

fn notice_list(message: &str) -> RenderedList {
    RenderedList {
        mode: RenderMode::Replace,
        html: render_notice(message),
        info: String::new(),
        total_shown: 0,
        total: 0,
        has_more: false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use utils_common::models::Category;

    fn categories() -> CategoryMap {
        CategoryMap::from_categories(vec![Category {
            id: 1,
            name: "Rust & WASM".to_string(),
        }])
    }

    #[test]
    fn test_post_item_escapes_and_resolves_tags() {
        let post = Post::from_value(&json!({
            "id": 5,
            "title": "<b>bold</b>",
            "summary": "a \"quote\"",
            "tags": [1, 2]
        }));

        let html = render_post_item(&post, &categories());
        assert!(html.contains(r#"<a href="data/BlogData/5/index.html">&lt;b&gt;bold&lt;/b&gt;</a>"#));
        assert!(html.contains("ID: 5 | tags: Rust &amp; WASM Tag 2"));
        assert!(html.contains("a &quot;quote&quot;"));
    }

    #[test]
    fn test_post_item_without_tags_has_no_tag_meta() {
        let post = Post::from_value(&json!({ "id": 5 }));
        let html = render_post_item(&post, &CategoryMap::default());
        assert!(html.contains(r#"<div class="blog-item-meta small muted">ID: 5</div>"#));
    }

    #[test]
    fn test_pagination_info() {
        assert_eq!(pagination_info(20, 45), "表示中: 20 / 45");
    }

    #[test]
    fn test_tag_options_start_with_all() {
        let options = vec![
            TagOption { id: 1, name: "Rust".to_string() },
            TagOption { id: 2, name: "Tag 2".to_string() },
        ];
        assert_eq!(
            render_tag_options(&options),
            r#"<option value="all">すべて</option><option value="1">Rust</option><option value="2">Tag 2</option>"#
        );
    }

    #[test]
    fn test_related_list() {
        let post = Post::from_value(&json!({
            "id": 2,
            "title": "Two",
            "path": "posts/two.html",
            "date": "2024-02-03T10:00:00Z"
        }));

        let html = render_related(&[&post]);
        assert!(html.contains(r#"<a href="posts/two.html">Two</a> <span class="small muted">2024-02-03</span>"#));
        assert_eq!(render_related(&[]), r#"<div class="muted">関連する投稿はありません。</div>"#);
    }
}
