use utils_common::models::Post;

// 导出模块
pub mod catalog;
pub mod models;
pub mod tags;

pub use catalog::{Catalog, CatalogBuilder, PublicationMode};
pub use models::{FilterState, ListAction, ListUpdate, PageResult, RenderMode, TagSelection};
pub use tags::{collect_tags, resolve_name, tag_options, TagOption};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// 筛选结果 - 目录的只读视图
#[derive(Debug, Clone, PartialEq)]
pub enum FilteredPosts<'a> {
    /// 选择 "all" 时直接引用整个目录
    All(&'a [Post]),
    /// 包含所选标签的文章
    Matching(Vec<&'a Post>),
}

impl<'a> FilteredPosts<'a> {
    pub fn len(&self) -> usize {
        match self {
            FilteredPosts::All(posts) => posts.len(),
            FilteredPosts::Matching(posts) => posts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取出 `[start, end)` 区间的文章，超出部分被截掉
    pub fn range(&self, start: usize, end: usize) -> Vec<&'a Post> {
        let end = end.min(self.len());
        if start >= end {
            return Vec::new();
        }

        match self {
            FilteredPosts::All(posts) => {
                let posts: &'a [Post] = *posts;
                posts[start..end].iter().collect()
            }
            FilteredPosts::Matching(posts) => posts[start..end].to_vec(),
        }
    }

    pub fn to_vec(&self) -> Vec<&'a Post> {
        self.range(0, self.len())
    }
}

/// 按标签筛选文章
pub fn apply_filter<'a>(catalog: &'a Catalog, selection: &TagSelection) -> FilteredPosts<'a> {
    match selection {
        TagSelection::All => FilteredPosts::All(catalog.posts()),
        TagSelection::Tag(tag) => FilteredPosts::Matching(
            catalog
                .posts()
                .iter()
                .filter(|post| post.has_tag(*tag))
                .collect(),
        ),
        TagSelection::Unmatched(_) => FilteredPosts::Matching(Vec::new()),
    }
}

/// 取出指定页的文章
pub fn render_page<'a>(
    filtered: &FilteredPosts<'a>,
    page: usize,
    page_size: usize,
) -> PageResult<'a> {
    let page_size = page_size.max(1);
    let total = filtered.len();
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size);

    PageResult {
        items: filtered.range(start, end),
        total_shown: end.min(total),
        total,
        has_more: end < total,
    }
}

/// 列表状态归约
///
/// 选择标签或重新加载时回到第0页并替换显示内容；翻页时追加下一页。
/// 已经没有更多文章时翻页不会改变状态。
pub fn reduce<'a>(
    catalog: &'a Catalog,
    state: &FilterState,
    action: ListAction,
    page_size: usize,
) -> (FilterState, ListUpdate<'a>) {
    match action {
        ListAction::Reset => replace_with(catalog, TagSelection::All, page_size),
        ListAction::SelectTag(selection) => replace_with(catalog, selection, page_size),
        ListAction::NextPage => {
            let filtered = apply_filter(catalog, &state.selected);
            let current = render_page(&filtered, state.current_page, page_size);

            if !current.has_more {
                let update = ListUpdate {
                    mode: RenderMode::Append,
                    page: PageResult {
                        items: Vec::new(),
                        ..current
                    },
                };
                return (state.clone(), update);
            }

            let next_state = FilterState {
                selected: state.selected.clone(),
                current_page: state.current_page + 1,
            };
            let page = render_page(&filtered, next_state.current_page, page_size);

            (
                next_state,
                ListUpdate {
                    mode: RenderMode::Append,
                    page,
                },
            )
        }
    }
}

fn replace_with(
    catalog: &Catalog,
    selection: TagSelection,
    page_size: usize,
) -> (FilterState, ListUpdate<'_>) {
    let filtered = apply_filter(catalog, &selection);
    let page = render_page(&filtered, 0, page_size);

    (
        FilterState {
            selected: selection,
            current_page: 0,
        },
        ListUpdate {
            mode: RenderMode::Replace,
            page,
        },
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    fn scenario_catalog() -> Catalog {
        Catalog::from_document(
            &json!({
                "posts": [
                    { "id": 3, "published": true, "tags": [1] },
                    { "id": 1, "published": false },
                    { "id": 2, "published": true, "tags": [1, 2] }
                ]
            }),
            PublicationMode::RequireFlag,
        )
    }

    fn numbered_catalog(count: i64) -> Catalog {
        let posts: Vec<Value> = (1..=count)
            .map(|id| json!({ "id": id, "published": true, "tags": [id % 3] }))
            .collect();
        Catalog::from_document(&json!({ "posts": posts }), PublicationMode::RequireFlag)
    }

    fn ids(posts: &[&Post]) -> Vec<i64> {
        posts.iter().filter_map(|p| p.id).collect()
    }

    #[test]
    fn test_scenario_filter_by_tag() {
        let catalog = scenario_catalog();
        assert_eq!(collect_tags(&catalog), vec![1, 2]);

        let filtered = apply_filter(&catalog, &TagSelection::Tag(2));
        assert_eq!(ids(&filtered.to_vec()), vec![2]);
    }

    #[test]
    fn test_filter_all_is_identity() {
        let catalog = numbered_catalog(7);
        let filtered = apply_filter(&catalog, &TagSelection::All);

        match &filtered {
            FilteredPosts::All(posts) => assert!(std::ptr::eq(*posts, catalog.posts())),
            other => panic!("expected aliased catalog, got {:?}", other),
        }
        assert_eq!(ids(&filtered.to_vec()), vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_filter_by_tag_is_complete_without_duplicates() {
        let catalog = Catalog::from_document(
            &json!({
                "posts": [
                    { "id": 1, "published": true, "tags": [4, 4] },
                    { "id": 2, "published": true, "tags": [5] },
                    { "id": 3, "published": true, "tags": [5, 4] },
                    { "id": 4, "published": false, "tags": [4] }
                ]
            }),
            PublicationMode::RequireFlag,
        );

        for tag in [4, 5, 6] {
            let filtered = apply_filter(&catalog, &TagSelection::Tag(tag)).to_vec();
            assert!(filtered.iter().all(|p| p.has_tag(tag)));

            let expected: Vec<i64> = catalog
                .posts()
                .iter()
                .filter(|p| p.has_tag(tag))
                .filter_map(|p| p.id)
                .collect();
            assert_eq!(ids(&filtered), expected);
        }
    }

    #[test]
    fn test_unparsable_tag_gives_empty_result() {
        let catalog = scenario_catalog();
        let selection = TagSelection::parse("rust");
        assert_eq!(selection, TagSelection::Unmatched("rust".to_string()));
        assert!(apply_filter(&catalog, &selection).is_empty());
    }

    #[test]
    fn test_tag_selection_parse() {
        assert_eq!(TagSelection::parse("all"), TagSelection::All);
        assert_eq!(TagSelection::parse(" ALL "), TagSelection::All);
        assert_eq!(TagSelection::parse("12"), TagSelection::Tag(12));
        assert_eq!(TagSelection::parse("12.0"), TagSelection::Tag(12));
        assert_eq!(TagSelection::parse("12.5"), TagSelection::Unmatched("12.5".to_string()));
        assert_eq!(TagSelection::Tag(3).to_string(), "3");
    }

    #[test]
    fn test_render_page_on_empty_catalog() {
        let catalog = Catalog::from_document(&json!({}), PublicationMode::RequireFlag);
        let page = render_page(&apply_filter(&catalog, &TagSelection::All), 0, DEFAULT_PAGE_SIZE);

        assert!(page.items.is_empty());
        assert_eq!(page.total_shown, 0);
        assert!(!page.has_more);
    }

    #[test]
    fn test_render_page_slices() {
        let catalog = numbered_catalog(45);
        let filtered = apply_filter(&catalog, &TagSelection::All);

        let first = render_page(&filtered, 0, 20);
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.total_shown, 20);
        assert!(first.has_more);

        let last = render_page(&filtered, 2, 20);
        assert_eq!(ids(&last.items), vec![5, 4, 3, 2, 1]);
        assert_eq!(last.total_shown, 45);
        assert!(!last.has_more);

        let beyond = render_page(&filtered, 3, 20);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_shown, 45);
        assert!(!beyond.has_more);
    }

    #[test]
    fn test_render_page_exact_multiple_has_no_more() {
        let catalog = numbered_catalog(40);
        let filtered = apply_filter(&catalog, &TagSelection::All);
        assert!(!render_page(&filtered, 1, 20).has_more);
    }

    #[test]
    fn test_pages_are_contiguous_and_disjoint() {
        let catalog = numbered_catalog(23);
        let filtered = apply_filter(&catalog, &TagSelection::All);
        let all = filtered.to_vec();

        for page_size in [1, 4, 5, 23, 30] {
            let mut shown: Vec<&Post> = Vec::new();
            for page in 0..4 {
                let result = render_page(&filtered, page, page_size);
                shown.extend(result.items.iter().copied());

                let expected_len = ((page + 1) * page_size).min(all.len());
                assert_eq!(ids(&shown), ids(&all[..expected_len]));
                assert_eq!(result.total_shown, expected_len);
                assert_eq!(result.has_more, expected_len < all.len());
            }
        }
    }

    #[test]
    fn test_reduce_select_then_next_page() {
        let catalog = numbered_catalog(30);
        let state = FilterState::default();

        // 标签 1 的文章: 1, 4, 7, ..., 28 共10篇
        let (state, update) = reduce(&catalog, &state, ListAction::SelectTag(TagSelection::Tag(1)), 4);
        assert_eq!(update.mode, RenderMode::Replace);
        assert_eq!(ids(&update.page.items), vec![28, 25, 22, 19]);
        assert_eq!(state.current_page, 0);

        let (state, update) = reduce(&catalog, &state, ListAction::NextPage, 4);
        assert_eq!(update.mode, RenderMode::Append);
        assert_eq!(ids(&update.page.items), vec![16, 13, 10, 7]);
        assert_eq!(update.page.total_shown, 8);
        assert_eq!(state.current_page, 1);

        let (state, update) = reduce(&catalog, &state, ListAction::NextPage, 4);
        assert_eq!(ids(&update.page.items), vec![4, 1]);
        assert!(!update.page.has_more);
        assert_eq!(state.current_page, 2);

        // 没有更多时状态不变
        let (after, update) = reduce(&catalog, &state, ListAction::NextPage, 4);
        assert_eq!(after, state);
        assert!(update.page.items.is_empty());
        assert_eq!(update.page.total_shown, 10);
    }

    #[test]
    fn test_reduce_select_resets_page() {
        let catalog = numbered_catalog(50);
        let state = FilterState {
            selected: TagSelection::All,
            current_page: 2,
        };

        let (state, update) = reduce(&catalog, &state, ListAction::SelectTag(TagSelection::Tag(2)), 20);
        assert_eq!(state.current_page, 0);
        assert_eq!(update.mode, RenderMode::Replace);

        let (state, update) = reduce(&catalog, &state, ListAction::Reset, 20);
        assert_eq!(state, FilterState::default());
        assert_eq!(update.page.total, 50);
        assert_eq!(update.page.items.len(), 20);
    }

    #[test]
    fn test_list_update_serializes_flat() {
        let catalog = scenario_catalog();
        let (_, update) = reduce(&catalog, &FilterState::default(), ListAction::Reset, 20);
        let value = serde_json::to_value(&update).unwrap();

        assert_eq!(value["mode"], "replace");
        assert_eq!(value["total_shown"], 2);
        assert_eq!(value["has_more"], false);
        assert_eq!(value["items"][0]["id"], 3);
    }
}
