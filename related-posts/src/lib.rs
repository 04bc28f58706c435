use chrono::{DateTime, Utc};
use post_filter::Catalog;
use utils_common::models::Post;

pub mod models;

pub use models::{RelatedQuery, RelatedRequest, ScoredPost, DEFAULT_MAX_RESULTS};

/// 每个共同标签的分数
const TAG_MATCH_SCORE: f64 = 10.0;
/// 日期接近度加分上限
const MAX_DATE_BONUS: f64 = 5.0;
/// 每隔多少天加分减少1
const DAYS_PER_BONUS_POINT: f64 = 30.0;

/// 计算相关文章，以当前时间为参考日期
pub fn rank<'a>(catalog: &'a Catalog, query: &RelatedQuery) -> Vec<&'a Post> {
    rank_at(catalog, query, Utc::now())
        .into_iter()
        .map(|scored| scored.post)
        .collect()
}

/// 以指定参考日期计算相关文章及分数
///
/// 有标签时按分数降序，分数相同按日期降序；没有标签时直接按日期降序。
/// 日期缺失或无法解析的文章视为最旧。
pub fn rank_at<'a>(
    catalog: &'a Catalog,
    query: &RelatedQuery,
    reference: DateTime<Utc>,
) -> Vec<ScoredPost<'a>> {
    let mut candidates: Vec<ScoredPost<'a>> = catalog
        .posts()
        .iter()
        .filter(|post| catalog.is_visible(post))
        .filter(|post| !is_excluded(post, &query.exclude_path))
        .map(|post| ScoredPost { post, score: 0.0 })
        .collect();

    if query.current_tags.is_empty() {
        candidates.sort_by(|a, b| b.post.timestamp.cmp(&a.post.timestamp));
    } else {
        for candidate in &mut candidates {
            candidate.score = score(query, candidate.post, reference);
        }

        // 先按分数，再按日期
        candidates.sort_by(|a, b| match b.score.total_cmp(&a.score) {
            std::cmp::Ordering::Equal => b.post.timestamp.cmp(&a.post.timestamp),
            other => other,
        });
    }

    candidates.truncate(query.max_results);
    candidates
}

/// 文章相关度分数
pub fn score(query: &RelatedQuery, post: &Post, reference: DateTime<Utc>) -> f64 {
    let overlap = query
        .current_tags
        .iter()
        .filter(|tag| post.has_tag(**tag))
        .count();

    TAG_MATCH_SCORE * overlap as f64 + date_bonus(post, reference)
}

/// 日期越接近参考日期加分越多，最多5分，150天以上不加分
pub fn date_bonus(post: &Post, reference: DateTime<Utc>) -> f64 {
    let Some(date) = post.timestamp else {
        return 0.0;
    };

    let days = (reference - date).num_seconds().abs() as f64 / 86_400.0;
    (MAX_DATE_BONUS - days / DAYS_PER_BONUS_POINT).max(0.0)
}

/// 文章路径等于当前路径，或者包含在当前路径中
fn is_excluded(post: &Post, exclude_path: &str) -> bool {
    let href = post.href();
    !href.is_empty() && exclude_path.contains(href.as_str())
}
