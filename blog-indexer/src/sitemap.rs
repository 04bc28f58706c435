use crate::error::{IoContext, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use utils_common::escape_html;
use utils_common::models::{parse_date, IndexedPost, PostsMeta};

/// 站点地图中的一条地址
struct UrlEntry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

/// 生成站点地图 XML
///
/// 包含首页两条地址和所有未标记为未发布的文章，文章按日期从新到旧排列。
pub fn build_sitemap(meta: &PostsMeta, base_url: &str, today: NaiveDate) -> String {
    let base_url = normalize_base_url(base_url);
    let today = today.format("%Y-%m-%d").to_string();

    let mut entries = vec![
        UrlEntry {
            loc: base_url.clone(),
            lastmod: today.clone(),
            changefreq: "weekly",
            priority: "1.0",
        },
        UrlEntry {
            loc: format!("{}index.html", base_url),
            lastmod: today.clone(),
            changefreq: "weekly",
            priority: "1.0",
        },
    ];

    let mut posts: Vec<_> = published_posts(meta).collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    for post in posts {
        let Some(href) = post.href() else {
            continue;
        };
        let lastmod = post
            .date
            .as_deref()
            .and_then(parse_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| today.clone());
        entries.push(UrlEntry {
            loc: format!("{}{}", base_url, href),
            lastmod,
            changefreq: "monthly",
            priority: "0.8",
        });
    }

    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#.to_string(),
    ];
    for entry in &entries {
        lines.push("  <url>".to_string());
        lines.push(format!("    <loc>{}</loc>", escape_html(&entry.loc)));
        lines.push(format!("    <lastmod>{}</lastmod>", entry.lastmod));
        lines.push(format!("    <changefreq>{}</changefreq>", entry.changefreq));
        lines.push(format!("    <priority>{}</priority>", entry.priority));
        lines.push("  </url>".to_string());
    }
    lines.push("</urlset>".to_string());

    lines.join("\n") + "\n"
}

/// 写入站点地图，返回其中的文章数
pub fn write_sitemap(meta: &PostsMeta, base_url: &str, output: &Path) -> Result<usize> {
    let today = chrono::Local::now().date_naive();
    let xml = build_sitemap(meta, base_url, today);
    fs::write(output, xml).at(output)?;

    Ok(published_posts(meta).filter(|p| p.href().is_some()).count())
}

fn published_posts(meta: &PostsMeta) -> impl Iterator<Item = &IndexedPost> {
    meta.posts.iter().filter(|p| p.is_published())
}

fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}
