use crate::error::{IoContext, Result};
use crate::html::{self, PageSummary};
use crate::meta::{load_meta, save_meta};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use utils_common::models::{IndexedPost, PostsMeta};
use walkdir::WalkDir;

/// 待处理目录中存放已处理内容的子目录
const ARCHIVE_DIR_NAME: &str = "processed";
/// 目录中优先使用的 HTML 文件
const PREFERRED_HTML: [&str; 3] = ["index.html", "home.html", "Home.html"];
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "svg", "bmp", "webp"];

/// 博客数据目录布局
pub struct BlogLayout {
    /// 站点根目录
    pub root: PathBuf,
}

impl BlogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn blog_dir(&self) -> PathBuf {
        self.root.join("data").join("BlogData")
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.blog_dir().join("RawData")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.raw_dir().join(ARCHIVE_DIR_NAME)
    }

    pub fn meta_file(&self) -> PathBuf {
        self.blog_dir().join("posts.json")
    }
}

/// 导入结果统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// 成功导入的文章ID
    pub processed: Vec<i64>,
    /// 找不到 HTML 而跳过的条目数
    pub skipped: usize,
}

/// 导入 RawData 目录下的所有原始文章，并更新 posts.json
pub fn ingest(layout: &BlogLayout, verbose: bool) -> Result<IngestReport> {
    let raw_dir = layout.raw_dir();
    let mut report = IngestReport::default();

    if !raw_dir.is_dir() {
        println!("原始文章目录不存在，无需处理: {}", raw_dir.display());
        return Ok(report);
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(&raw_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_name() != ARCHIVE_DIR_NAME {
            candidates.push(entry.into_path());
        }
    }

    if candidates.is_empty() {
        println!("没有待处理的原始文章。");
        return Ok(report);
    }

    let meta_file = layout.meta_file();
    let mut meta = load_meta(&meta_file)?;

    // 每篇文章先写入 posts.json 再归档，中途出错时已完成的文章不会丢失
    for item in candidates {
        match ingest_item(layout, &item, &mut meta, verbose)? {
            Some(id) => {
                save_meta(&meta_file, &meta)?;
                archive(layout, &item, id);
                println!("已处理 {} -> id={}", item.display(), id);
                report.processed.push(id);
            }
            None => {
                println!("未找到 HTML 文件，跳过 {}", item.display());
                report.skipped += 1;
            }
        }
    }

    if report.processed.is_empty() {
        println!("没有任何更改。");
    } else {
        println!("posts.json 已更新。");
    }

    Ok(report)
}

/// 导入一篇原始文章并加入索引，返回分配的ID；找不到 HTML 时返回 None
fn ingest_item(
    layout: &BlogLayout,
    item: &Path,
    meta: &mut PostsMeta,
    verbose: bool,
) -> Result<Option<i64>> {
    let Some(html_path) = find_html(item)? else {
        return Ok(None);
    };

    let html = fs::read_to_string(&html_path).at(&html_path)?;
    let page = html::summarize(&html);

    let id = meta.next_id();
    let post_dir = layout.blog_dir().join(id.to_string());
    let images_dir = post_dir.join("images");
    fs::create_dir_all(&images_dir).at(&images_dir)?;

    let rewritten = copy_images(&html, &page, &html_path, item, &images_dir, verbose)?;
    let index_path = post_dir.join("index.html");
    fs::write(&index_path, rewritten).at(&index_path)?;

    if item.is_dir() {
        copy_assets(item, &post_dir)?;
    }

    let title = page.title.clone().unwrap_or_else(|| {
        html_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let slug = match slug::slugify(&title) {
        s if s.is_empty() => id.to_string(),
        s => s,
    };

    meta.posts.push(IndexedPost {
        id: Some(id),
        title: Some(title),
        slug: Some(slug),
        date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        path: Some(format!("data/BlogData/{}/index.html", id)),
        summary: Some(page.summary()),
        tags: Some(Vec::new()),
        published: Some(true),
        extra: Default::default(),
    });
    meta.last_id = id;

    Ok(Some(id))
}

/// 查找条目中的 HTML 文件
///
/// 条目本身是 HTML 文件时直接使用；是目录时优先使用 index.html 等，否则取第一个 *.html。
pub fn find_html(item: &Path) -> Result<Option<PathBuf>> {
    if item.is_file() {
        return Ok(has_extension(item, &["html"]).then(|| item.to_path_buf()));
    }

    if !item.is_dir() {
        return Ok(None);
    }

    for name in PREFERRED_HTML {
        let candidate = item.join(name);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }

    for entry in WalkDir::new(item).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), &["html"]) {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

/// 复制文章引用的本地图片到 images 目录，并改写 HTML 中的地址
fn copy_images(
    html: &str,
    page: &PageSummary,
    html_path: &Path,
    item: &Path,
    images_dir: &Path,
    verbose: bool,
) -> Result<String> {
    let mut replacements = HashMap::new();
    let html_dir = html_path.parent().unwrap_or(Path::new("."));

    for src in &page.image_sources {
        if html::is_remote(src) {
            continue;
        }

        let source = [html_dir.join(src), item.join(src)]
            .into_iter()
            .find(|p| p.is_file());
        let Some(source) = source else {
            println!("找不到图片: {} (来自 {})，跳过", src, html_path.display());
            continue;
        };

        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = images_dir.join(file_name);
        fs::copy(&source, &target).at(&source)?;

        replacements.insert(src.clone(), format!("images/{}", file_name.to_string_lossy()));
        if verbose {
            println!("复制图片 {} -> {}", source.display(), target.display());
        }
    }

    if replacements.is_empty() {
        return Ok(html.to_string());
    }
    html::rewrite_image_sources(html, &replacements).at(html_path)
}

/// 复制目录中除 HTML 和图片以外的文件（例如样式表）
fn copy_assets(item: &Path, post_dir: &Path) -> Result<()> {
    for entry in WalkDir::new(item).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || has_extension(path, &["html"])
            || has_extension(path, &IMAGE_EXTENSIONS)
        {
            continue;
        }

        let target = post_dir.join(entry.file_name());
        fs::copy(path, &target).at(path)?;
    }
    Ok(())
}

/// 把已处理的原始条目移动到 processed 目录，失败时只输出警告
fn archive(layout: &BlogLayout, item: &Path, id: i64) {
    let archive_dir = layout.archive_dir();
    let name = item
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = if item.is_dir() {
        fs::create_dir_all(&archive_dir)
            .and_then(|_| fs::rename(item, archive_dir.join(format!("{}.processed.{}", name, id))))
    } else {
        let stem = item
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let moved_dir = archive_dir.join(stem);
        fs::create_dir_all(&moved_dir).and_then(|_| fs::rename(item, moved_dir.join(&name)))
    };

    if let Err(e) = result {
        eprintln!("警告: 无法移动已处理的条目 {}: {}", item.display(), e);
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}
