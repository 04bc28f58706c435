use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::collections::HashMap;

/// 从原始 HTML 中提取的文章信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageSummary {
    /// `<title>` 文本
    pub title: Option<String>,
    /// `<meta name="description">` 内容
    pub description: Option<String>,
    /// 第一个 `<p>` 的文本
    pub first_paragraph: Option<String>,
    /// 所有 `<img src>`，按出现顺序
    pub image_sources: Vec<String>,
}

impl PageSummary {
    /// 摘要：优先使用 description，否则取第一段的前200个字符
    pub fn summary(&self) -> String {
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            return description.to_string();
        }

        self.first_paragraph
            .as_deref()
            .map(|p| p.chars().take(200).collect())
            .unwrap_or_default()
    }
}

fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .one(html.as_bytes())
}

/// 解析 HTML 并提取文章信息
pub fn summarize(html: &str) -> PageSummary {
    let dom = parse(html);

    let mut summary = PageSummary::default();
    visit(&dom.document, &mut summary);
    summary
}

// 深度优先遍历，只记录每种元素第一次出现的内容
fn visit(handle: &Handle, summary: &mut PageSummary) {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = handle.data
    {
        let attrs = attrs.borrow();
        let attr = |key: &str| {
            attrs
                .iter()
                .find(|a| &*a.name.local == key)
                .map(|a| a.value.to_string())
        };

        match &*name.local {
            "title" if summary.title.is_none() => {
                summary.title = non_empty(text_of(handle));
            }
            "meta" if summary.description.is_none() => {
                let is_description = attr("name")
                    .map(|n| n.eq_ignore_ascii_case("description"))
                    .unwrap_or(false);
                if is_description {
                    summary.description = attr("content").map(|c| c.trim().to_string());
                }
            }
            "p" if summary.first_paragraph.is_none() => {
                summary.first_paragraph = non_empty(text_of(handle));
            }
            "img" => {
                if let Some(src) = attr("src").filter(|s| !s.is_empty()) {
                    summary.image_sources.push(src);
                }
            }
            _ => {}
        }
    }

    for child in handle.children.borrow().iter() {
        visit(child, summary);
    }
}

// 节点下所有文本，连续空白合并为一个空格
fn text_of(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => {
            text.push_str(&contents.borrow());
            text.push(' ');
        }
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 改写 `<img src>`，只替换属性值与 `replacements` 中的键完全相同的图片
pub fn rewrite_image_sources(
    html: &str,
    replacements: &HashMap<String, String>,
) -> std::io::Result<String> {
    let dom = parse(html);
    rewrite_visit(&dom.document, replacements);

    let mut out = Vec::new();
    let document: SerializableHandle = dom.document.clone().into();
    serialize(&mut out, &document, SerializeOpts::default())?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn rewrite_visit(handle: &Handle, replacements: &HashMap<String, String>) {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = handle.data
    {
        if &*name.local == "img" {
            for attr in attrs.borrow_mut().iter_mut() {
                if &*attr.name.local != "src" {
                    continue;
                }
                if let Some(new_src) = replacements.get(&*attr.value) {
                    attr.value = StrTendril::from_slice(new_src);
                }
            }
        }
    }

    for child in handle.children.borrow().iter() {
        rewrite_visit(child, replacements);
    }
}

/// 是否为外部图片地址
pub fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("//")
}
