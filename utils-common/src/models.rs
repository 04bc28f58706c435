use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// 标签标识符
pub type TagId = i64;

/// 文章 - 从文章索引中读取的一条记录
///
/// 字段缺失或类型不对时不会报错，而是退化为默认值，
/// 这样单条坏记录不会影响整个列表。
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Post {
    /// 文章ID，缺失时为 None
    pub id: Option<i64>,
    /// 文章标题，缺失时为 "Post {id}"
    pub title: String,
    /// 文章摘要
    pub summary: String,
    /// 文章相对路径
    pub path: Option<String>,
    /// 原始日期字符串 (ISO-8601)
    pub date: Option<String>,
    /// 解析后的日期，无法解析时为 None
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
    /// 标签ID列表，保持原始顺序
    pub tags: Vec<TagId>,
    /// 原始 published 字段
    pub published: Option<bool>,
}

impl Post {
    /// 从任意 JSON 记录宽松地转换为文章
    pub fn from_value(record: &Value) -> Self {
        let id = record.get("id").and_then(coerce_int);

        let title = record
            .get("title")
            .and_then(non_empty_str)
            .map(str::to_string)
            .unwrap_or_else(|| match id {
                Some(id) => format!("Post {}", id),
                None => "Post".to_string(),
            });

        let summary = record
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let path = record
            .get("path")
            .and_then(non_empty_str)
            .map(str::to_string);

        let date = record
            .get("date")
            .and_then(Value::as_str)
            .map(str::to_string);
        let timestamp = date.as_deref().and_then(parse_date);

        // 标签不是数组时视为没有标签，无法转换为整数的元素直接丢弃
        let tags = match record.get("tags") {
            Some(Value::Array(items)) => items.iter().filter_map(coerce_int).collect(),
            _ => Vec::new(),
        };

        let published = record.get("published").and_then(Value::as_bool);

        Self {
            id,
            title,
            summary,
            path,
            date,
            timestamp,
            tags,
            published,
        }
    }

    /// 文章链接，没有 path 时使用默认的文章目录
    pub fn href(&self) -> String {
        match (&self.path, self.id) {
            (Some(path), _) => path.clone(),
            (None, Some(id)) => format!("data/BlogData/{}/index.html", id),
            (None, None) => String::new(),
        }
    }

    /// published 字段是否恰好为 true
    pub fn is_published(&self) -> bool {
        self.published == Some(true)
    }

    /// 是否包含指定标签
    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }
}

/// 分类 - 分类索引中的一条记录
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// 分类映射 - 标签ID到显示名称
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    names: HashMap<TagId, String>,
}

impl CategoryMap {
    /// 从分类索引文档 `{ "category": [...] }` 构建映射
    ///
    /// 文档格式不正确时返回空映射，格式不正确的单条记录被跳过。
    pub fn from_document(document: &Value) -> Self {
        let mut names = HashMap::new();

        if let Some(Value::Array(items)) = document.get("category") {
            for item in items {
                let id = item.get("id").and_then(coerce_int);
                let name = item.get("name").and_then(Value::as_str);
                if let (Some(id), Some(name)) = (id, name) {
                    names.insert(id, name.to_string());
                }
            }
        }

        Self { names }
    }

    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            names: categories.into_iter().map(|c| (c.id, c.name)).collect(),
        }
    }

    pub fn get(&self, id: TagId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// 文章索引文件 posts.json 的结构（离线工具读写）
///
/// 读取时尽量宽松：`lastId` 可以是数字字符串，未知字段原样保留在 `extra` 中，
/// 写回时不会丢失。`posts` 不是数组或其中有非对象元素时视为无法读取。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct PostsMeta {
    /// 最后分配的文章ID
    #[serde(rename = "lastId")]
    pub last_id: i64,
    /// 文章列表
    pub posts: Vec<IndexedPost>,
    /// 其他字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostsMeta {
    /// 下一个可用的文章ID
    ///
    /// 同时参考 `lastId` 和已有文章的最大ID，避免 `lastId` 落后时重复分配。
    pub fn next_id(&self) -> i64 {
        let max_id = self.posts.iter().filter_map(|p| p.id).max().unwrap_or(0);
        self.last_id.max(max_id) + 1
    }
}

impl TryFrom<Map<String, Value>> for PostsMeta {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let last_id = match map.remove("lastId") {
            None | Some(Value::Null) => 0,
            Some(value) => {
                coerce_int(&value).ok_or_else(|| format!("lastId 不是整数: {}", value))?
            }
        };

        let posts = match map.remove("posts") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(record) => Ok(IndexedPost::from(record)),
                    other => Err(format!("posts[{}] 不是对象: {}", i, other)),
                })
                .collect::<Result<_, _>>()?,
            Some(other) => return Err(format!("posts 不是数组: {}", other)),
        };

        Ok(Self {
            last_id,
            posts,
            extra: map,
        })
    }
}

/// posts.json 中的一条文章记录
///
/// 已知字段类型不符时不做转换，连同未知字段一起保留在 `extra` 中。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "Map<String, Value>")]
pub struct IndexedPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// 其他字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IndexedPost {
    /// 缺失 published 字段时视为已发布
    pub fn is_published(&self) -> bool {
        self.published != Some(false)
    }

    /// 文章链接，没有 path 时使用默认的文章目录
    pub fn href(&self) -> Option<String> {
        match (&self.path, self.id) {
            (Some(path), _) if !path.is_empty() => Some(path.clone()),
            (_, Some(id)) => Some(format!("data/BlogData/{}/index.html", id)),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for IndexedPost {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            id: take(&mut map, "id", coerce_int),
            title: take(&mut map, "title", owned_str),
            slug: take(&mut map, "slug", owned_str),
            date: take(&mut map, "date", owned_str),
            path: take(&mut map, "path", owned_str),
            summary: take(&mut map, "summary", owned_str),
            tags: take(&mut map, "tags", |value| match value {
                Value::Array(items) => items.iter().map(coerce_int).collect(),
                _ => None,
            }),
            published: take(&mut map, "published", Value::as_bool),
            extra: map,
        }
    }
}

// 转换成功才从 map 中取出，否则原值留在 map 中
fn take<T>(map: &mut Map<String, Value>, key: &str, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let converted = map.get(key).and_then(convert)?;
    map.remove(key);
    Some(converted)
}

fn owned_str(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// 解析 ISO-8601 日期
///
/// 支持完整的 RFC 3339 时间、无时区的日期时间（按 UTC 处理）以及纯日期。
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 将数字或数字字符串转换为整数
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
