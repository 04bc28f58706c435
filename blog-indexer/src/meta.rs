use crate::error::{Error, IoContext, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use utils_common::models::PostsMeta;

/// 读取 posts.json
///
/// 文件不存在时返回空索引；文件存在但无法读取或解析时返回错误，避免覆盖已有数据。
pub fn load_meta(path: &Path) -> Result<PostsMeta> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PostsMeta::default()),
        Err(err) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                err,
            })
        }
    };

    serde_json::from_str(&contents).map_err(|err| Error::Json {
        path: path.to_path_buf(),
        err,
    })
}

/// 写入 posts.json（两空格缩进，保留非 ASCII 字符）
pub fn save_meta(path: &Path, meta: &PostsMeta) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }

    let json = serde_json::to_string_pretty(meta).map_err(|err| Error::Json {
        path: path.to_path_buf(),
        err,
    })?;
    fs::write(path, json).at(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Map};
    use tempfile::tempdir;
    use utils_common::models::IndexedPost;

    #[test]
    fn test_missing_meta_is_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(load_meta(&dir.path().join("posts.json")).unwrap(), PostsMeta::default());
    }

    #[test]
    fn test_malformed_meta_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, "{ not json").unwrap();

        match load_meta(&path) {
            Err(Error::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data/BlogData/posts.json");
        let meta = PostsMeta {
            last_id: 1,
            posts: vec![IndexedPost {
                id: Some(1),
                title: Some("はじめまして".to_string()),
                path: Some("data/BlogData/1/index.html".to_string()),
                published: Some(true),
                ..IndexedPost::default()
            }],
            extra: Map::new(),
        };

        save_meta(&path, &meta).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"lastId\": 1"));
        assert!(written.contains("はじめまして"));
        assert_eq!(load_meta(&path).unwrap(), meta);
    }

    #[test]
    fn test_round_trip_keeps_irregular_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let original = json!({
            "lastId": 3,
            "posts": [
                { "id": 1, "title": "no path" },
                { "id": "3", "title": "string id", "cover": "c.png" }
            ]
        });
        fs::write(&path, original.to_string()).unwrap();

        let meta = load_meta(&path).unwrap();
        save_meta(&path, &meta).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["posts"].as_array().unwrap().len(), 2);
        assert_eq!(written["posts"][1]["cover"], "c.png");
        assert_eq!(written["posts"][1]["id"], 3);
    }
}
