use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// 离线工具的错误类型
#[derive(Debug)]
pub enum Error {
    /// 读写文件或目录失败
    Io { path: PathBuf, err: std::io::Error },

    /// posts.json 无法解析或序列化
    Json { path: PathBuf, err: serde_json::Error },

    /// 遍历目录失败
    Walk(walkdir::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => write!(f, "'{}': {}", path.display(), err),
            Error::Json { path, err } => {
                write!(f, "'{}' 不是有效的文章索引: {}", path.display(), err)
            }
            Error::Walk(err) => write!(f, "遍历目录时出错: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { err, .. } => Some(err),
            Error::Json { err, .. } => Some(err),
            Error::Walk(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// 支持 `?` 运算符
    fn from(err: walkdir::Error) -> Error {
        Error::Walk(err)
    }
}

/// 为 I/O 错误附加路径
pub trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|err| Error::Io {
            path: path.into(),
            err,
        })
    }
}
