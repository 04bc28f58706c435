pub mod escape;
pub mod log;
pub mod models;

// 重新导出常用类型和函数，方便直接使用
pub use escape::escape_html;
pub use models::{parse_date, CategoryMap, IndexedPost, Post, PostsMeta, TagId};
