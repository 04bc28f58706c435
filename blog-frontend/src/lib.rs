use wasm_bindgen::prelude::*;
use serde::Serialize;
use related_posts::{RelatedQuery, RelatedRequest};

// 导出模块
pub mod app;
pub mod config;
pub mod render;
pub mod source;

#[cfg(test)]
mod testing;

pub use app::{BlogApp, LoadStatus};
pub use config::SiteConfig;
pub use source::{BrowserTransport, DataSource, LoadError, Transport, TransportResponse};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 博客列表JS接口 - 提供给列表页使用
#[wasm_bindgen]
pub struct BlogListJS {
    app: BlogApp,
}

/// 加载分类和文章索引，返回列表页对象
///
/// 加载失败不会抛出异常，列表会显示加载失败的提示。
#[wasm_bindgen]
pub async fn load_blog_list(config: JsValue) -> Result<BlogListJS, JsValue> {
    let config = parse_config(config)?;
    let source = DataSource::new(BrowserTransport);
    let app = BlogApp::load(&source, config).await;
    Ok(BlogListJS { app })
}

#[wasm_bindgen]
impl BlogListJS {
    /// 第一页（替换显示内容）
    #[wasm_bindgen]
    pub fn initial(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.app.reset())
    }

    /// 选择标签，"all" 表示全部
    #[wasm_bindgen]
    pub fn select_tag(&mut self, tag: &str) -> Result<JsValue, JsValue> {
        to_js(&self.app.select_tag(tag))
    }

    /// 加载下一页（追加到已显示内容之后）
    #[wasm_bindgen]
    pub fn request_next_page(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.app.request_next_page())
    }

    /// 标签列表
    #[wasm_bindgen]
    pub fn tag_options(&self) -> Result<JsValue, JsValue> {
        to_js(&self.app.tag_options())
    }

    /// 标签下拉框 HTML
    #[wasm_bindgen]
    pub fn tag_options_html(&self) -> String {
        render::render_tag_options(&self.app.tag_options())
    }
}

/// 相关文章HTML - 文章页使用
///
/// `request` 格式: `{ current_tags: [1, 2], exclude_path: "...", max_results: 5 }`
#[wasm_bindgen]
pub async fn load_related(config: JsValue, request: JsValue) -> Result<String, JsValue> {
    let config = parse_config(config)?;
    let request: RelatedRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("解析相关文章请求失败: {}", e)))?;

    let source = DataSource::new(BrowserTransport);
    let app = BlogApp::load(&source, config).await;
    if let LoadStatus::Failed(message) = app.status() {
        return Err(JsValue::from_str(message));
    }

    let query = RelatedQuery::from(request);
    Ok(render::render_related(&app.related(&query)))
}

/// 解析配置，未传入时使用默认配置
fn parse_config(config: JsValue) -> Result<SiteConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(SiteConfig::default());
    }

    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("解析配置失败: {}", e)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}
