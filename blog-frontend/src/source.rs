use serde_json::Value;
use std::fmt;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response};

/// 传输层返回的原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP 状态码
    pub status: u16,
    /// 响应正文
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 网络传输能力
///
/// 每次调用只请求一次，并且必须绕过缓存。请求被拒绝（没有任何状态码）时返回错误信息。
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch_fresh(&self, url: &str) -> Result<TransportResponse, String>;
}

/// 数据加载错误
#[derive(Debug)]
pub enum LoadError {
    /// 服务器返回了非成功状态码
    Fetch { status: u16, url: String },

    /// 请求没有得到任何响应
    Network { url: String, message: String },

    /// 响应正文不是有效的 JSON
    Decode { url: String, cause: serde_json::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Fetch { status, url } => {
                write!(f, "请求 '{}' 失败，状态码 {}", url, status)
            }
            LoadError::Network { url, message } => {
                write!(f, "请求 '{}' 失败: {}", url, message)
            }
            LoadError::Decode { url, cause } => {
                write!(f, "解析 '{}' 失败: {}", url, cause)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Decode { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// 数据源 - 获取并解析 JSON 资源
///
/// 不重试；失败原样返回给调用方，由调用方决定是否改用备用地址。
pub struct DataSource<T> {
    transport: T,
}

impl<T: Transport> DataSource<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 加载并解析一个 JSON 资源
    pub async fn load(&self, url: &str) -> Result<Value, LoadError> {
        let response = self
            .transport
            .fetch_fresh(url)
            .await
            .map_err(|message| LoadError::Network {
                url: url.to_string(),
                message,
            })?;

        decode_response(url, response)
    }
}

/// 检查状态码并解析正文
pub fn decode_response(url: &str, response: TransportResponse) -> Result<Value, LoadError> {
    if !response.is_success() {
        return Err(LoadError::Fetch {
            status: response.status,
            url: url.to_string(),
        });
    }

    serde_json::from_str(&response.body).map_err(|cause| LoadError::Decode {
        url: url.to_string(),
        cause,
    })
}

/// 浏览器 `fetch` 传输
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn fetch_fresh(&self, url: &str) -> Result<TransportResponse, String> {
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_cache(RequestCache::NoStore);

        let request = Request::new_with_str_and_init(url, &init).map_err(describe_js_error)?;
        let window = web_sys::window().ok_or_else(|| "window 不可用".to_string())?;

        let promise: js_sys::Promise = window.fetch_with_request(&request);
        let response: Response = JsFuture::from(promise)
            .await
            .map_err(describe_js_error)?
            .dyn_into()
            .map_err(describe_js_error)?;

        let status = response.status();
        let text = JsFuture::from(response.text().map_err(describe_js_error)?)
            .await
            .map_err(describe_js_error)?;

        Ok(TransportResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn describe_js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
