//! 测试辅助：内存传输

use crate::source::{Transport, TransportResponse};
use std::cell::RefCell;
use std::collections::HashMap;

/// 按地址返回固定响应的传输，未登记的地址视为网络错误
///
/// 每次请求先让出一次执行权，和真实的网络请求一样会挂起。
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, TransportResponse>,
    requests: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            TransportResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// 按顺序记录的请求地址
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for MockTransport {
    async fn fetch_fresh(&self, url: &str) -> Result<TransportResponse, String> {
        self.requests.borrow_mut().push(url.to_string());
        tokio::task::yield_now().await;
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| "connection refused".to_string())
    }
}
