//! 日志输出
//!
//! 浏览器中写入 `console`，本地运行（测试和命令行工具）时写入标准错误。

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub fn emit(level: Level, message: &str) {
    let value = wasm_bindgen::JsValue::from_str(message);
    match level {
        Level::Info => web_sys::console::log_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Error => web_sys::console::error_1(&value),
    }
}

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
pub fn emit(level: Level, message: &str) {
    eprintln!("[{}] {}", level.label(), message);
}

/// 输出普通日志
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Info, &format!($($arg)*))
    };
}

/// 输出警告日志
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Warn, &format!($($arg)*))
    };
}

/// 输出错误日志
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Error, &format!($($arg)*))
    };
}
