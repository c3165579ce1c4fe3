//! 全局错误类型定义
use kolreview_engine::CoreError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum KolError {
    // 配置相关错误
    #[error("配置加载失败：{0}")]
    ConfigLoadError(String),

    // 审核内核错误
    #[error("审核内核错误：{0}")]
    EngineError(#[from] CoreError),

    // AI 改写相关错误
    #[error("AI改写调用失败：{0}")]
    RewriteError(String),
    #[error("AI改写未配置（缺少 GOOGLE_API_KEY）")]
    RewriteUnavailable,

    // 网络相关错误
    #[error("网络相关错误：{0}")]
    NetworkError(String),

    // 输入相关错误
    #[error("无效输入：{0}")]
    InvalidInput(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
}

// 全局Result类型
pub type KolResult<T> = Result<T, KolError>;
