// Gemini REST 客户端（超时 + 重试 + 响应提取）
pub mod client;
// 人话改写提示词组装
pub mod prompt;

pub use client::{RetryPolicy, RewriteClient, RewriteOptions};
pub use prompt::build_rewrite_prompt;
