//! AI 改写 REST 客户端
//! 核心特性：
//! 1. 纯异步设计（基于tokio异步运行时，无block_on）
//! 2. 可配置重试策略（Never/Times(n)，固定1秒间隔）
//! 3. 有界超时：请求级 timeout，超时/传输失败返回错误值而不是panic
//! 4. 输入永不被修改：调用失败后改写前的内容快照原样可用，可重试或跳过

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use kolreview_engine::RuleConfig;

use super::prompt::build_rewrite_prompt;
use crate::error::{KolError, KolResult};

/// 重试策略
#[derive(Debug, Clone, Copy)]
pub enum RetryPolicy {
    Never,     // 不重试
    Times(u8), // 固定次数重试（不含第一次）
}

/// 改写服务选项
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// API 根地址（须以 / 结尾）
    pub endpoint: Url,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            endpoint: Url::parse("https://generativelanguage.googleapis.com/v1beta/")
                .expect("default endpoint is a valid URL"),
            model: "gemini-2.0-flash".to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::Never,
        }
    }
}

// ===================== 请求/响应结构 =====================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

impl GenerateContentResponse {
    /// 取第一个候选的文本
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
    }
}

/// 从 .env 文件内容里解析 GOOGLE_API_KEY 行
fn read_env_key(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.trim().strip_prefix("GOOGLE_API_KEY=") {
            let key = rest.trim();
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
    }
    None
}

/// 解析 API Key：环境变量优先，其次 .env 文件
async fn resolve_api_key(env_file: &Path) -> Option<String> {
    if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
        if !key.is_empty() {
            return Some(key);
        }
    }
    match tokio::fs::read_to_string(env_file).await {
        Ok(text) => read_env_key(&text),
        Err(_) => None,
    }
}

/// AI 改写客户端
#[derive(Debug, Clone)]
pub struct RewriteClient {
    http: reqwest::Client,
    options: RewriteOptions,
    api_key: String,
}

impl RewriteClient {
    /// 用显式 API Key 构建客户端
    pub fn with_api_key(api_key: impl Into<String>, options: RewriteOptions) -> KolResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| KolError::NetworkError(format!("HTTP客户端构建失败：{e}")))?;
        Ok(Self {
            http,
            options,
            api_key: api_key.into(),
        })
    }

    /// 从环境解析 Key 构建客户端；未配置时返回 RewriteUnavailable，
    /// 调用方据此走「跳过 AI」路径
    pub async fn from_env(options: RewriteOptions) -> KolResult<Self> {
        let key = resolve_api_key(Path::new(".env"))
            .await
            .ok_or(KolError::RewriteUnavailable)?;
        Self::with_api_key(key, options)
    }

    /// 改写整篇正文：组装提示词 → 调用服务 → 提取首个候选文本。
    /// 按重试策略重试，所有尝试失败后返回最后一次错误
    pub async fn rewrite_body(&self, body: &str, config: &RuleConfig) -> KolResult<String> {
        let prompt = build_rewrite_prompt(body, config);
        let max_retries = match self.options.retry {
            RetryPolicy::Never => 0,
            RetryPolicy::Times(n) => n as usize,
        };

        let mut last_err: Option<KolError> = None;
        for attempt in 0..=max_retries {
            match self.generate(&prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    last_err = Some(e);
                    if attempt < max_retries {
                        tracing::warn!(
                            "AI改写请求失败，准备重试 (attempt {}/{})",
                            attempt + 1,
                            max_retries
                        );
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| KolError::RewriteError("未知错误".into())))
    }

    async fn generate(&self, prompt: &str) -> KolResult<String> {
        let url = self
            .options
            .endpoint
            .join(&format!("models/{}:generateContent", self.options.model))?;

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    KolError::NetworkError(format!("请求超时：{e}"))
                } else {
                    KolError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let preview: String = detail.chars().take(200).collect();
            return Err(KolError::RewriteError(format!("HTTP {status}: {preview}")));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| KolError::RewriteError(format!("响应解析失败：{e}")))?;

        data.first_text()
            .map(|t| t.trim().to_string())
            .ok_or_else(|| KolError::RewriteError("响应中没有候选文本".into()))
    }
}
