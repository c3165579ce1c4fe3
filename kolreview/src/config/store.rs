//! 营销活动配置目录存储
//! 一个目录下每个 `*.json` 文件对应一个活动的规则配置；
//! 列表接口容错（坏文件只告警跳过），按名加载则把校验失败如实上报

use std::path::{Path, PathBuf};

use kolreview_engine::{load_rule_config, RuleConfig};
use serde::Serialize;

use crate::error::{KolError, KolResult};

/// 配置列表条目
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// 文件名（不含 .json 后缀）
    pub file: String,
    pub brand: String,
    pub direction: String,
    /// 展示用标签：「品牌 - 方向」
    pub label: String,
}

/// 目录型配置存储
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 列出目录下所有可用配置
    /// 加载失败的文件记一条告警并跳过，不阻断整个列表
    pub async fn list(&self) -> KolResult<Vec<ConfigSummary>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            KolError::ConfigLoadError(format!("读取配置目录 {} 失败：{e}", self.dir.display()))
        })?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.load_path(&path).await {
                Ok(config) => {
                    let file = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default()
                        .to_string();
                    summaries.push(ConfigSummary {
                        file,
                        brand: config.meta.brand.clone(),
                        direction: config.meta.direction.clone(),
                        label: config.meta.label(),
                    });
                }
                Err(e) => {
                    tracing::warn!("跳过无效配置文件 {}：{}", path.display(), e);
                }
            }
        }
        summaries.sort_by(|a, b| a.file.cmp(&b.file));
        Ok(summaries)
    }

    /// 按名加载配置（`name` 可带可不带 .json 后缀）
    pub async fn load(&self, name: &str) -> KolResult<RuleConfig> {
        let file_name = if name.ends_with(".json") {
            name.to_string()
        } else {
            format!("{name}.json")
        };
        self.load_path(&self.dir.join(file_name)).await
    }

    /// 从任意路径加载配置
    pub async fn load_path(&self, path: &Path) -> KolResult<RuleConfig> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            KolError::ConfigLoadError(format!("读取配置文件 {} 失败：{e}", path.display()))
        })?;
        load_rule_config(&json).map_err(|e| {
            KolError::ConfigLoadError(format!("配置文件 {} 无效：{e}", path.display()))
        })
    }
}
