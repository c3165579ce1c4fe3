//! 审稿流水线状态机
//! 四个阶段严格按序推进：初稿 → 自动修复稿 → 人话改写稿 → 终稿。
//! 每次流转都是调用方的显式动作，状态机从不自动推进；
//! 每个已到达阶段持有自己的 Content 快照与审核结果，历史阶段始终可对比

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::checker::{run_all_checks, CheckResult};
use crate::config::RuleConfig;
use crate::content::{parse_content, Content};
use crate::diff::{diff_chars, DiffSegment};
use crate::error::{CoreError, CoreResult};
use crate::fixer::{auto_fix, ChangeRecord};

/// 审稿阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Draft,
    BasicFixed,
    HumanizedReviewed,
    Final,
}

impl ReviewStage {
    /// 展示用中文阶段名
    pub fn label(&self) -> &'static str {
        match self {
            ReviewStage::Draft => "初稿",
            ReviewStage::BasicFixed => "自动修复稿",
            ReviewStage::HumanizedReviewed => "人话改写稿",
            ReviewStage::Final => "终稿",
        }
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStage::Draft => "draft",
            ReviewStage::BasicFixed => "basic_fixed",
            ReviewStage::HumanizedReviewed => "humanized_reviewed",
            ReviewStage::Final => "final",
        };
        write!(f, "{s}")
    }
}

/// 一个阶段的完整快照
#[derive(Debug, Clone)]
pub struct StageSnapshot {
    pub content: Content,
    pub results: Vec<CheckResult>,
    /// 产生该阶段内容的修复变更（Draft 与 skip 路径为空）
    pub changes: Vec<ChangeRecord>,
}

/// 审稿会话：配置 + 当前阶段 + 各阶段快照
/// 由调用方显式持有并传递，不依赖任何环境全局状态
#[derive(Debug)]
pub struct ReviewSession {
    config: Arc<RuleConfig>,
    stage: ReviewStage,
    snapshots: FxHashMap<ReviewStage, StageSnapshot>,
}

impl ReviewSession {
    /// 从原始粘贴文本开始一次审稿（解析 + 首轮审核，进入 Draft）
    pub fn from_raw(config: Arc<RuleConfig>, raw: &str) -> CoreResult<Self> {
        let content = parse_content(raw, config.hard_rules.titles.required_count);
        Self::from_content(config, content)
    }

    /// 从已拆分的 Content 开始一次审稿
    pub fn from_content(config: Arc<RuleConfig>, content: Content) -> CoreResult<Self> {
        if content.is_empty() {
            return Err(CoreError::EmptyContent);
        }
        let results = run_all_checks(&content, &config);
        let mut snapshots = FxHashMap::default();
        snapshots.insert(
            ReviewStage::Draft,
            StageSnapshot {
                content,
                results,
                changes: Vec::new(),
            },
        );
        Ok(Self {
            config,
            stage: ReviewStage::Draft,
            snapshots,
        })
    }

    pub fn stage(&self) -> ReviewStage {
        self.stage
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// 当前阶段快照
    pub fn current(&self) -> &StageSnapshot {
        // 不变量：当前阶段的快照必然存在（构造与每次流转都会写入）
        &self.snapshots[&self.stage]
    }

    /// 指定阶段快照（未到达的阶段返回 None）
    pub fn snapshot(&self, stage: ReviewStage) -> Option<&StageSnapshot> {
        self.snapshots.get(&stage)
    }

    fn require_stage(&self, expected: ReviewStage, action: &str) -> CoreResult<()> {
        if self.stage != expected {
            return Err(CoreError::InvalidStageTransition(format!(
                "cannot {action} at stage {}",
                self.stage
            )));
        }
        Ok(())
    }

    fn enter(&mut self, stage: ReviewStage, content: Content, changes: Vec<ChangeRecord>) {
        let results = run_all_checks(&content, &self.config);
        log::debug!("Stage transition: {} -> {}", self.stage, stage);
        self.snapshots.insert(
            stage,
            StageSnapshot {
                content,
                results,
                changes,
            },
        );
        self.stage = stage;
    }

    /// Draft → BasicFixed：对初稿执行自动修复并重新审核
    pub fn apply_auto_fix(&mut self) -> CoreResult<&StageSnapshot> {
        self.require_stage(ReviewStage::Draft, "auto-fix")?;
        let outcome = auto_fix(&self.current().content, &self.config);
        self.enter(ReviewStage::BasicFixed, outcome.content, outcome.changes);
        Ok(self.current())
    }

    /// BasicFixed → HumanizedReviewed：接受外部 AI 改写后的正文。
    /// 改写产物视为不可信输出：先重跑自动修复清理新引入的违规，再重新审核
    pub fn apply_rewrite(&mut self, new_body: String) -> CoreResult<&StageSnapshot> {
        self.require_stage(ReviewStage::BasicFixed, "apply rewrite")?;
        let base = self.current();
        let rewritten = Content::new(
            base.content.titles.clone(),
            new_body,
            base.content.tags.clone(),
        );
        if rewritten.is_empty() {
            return Err(CoreError::EmptyContent);
        }
        let outcome = auto_fix(&rewritten, &self.config);
        self.enter(
            ReviewStage::HumanizedReviewed,
            outcome.content,
            outcome.changes,
        );
        Ok(self.current())
    }

    /// BasicFixed → HumanizedReviewed：显式跳过 AI 改写，内容原样前进并重新审核
    pub fn skip_rewrite(&mut self) -> CoreResult<&StageSnapshot> {
        self.require_stage(ReviewStage::BasicFixed, "skip rewrite")?;
        let content = self.current().content.clone();
        self.enter(ReviewStage::HumanizedReviewed, content, Vec::new());
        Ok(self.current())
    }

    /// HumanizedReviewed → Final：冻结内容，重新审核一遍
    pub fn finalize(&mut self) -> CoreResult<&StageSnapshot> {
        self.require_stage(ReviewStage::HumanizedReviewed, "finalize")?;
        let content = self.current().content.clone();
        self.enter(ReviewStage::Final, content, Vec::new());
        Ok(self.current())
    }

    /// 原地手动编辑当前阶段内容并重新审核，阶段不变
    pub fn edit_current(
        &mut self,
        titles: Vec<String>,
        body: String,
        tags: String,
    ) -> CoreResult<&StageSnapshot> {
        let content = Content::new(titles, body, tags);
        if content.is_empty() {
            return Err(CoreError::EmptyContent);
        }
        let results = run_all_checks(&content, &self.config);
        let snapshot = self
            .snapshots
            .get_mut(&self.stage)
            .expect("current stage snapshot always exists");
        snapshot.content = content;
        snapshot.results = results;
        Ok(self.current())
    }

    /// 对比两个已到达阶段的正文
    pub fn diff_bodies(&self, from: ReviewStage, to: ReviewStage) -> CoreResult<Vec<DiffSegment>> {
        let before = self
            .snapshot(from)
            .ok_or_else(|| CoreError::StageNotReached(from.to_string()))?;
        let after = self
            .snapshot(to)
            .ok_or_else(|| CoreError::StageNotReached(to.to_string()))?;
        Ok(diff_chars(&before.content.body, &after.content.body))
    }
}
