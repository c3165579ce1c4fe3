//! kolreview - 小红书KOL营销文案审核流水线
//! 规则审核 + 确定性自动修复 + AI人话改写 + 审稿对比导出。
//! 审核内核（规则模型/检查/修复/对比/阶段状态机）在 kolreview-engine，
//! 本 crate 承载配置存储、AI 改写协作方、导出渲染与 CLI

pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod rewriter;

// 导出全局错误类型
pub use self::error::{KolError, KolResult};

// 导出配置存储
pub use crate::config::{ConfigStore, ConfigSummary};

// 导出流水线驱动器
pub use crate::pipeline::ReviewPipeline;

// 导出 AI 改写客户端
pub use crate::rewriter::{build_rewrite_prompt, RetryPolicy, RewriteClient, RewriteOptions};

// 导出渲染器
pub use crate::export::{
    render_clean_report, render_diff_html, render_plain_document, render_review_report,
};

// 重导出内核常用类型
pub use kolreview_engine as engine;
pub use kolreview_engine::{
    auto_fix, diff_chars, load_rule_config, parse_content, run_all_checks, ChangeRecord,
    CheckResult, Content, DiffKind, DiffSegment, ReviewSession, ReviewStage, RuleConfig,
};
