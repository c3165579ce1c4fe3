//! kolreview-engine - 营销文案审核内核
//! 纯同步、无副作用：规则模型 + 内容解析 + 硬性审核 + 确定性自动修复 +
//! 字符级对比 + 审稿阶段状态机。所有 I/O（配置文件、AI 改写调用、导出）
//! 都在外层 kolreview crate

// 规则配置：原始 JSON 视图 + 类型化模型 + 加载校验
pub mod config;
// 文案内容模型与解析器
pub mod content;
// 硬性审核检查引擎
pub mod checker;
// 确定性自动修复引擎
pub mod fixer;
// 字符级文本对比
pub mod diff;
// 审稿阶段状态机
pub mod session;
// 内核错误定义
pub mod error;
// 文本统计/标签工具
pub mod utils;

// 顶层导出常用类型
pub use checker::{run_all_checks, CheckDetail, CheckId, CheckResult};
pub use config::{
    load_rule_config, ForbiddenWordRule, HardRules, HashtagRules, ParagraphSpec, PointRequirement,
    RequiredKeywords, RequiredTag, RuleConfig, SellingPoint, SpecialReplacement, StructureRule,
    TitleRule, WordCountRule,
};
pub use content::{parse_content, Content};
pub use diff::{diff_chars, DiffKind, DiffSegment};
pub use error::{CoreError, CoreResult};
pub use fixer::{auto_fix, ChangeKind, ChangeRecord, ChangeScope, FixOutcome, PROBLEM_TAGS};
pub use session::{ReviewSession, ReviewStage, StageSnapshot};
