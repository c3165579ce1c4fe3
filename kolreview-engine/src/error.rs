//! kolreview-engine 内核错误定义
//! 封装内核层所有核心错误，与业务层错误解耦，基于thiserror实现类型安全处理
use thiserror::Error;

/// 内核核心错误枚举
/// 注意：单项规则不通过不是错误，而是 `pass: false` 的数据结果；
/// 只有结构性非法的配置和非法的阶段流转才会走到这里
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 配置相关错误 =====================
    /// 规则配置错误（加载期一次性校验失败，错误信息命名出错的配置路径）
    #[error("Config error: {0}")]
    ConfigError(String),

    // ===================== 内容相关错误 =====================
    /// 空内容（标题/正文/标签均为空，无可审核内容）
    #[error("Nothing to check: content is empty")]
    EmptyContent,

    // ===================== 审稿流转错误 =====================
    /// 非法的审稿阶段流转（阶段只能按 Draft → BasicFixed → HumanizedReviewed → Final 推进）
    #[error("Invalid stage transition: {0}")]
    InvalidStageTransition(String),

    /// 访问尚未到达的审稿阶段快照
    #[error("Stage not reached: {0}")]
    StageNotReached(String),
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
