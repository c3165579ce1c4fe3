// 类型化规则模型（校验后的唯一下游视图）
pub mod model;
// 原始 JSON 宽松视图（serde default 容错）
pub mod source;
// 加载 + 路径校验 + 原始→类型化转换
pub mod loader;

pub use loader::load_rule_config;
pub use model::{
    CampaignMeta, ForbiddenWordRule, HardRules, HashtagRules, ParagraphSpec, PointRequirement,
    RequiredKeywords, RequiredTag, RuleConfig, SellingPoint, SpecialReplacement, StructureRule,
    TitleRule, WordCountRule,
};
