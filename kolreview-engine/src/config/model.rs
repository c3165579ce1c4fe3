//! 类型化的营销活动规则模型
//! 加载期一次性从原始 JSON 校验转换而来，此后全程不可变；
//! 下游审核/修复代码只消费这一层，永远不接触原始 map

use serde::Serialize;

/// 一个营销活动（campaign）的完整审核规则
#[derive(Debug, Clone, Serialize)]
pub struct RuleConfig {
    pub meta: CampaignMeta,
    pub hard_rules: HardRules,
}

/// 活动元信息
#[derive(Debug, Clone, Serialize)]
pub struct CampaignMeta {
    pub brand: String,
    pub direction: String,
    pub platform: String,
}

impl CampaignMeta {
    /// 配置列表展示用标签：「品牌 - 方向」
    pub fn label(&self) -> String {
        format!("{} - {}", self.brand, self.direction)
    }
}

/// 硬性审核规则集合
#[derive(Debug, Clone, Serialize)]
pub struct HardRules {
    pub word_count: WordCountRule,
    pub titles: TitleRule,
    pub required_keywords: RequiredKeywords,
    pub hashtags: HashtagRules,
    pub forbidden_words: Vec<ForbiddenWordRule>,
    pub special_replacements: Vec<SpecialReplacement>,
    pub structure: StructureRule,
}

/// 正文字数区间（仅计中文字符）
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WordCountRule {
    pub min: usize,
    pub max: usize,
}

/// 标题数量与标题必提关键词
#[derive(Debug, Clone, Serialize)]
pub struct TitleRule {
    pub required_count: usize,
    pub keywords: Vec<String>,
}

/// 按作用域划分的必提关键词
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequiredKeywords {
    pub title: Vec<String>,
    pub body: Vec<String>,
}

/// 话题标签要求
#[derive(Debug, Clone, Serialize)]
pub struct HashtagRules {
    pub required: Vec<RequiredTag>,
    /// 安全白名单：白名单内的标签不参与「标签内嵌违禁词」检查
    pub safe: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequiredTag {
    pub tag: String,
    pub min_count: usize,
}

/// 一条违禁词规则
/// `exceptions` 是上下文例外子串：匹配位置落在任一例外子串的跨度内时，
/// 该次出现不算违规（例外判定是全局的，见 DESIGN.md 的开放问题决议）
#[derive(Debug, Clone, Serialize)]
pub struct ForbiddenWordRule {
    pub word: String,
    pub category: String,
    /// 无替换建议的违禁词不参与自动修复，只报告
    pub replacement: Option<String>,
    pub exceptions: Vec<String>,
}

/// 独立于违禁词表的条件替换规则
#[derive(Debug, Clone, Serialize)]
pub struct SpecialReplacement {
    pub find: String,
    /// 自动修复采用最后一个选项
    pub replace_options: Vec<String>,
    /// 紧跟该字符串时跳过（如「第一口奶」后跟「粉」即合规）
    pub skip_if_followed_by: Option<String>,
    pub description: String,
}

impl SpecialReplacement {
    /// 自动修复实际写入的替换文本
    pub fn replacement(&self) -> &str {
        self.replace_options
            .last()
            .map(|s| s.as_str())
            .unwrap_or_default()
    }
}

/// 段落结构要求
#[derive(Debug, Clone, Serialize)]
pub struct StructureRule {
    pub paragraphs: Vec<ParagraphSpec>,
}

/// 一个主题段落：锚点关键词定位 + 卖点清单
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphSpec {
    pub name: String,
    pub anchor_keywords: Vec<String>,
    pub selling_points: Vec<SellingPoint>,
}

/// 卖点
#[derive(Debug, Clone, Serialize)]
pub struct SellingPoint {
    pub id: String,
    pub name: String,
    pub requirement: PointRequirement,
    pub paraphrase_ref: Option<String>,
}

/// 卖点约束强度
/// Advisory 卖点只做展示参考，永远不会让审核不通过，也不计入覆盖率
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointRequirement {
    /// 必提：所有关键词必须逐字出现在正文中
    Enforced { keywords: Vec<String> },
    /// 建议：仅供参考
    Advisory,
}

impl SellingPoint {
    pub fn is_advisory(&self) -> bool {
        matches!(self.requirement, PointRequirement::Advisory)
    }
}
