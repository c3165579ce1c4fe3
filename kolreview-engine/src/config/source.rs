//! 营销活动规则配置的原始 JSON 视图
//! 全字段 `serde(default)` 容错：缺键是否致命由 loader 的路径校验统一判定，
//! 反序列化本身不做任何业务校验

use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCampaignConfig {
    #[serde(default)]
    pub meta: RawMeta,
    #[serde(default)]
    pub hard_rules: RawHardRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeta {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHardRules {
    #[serde(default)]
    pub word_count: RawWordCount,
    #[serde(default)]
    pub titles: RawTitles,
    /// scope（"title"/"body"）→ 必提关键词
    #[serde(default)]
    pub required_keywords: FxHashMap<String, Vec<String>>,
    #[serde(default)]
    pub hashtags: RawHashtags,
    #[serde(default)]
    pub forbidden_words: Vec<RawForbiddenWord>,
    #[serde(default)]
    pub special_replacements: Vec<RawSpecialReplacement>,
    /// 标签安全白名单（位于 hard_rules 层，沿用原始配置键位）
    #[serde(default)]
    pub safe_tags: Option<Vec<String>>,
    #[serde(default)]
    pub structure: RawStructure,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWordCount {
    #[serde(default)]
    pub min: usize,
    #[serde(default)]
    pub max: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTitles {
    #[serde(default)]
    pub required_count: usize,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHashtags {
    #[serde(default)]
    pub required: Vec<RawRequiredTag>,
}

fn default_min_count() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRequiredTag {
    pub tag: String,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForbiddenWord {
    pub word: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub replacement: String,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecialReplacement {
    pub find: String,
    #[serde(default)]
    pub replace_with: Vec<String>,
    #[serde(default)]
    pub skip_if_followed_by: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStructure {
    #[serde(default)]
    pub paragraphs: Vec<RawParagraph>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParagraph {
    pub name: String,
    #[serde(default)]
    pub anchor_keywords: Vec<String>,
    #[serde(default)]
    pub selling_points: Vec<RawSellingPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSellingPoint {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub required_keywords: Vec<String>,
    #[serde(default)]
    pub soft_only: bool,
    #[serde(default)]
    pub paraphrase_ref: Option<String>,
}
