//! 硬性审核检查引擎
//! 每个规则类别一个纯函数求值器，输入 (Content, RuleConfig)，输出 `CheckResult`。
//! 求值器无隐藏状态、无 I/O、永不抛错：规则不通过是 `pass: false` 的数据结果，
//! 配置问题在加载期已被拦截，审核期不会再出现

// 字数审核（仅计中文字符）
mod word_count;
// 标题数量 + 标题关键词
mod titles;
// 按作用域的必提关键词
mod keywords;
// 话题标签覆盖
mod hashtags;
// 违禁词 + 特殊替换 + 标签内嵌违禁词
pub(crate) mod forbidden;
// 段落结构顺序（锚点关键词模糊定位）
mod structure;
// 卖点必提词覆盖
mod selling_points;

use serde::Serialize;
use std::fmt;

use crate::config::RuleConfig;
use crate::content::Content;

/// 审核项标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    WordCount,
    TitleCount,
    TitleKeywords,
    Keywords,
    Hashtags,
    ForbiddenWords,
    Structure,
    SellingPoints,
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckId::WordCount => "word_count",
            CheckId::TitleCount => "title_count",
            CheckId::TitleKeywords => "title_keywords",
            CheckId::Keywords => "keywords",
            CheckId::Hashtags => "hashtags",
            CheckId::ForbiddenWords => "forbidden_words",
            CheckId::Structure => "structure",
            CheckId::SellingPoints => "selling_points",
        };
        write!(f, "{s}")
    }
}

/// 单项审核结果
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub id: CheckId,
    /// 审核项中文名（展示用）
    pub name: String,
    pub pass: bool,
    /// 面向审稿人的一句话结论
    pub message: String,
    /// 类别专属明细
    pub detail: CheckDetail,
}

/// 审核明细，按类别携带各自的结构化字段
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckDetail {
    WordCount {
        value: usize,
        min: usize,
        max: usize,
    },
    TitleCount {
        actual: usize,
        required: usize,
    },
    TitleKeywords {
        details: Vec<TitleKeywordHit>,
        missing: Vec<String>,
    },
    Keywords {
        title_missing: Vec<String>,
        body_missing: Vec<String>,
    },
    Hashtags {
        details: Vec<TagCount>,
        missing: Vec<String>,
    },
    ForbiddenWords {
        violations: Vec<WordViolation>,
        special_violations: Vec<SpecialViolation>,
        tag_violations: Vec<TagViolation>,
    },
    Structure {
        detected: Vec<ParagraphHit>,
        expected_order: Vec<String>,
        actual_order: Vec<String>,
        missing_sections: Vec<String>,
        order_correct: bool,
    },
    SellingPoints {
        total: usize,
        passed: usize,
        paragraphs: Vec<ParagraphPoints>,
    },
}

/// 单个标题关键词的命中情况
#[derive(Debug, Clone, Serialize)]
pub struct TitleKeywordHit {
    pub keyword: String,
    pub found: bool,
    /// 命中的标题序号（1 起）
    pub found_in_titles: Vec<usize>,
}

/// 单个必提标签的计数情况
#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub required_count: usize,
    pub actual_count: usize,
    pub pass: bool,
}

/// 一处违禁词违规
#[derive(Debug, Clone, Serialize)]
pub struct WordViolation {
    pub word: String,
    pub category: String,
    /// 全文中的字节位置
    pub position: usize,
    /// 前后各 15 字的上下文
    pub context: String,
    /// 配置的替换建议（可能为空，表示需人工处理）
    pub replacement: String,
}

/// 一处特殊替换违规
#[derive(Debug, Clone, Serialize)]
pub struct SpecialViolation {
    pub find: String,
    pub context: String,
    pub replace_with: String,
    pub description: String,
}

/// 一处标签内嵌违禁词违规
#[derive(Debug, Clone, Serialize)]
pub struct TagViolation {
    pub tag: String,
    pub word: String,
}

/// 单个主题段落的锚点命中情况
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphHit {
    pub name: String,
    pub found: bool,
    pub found_keywords: Vec<String>,
    pub total_anchor: usize,
    /// 命中锚点的平均字节位置，未命中时为 None
    pub avg_position: Option<f64>,
}

/// 单个段落下所有卖点的审核结果
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphPoints {
    pub paragraph_name: String,
    pub selling_points: Vec<PointResult>,
}

/// 单个卖点的审核结果
#[derive(Debug, Clone, Serialize)]
pub struct PointResult {
    pub id: String,
    pub name: String,
    pub soft_only: bool,
    pub pass: bool,
    pub keywords: Vec<KeywordHit>,
    pub missing: Vec<String>,
    pub paraphrase_ref: Option<String>,
}

/// 单个必提词的命中情况
#[derive(Debug, Clone, Serialize)]
pub struct KeywordHit {
    pub keyword: String,
    pub found: bool,
}

/// 运行全部硬性审核，结果顺序固定
pub fn run_all_checks(content: &Content, config: &RuleConfig) -> Vec<CheckResult> {
    let hr = &config.hard_rules;
    let full_text = content.full_text();

    let results = vec![
        word_count::check(&content.body, &hr.word_count),
        titles::check_count(&content.titles, &hr.titles),
        titles::check_keywords(&content.titles, &hr.titles),
        keywords::check(content, &hr.required_keywords),
        hashtags::check(&content.tags, &hr.hashtags),
        forbidden::check(&full_text, hr),
        structure::check(&content.body, &hr.structure),
        selling_points::check(&content.body, &hr.structure),
    ];

    let failed = results.iter().filter(|r| !r.pass).count();
    log::debug!(
        "Check run finished: total={} failed={}",
        results.len(),
        failed
    );
    results
}
