//! 人话改写提示词组装
//! 把规则配置里的硬性约束（字数区间、必提词、违禁词与替换建议、结构顺序）
//! 连同去AI痕迹的文风要求拼成一份完整提示词。
//! 提示词内容只是对外部服务的"请求"，改写产物回来后仍会整体重审

use kolreview_engine::{PointRequirement, RuleConfig};

/// 收集所有 Enforced 卖点的必提词（按配置顺序去重）
fn collect_enforced_keywords(config: &RuleConfig) -> Vec<&str> {
    let mut seen = Vec::new();
    for para in &config.hard_rules.structure.paragraphs {
        for sp in &para.selling_points {
            if let PointRequirement::Enforced { keywords } = &sp.requirement {
                for kw in keywords {
                    if !seen.contains(&kw.as_str()) {
                        seen.push(kw.as_str());
                    }
                }
            }
        }
    }
    for kw in &config.hard_rules.required_keywords.body {
        if !seen.contains(&kw.as_str()) {
            seen.push(kw.as_str());
        }
    }
    seen
}

/// 组装整篇正文的人话改写提示词
pub fn build_rewrite_prompt(body: &str, config: &RuleConfig) -> String {
    let hr = &config.hard_rules;

    let keywords = collect_enforced_keywords(config);
    let kw_block = keywords
        .iter()
        .map(|kw| format!("- {kw}"))
        .collect::<Vec<_>>()
        .join("\n");

    let forbidden_list = hr
        .forbidden_words
        .iter()
        .map(|fw| fw.word.as_str())
        .collect::<Vec<_>>()
        .join("、");

    let replace_rules = hr
        .forbidden_words
        .iter()
        .filter_map(|fw| {
            fw.replacement
                .as_deref()
                .map(|rep| format!("「{}」→「{rep}」", fw.word))
        })
        .collect::<Vec<_>>()
        .join("; ");

    let special_rules = hr
        .special_replacements
        .iter()
        .map(|sr| format!("「{}」必须写成「{}」", sr.find, sr.replacement()))
        .collect::<Vec<_>>()
        .join("\n   - ");

    format!(
        "你是一个真实的小红书博主，不是AI。请用你自己的语气改写以下文案。\n\n\
【原文】\n{body}\n\n\
【硬性要求 - 必须100%遵守】\n\
1. 字数严格控制在 {min}-{max} 字之间（中文字符数）\n\
2. 以下必提词必须原封不动保留（一字不差、不能省略、不能改写）：\n{kw_block}\n\
3. ⚠️ 绝对禁止出现以下违禁词：{forbidden_list}\n\
   - 这些词连一个都不能出现！\n\
   - 正确替换方式：{replace_rules}\n\
   - {special_rules}\n\n\
【去AI痕迹 - 让文字像真人写的】\n\
❌ 禁止使用AI典型句式：\n\
- 不要用\"值得一提的是\"\"总而言之\"\"综上所述\"\"不仅...而且...\"\"无论...还是...\"\n\
- 不要用\"作为一个XX\"\"说到XX\"\"关于XX\"\"众所周知\"\n\
- 不要三段式排比，不要空洞的总结句\n\
- 不要用\"重要的是\"\"关键在于\"\"核心是\"这类伪深度表达\n\
✅ 要像真人这样写：\n\
- 句子长短交错，有时候一个词就是一句话。有时候拉长说\n\
- 要有自己的态度和反应（\"我当时真的吓到了\"\"说实话一开始我也犹豫\"）\n\
- 可以有不确定感（\"我也说不好\"\"反正我家是这样\"）\n\
- 像在微信里跟闺蜜语音转文字，有口语的碎片感\n\
- 用具体的场景和细节，不要笼统概括\n\n\
【结构要求】\n\
- 保持原文的内容结构顺序\n\
- 段落之间不要用生硬的过渡句，自然地聊下去就好\n\n\
请直接输出改写后的完整正文，不要加任何解释或前言：",
        min = hr.word_count.min,
        max = hr.word_count.max,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolreview_engine::load_rule_config;

    fn config() -> RuleConfig {
        let json = serde_json::json!({
            "meta": {"brand": "能恩全护", "direction": "防敏种草", "platform": "小红书"},
            "hard_rules": {
                "word_count": {"min": 820, "max": 880},
                "titles": {"required_count": 3, "keywords": []},
                "required_keywords": {"body": ["能恩全护"]},
                "hashtags": {"required": [{"tag": "#能恩全护", "min_count": 1}]},
                "forbidden_words": [
                    {"word": "新生儿", "category": "禁止词", "replacement": "初生宝宝"},
                    {"word": "最", "category": "禁绝对化"}
                ],
                "special_replacements": [
                    {"find": "第一口奶", "replace_with": ["第一口奶粉"], "skip_if_followed_by": "粉"}
                ],
                "structure": {"paragraphs": [{
                    "name": "防敏科普",
                    "anchor_keywords": ["适度水解"],
                    "selling_points": [
                        {"id": "sp1", "name": "水解技术", "required_keywords": ["适度水解", "小分子"]},
                        {"id": "sp2", "name": "口碑", "required_keywords": []}
                    ]
                }]}
            }
        });
        load_rule_config(&json.to_string()).unwrap()
    }

    #[test]
    fn prompt_carries_all_hard_constraints() {
        let prompt = build_rewrite_prompt("原始正文内容", &config());
        assert!(prompt.contains("原始正文内容"));
        assert!(prompt.contains("820-880 字"));
        assert!(prompt.contains("- 适度水解"));
        assert!(prompt.contains("- 小分子"));
        assert!(prompt.contains("- 能恩全护"));
        assert!(prompt.contains("新生儿、最"));
        assert!(prompt.contains("「新生儿」→「初生宝宝」"));
        assert!(prompt.contains("「第一口奶」必须写成「第一口奶粉」"));
    }

    #[test]
    fn enforced_keywords_deduplicate_preserving_order() {
        let cfg = config();
        let keywords = collect_enforced_keywords(&cfg);
        assert_eq!(keywords, vec!["适度水解", "小分子", "能恩全护"]);
    }
}
