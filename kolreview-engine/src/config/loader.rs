//! 规则配置加载器
//! 加载路径：JSON 文本 → `serde_json::Value` 必填路径校验 → 原始视图反序列化
//! → 类型化模型转换 → 业务后校验。
//! 所有配置问题都在这里一次性以 `ConfigError` 报出，审核期不再出现配置错误。

use serde_json::Value;

use super::model::{
    CampaignMeta, ForbiddenWordRule, HardRules, HashtagRules, ParagraphSpec, PointRequirement,
    RequiredKeywords, RequiredTag, RuleConfig, SellingPoint, SpecialReplacement, StructureRule,
    TitleRule, WordCountRule,
};
use super::source::{RawCampaignConfig, RawParagraph, RawSellingPoint};
use crate::error::{CoreError, CoreResult};

/// 必填配置路径（点号分隔），缺任何一个都是致命的加载错误
const REQUIRED_PATHS: &[&str] = &[
    "meta.brand",
    "meta.direction",
    "meta.platform",
    "hard_rules.word_count",
    "hard_rules.titles",
    "hard_rules.hashtags.required",
    "hard_rules.forbidden_words",
    "hard_rules.structure.paragraphs",
];

/// 原始配置缺 safe_tags 键时的标签白名单兜底
const DEFAULT_SAFE_TAGS: &[&str] = &["#防敏奶粉", "#第一口奶粉"];

/// 从 JSON 文本加载并校验一份规则配置
pub fn load_rule_config(json: &str) -> CoreResult<RuleConfig> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| CoreError::ConfigError(format!("invalid JSON: {e}")))?;

    ensure_required_paths(&value)?;

    let raw: RawCampaignConfig = serde_json::from_value(value)
        .map_err(|e| CoreError::ConfigError(format!("schema mismatch: {e}")))?;

    convert(raw)
}

fn ensure_required_paths(root: &Value) -> CoreResult<()> {
    for path in REQUIRED_PATHS {
        let pointer = format!("/{}", path.replace('.', "/"));
        if root.pointer(&pointer).is_none() {
            return Err(CoreError::ConfigError(format!(
                "missing required config key: {path}"
            )));
        }
    }
    Ok(())
}

fn convert(raw: RawCampaignConfig) -> CoreResult<RuleConfig> {
    let hr = raw.hard_rules;

    let word_count = WordCountRule {
        min: hr.word_count.min,
        max: hr.word_count.max,
    };
    if word_count.min > word_count.max {
        return Err(CoreError::ConfigError(format!(
            "hard_rules.word_count: min ({}) exceeds max ({})",
            word_count.min, word_count.max
        )));
    }

    if hr.titles.required_count == 0 {
        return Err(CoreError::ConfigError(
            "hard_rules.titles.required_count must be >= 1".into(),
        ));
    }
    let titles = TitleRule {
        required_count: hr.titles.required_count,
        keywords: hr.titles.keywords,
    };

    let mut required_keywords = RequiredKeywords::default();
    for (scope, keywords) in hr.required_keywords {
        match scope.as_str() {
            "title" => required_keywords.title = keywords,
            "body" => required_keywords.body = keywords,
            other => {
                return Err(CoreError::ConfigError(format!(
                    "hard_rules.required_keywords: unknown scope '{other}' (expected 'title' or 'body')"
                )));
            }
        }
    }

    let mut required_tags = Vec::with_capacity(hr.hashtags.required.len());
    for (i, tag) in hr.hashtags.required.into_iter().enumerate() {
        if tag.tag.is_empty() {
            return Err(CoreError::ConfigError(format!(
                "hard_rules.hashtags.required[{i}].tag is empty"
            )));
        }
        if tag.min_count == 0 {
            return Err(CoreError::ConfigError(format!(
                "hard_rules.hashtags.required[{i}].min_count must be >= 1"
            )));
        }
        required_tags.push(RequiredTag {
            tag: tag.tag,
            min_count: tag.min_count,
        });
    }
    let hashtags = HashtagRules {
        required: required_tags,
        safe: hr
            .safe_tags
            .unwrap_or_else(|| DEFAULT_SAFE_TAGS.iter().map(|s| s.to_string()).collect()),
    };

    let mut forbidden_words = Vec::with_capacity(hr.forbidden_words.len());
    for (i, fw) in hr.forbidden_words.into_iter().enumerate() {
        if fw.word.is_empty() {
            return Err(CoreError::ConfigError(format!(
                "hard_rules.forbidden_words[{i}].word is empty"
            )));
        }
        // 替换文本包含原词会让自动修复永不收敛，在加载期拒绝
        if !fw.replacement.is_empty() && fw.replacement.contains(&fw.word) {
            return Err(CoreError::ConfigError(format!(
                "hard_rules.forbidden_words[{i}]: replacement '{}' contains its own word '{}'",
                fw.replacement, fw.word
            )));
        }
        forbidden_words.push(ForbiddenWordRule {
            word: fw.word,
            category: if fw.category.is_empty() {
                "禁止词".to_string()
            } else {
                fw.category
            },
            replacement: if fw.replacement.is_empty() {
                None
            } else {
                Some(fw.replacement)
            },
            exceptions: fw.exceptions,
        });
    }

    let mut special_replacements = Vec::with_capacity(hr.special_replacements.len());
    for (i, sr) in hr.special_replacements.into_iter().enumerate() {
        if sr.find.is_empty() {
            return Err(CoreError::ConfigError(format!(
                "hard_rules.special_replacements[{i}].find is empty"
            )));
        }
        if sr.replace_with.is_empty() {
            return Err(CoreError::ConfigError(format!(
                "hard_rules.special_replacements[{i}].replace_with is empty"
            )));
        }
        special_replacements.push(SpecialReplacement {
            find: sr.find,
            replace_options: sr.replace_with,
            skip_if_followed_by: sr.skip_if_followed_by.filter(|s| !s.is_empty()),
            description: sr.description,
        });
    }

    let paragraphs = hr
        .structure
        .paragraphs
        .into_iter()
        .enumerate()
        .map(|(i, p)| convert_paragraph(i, p))
        .collect::<CoreResult<Vec<_>>>()?;

    log::debug!(
        "Rule config loaded: brand={} forbidden={} paragraphs={} required_tags={}",
        raw.meta.brand,
        forbidden_words.len(),
        paragraphs.len(),
        hashtags.required.len()
    );

    Ok(RuleConfig {
        meta: CampaignMeta {
            brand: raw.meta.brand,
            direction: raw.meta.direction,
            platform: raw.meta.platform,
        },
        hard_rules: HardRules {
            word_count,
            titles,
            required_keywords,
            hashtags,
            forbidden_words,
            special_replacements,
            structure: StructureRule { paragraphs },
        },
    })
}

fn convert_paragraph(index: usize, raw: RawParagraph) -> CoreResult<ParagraphSpec> {
    if raw.name.is_empty() {
        return Err(CoreError::ConfigError(format!(
            "hard_rules.structure.paragraphs[{index}].name is empty"
        )));
    }
    let selling_points = raw
        .selling_points
        .into_iter()
        .map(convert_selling_point)
        .collect();
    Ok(ParagraphSpec {
        name: raw.name,
        anchor_keywords: raw.anchor_keywords,
        selling_points,
    })
}

fn convert_selling_point(raw: RawSellingPoint) -> SellingPoint {
    // 无必提词或显式标记 soft_only 的卖点都是建议性卖点
    let requirement = if raw.soft_only || raw.required_keywords.is_empty() {
        PointRequirement::Advisory
    } else {
        PointRequirement::Enforced {
            keywords: raw.required_keywords,
        }
    };
    SellingPoint {
        id: raw.id,
        name: raw.name,
        requirement,
        paraphrase_ref: raw.paraphrase_ref,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config_json() -> serde_json::Value {
        serde_json::json!({
            "meta": {"brand": "能恩全护", "direction": "防敏种草", "platform": "小红书"},
            "hard_rules": {
                "word_count": {"min": 600, "max": 900},
                "titles": {"required_count": 3, "keywords": ["适度水解"]},
                "required_keywords": {"title": ["适度水解"], "body": ["适度水解", "防敏", "能恩全护"]},
                "hashtags": {"required": [{"tag": "#能恩全护", "min_count": 1}]},
                "forbidden_words": [
                    {"word": "新生儿", "category": "禁止词", "replacement": "初生宝宝", "exceptions": ["第一口奶粉"]}
                ],
                "special_replacements": [
                    {"find": "第一口奶", "replace_with": ["第一口奶粉"], "skip_if_followed_by": "粉"}
                ],
                "structure": {
                    "paragraphs": [
                        {
                            "name": "开头引入",
                            "anchor_keywords": ["宝妈", "踩坑"],
                            "selling_points": [
                                {"id": "sp1", "name": "防敏技术", "required_keywords": ["适度水解"]},
                                {"id": "sp2", "name": "口碑", "required_keywords": [], "paraphrase_ref": "身边宝妈都在用"}
                            ]
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn loads_minimal_config() {
        let config = load_rule_config(&minimal_config_json().to_string()).unwrap();
        assert_eq!(config.meta.brand, "能恩全护");
        assert_eq!(config.meta.label(), "能恩全护 - 防敏种草");
        assert_eq!(config.hard_rules.titles.required_count, 3);
        assert_eq!(config.hard_rules.required_keywords.body.len(), 3);
        assert_eq!(
            config.hard_rules.forbidden_words[0].replacement.as_deref(),
            Some("初生宝宝")
        );
        // safe_tags 缺省时落到白名单兜底
        assert!(config
            .hard_rules
            .hashtags
            .safe
            .contains(&"#防敏奶粉".to_string()));
    }

    #[test]
    fn missing_required_path_is_fatal_and_named() {
        for path in super::REQUIRED_PATHS {
            let mut value = minimal_config_json();
            // 删掉路径的最后一段
            let (parent, leaf) = path.rsplit_once('.').unwrap_or(("", path));
            let pointer = if parent.is_empty() {
                String::new()
            } else {
                format!("/{}", parent.replace('.', "/"))
            };
            value
                .pointer_mut(&pointer)
                .and_then(Value::as_object_mut)
                .unwrap()
                .remove(leaf);

            let err = load_rule_config(&value.to_string()).unwrap_err();
            match err {
                CoreError::ConfigError(msg) => assert!(
                    msg.contains(path),
                    "error for missing {path} should name the path, got: {msg}"
                ),
                other => panic!("expected ConfigError, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_replacement_containing_its_own_word() {
        let mut value = minimal_config_json();
        value["hard_rules"]["forbidden_words"][0]["replacement"] =
            serde_json::json!("还是新生儿");
        let err = load_rule_config(&value.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
    }

    #[test]
    fn rejects_inverted_word_count_bounds() {
        let mut value = minimal_config_json();
        value["hard_rules"]["word_count"] = serde_json::json!({"min": 900, "max": 600});
        assert!(matches!(
            load_rule_config(&value.to_string()),
            Err(CoreError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_required_keywords_become_advisory_points() {
        let config = load_rule_config(&minimal_config_json().to_string()).unwrap();
        let points = &config.hard_rules.structure.paragraphs[0].selling_points;
        assert!(matches!(
            points[0].requirement,
            PointRequirement::Enforced { .. }
        ));
        assert!(points[1].is_advisory());
    }
}
