//! 自动修复引擎
//! 确定性地解决可自动修复的违规：违禁词替换、特殊替换、问题标签、标签补齐。
//! 纯函数：输入 Content 不被触碰，输出新 Content + 变更记录。
//! 幂等保证：对自身输出再跑一遍，所有类别都产生零条新变更
//! （替换文本不含原词由配置加载期兜底；扫描指针越过替换文本从不回扫；
//! 已存在的必提标签不会重复补齐）

use serde::Serialize;

use crate::checker::forbidden::is_excepted;
use crate::config::{RuleConfig, SpecialReplacement};
use crate::content::Content;
use crate::utils::{clamp_ceil_char_boundary, clamp_floor_char_boundary};

/// 已知问题标签固定表：重写为合规标签，或整个删除
pub static PROBLEM_TAGS: &[(&str, Option<&str>)] = &[
    ("#新生儿奶粉", None),
    ("#防敏感奶粉", Some("#防敏奶粉")),
];

/// 变更类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    ForbiddenWord,
    SpecialReplacement,
    TagRewrite,
    TagRemoval,
    TagCompletion,
}

impl ChangeKind {
    /// 展示用中文标签
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::ForbiddenWord => "违禁词",
            ChangeKind::SpecialReplacement => "特殊替换",
            ChangeKind::TagRewrite => "标签修复",
            ChangeKind::TagRemoval => "标签删除",
            ChangeKind::TagCompletion => "标签补齐",
        }
    }
}

/// 变更作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeScope {
    Body,
    Tags,
    /// 第 n 个标题（0 起）
    Title(usize),
}

impl ChangeScope {
    pub fn label(&self) -> String {
        match self {
            ChangeScope::Body => "正文".to_string(),
            ChangeScope::Tags => "标签".to_string(),
            ChangeScope::Title(i) => format!("标题{}", i + 1),
        }
    }
}

/// 一条修复变更记录（创建后不再修改，追加式日志）
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub old: String,
    pub new: String,
    pub count: usize,
    pub scope: ChangeScope,
}

/// 一次修复的产出
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub content: Content,
    pub changes: Vec<ChangeRecord>,
}

/// 向前扫描替换：逐个匹配，带例外跨度判定，指针越过匹配文本推进，
/// 替换文本只进输出、从不被回扫
fn scan_replace(
    text: &str,
    word: &str,
    replacement: &str,
    exceptions: &[String],
) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut i = 0;

    while let Some(rel) = text[i..].find(word) {
        let idx = i + rel;
        let end = idx + word.len();
        if is_excepted(text, idx, exceptions) {
            out.push_str(&text[i..end]);
        } else {
            out.push_str(&text[i..idx]);
            out.push_str(replacement);
            count += 1;
        }
        i = end;
    }
    out.push_str(&text[i..]);
    (out, count)
}

/// 特殊替换扫描：紧跟 skip 后缀时跳过；匹配窗口内已出现替换文本时跳过
/// （防止第二次套用，替换文本可以包含 find 本身）
fn special_replace(text: &str, rule: &SpecialReplacement) -> (String, usize) {
    let replacement = rule.replacement();
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut i = 0;

    while let Some(rel) = text[i..].find(rule.find.as_str()) {
        let idx = i + rel;
        let end = idx + rule.find.len();

        let mut skip = rule
            .skip_if_followed_by
            .as_deref()
            .map(|suffix| text[end..].starts_with(suffix))
            .unwrap_or(false);
        if !skip && !replacement.is_empty() {
            let win_start = clamp_floor_char_boundary(text, idx.saturating_sub(replacement.len()));
            let win_end = clamp_ceil_char_boundary(text, end + replacement.len());
            if text[win_start..win_end].contains(replacement) {
                skip = true;
            }
        }

        if skip {
            out.push_str(&text[i..end]);
        } else {
            out.push_str(&text[i..idx]);
            out.push_str(replacement);
            count += 1;
        }
        i = end;
    }
    out.push_str(&text[i..]);
    (out, count)
}

/// 一键修复所有可自动修复的违规
pub fn auto_fix(content: &Content, config: &RuleConfig) -> FixOutcome {
    let hr = &config.hard_rules;
    let mut titles = content.titles.clone();
    let mut body = content.body.clone();
    let mut tags = content.tags.clone();
    let mut changes: Vec<ChangeRecord> = Vec::new();

    // 1. 违禁词替换（无替换建议的留给人工/AI 环节）
    for fw in &hr.forbidden_words {
        let Some(replacement) = fw.replacement.as_deref() else {
            continue;
        };

        let (new_body, n) = scan_replace(&body, &fw.word, replacement, &fw.exceptions);
        if n > 0 {
            body = new_body;
            changes.push(ChangeRecord {
                kind: ChangeKind::ForbiddenWord,
                old: fw.word.clone(),
                new: replacement.to_string(),
                count: n,
                scope: ChangeScope::Body,
            });
        }

        let (new_tags, n) = scan_replace(&tags, &fw.word, replacement, &fw.exceptions);
        if n > 0 {
            tags = new_tags;
            changes.push(ChangeRecord {
                kind: ChangeKind::ForbiddenWord,
                old: fw.word.clone(),
                new: replacement.to_string(),
                count: n,
                scope: ChangeScope::Tags,
            });
        }

        for (ti, title) in titles.iter_mut().enumerate() {
            let (new_title, n) = scan_replace(title, &fw.word, replacement, &fw.exceptions);
            if n > 0 {
                *title = new_title;
                changes.push(ChangeRecord {
                    kind: ChangeKind::ForbiddenWord,
                    old: fw.word.clone(),
                    new: replacement.to_string(),
                    count: n,
                    scope: ChangeScope::Title(ti),
                });
            }
        }
    }

    // 2. 特殊替换（正文）
    for rule in &hr.special_replacements {
        let (new_body, n) = special_replace(&body, rule);
        if n > 0 {
            body = new_body;
            changes.push(ChangeRecord {
                kind: ChangeKind::SpecialReplacement,
                old: rule.find.clone(),
                new: rule.replacement().to_string(),
                count: n,
                scope: ChangeScope::Body,
            });
        }
    }

    // 3. 已知问题标签
    for (bad, good) in PROBLEM_TAGS {
        if !tags.contains(bad) {
            continue;
        }
        let count = tags.matches(bad).count();
        match good {
            Some(good) => {
                tags = tags.replace(bad, good);
                changes.push(ChangeRecord {
                    kind: ChangeKind::TagRewrite,
                    old: bad.to_string(),
                    new: good.to_string(),
                    count,
                    scope: ChangeScope::Tags,
                });
            }
            None => {
                tags = tags.replace(bad, "");
                while tags.contains("  ") {
                    tags = tags.replace("  ", " ");
                }
                tags = tags.trim().to_string();
                changes.push(ChangeRecord {
                    kind: ChangeKind::TagRemoval,
                    old: bad.to_string(),
                    new: String::new(),
                    count,
                    scope: ChangeScope::Tags,
                });
            }
        }
    }

    // 4. 补齐缺失的必提标签
    for req in &hr.hashtags.required {
        if tags.contains(req.tag.as_str()) {
            continue;
        }
        if tags.trim().is_empty() {
            tags = req.tag.clone();
        } else {
            tags = format!("{} {}", tags.trim_end(), req.tag);
        }
        changes.push(ChangeRecord {
            kind: ChangeKind::TagCompletion,
            old: String::new(),
            new: req.tag.clone(),
            count: 1,
            scope: ChangeScope::Tags,
        });
    }

    log::debug!("Auto-fix finished: changes={}", changes.len());

    FixOutcome {
        content: Content::new(titles, body, tags),
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_rule_config;

    fn config() -> RuleConfig {
        let json = serde_json::json!({
            "meta": {"brand": "能恩全护", "direction": "防敏种草", "platform": "小红书"},
            "hard_rules": {
                "word_count": {"min": 0, "max": 10000},
                "titles": {"required_count": 3, "keywords": []},
                "hashtags": {"required": [
                    {"tag": "#能恩全护", "min_count": 1},
                    {"tag": "#防敏奶粉", "min_count": 1}
                ]},
                "forbidden_words": [
                    {"word": "新生儿", "category": "禁止词", "replacement": "初生宝宝", "exceptions": ["第一口奶粉"]},
                    {"word": "第一", "category": "禁绝对化", "replacement": "", "exceptions": ["第一口奶粉"]},
                    {"word": "过敏", "category": "禁止词", "replacement": "敏敏", "exceptions": []}
                ],
                "special_replacements": [
                    {"find": "第一口奶", "replace_with": ["第一口奶粉"], "skip_if_followed_by": "粉"}
                ],
                "structure": {"paragraphs": []}
            }
        });
        load_rule_config(&json.to_string()).unwrap()
    }

    #[test]
    fn replaces_forbidden_word_outside_exception_span() {
        let content = Content::new(Vec::new(), "新生儿适合喝第一口奶粉", "");
        let outcome = auto_fix(&content, &config());
        assert_eq!(outcome.content.body, "初生宝宝适合喝第一口奶粉");
        // 「新生儿」一条替换记录；「第一」无替换建议不修复；「第一口奶」后跟「粉」跳过
        assert_eq!(outcome.changes.len(), 1);
        let c = &outcome.changes[0];
        assert_eq!((c.old.as_str(), c.new.as_str(), c.count), ("新生儿", "初生宝宝", 1));
        assert_eq!(c.scope, ChangeScope::Body);
    }

    #[test]
    fn special_replacement_completes_bare_find() {
        let content = Content::new(Vec::new(), "宝宝的第一口奶很重要", "");
        let outcome = auto_fix(&content, &config());
        assert_eq!(outcome.content.body, "宝宝的第一口奶粉很重要");
        assert!(outcome
            .changes
            .iter()
            .any(|c| c.kind == ChangeKind::SpecialReplacement && c.count == 1));
    }

    #[test]
    fn fixes_each_title_with_its_own_record() {
        let content = Content::new(
            vec!["新生儿怎么选奶粉".to_string(), "过敏体质看过来".to_string()],
            "正文",
            "#能恩全护 #防敏奶粉",
        );
        let outcome = auto_fix(&content, &config());
        assert_eq!(outcome.content.titles[0], "初生宝宝怎么选奶粉");
        assert_eq!(outcome.content.titles[1], "敏敏体质看过来");
        assert!(outcome
            .changes
            .iter()
            .any(|c| c.scope == ChangeScope::Title(0) && c.old == "新生儿"));
        assert!(outcome
            .changes
            .iter()
            .any(|c| c.scope == ChangeScope::Title(1) && c.old == "过敏"));
    }

    #[test]
    fn problem_tags_rewritten_or_removed() {
        let content = Content::new(
            Vec::new(),
            "正文",
            "#能恩全护 #防敏感奶粉 #新生儿奶粉",
        );
        let outcome = auto_fix(&content, &config());
        // #新生儿奶粉 先被违禁词替换改写成 #初生宝宝奶粉，问题标签删除分支不再命中；
        // #防敏感奶粉 重写为 #防敏奶粉
        assert!(outcome.content.tags.contains("#防敏奶粉"));
        assert!(!outcome.content.tags.contains("#防敏感奶粉"));
        assert!(outcome
            .changes
            .iter()
            .any(|c| c.kind == ChangeKind::TagRewrite && c.new == "#防敏奶粉"));
    }

    #[test]
    fn missing_required_tags_appended_once() {
        let content = Content::new(Vec::new(), "正文", "#能恩全护");
        let outcome = auto_fix(&content, &config());
        assert_eq!(outcome.content.tags, "#能恩全护 #防敏奶粉");
        let completions: Vec<_> = outcome
            .changes
            .iter()
            .filter(|c| c.kind == ChangeKind::TagCompletion)
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].new, "#防敏奶粉");
    }

    #[test]
    fn auto_fix_is_idempotent() {
        let content = Content::new(
            vec!["新生儿怎么选奶粉".to_string()],
            "新生儿宝宝的第一口奶很重要，过敏体质更要当心。",
            "#防敏感奶粉",
        );
        let first = auto_fix(&content, &config());
        assert!(!first.changes.is_empty());

        let second = auto_fix(&first.content, &config());
        assert!(
            second.changes.is_empty(),
            "second pass must be a no-op, got {:?}",
            second.changes
        );
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn exception_spans_survive_fixing() {
        let content = Content::new(Vec::new(), "第一口奶粉就选它", "");
        let outcome = auto_fix(&content, &config());
        // 「第一」落在例外跨度内：不替换也不记录
        assert_eq!(outcome.content.body, "第一口奶粉就选它");
        assert!(outcome.changes.iter().all(|c| c.old != "第一"));
    }
}
