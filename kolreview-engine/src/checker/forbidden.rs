//! 违禁词审核
//! 三路扫描：违禁词字面出现（带上下文例外压制）、特殊替换规则、
//! 标签内嵌违禁词（带安全白名单）。
//! 例外判定：匹配位置落在任一已配置例外子串的跨度内即压制该次出现，
//! 例外查找从「匹配位置 - 例外长度」处开始取第一次出现

use super::{CheckDetail, CheckId, CheckResult, SpecialViolation, TagViolation, WordViolation};
use crate::config::HardRules;
use crate::utils::{clamp_floor_char_boundary, context_window, extract_hashtags};

/// 违禁词上下文窗口半径（字符）
const WORD_CONTEXT_RADIUS: usize = 15;
/// 特殊替换上下文窗口半径（字符）
const SPECIAL_CONTEXT_RADIUS: usize = 10;

/// 匹配位置是否被某个例外子串的跨度覆盖
/// 例外是全局生效的：不与具体违禁词绑定（保留观察到的原始行为）
pub(crate) fn is_excepted(text: &str, idx: usize, exceptions: &[String]) -> bool {
    for exc in exceptions {
        if exc.is_empty() {
            continue;
        }
        let from = clamp_floor_char_boundary(text, idx.saturating_sub(exc.len()));
        if let Some(rel) = text[from..].find(exc.as_str()) {
            let exc_idx = from + rel;
            if exc_idx <= idx && idx < exc_idx + exc.len() {
                return true;
            }
        }
    }
    false
}

/// 从 idx 前进一个字符的字节步长
pub(crate) fn char_step(text: &str, idx: usize) -> usize {
    text[idx..].chars().next().map(char::len_utf8).unwrap_or(1)
}

pub(super) fn check(full_text: &str, rules: &HardRules) -> CheckResult {
    let mut violations = Vec::new();

    for fw in &rules.forbidden_words {
        let mut start = 0;
        while let Some(rel) = full_text[start..].find(fw.word.as_str()) {
            let idx = start + rel;
            if !is_excepted(full_text, idx, &fw.exceptions) {
                violations.push(WordViolation {
                    word: fw.word.clone(),
                    category: fw.category.clone(),
                    position: idx,
                    context: context_window(full_text, idx, fw.word.len(), WORD_CONTEXT_RADIUS),
                    replacement: fw.replacement.clone().unwrap_or_default(),
                });
            }
            // 逐字符推进，保持与重叠出现相同的扫描语义
            start = idx + char_step(full_text, idx);
        }
    }

    let mut special_violations = Vec::new();
    for rule in &rules.special_replacements {
        let mut start = 0;
        while let Some(rel) = full_text[start..].find(rule.find.as_str()) {
            let idx = start + rel;
            let after = idx + rule.find.len();
            let followed = rule
                .skip_if_followed_by
                .as_deref()
                .map(|suffix| full_text[after..].starts_with(suffix))
                .unwrap_or(false);
            if !followed {
                special_violations.push(SpecialViolation {
                    find: rule.find.clone(),
                    context: context_window(full_text, idx, rule.find.len(), SPECIAL_CONTEXT_RADIUS),
                    replace_with: rule.replacement().to_string(),
                    description: rule.description.clone(),
                });
            }
            start = idx + char_step(full_text, idx);
        }
    }

    let mut tag_violations = Vec::new();
    for tag in extract_hashtags(full_text) {
        if rules.hashtags.safe.iter().any(|safe| safe == &tag) {
            continue;
        }
        for fw in &rules.forbidden_words {
            if tag.contains(fw.word.as_str()) {
                tag_violations.push(TagViolation {
                    tag: tag.clone(),
                    word: fw.word.clone(),
                });
            }
        }
    }

    let pass = violations.is_empty() && special_violations.is_empty() && tag_violations.is_empty();
    let message = if pass {
        "未发现违禁词".to_string()
    } else {
        format!(
            "发现{}处违禁词、{}处特殊违规、{}处标签违规",
            violations.len(),
            special_violations.len(),
            tag_violations.len()
        )
    };

    CheckResult {
        id: CheckId::ForbiddenWords,
        name: "违禁词审核".to_string(),
        pass,
        message,
        detail: CheckDetail::ForbiddenWords {
            violations,
            special_violations,
            tag_violations,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ForbiddenWordRule, HashtagRules, RequiredKeywords, SpecialReplacement, StructureRule,
        TitleRule, WordCountRule,
    };

    fn rules(
        forbidden: Vec<ForbiddenWordRule>,
        special: Vec<SpecialReplacement>,
        safe: Vec<String>,
    ) -> HardRules {
        HardRules {
            word_count: WordCountRule { min: 0, max: 10_000 },
            titles: TitleRule { required_count: 3, keywords: Vec::new() },
            required_keywords: RequiredKeywords::default(),
            hashtags: HashtagRules { required: Vec::new(), safe },
            forbidden_words: forbidden,
            special_replacements: special,
            structure: StructureRule { paragraphs: Vec::new() },
        }
    }

    fn fw(word: &str, replacement: &str, exceptions: &[&str]) -> ForbiddenWordRule {
        ForbiddenWordRule {
            word: word.into(),
            category: "禁止词".into(),
            replacement: if replacement.is_empty() { None } else { Some(replacement.into()) },
            exceptions: exceptions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn match_inside_exception_span_is_suppressed() {
        // 「第一」被禁，但「第一口奶粉」里的「第一」落在例外跨度内
        let rules = rules(vec![fw("第一", "领先", &["第一口奶粉"])], Vec::new(), Vec::new());
        let r = check("这是第一口奶粉没问题", &rules);
        assert!(r.pass, "{}", r.message);
    }

    #[test]
    fn unrelated_exception_does_not_suppress() {
        // 例外串与违禁词无关时不压制：文本里找不到覆盖匹配位置的例外跨度
        let rules = rules(
            vec![fw("新生儿", "初生宝宝", &["第一口奶粉"])],
            Vec::new(),
            Vec::new(),
        );
        let r = check("新生儿适合喝第一口奶粉", &rules);
        assert!(!r.pass);
        match &r.detail {
            CheckDetail::ForbiddenWords { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].word, "新生儿");
                assert_eq!(violations[0].position, 0);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn special_replacement_skips_when_followed_by_suffix() {
        let special = SpecialReplacement {
            find: "第一口奶".into(),
            replace_options: vec!["第一口奶粉".into()],
            skip_if_followed_by: Some("粉".into()),
            description: String::new(),
        };
        let rules = rules(Vec::new(), vec![special], Vec::new());

        assert!(check("推荐第一口奶粉", &rules).pass);

        let r = check("宝宝的第一口奶很重要", &rules);
        assert!(!r.pass);
        match &r.detail {
            CheckDetail::ForbiddenWords { special_violations, .. } => {
                assert_eq!(special_violations.len(), 1);
                assert_eq!(special_violations[0].replace_with, "第一口奶粉");
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn tags_with_embedded_forbidden_words_flagged_unless_safelisted() {
        let rules = rules(
            vec![fw("新生儿", "初生宝宝", &[])],
            Vec::new(),
            vec!["#新生儿专用".into()],
        );
        let r = check("正文\n#新生儿奶粉 #新生儿专用", &rules);
        match &r.detail {
            CheckDetail::ForbiddenWords { tag_violations, violations, .. } => {
                // 白名单里的 #新生儿专用 不算标签违规
                assert_eq!(tag_violations.len(), 1);
                assert_eq!(tag_violations[0].tag, "#新生儿奶粉");
                // 两个标签里的「新生儿」仍是违禁词字面出现
                assert_eq!(violations.len(), 2);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn context_window_wraps_the_match() {
        let rules = rules(vec![fw("过敏", "敏感", &[])], Vec::new(), Vec::new());
        let r = check("宝宝最近总是过敏难受得很", &rules);
        match &r.detail {
            CheckDetail::ForbiddenWords { violations, .. } => {
                assert!(violations[0].context.contains("过敏"));
                assert!(violations[0].context.contains("宝宝"));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }
}
