//! 必提关键词审核：按作用域（标题/正文）逐词检查字面出现

use super::{CheckDetail, CheckId, CheckResult};
use crate::config::RequiredKeywords;
use crate::content::Content;

fn missing_in(text: &str, keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|kw| !text.contains(kw.as_str()))
        .cloned()
        .collect()
}

pub(super) fn check(content: &Content, rule: &RequiredKeywords) -> CheckResult {
    let joined_titles = content.titles.join(" ");
    let title_missing = missing_in(&joined_titles, &rule.title);
    let body_missing = missing_in(&content.body, &rule.body);

    let pass = title_missing.is_empty() && body_missing.is_empty();
    let message = if pass {
        "必提关键词齐全".to_string()
    } else {
        let mut parts = Vec::new();
        if !title_missing.is_empty() {
            parts.push(format!("标题缺少：{}", title_missing.join("、")));
        }
        if !body_missing.is_empty() {
            parts.push(format!("正文缺少：{}", body_missing.join("、")));
        }
        parts.join("；")
    };

    CheckResult {
        id: CheckId::Keywords,
        name: "必提关键词审核".to_string(),
        pass,
        message,
        detail: CheckDetail::Keywords {
            title_missing,
            body_missing,
        },
    }
}
