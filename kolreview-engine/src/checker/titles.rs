//! 标题审核：数量精确匹配 + 标题必提关键词

use super::{CheckDetail, CheckId, CheckResult, TitleKeywordHit};
use crate::config::TitleRule;

pub(super) fn check_count(titles: &[String], rule: &TitleRule) -> CheckResult {
    let actual = titles.len();
    let pass = actual == rule.required_count;
    CheckResult {
        id: CheckId::TitleCount,
        name: "标题数量审核".to_string(),
        pass,
        message: if pass {
            format!("{actual}个标题")
        } else {
            format!("需要{}个标题，当前{}个", rule.required_count, actual)
        },
        detail: CheckDetail::TitleCount {
            actual,
            required: rule.required_count,
        },
    }
}

pub(super) fn check_keywords(titles: &[String], rule: &TitleRule) -> CheckResult {
    let all_titles = titles.join(" ");
    let mut details = Vec::with_capacity(rule.keywords.len());

    for kw in &rule.keywords {
        let found = all_titles.contains(kw.as_str());
        let found_in_titles = if found {
            titles
                .iter()
                .enumerate()
                .filter(|(_, t)| t.contains(kw.as_str()))
                .map(|(i, _)| i + 1)
                .collect()
        } else {
            Vec::new()
        };
        details.push(TitleKeywordHit {
            keyword: kw.clone(),
            found,
            found_in_titles,
        });
    }

    let missing: Vec<String> = details
        .iter()
        .filter(|d| !d.found)
        .map(|d| d.keyword.clone())
        .collect();
    let pass = missing.is_empty();

    CheckResult {
        id: CheckId::TitleKeywords,
        name: "标题关键词审核".to_string(),
        pass,
        message: if pass {
            "标题关键词齐全".to_string()
        } else {
            format!("标题缺少关键词：{}", missing.join("、"))
        },
        detail: CheckDetail::TitleKeywords { details, missing },
    }
}
