//! 话题标签审核：每个必提标签的出现次数须达到最小要求

use super::{CheckDetail, CheckId, CheckResult, TagCount};
use crate::config::HashtagRules;
use crate::utils::count_tag_occurrences;

pub(super) fn check(tags_text: &str, rule: &HashtagRules) -> CheckResult {
    let mut details = Vec::with_capacity(rule.required.len());

    for req in &rule.required {
        let actual = count_tag_occurrences(tags_text, &req.tag);
        details.push(TagCount {
            tag: req.tag.clone(),
            required_count: req.min_count,
            actual_count: actual,
            pass: actual >= req.min_count,
        });
    }

    let missing: Vec<String> = details
        .iter()
        .filter(|d| !d.pass)
        .map(|d| d.tag.clone())
        .collect();
    let pass = missing.is_empty();

    CheckResult {
        id: CheckId::Hashtags,
        name: "话题标签审核".to_string(),
        pass,
        message: if pass {
            "话题标签齐全".to_string()
        } else {
            format!("缺少标签：{}", missing.join("、"))
        },
        detail: CheckDetail::Hashtags { details, missing },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RequiredTag;

    fn rule() -> HashtagRules {
        HashtagRules {
            required: vec![
                RequiredTag { tag: "#能恩全护".into(), min_count: 1 },
                RequiredTag { tag: "#适度水解".into(), min_count: 1 },
                RequiredTag { tag: "#防敏奶粉".into(), min_count: 1 },
            ],
            safe: Vec::new(),
        }
    }

    #[test]
    fn reports_missing_required_tags() {
        let r = check("#能恩全护 #适度水解", &rule());
        assert!(!r.pass);
        assert_eq!(r.message, "缺少标签：#防敏奶粉");
        match &r.detail {
            CheckDetail::Hashtags { missing, .. } => {
                assert_eq!(missing, &vec!["#防敏奶粉".to_string()]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn numeric_suffix_satisfies_min_count() {
        let mut rule = rule();
        rule.required[0].min_count = 3;
        let r = check("#能恩全护 3 #适度水解 #防敏奶粉", &rule);
        assert!(r.pass);
    }
}
