//! 卖点必提词审核
//! Enforced 卖点：全部必提词逐字出现在正文中才算通过，并计入覆盖率；
//! Advisory 卖点：永远通过，不计入覆盖率

use super::{CheckDetail, CheckId, CheckResult, KeywordHit, ParagraphPoints, PointResult};
use crate::config::{PointRequirement, StructureRule};

pub(super) fn check(body: &str, rule: &StructureRule) -> CheckResult {
    let mut paragraphs = Vec::with_capacity(rule.paragraphs.len());
    let mut total = 0;
    let mut passed = 0;

    for para in &rule.paragraphs {
        let mut points = Vec::with_capacity(para.selling_points.len());
        for sp in &para.selling_points {
            match &sp.requirement {
                PointRequirement::Advisory => points.push(PointResult {
                    id: sp.id.clone(),
                    name: sp.name.clone(),
                    soft_only: true,
                    pass: true,
                    keywords: Vec::new(),
                    missing: Vec::new(),
                    paraphrase_ref: sp.paraphrase_ref.clone(),
                }),
                PointRequirement::Enforced { keywords } => {
                    total += 1;
                    let hits: Vec<KeywordHit> = keywords
                        .iter()
                        .map(|kw| KeywordHit {
                            keyword: kw.clone(),
                            found: body.contains(kw.as_str()),
                        })
                        .collect();
                    let missing: Vec<String> = hits
                        .iter()
                        .filter(|h| !h.found)
                        .map(|h| h.keyword.clone())
                        .collect();
                    let sp_pass = missing.is_empty();
                    if sp_pass {
                        passed += 1;
                    }
                    points.push(PointResult {
                        id: sp.id.clone(),
                        name: sp.name.clone(),
                        soft_only: false,
                        pass: sp_pass,
                        keywords: hits,
                        missing,
                        paraphrase_ref: sp.paraphrase_ref.clone(),
                    });
                }
            }
        }
        paragraphs.push(ParagraphPoints {
            paragraph_name: para.name.clone(),
            selling_points: points,
        });
    }

    let pass = passed == total;
    let message = if pass {
        format!("卖点必提词 {passed}/{total} 通过")
    } else {
        format!(
            "卖点必提词 {passed}/{total} 通过，{}个卖点有缺失",
            total - passed
        )
    };

    CheckResult {
        id: CheckId::SellingPoints,
        name: "卖点必提词审核".to_string(),
        pass,
        message,
        detail: CheckDetail::SellingPoints {
            total,
            passed,
            paragraphs,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParagraphSpec, SellingPoint};

    fn rule() -> StructureRule {
        StructureRule {
            paragraphs: vec![ParagraphSpec {
                name: "防敏科普".into(),
                anchor_keywords: Vec::new(),
                selling_points: vec![
                    SellingPoint {
                        id: "sp1".into(),
                        name: "防敏水解技术".into(),
                        requirement: PointRequirement::Enforced {
                            keywords: vec!["适度水解".into(), "小分子".into()],
                        },
                        paraphrase_ref: None,
                    },
                    SellingPoint {
                        id: "sp2".into(),
                        name: "口碑背书".into(),
                        requirement: PointRequirement::Advisory,
                        paraphrase_ref: Some("身边宝妈都在用".into()),
                    },
                ],
            }],
        }
    }

    #[test]
    fn enforced_point_needs_every_keyword() {
        let r = check("适度水解工艺不错，但没提到另一个词", &rule());
        assert!(!r.pass);
        match &r.detail {
            CheckDetail::SellingPoints { total, passed, paragraphs } => {
                assert_eq!((*total, *passed), (1, 0));
                let point = &paragraphs[0].selling_points[0];
                assert_eq!(point.missing, vec!["小分子".to_string()]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn advisory_point_never_fails_nor_counts() {
        let r = check("适度水解的小分子蛋白很温和", &rule());
        assert!(r.pass);
        assert_eq!(r.message, "卖点必提词 1/1 通过");
        match &r.detail {
            CheckDetail::SellingPoints { total, paragraphs, .. } => {
                // Advisory 卖点不计入 total
                assert_eq!(*total, 1);
                let advisory = &paragraphs[0].selling_points[1];
                assert!(advisory.soft_only && advisory.pass);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn zero_enforced_points_pass_vacuously() {
        let rule = StructureRule { paragraphs: Vec::new() };
        let r = check("随便什么正文", &rule);
        assert!(r.pass);
    }
}
