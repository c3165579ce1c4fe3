//! 文章结构审核
//! 不要求严格分段：用锚点关键词在全文中的首次出现位置做模糊定位，
//! 段落的定位值取其命中锚点的平均位置，再检查平均位置是否按配置顺序单调不减

use super::{CheckDetail, CheckId, CheckResult, ParagraphHit};
use crate::config::StructureRule;

pub(super) fn check(body: &str, rule: &StructureRule) -> CheckResult {
    let mut detected = Vec::with_capacity(rule.paragraphs.len());

    for spec in &rule.paragraphs {
        let mut positions = Vec::new();
        let mut found_keywords = Vec::new();
        for kw in &spec.anchor_keywords {
            if let Some(idx) = body.find(kw.as_str()) {
                positions.push(idx);
                found_keywords.push(kw.clone());
            }
        }
        let avg_position = if positions.is_empty() {
            None
        } else {
            Some(positions.iter().sum::<usize>() as f64 / positions.len() as f64)
        };
        detected.push(ParagraphHit {
            name: spec.name.clone(),
            found: avg_position.is_some(),
            found_keywords,
            total_anchor: spec.anchor_keywords.len(),
            avg_position,
        });
    }

    let missing_sections: Vec<String> = detected
        .iter()
        .filter(|d| !d.found)
        .map(|d| d.name.clone())
        .collect();
    let all_found = missing_sections.is_empty();

    // 顺序检查只看已命中的段落：配置顺序下平均位置须单调不减
    let found_positions: Vec<f64> = detected
        .iter()
        .filter_map(|d| d.avg_position)
        .collect();
    let order_correct = found_positions.windows(2).all(|w| w[0] <= w[1]);

    let expected_order: Vec<String> = rule.paragraphs.iter().map(|p| p.name.clone()).collect();
    let mut found_topics: Vec<(&String, f64)> = detected
        .iter()
        .filter_map(|d| d.avg_position.map(|p| (&d.name, p)))
        .collect();
    found_topics.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let actual_order: Vec<String> = found_topics.into_iter().map(|(n, _)| n.clone()).collect();

    let pass = all_found && order_correct;
    let message = if pass {
        "内容结构与顺序正确".to_string()
    } else if !missing_sections.is_empty() {
        format!("缺少内容：{}", missing_sections.join("、"))
    } else {
        format!("内容顺序不正确，当前：{}", actual_order.join("→"))
    };

    CheckResult {
        id: CheckId::Structure,
        name: "文章结构审核".to_string(),
        pass,
        message,
        detail: CheckDetail::Structure {
            detected,
            expected_order,
            actual_order,
            missing_sections,
            order_correct,
        },
    }
}
