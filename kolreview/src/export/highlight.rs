//! 行内高亮渲染
//! 把对比分段渲染为前后两份 HTML：
//! - hl-bad（红色划线）：删除的文字，仅 before 侧
//! - hl-change（黄底划线）：被替换的原文，仅 before 侧
//! - hl-good（绿色底色）：新增/替换后的文字，仅 after 侧
//! Equal 分段两侧原样渲染

use kolreview_engine::{DiffKind, DiffSegment};

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_text(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

fn span(class: &str, text: &str) -> String {
    format!(r#"<span class="{class}">{}</span>"#, html_text(text))
}

/// 渲染对比分段为 (before_html, after_html)
pub fn render_diff_html(segments: &[DiffSegment]) -> (String, String) {
    let mut before = String::new();
    let mut after = String::new();

    for seg in segments {
        match seg.kind {
            DiffKind::Equal => {
                before.push_str(&html_text(&seg.before));
                after.push_str(&html_text(&seg.after));
            }
            DiffKind::Delete => {
                before.push_str(&span("hl-bad", &seg.before));
            }
            DiffKind::Insert => {
                after.push_str(&span("hl-good", &seg.after));
            }
            DiffKind::Replace => {
                before.push_str(&span("hl-change", &seg.before));
                after.push_str(&span("hl-good", &seg.after));
            }
        }
    }
    (before, after)
}
