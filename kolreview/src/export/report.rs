//! 审稿报告导出（Markdown）
//! 消费内核的对比分段流与最终 Content：
//! - 标注版报告：~~删除线~~ = 删除/被替换原文，**加粗** = 新增/替换后
//! - 终稿导出：无标注的干净文档

use kolreview_engine::{ChangeKind, ChangeRecord, CheckResult, Content, DiffKind, DiffSegment};

/// 按行包裹标注符号（标注符号不能跨行）
fn wrap_lines(text: &str, marker: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{marker}{line}{marker}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 把对比分段渲染为带标注的 Markdown 正文
fn render_annotated_body(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg.kind {
            DiffKind::Equal => out.push_str(&seg.after),
            DiffKind::Delete => out.push_str(&wrap_lines(&seg.before, "~~")),
            DiffKind::Insert => out.push_str(&wrap_lines(&seg.after, "**")),
            DiffKind::Replace => {
                out.push_str(&wrap_lines(&seg.before, "~~"));
                out.push_str(&wrap_lines(&seg.after, "**"));
            }
        }
    }
    out
}

fn change_old_label(change: &ChangeRecord) -> &str {
    if change.old.is_empty() {
        "(缺失)"
    } else {
        &change.old
    }
}

fn change_new_label(change: &ChangeRecord) -> &str {
    match change.kind {
        ChangeKind::TagRemoval => "(删除)",
        _ => &change.new,
    }
}

/// 渲染完整的审稿对比报告
pub fn render_review_report(
    title_label: &str,
    titles: &[String],
    segments: &[DiffSegment],
    tags: &str,
    results: &[CheckResult],
    changes: &[&ChangeRecord],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {title_label}\n\n"));

    for (i, title) in titles.iter().enumerate() {
        out.push_str(&format!("**标题{}：**{}\n\n", i + 1, title));
    }

    out.push_str("## 正文（标注版）\n\n");
    out.push_str(&render_annotated_body(segments));
    out.push_str("\n\n## 话题标签\n\n");
    out.push_str(tags);
    out.push('\n');

    out.push_str("\n## 审核结果\n\n");
    out.push_str("| 检查项 | 结果 | 说明 |\n|---|---|---|\n");
    for r in results {
        let mark = if r.pass { "✅" } else { "❌" };
        out.push_str(&format!("| {} | {} | {} |\n", r.name, mark, r.message));
    }

    out.push_str("\n## 修改记录\n\n");
    if changes.is_empty() {
        out.push_str("无\n");
    } else {
        for c in changes {
            out.push_str(&format!(
                "- {}：「{}」→「{}」 ×{}（{}）\n",
                c.kind.label(),
                change_old_label(c),
                change_new_label(c),
                c.count,
                c.scope.label()
            ));
        }
    }

    out.push_str("\n【标注说明】~~删除线~~ = 删除/被替换原文；**加粗** = 新增/替换后\n");
    out
}

/// 渲染干净的终稿文档（无标注）
pub fn render_clean_report(content: &Content) -> String {
    let mut out = String::new();
    out.push_str("# 终稿\n\n");
    for (i, title) in content.titles.iter().enumerate() {
        out.push_str(&format!("**标题{}：**{}\n\n", i + 1, title));
    }
    out.push_str(&content.body);
    out.push_str("\n\n");
    out.push_str(&content.tags);
    out.push('\n');
    out
}

/// 纯文本文档（标题 + 正文 + 标签），供 --out 落盘后继续编辑
pub fn render_plain_document(content: &Content) -> String {
    let mut out = String::new();
    for title in &content.titles {
        out.push_str(title);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&content.body);
    out.push_str("\n\n");
    out.push_str(&content.tags);
    out.push('\n');
    out
}
