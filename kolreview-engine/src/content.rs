//! 文案内容模型与解析器
//! 把粘贴/上传的原始文本拆分为 标题 / 正文 / 话题标签 三部分。
//! 解析器永不失败：识别不出结构时全部内容降级为正文，
//! 缺失的标题/标签由下游审核项报告为不通过，而不是解析错误。

use serde::{Deserialize, Serialize};

use crate::utils::count_cjk;

/// 一份待审核的文案内容
/// 值语义：每个审稿阶段持有自己的 Content 副本，阶段流转只产生新值，
/// 从不原地修改，保证历史阶段始终可供对比
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// 备选标题（有序，数量上限由配置决定）
    pub titles: Vec<String>,
    /// 正文（换行分段的自由文本）
    pub body: String,
    /// 话题标签行（原始字符串，空格分隔）
    pub tags: String,
}

impl Content {
    pub fn new(titles: Vec<String>, body: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            titles,
            body: body.into(),
            tags: tags.into(),
        }
    }

    /// 三部分是否全部为空（无可审核内容）
    pub fn is_empty(&self) -> bool {
        self.titles.iter().all(|t| t.trim().is_empty())
            && self.body.trim().is_empty()
            && self.tags.trim().is_empty()
    }

    /// 违禁词扫描使用的全文视图：标题 + 正文 + 标签按行拼接
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = self.titles.iter().map(|s| s.as_str()).collect();
        parts.push(&self.body);
        parts.push(&self.tags);
        parts.join("\n")
    }
}

/// 行分类所处的段区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Body,
    Skip,
}

/// 识别 brief 风格的段区标头行（如「一、标题备选」「二、正文」「大纲」）
/// 只对短行生效，避免把普通正文误判为标头
fn detect_section_header(line: &str) -> Option<Section> {
    if line.chars().count() > 12 {
        return None;
    }
    let label = line.trim_start_matches(|c: char| {
        c.is_ascii_digit() || "一二三四五六七八九十、．.:：（）() ".contains(c)
    });
    if label.contains("标题备选") || label.contains("备选标题") || label == "标题" {
        return Some(Section::Title);
    }
    if label == "正文" || label.starts_with("正文内容") {
        return Some(Section::Body);
    }
    if label.contains("大纲") || label.eq_ignore_ascii_case("brief") {
        return Some(Section::Skip);
    }
    None
}

/// 标题候选：不以 # 开头的 5~30 个中文字的短行
fn is_title_like(line: &str) -> bool {
    if line.starts_with('#') {
        return false;
    }
    let cjk = count_cjk(line);
    (5..=30).contains(&cjk)
}

/// 话题标签行：「话题标签」标注行，或 # 号出现 3 次以上的行
fn tag_line_payload(line: &str) -> Option<&str> {
    if line.contains("话题标签") {
        let rest = line
            .split_once('：')
            .or_else(|| line.split_once(':'))
            .map(|(_, r)| r)
            .unwrap_or("");
        return Some(rest.trim());
    }
    if line.matches('#').count() >= 3 {
        return Some(line);
    }
    None
}

/// 把原始文本解析为 Content
/// `title_limit` 来自规则配置的 `titles.required_count`：
/// 标题段最多捕获这么多行，之后自动切入正文段
pub fn parse_content(raw: &str, title_limit: usize) -> Content {
    let mut titles: Vec<String> = Vec::new();
    let mut body_lines: Vec<String> = Vec::new();
    let mut tag_parts: Vec<String> = Vec::new();
    let mut section = Section::Title;

    for line in raw.trim().lines() {
        let stripped = line.trim();

        if stripped.is_empty() {
            // 连续空行折叠为一个空行分隔符，正文开始前的空行丢弃
            if !body_lines.is_empty() && body_lines.last().map(|l| !l.is_empty()) == Some(true) {
                body_lines.push(String::new());
            }
            continue;
        }

        if let Some(next) = detect_section_header(stripped) {
            section = next;
            continue;
        }

        if let Some(payload) = tag_line_payload(stripped) {
            if !payload.is_empty() {
                tag_parts.push(payload.to_string());
            }
            continue;
        }

        match section {
            Section::Skip => continue,
            Section::Title => {
                if titles.len() < title_limit && is_title_like(stripped) {
                    titles.push(stripped.to_string());
                    if titles.len() >= title_limit {
                        section = Section::Body;
                    }
                } else {
                    section = Section::Body;
                    body_lines.push(stripped.to_string());
                }
            }
            Section::Body => body_lines.push(stripped.to_string()),
        }
    }

    let body = body_lines.join("\n").trim().to_string();
    Content {
        titles,
        body,
        tags: tag_parts.join(" "),
    }
}
