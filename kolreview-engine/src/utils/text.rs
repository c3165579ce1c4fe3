//! 中文文本统计与边界安全工具
//! 审核引擎全程使用字节索引（`str::find` 的返回值），本模块负责
//! 把任意字节偏移夹取到合法的字符边界，保证中文文本永远不会被从
//! 码点中间切开

use once_cell::sync::Lazy;
use regex::Regex;

/// 中日韩统一表意文字区（基本区）
static CJK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{4E00}-\u{9FFF}]").unwrap());

/// 统计中文字符数量（仅计 CJK 表意字，拉丁字母/数字/标点不计入）
pub fn count_cjk(text: &str) -> usize {
    CJK_RE.find_iter(text).count()
}

/// 向下夹取到字符边界（idx 超长时返回字符串长度）
#[inline]
pub fn clamp_floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// 向上夹取到字符边界（idx 超长时返回字符串长度）
#[inline]
pub fn clamp_ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// 截取匹配位置前后各 `radius` 个字符的上下文窗口
/// `start`/`len` 为字节单位（来自 `str::find`，必为字符边界）
pub fn context_window(text: &str, start: usize, len: usize, radius: usize) -> String {
    let end = (start + len).min(text.len());
    let before: String = {
        let mut chars: Vec<char> = text[..start].chars().rev().take(radius).collect();
        chars.reverse();
        chars.into_iter().collect()
    };
    let after: String = text[end..].chars().take(radius).collect();
    format!("{}{}{}", before, &text[start..end], after)
}
