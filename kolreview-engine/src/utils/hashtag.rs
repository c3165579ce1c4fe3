//! 话题标签提取与计数

use once_cell::sync::Lazy;
use regex::Regex;

/// 话题标签：# 后面跟到下一个空白或 # 为止
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[^\s#]+").unwrap());

/// 提取文本中的所有话题标签
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// 计算特定标签在文本中的出现次数
/// 支持「#标签 3」的数字后缀约定：后缀存在时直接按该数字计数
pub fn count_tag_occurrences(text: &str, tag: &str) -> usize {
    let pattern = format!(r"{}(?:\s+(\d+))?", regex::escape(tag));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            // 理论上不可达：pattern 由转义字面量拼接而来
            log::warn!("Tag pattern compilation failed: tag={} error={}", tag, e);
            return text.matches(tag).count();
        }
    };

    let mut total = 0;
    for caps in re.captures_iter(text) {
        if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
            return n;
        }
        total += 1;
    }
    total
}
