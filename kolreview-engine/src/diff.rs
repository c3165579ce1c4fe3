//! 文本对比引擎
//! 字符级最长公共子序列对齐，输出带标注的分段序列。
//! 无状态工具：行内高亮和导出文档标注共用同一算法与同一分段契约。
//! 无损往返不变量：所有分段的 before 侧拼接 == 原文，after 侧拼接 == 新文

use serde::Serialize;

/// DP 表规模上限（单元格数）：中间段超限时整段降级为一个 Replace，
/// 不变量不受影响，只是粒度变粗
const MAX_DP_CELLS: usize = 4_000_000;

/// 分段类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// 两侧相同，原样渲染
    Equal,
    /// 仅出现在 after 侧（新增，绿色）
    Insert,
    /// 仅出现在 before 侧（删除，红色划线）
    Delete,
    /// 两侧都渲染（before 黄底划线，after 绿色）
    Replace,
}

/// 一个对比分段
/// Equal 两侧文本相同；Insert 的 before 为空；Delete 的 after 为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub before: String,
    pub after: String,
}

impl DiffSegment {
    fn equal(text: String) -> Self {
        Self {
            kind: DiffKind::Equal,
            before: text.clone(),
            after: text,
        }
    }

    fn insert(text: String) -> Self {
        Self {
            kind: DiffKind::Insert,
            before: String::new(),
            after: text,
        }
    }

    fn delete(text: String) -> Self {
        Self {
            kind: DiffKind::Delete,
            before: text,
            after: String::new(),
        }
    }

    fn replace(before: String, after: String) -> Self {
        Self {
            kind: DiffKind::Replace,
            before,
            after,
        }
    }
}

/// 单字符对齐操作
enum Op {
    Equal(char),
    Delete(char),
    Insert(char),
}

/// 对比两段文本，返回覆盖双方全长的有序分段序列
pub fn diff_chars(before: &str, after: &str) -> Vec<DiffSegment> {
    if before == after {
        if before.is_empty() {
            return Vec::new();
        }
        return vec![DiffSegment::equal(before.to_string())];
    }

    let a: Vec<char> = before.chars().collect();
    let b: Vec<char> = after.chars().collect();

    // 公共前缀 / 公共后缀先行剥离，DP 只对齐中间段
    let mut prefix = 0;
    while prefix < a.len() && prefix < b.len() && a[prefix] == b[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < a.len() - prefix && suffix < b.len() - prefix
        && a[a.len() - 1 - suffix] == b[b.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];

    let mut segments = Vec::new();
    if prefix > 0 {
        segments.push(DiffSegment::equal(a[..prefix].iter().collect()));
    }
    segments.extend(group_ops(align(mid_a, mid_b)));
    if suffix > 0 {
        segments.push(DiffSegment::equal(a[a.len() - suffix..].iter().collect()));
    }

    merge_adjacent(segments)
}

/// LCS 动态规划 + 回溯，产出单字符操作流
fn align(a: &[char], b: &[char]) -> Vec<Op> {
    if a.is_empty() {
        return b.iter().map(|&c| Op::Insert(c)).collect();
    }
    if b.is_empty() {
        return a.iter().map(|&c| Op::Delete(c)).collect();
    }
    let (n, m) = (a.len(), b.len());
    if n.saturating_mul(m) > MAX_DP_CELLS {
        log::debug!("Diff input too large for DP ({n}x{m}), degrading to coarse replace");
        let mut ops: Vec<Op> = a.iter().map(|&c| Op::Delete(c)).collect();
        ops.extend(b.iter().map(|&c| Op::Insert(c)));
        return ops;
    }

    // dp[i][j] = a[..i] 与 b[..j] 的 LCS 长度（扁平存储）
    let width = m + 1;
    let mut dp = vec![0u32; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            dp[i * width + j] = if a[i - 1] == b[j - 1] {
                dp[(i - 1) * width + (j - 1)] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + (j - 1)])
            };
        }
    }

    let mut ops_rev = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            ops_rev.push(Op::Equal(a[i - 1]));
            i -= 1;
            j -= 1;
        } else if dp[(i - 1) * width + j] >= dp[i * width + (j - 1)] {
            ops_rev.push(Op::Delete(a[i - 1]));
            i -= 1;
        } else {
            ops_rev.push(Op::Insert(b[j - 1]));
            j -= 1;
        }
    }
    while i > 0 {
        ops_rev.push(Op::Delete(a[i - 1]));
        i -= 1;
    }
    while j > 0 {
        ops_rev.push(Op::Insert(b[j - 1]));
        j -= 1;
    }
    ops_rev.reverse();
    ops_rev
}

/// 把单字符操作流聚合成分段：
/// 相邻的删除串 + 插入串合并为一个 Replace
fn group_ops(ops: Vec<Op>) -> Vec<DiffSegment> {
    let mut segments = Vec::new();
    let mut deleted = String::new();
    let mut inserted = String::new();

    let flush = |segments: &mut Vec<DiffSegment>, deleted: &mut String, inserted: &mut String| {
        match (deleted.is_empty(), inserted.is_empty()) {
            (false, false) => segments.push(DiffSegment::replace(
                std::mem::take(deleted),
                std::mem::take(inserted),
            )),
            (false, true) => segments.push(DiffSegment::delete(std::mem::take(deleted))),
            (true, false) => segments.push(DiffSegment::insert(std::mem::take(inserted))),
            (true, true) => {}
        }
    };

    let mut equal_run = String::new();
    for op in ops {
        match op {
            Op::Equal(c) => {
                flush(&mut segments, &mut deleted, &mut inserted);
                equal_run.push(c);
            }
            Op::Delete(c) => {
                if !equal_run.is_empty() {
                    segments.push(DiffSegment::equal(std::mem::take(&mut equal_run)));
                }
                deleted.push(c);
            }
            Op::Insert(c) => {
                if !equal_run.is_empty() {
                    segments.push(DiffSegment::equal(std::mem::take(&mut equal_run)));
                }
                inserted.push(c);
            }
        }
    }
    if !equal_run.is_empty() {
        segments.push(DiffSegment::equal(equal_run));
    }
    flush(&mut segments, &mut deleted, &mut inserted);
    segments
}

/// 合并相邻同类分段（前缀 Equal 与中间段开头的 Equal 等场景）
fn merge_adjacent(segments: Vec<DiffSegment>) -> Vec<DiffSegment> {
    let mut merged: Vec<DiffSegment> = Vec::with_capacity(segments.len());
    for seg in segments {
        match merged.last_mut() {
            Some(last) if last.kind == seg.kind => {
                last.before.push_str(&seg.before);
                last.after.push_str(&seg.after);
            }
            _ => merged.push(seg),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(segments: &[DiffSegment]) -> (String, String) {
        let before = segments.iter().map(|s| s.before.as_str()).collect();
        let after = segments.iter().map(|s| s.after.as_str()).collect();
        (before, after)
    }

    #[test]
    fn round_trip_reconstructs_both_sides() {
        let cases = [
            ("", ""),
            ("相同的文本", "相同的文本"),
            ("", "全新插入的内容"),
            ("全部删除的内容", ""),
            ("新生儿适合喝第一口奶粉", "初生宝宝适合喝第一口奶粉"),
            ("a b", "a  b"),
            ("完全不同", "毫无交集的另一段"),
            ("宝宝过敏了很难受\n第二行", "宝宝敏敏了很难受\n第二行还加了字"),
        ];
        for (before, after) in cases {
            let segments = diff_chars(before, after);
            let (rb, ra) = reconstruct(&segments);
            assert_eq!(rb, before, "before-side round trip failed for {before:?}");
            assert_eq!(ra, after, "after-side round trip failed for {after:?}");
        }
    }

    #[test]
    fn equal_inputs_yield_single_equal_segment() {
        let segments = diff_chars("一样的", "一样的");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, DiffKind::Equal);
        assert_eq!(segments[0].before, segments[0].after);
    }

    #[test]
    fn pure_insert_and_delete_have_one_empty_side() {
        let segments = diff_chars("前后文", "前中后文");
        let insert: Vec<_> = segments.iter().filter(|s| s.kind == DiffKind::Insert).collect();
        assert_eq!(insert.len(), 1);
        assert_eq!(insert[0].after, "中");
        assert!(insert[0].before.is_empty());

        let segments = diff_chars("前中后文", "前后文");
        let delete: Vec<_> = segments.iter().filter(|s| s.kind == DiffKind::Delete).collect();
        assert_eq!(delete.len(), 1);
        assert_eq!(delete[0].before, "中");
        assert!(delete[0].after.is_empty());
    }

    #[test]
    fn substitution_becomes_replace_segment() {
        let segments = diff_chars("过敏体质", "敏敏体质");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, DiffKind::Replace);
        assert_eq!(segments[0].before, "过");
        assert_eq!(segments[0].after, "敏");
        assert_eq!(segments[1].kind, DiffKind::Equal);
        assert_eq!(segments[1].after, "敏体质");
    }

    #[test]
    fn whitespace_gets_no_special_treatment() {
        let segments = diff_chars("a b", "a  b");
        let (rb, ra) = reconstruct(&segments);
        assert_eq!(rb, "a b");
        assert_eq!(ra, "a  b");
        assert!(segments.iter().any(|s| s.kind == DiffKind::Insert && s.after == " "));
    }

    #[test]
    fn segments_cover_full_length_in_order() {
        let segments = diff_chars("甲乙丙丁", "甲戊丙己");
        for w in segments.windows(2) {
            // 相邻分段类别必不相同（已合并）
            assert_ne!(w[0].kind, w[1].kind);
        }
        let (rb, ra) = reconstruct(&segments);
        assert_eq!(rb, "甲乙丙丁");
        assert_eq!(ra, "甲戊丙己");
    }
}
