// 行内 HTML 高亮渲染
pub mod highlight;
// 审稿报告（Markdown）与终稿导出
pub mod report;

pub use highlight::render_diff_html;
pub use report::{render_clean_report, render_plain_document, render_review_report};
