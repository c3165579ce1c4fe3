//! 字数审核：正文中文字符数须落在配置区间内

use super::{CheckDetail, CheckId, CheckResult};
use crate::config::WordCountRule;
use crate::utils::count_cjk;

pub(super) fn check(body: &str, rule: &WordCountRule) -> CheckResult {
    let value = count_cjk(body);
    let pass = (rule.min..=rule.max).contains(&value);

    let message = if pass {
        format!("{value}字")
    } else if value < rule.min {
        format!("{value}字，不足{}字，还差{}字", rule.min, rule.min - value)
    } else {
        format!("{value}字，超过{}字上限，超出{}字", rule.max, value - rule.max)
    };

    CheckResult {
        id: CheckId::WordCount,
        name: "字数审核".to_string(),
        pass,
        message,
        detail: CheckDetail::WordCount {
            value,
            min: rule.min,
            max: rule.max,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: WordCountRule = WordCountRule { min: 3, max: 5 };

    #[test]
    fn passes_inside_bounds() {
        let r = check("一二三四，with latin", &RULE);
        assert!(r.pass);
        assert_eq!(r.message, "4字");
    }

    #[test]
    fn reports_overage() {
        let r = check("一二三四五六七八", &RULE);
        assert!(!r.pass);
        assert_eq!(r.message, "8字，超过5字上限，超出3字");
    }

    #[test]
    fn reports_shortfall() {
        let r = check("一二", &RULE);
        assert!(!r.pass);
        assert!(r.message.contains("不足3字"));
    }
}
