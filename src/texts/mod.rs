//! # Texts 模块
//!
//! 文本条目定义与动态文案生成器。
//!
//! 条目要么是字面文本，要么是在被选中时才求值的生成器（如新年倒计时）。
//! 生成器失败时用配置的替代文本兜底，不会中断文本轮换。

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 文本条目
///
/// 在配置中，字面文本直接写字符串，生成器写成对象：
/// `{"generator": "days_to_lunar_new_year"}`。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextEntry {
    /// 字面文本
    Literal(String),
    /// 选中时求值的生成器
    Generated {
        /// 生成器种类
        generator: GeneratorKind,
    },
}

impl TextEntry {
    /// 解析条目为字面文本
    ///
    /// 生成器在此刻求值；求值失败时返回 `fallback`。
    pub fn resolve(&self, fallback: &str) -> String {
        match self {
            TextEntry::Literal(text) => text.clone(),
            TextEntry::Generated { generator } => {
                resolve_produced(generator.produce(Local::now().date_naive()), fallback)
            }
        }
    }
}

/// 将生成结果落到字面文本，失败时兜底
fn resolve_produced(produced: Result<String, String>, fallback: &str) -> String {
    match produced {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "文案生成失败，使用替代文本");
            fallback.to_string()
        }
    }
}

/// 文案生成器种类
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// 距离下一个春节的天数
    DaysToLunarNewYear,
    /// 距离下一个公历新年的天数
    DaysToNewYear,
}

impl GeneratorKind {
    /// 以 `today` 为基准生成文案
    pub fn produce(&self, today: NaiveDate) -> Result<String, String> {
        match self {
            GeneratorKind::DaysToLunarNewYear => {
                let days = days_to_lunar_new_year(today)?;
                Ok(format!("距离春节还有 {} 天", days))
            }
            GeneratorKind::DaysToNewYear => {
                let days = days_to_new_year(today)?;
                Ok(format!("距离新年还有 {} 天", days))
            }
        }
    }
}

/// 距离下一个春节的天数（当天算 0 天）
fn days_to_lunar_new_year(today: NaiveDate) -> Result<i64, String> {
    let this_year = lunar_new_year(today.year())?;
    let target = if today > this_year {
        lunar_new_year(today.year() + 1)?
    } else {
        this_year
    };
    Ok((target - today).num_days())
}

/// 距离下一个公历新年的天数（元旦当天算 0 天）
fn days_to_new_year(today: NaiveDate) -> Result<i64, String> {
    let year = if today.month() == 1 && today.day() == 1 {
        today.year()
    } else {
        today.year() + 1
    };
    let target = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| format!("无效的新年日期: {}-01-01", year))?;
    Ok((target - today).num_days())
}

/// 春节日期查表（农历无规则，超出表范围时取 1 月 21 日近似）
fn lunar_new_year(year: i32) -> Result<NaiveDate, String> {
    let (month, day) = match year {
        2024 => (2, 10),
        2025 => (1, 29),
        2026 => (2, 17),
        2027 => (2, 6),
        2028 => (1, 26),
        2029 => (2, 13),
        2030 => (2, 3),
        _ => (1, 21),
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("无效的春节日期: {}-{}-{}", year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_literal() {
        let entry = TextEntry::Literal("你好".to_string());
        assert_eq!(entry.resolve("兜底"), "你好");
    }

    #[test]
    fn test_resolve_produced_fallback() {
        assert_eq!(resolve_produced(Err("boom".to_string()), "兜底"), "兜底");
        assert_eq!(resolve_produced(Ok("ok".to_string()), "兜底"), "ok");
    }

    #[test]
    fn test_days_to_new_year() {
        // 12 月 31 日 → 1 天
        assert_eq!(days_to_new_year(date(2025, 12, 31)).unwrap(), 1);
        // 元旦当天 → 0 天
        assert_eq!(days_to_new_year(date(2026, 1, 1)).unwrap(), 0);
        // 年中
        assert_eq!(days_to_new_year(date(2026, 12, 30)).unwrap(), 2);
    }

    #[test]
    fn test_days_to_lunar_new_year() {
        // 2026 年春节是 2 月 17 日
        assert_eq!(days_to_lunar_new_year(date(2026, 1, 1)).unwrap(), 47);
        // 春节当天 → 0 天
        assert_eq!(days_to_lunar_new_year(date(2026, 2, 17)).unwrap(), 0);
        // 春节已过 → 指向下一年（2027-02-06）
        assert_eq!(days_to_lunar_new_year(date(2026, 2, 18)).unwrap(), 353);
    }

    #[test]
    fn test_lunar_table_fallback() {
        // 超出查表范围时取 1 月 21 日近似
        assert_eq!(lunar_new_year(2040).unwrap(), date(2040, 1, 21));
    }

    #[test]
    fn test_generator_produce() {
        let text = GeneratorKind::DaysToLunarNewYear
            .produce(date(2026, 1, 1))
            .unwrap();
        assert!(text.contains("47"));
        assert!(text.contains("春节"));

        let text = GeneratorKind::DaysToNewYear
            .produce(date(2025, 12, 31))
            .unwrap();
        assert!(text.contains("1"));
    }

    #[test]
    fn test_entry_serde_shapes() {
        // 字面文本直接是字符串
        let entry: TextEntry = serde_json::from_str("\"静谧与宁静\"").unwrap();
        assert!(matches!(entry, TextEntry::Literal(_)));

        // 生成器是对象
        let entry: TextEntry =
            serde_json::from_str("{\"generator\": \"days_to_lunar_new_year\"}").unwrap();
        assert!(matches!(
            entry,
            TextEntry::Generated {
                generator: GeneratorKind::DaysToLunarNewYear
            }
        ));
    }
}
