//! 期限日の抽出
//!
//! QRコードのテキストから日付らしい部分文字列を左から順に探し、
//! 暦として正しいもののうち最も遅い日付を `YYYY-MM-DD` で返す。
//!
//! 認識する書式は (正規表現, フィールド順) の組で差し替え可能:
//! - `2025-12-31` → 年-月-日
//! - `31/12/2025` → 日/月/年

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// 西暦0年以下は日付として扱わない
pub(crate) const MIN_YEAR: i32 = 1;
use regex::{Captures, Regex};

/// 3つのキャプチャグループの並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    YearMonthDay,
    DayMonthYear,
}

impl FieldOrder {
    /// (年, 月, 日) の順に並べ替える
    fn arrange<'a>(&self, fields: [&'a str; 3]) -> (&'a str, &'a str, &'a str) {
        match self {
            FieldOrder::YearMonthDay => (fields[0], fields[1], fields[2]),
            FieldOrder::DayMonthYear => (fields[2], fields[1], fields[0]),
        }
    }
}

/// 日付書式1件分
#[derive(Debug, Clone)]
pub struct DatePattern {
    regex: Regex,
    order: FieldOrder,
}

impl DatePattern {
    /// 正規表現はちょうど3つのキャプチャグループを持つこと
    pub fn new(pattern: &str, order: FieldOrder) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() != 4 {
            return Err(Error::InvalidPattern(format!(
                "{}: 3つのキャプチャグループが必要です（{}個）",
                pattern,
                regex.captures_len() - 1
            )));
        }
        Ok(Self { regex, order })
    }

}

lazy_static::lazy_static! {
    static ref DEFAULT_EXTRACTOR: DateExtractor = DateExtractor::new(vec![
        DatePattern::new(r"\b(\d{4})-(\d{2})-(\d{2})\b", FieldOrder::YearMonthDay).unwrap(),
        DatePattern::new(r"\b(\d{2})/(\d{2})/(\d{4})\b", FieldOrder::DayMonthYear).unwrap(),
    ]).unwrap();
}

/// 複数の日付書式をまとめて走査する抽出器
///
/// 書式は1本の選択正規表現に結合するので、書式をまたいでも
/// マッチは重ならず左から順に拾われる。
#[derive(Debug, Clone)]
pub struct DateExtractor {
    combined: Option<Regex>,
    patterns: Vec<DatePattern>,
    /// 各書式の外側グループ番号
    group_offsets: Vec<usize>,
}

impl DateExtractor {
    pub fn new(patterns: Vec<DatePattern>) -> Result<Self> {
        let mut offsets = Vec::with_capacity(patterns.len());
        let mut next = 1;
        for pattern in &patterns {
            offsets.push(next);
            // 外側グループ1つ + 内側グループ3つ
            next += pattern.regex.captures_len();
        }

        let alternation = patterns
            .iter()
            .map(|p| format!("({})", p.regex.as_str()))
            .collect::<Vec<_>>()
            .join("|");
        let combined = if alternation.is_empty() {
            None
        } else {
            Some(Regex::new(&alternation)?)
        };

        Ok(Self {
            combined,
            patterns,
            group_offsets: offsets,
        })
    }

    /// 暦として正しい候補日をすべて出現順に返す
    pub fn candidates(&self, text: &str) -> Vec<NaiveDate> {
        let Some(combined) = &self.combined else {
            return Vec::new();
        };
        combined
            .captures_iter(text)
            .filter_map(|caps| self.parse_match(&caps))
            .collect()
    }

    /// 最も遅い候補日を `YYYY-MM-DD` で返す
    pub fn extract(&self, text: &str) -> Option<String> {
        self.candidates(text)
            .into_iter()
            .max()
            .map(|date| date.format("%Y-%m-%d").to_string())
    }

    fn parse_match(&self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let (pattern, offset) = self
            .patterns
            .iter()
            .zip(&self.group_offsets)
            .find(|&(_, &offset)| caps.get(offset).is_some())?;

        let field = |i: usize| caps.get(*offset + i).map(|m| m.as_str()).unwrap_or("");
        let (year, month, day) = pattern.order.arrange([field(1), field(2), field(3)]);

        let year: i32 = year.parse().ok()?;
        if year < MIN_YEAR {
            return None;
        }
        // 月13などは黙って捨てる
        NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

/// 既定の2書式でテキストから期限日を抽出する
///
/// # Examples
/// ```
/// use qr_expiry_common::extract_expiry_date;
///
/// let date = extract_expiry_date("MFG 2023-05-01 EXP 31/12/2025");
/// assert_eq!(date.as_deref(), Some("2025-12-31"));
/// ```
pub fn extract_expiry_date(text: &str) -> Option<String> {
    DEFAULT_EXTRACTOR.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dates() {
        assert_eq!(extract_expiry_date("no dates here"), None);
        assert_eq!(extract_expiry_date(""), None);
        assert_eq!(extract_expiry_date("LOT 12345678"), None);
    }

    #[test]
    fn test_single_iso_date() {
        assert_eq!(extract_expiry_date("EXP 2099-01-01").as_deref(), Some("2099-01-01"));
    }

    #[test]
    fn test_single_day_first_date_is_reformatted() {
        assert_eq!(extract_expiry_date("BB 05/03/2024").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_latest_date_wins() {
        let text = "MFG 2023-05-01 EXP 2025-12-31";
        assert_eq!(extract_expiry_date(text).as_deref(), Some("2025-12-31"));

        let text = "EXP 2025-12-31 MFG 2023-05-01";
        assert_eq!(extract_expiry_date(text).as_deref(), Some("2025-12-31"));
    }

    #[test]
    fn test_latest_across_formats() {
        let text = "made 2024-06-30; best before 01/07/2024";
        assert_eq!(extract_expiry_date(text).as_deref(), Some("2024-07-01"));
    }

    #[test]
    fn test_invalid_calendar_values_are_dropped() {
        assert_eq!(extract_expiry_date("EXP 2024-13-01"), None);
        assert_eq!(extract_expiry_date("EXP 31/02/2024"), None);
        // 不正な候補だけ捨てて残りを採用
        let text = "2030-02-30 2024-02-29";
        assert_eq!(extract_expiry_date(text).as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn test_year_zero_is_dropped() {
        assert_eq!(extract_expiry_date("EXP 0000-05-05"), None);
        assert_eq!(extract_expiry_date("EXP 05/05/0000"), None);
        let text = "0000-12-31 0001-01-01";
        assert_eq!(extract_expiry_date(text).as_deref(), Some("0001-01-01"));
    }

    #[test]
    fn test_word_boundaries() {
        // 数字に埋もれた日付は拾わない
        assert_eq!(extract_expiry_date("X12024-01-015"), None);
        assert_eq!(extract_expiry_date("lot=2024-01-15;").as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_overlapping_matches_are_consumed_left_to_right() {
        // 日/月/年の一致が先に文字を消費するので後ろの年-月-日は拾わない
        let text = "12/05/2023-09-01";
        assert_eq!(extract_expiry_date(text).as_deref(), Some("2023-05-12"));
    }

    #[test]
    fn test_candidates_in_order() {
        let extractor = DateExtractor::default();
        let dates = extractor.candidates("01/01/2020 2019-12-31 99/99/9999");
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
            ]
        );
    }

    #[test]
    fn test_custom_pattern_table() {
        let extractor = DateExtractor::new(vec![DatePattern::new(
            r"(\d{4})\.(\d{2})\.(\d{2})",
            FieldOrder::YearMonthDay,
        )
        .unwrap()])
        .unwrap();
        assert_eq!(extractor.extract("2026.04.01").as_deref(), Some("2026-04-01"));
        assert_eq!(extractor.extract("2026-04-01"), None);
    }

    #[test]
    fn test_pattern_requires_three_groups() {
        let err = DatePattern::new(r"(\d{4})-(\d{2})", FieldOrder::YearMonthDay).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_pattern_compile_error() {
        let err = DatePattern::new(r"(\d{4}", FieldOrder::YearMonthDay).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn test_empty_pattern_table_never_matches() {
        let extractor = DateExtractor::new(Vec::new()).unwrap();
        assert_eq!(extractor.extract("2024-01-01"), None);
    }
}
