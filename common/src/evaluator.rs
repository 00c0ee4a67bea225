//! 期限判定
//!
//! `classify` と `remaining` はそれぞれ独立に現在時刻を読む。
//! 期限当日は classify では「有効」、remaining では「本日期限」になる。
//! 2つの比較は統合しないこと（日付をまたぐ瞬間の表示が変わる）。

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::extractor::{extract_expiry_date, MIN_YEAR};
use crate::types::{ExpiryStatus, RemainingDuration, ScanResult, UnavailableReason};

const SECONDS_PER_DAY: i64 = 86_400;

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `YYYY-MM-DD` を解釈する。空文字は「日付なし」扱い
fn parse_expiry(expiry: Option<&str>) -> Result<NaiveDate, UnavailableReason> {
    match expiry {
        None => Err(UnavailableReason::NoDateFound),
        Some(s) if s.is_empty() => Err(UnavailableReason::NoDateFound),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .filter(|date| date.year() >= MIN_YEAR)
            .ok_or(UnavailableReason::InvalidFormat),
    }
}

/// 期限日を現在時刻で分類する
pub fn classify(expiry: Option<&str>) -> ExpiryStatus {
    classify_at(expiry, now())
}

pub fn classify_at(expiry: Option<&str>, now: NaiveDateTime) -> ExpiryStatus {
    match parse_expiry(expiry) {
        Err(UnavailableReason::NoDateFound) => ExpiryStatus::NoDateFound,
        Err(UnavailableReason::InvalidFormat) => ExpiryStatus::InvalidFormat,
        Ok(date) if now.date() > date => ExpiryStatus::Expired,
        Ok(_) => ExpiryStatus::Valid,
    }
}

/// 期限までの残り期間を現在時刻で計算する
pub fn remaining(expiry: Option<&str>) -> RemainingDuration {
    remaining_at(expiry, now())
}

pub fn remaining_at(expiry: Option<&str>, now: NaiveDateTime) -> RemainingDuration {
    let date = match parse_expiry(expiry) {
        Ok(date) => date,
        Err(reason) => return RemainingDuration::Unavailable(reason),
    };

    if now.date() > date {
        return RemainingDuration::AlreadyExpired;
    }

    // 期限日0時までの経過秒を日単位で切り捨て
    let span = date.and_time(NaiveTime::MIN) - now;
    let days = span.num_seconds().div_euclid(SECONDS_PER_DAY);

    if days > 0 {
        RemainingDuration::Days(days)
    } else {
        RemainingDuration::Today
    }
}

/// ペイロード1件を 抽出 → 分類 → 残り期間 まで通して評価する
pub fn evaluate_payload(payload: &str) -> ScanResult {
    let expiry = extract_expiry_date(payload);
    let status = classify(expiry.as_deref());
    let duration = remaining(expiry.as_deref());
    ScanResult::new(payload, status.to_string(), duration.to_string())
}

pub fn evaluate_payload_at(payload: &str, now: NaiveDateTime) -> ScanResult {
    let expiry = extract_expiry_date(payload);
    let status = classify_at(expiry.as_deref(), now);
    let duration = remaining_at(expiry.as_deref(), now);
    ScanResult::new(payload, status.to_string(), duration.to_string())
}
