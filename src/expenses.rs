//! Expense ledger: append-only log plus today's total.

use chrono::{DateTime, Local, NaiveTime, TimeZone};

use crate::store::Store;

pub(crate) fn log_expense(store: &Store, item: &str, amount: f64) -> Result<String, String> {
    let item = item.trim();
    if item.is_empty() {
        return Ok("지출 항목을 입력해 주세요.".to_string());
    }
    store.log_expense(item, amount, Local::now().timestamp())?;
    Ok(format!(
        "💸 '{item}' {}원을 지출 내역에 기록했습니다.",
        format_won(amount)
    ))
}

/// Total over [local midnight, now). A NULL sum means no rows today.
pub(crate) fn summarize_expenses(store: &Store) -> Result<String, String> {
    match store.sum_expenses_since(midnight_epoch(Local::now()))? {
        None => Ok("오늘 지출 내역이 없습니다.".to_string()),
        Some(total) => Ok(format!("💰 오늘 총 지출: {}원", format_won(total))),
    }
}

pub(crate) fn midnight_epoch(now: DateTime<Local>) -> i64 {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

/// Thousands-separated, no decimal places: 1234567.8 → "1,234,568".
pub(crate) fn format_won(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
