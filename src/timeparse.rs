//! Korean natural-language time parsing: "내일 오후 3시", "저녁 7시 30분".
//!
//! The hour token is the one mandatory piece; everything else has a default
//! (today, :00, one hour). Period words are resolved by the first matching
//! keyword in source order — a phrase containing both 저녁 and 오후 gets the
//! 오후 adjustment only. That ordering is inherited behavior, kept as-is.

use chrono::{DateTime, Days, Duration, Local, NaiveTime, TimeZone};

pub(crate) const TIME_GUIDANCE: &str =
    "⏰ 시간 표현을 이해하지 못했습니다. 예: '내일 오후 3시', '오늘 저녁 7시 30분'";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EventWindow {
    pub(crate) start: DateTime<Local>,
    pub(crate) end: DateTime<Local>,
}

pub(crate) fn parse_time(phrase: &str) -> Result<EventWindow, String> {
    parse_with_reference(phrase, Local::now())
}

pub(crate) fn parse_with_reference(
    phrase: &str,
    now: DateTime<Local>,
) -> Result<EventWindow, String> {
    let chars: Vec<char> = phrase.chars().collect();

    // 내일 is checked before 모레, so "내일모레" reads as tomorrow.
    let day_offset: u64 = if phrase.contains("내일") {
        1
    } else if phrase.contains("모레") {
        2
    } else {
        0
    };

    let mut hour = hour_token(&chars).ok_or_else(|| "시각 토큰이 없습니다".to_string())?;
    let minute = minute_token(&chars).unwrap_or(0);
    let duration_hours = duration_token(&chars).unwrap_or(1);

    if phrase.contains("오후") {
        if hour != 12 {
            hour += 12;
        }
    } else if phrase.contains("오전") {
        if hour == 12 {
            hour = 0;
        }
    } else if phrase.contains("저녁") {
        if (6..12).contains(&hour) {
            hour += 12;
        }
    } else if phrase.contains("밤") {
        if hour < 12 {
            hour += 12;
        }
    }

    let date = now
        .date_naive()
        .checked_add_days(Days::new(day_offset))
        .ok_or_else(|| "날짜 범위를 벗어났습니다".to_string())?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| format!("{hour}시 {minute}분은 올바른 시각이 아닙니다"))?;
    let start = Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| "해석할 수 없는 지역 시각입니다".to_string())?;
    let end = start + Duration::hours(i64::from(duration_hours));
    Ok(EventWindow { start, end })
}

fn digit_run_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn number_at(chars: &[char], start: usize, end: usize) -> Option<u32> {
    chars[start..end].iter().collect::<String>().parse().ok()
}

/// First digit run immediately followed by 시 — unless that 시 begins 시간,
/// which is a duration token, not an hour.
fn hour_token(chars: &[char]) -> Option<u32> {
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let end = digit_run_end(chars, i);
            if chars.get(end) == Some(&'시') && chars.get(end + 1) != Some(&'간') {
                return number_at(chars, i, end);
            }
            i = end;
        } else {
            i += 1;
        }
    }
    None
}

fn minute_token(chars: &[char]) -> Option<u32> {
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let end = digit_run_end(chars, i);
            if chars.get(end) == Some(&'분') {
                return number_at(chars, i, end);
            }
            i = end;
        } else {
            i += 1;
        }
    }
    None
}

fn duration_token(chars: &[char]) -> Option<u32> {
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let end = digit_run_end(chars, i);
            if chars.get(end) == Some(&'시') && chars.get(end + 1) == Some(&'간') {
                return number_at(chars, i, end);
            }
            i = end;
        } else {
            i += 1;
        }
    }
    None
}
