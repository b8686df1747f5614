//! Google Calendar collaborator: next upcoming event, event insertion.

use chrono::{DateTime, Local, SecondsFormat, Utc};

use crate::auth::GoogleAuth;
use crate::services::{get_json, http_agent};
use crate::timeparse::EventWindow;

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

pub(crate) struct Calendar {
    auth: GoogleAuth,
}

impl Calendar {
    pub(crate) fn new(auth: GoogleAuth) -> Calendar {
        Calendar { auth }
    }

    /// The next upcoming event as a one-line description, or None when the
    /// calendar is clear.
    pub(crate) fn next_event(&self) -> Result<Option<String>, String> {
        let token = self.auth.access_token()?;
        let time_min = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let url = format!(
            "{EVENTS_URL}?maxResults=1&singleEvents=true&orderBy=startTime&timeMin={}",
            urlencoding::encode(&time_min),
        );
        let body = get_json(&url, Some(&token))?;
        let Some(item) = body
            .get("items")
            .and_then(|v| v.as_array())
            .and_then(|items| items.first())
        else {
            return Ok(None);
        };
        let summary = item
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or("(제목 없음)");
        // All-day events carry "date" instead of "dateTime".
        let start = item
            .get("start")
            .and_then(|s| s.get("dateTime").or_else(|| s.get("date")))
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        Ok(Some(format!("{summary} ({})", format_event_start(start))))
    }

    pub(crate) fn insert_event(&self, summary: &str, window: &EventWindow) -> Result<(), String> {
        let token = self.auth.access_token()?;
        let body = serde_json::json!({
            "summary": summary,
            "start": { "dateTime": window.start.to_rfc3339() },
            "end": { "dateTime": window.end.to_rfc3339() },
        });
        let response = http_agent()
            .post(EVENTS_URL)
            .set("authorization", &format!("Bearer {token}"))
            .send_json(body);
        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, resp)) => {
                let text = resp.into_string().unwrap_or_default();
                Err(format!("HTTP {code}: {}", text.trim()))
            }
            Err(err) => Err(format!("request failed: {err}")),
        }
    }
}

fn format_event_start(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%m월 %d일 %H:%M")
            .to_string(),
        // Bare dates (all-day events) pass through unchanged.
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_date_passes_through() {
        assert_eq!(format_event_start("2026-08-07"), "2026-08-07");
        assert_eq!(format_event_start("?"), "?");
    }

    #[test]
    fn rfc3339_is_reformatted() {
        let formatted = format_event_start("2026-08-07T15:00:00+09:00");
        assert!(formatted.contains("월"));
        assert!(formatted.contains("일"));
    }
}
