//! Daily briefing: calendar, weather, news. Each section is independently
//! fault tolerant — a failed collaborator becomes a one-line notice and the
//! remaining sections are still attempted.

use log::warn;

use crate::auth::GoogleAuth;
use crate::calendar::Calendar;
use crate::config::Config;
use crate::services;

pub(crate) fn daily_briefing(config: &Config) -> String {
    let calendar = GoogleAuth::from_config(config)
        .map(Calendar::new)
        .and_then(|calendar| calendar.next_event())
        .map(|event| match event {
            Some(line) => format!("📅 다음 일정: {line}"),
            None => "📅 예정된 일정이 없습니다.".to_string(),
        });
    let weather = services::current_weather(config).map(|line| format!("🌤️ {line}"));
    let news = services::top_headlines(config).map(|titles| render_headlines(&titles));
    compose(calendar, weather, news)
}

fn render_headlines(titles: &[String]) -> String {
    let mut out = String::from("📰 주요 뉴스:");
    for title in titles {
        out.push_str(&format!("\n- {title}"));
    }
    out
}

fn compose(
    calendar: Result<String, String>,
    weather: Result<String, String>,
    news: Result<String, String>,
) -> String {
    let mut sections = Vec::new();
    match calendar {
        Ok(section) => sections.push(section),
        Err(reason) => {
            warn!("[briefing] calendar: {reason}");
            sections.push("📅 일정 정보를 불러오지 못했습니다.".to_string());
        }
    }
    match weather {
        Ok(section) => sections.push(section),
        Err(reason) => {
            warn!("[briefing] weather: {reason}");
            sections.push("🌤️ 날씨 정보를 불러오지 못했습니다.".to_string());
        }
    }
    match news {
        Ok(section) => sections.push(section),
        Err(reason) => {
            warn!("[briefing] news: {reason}");
            sections.push("📰 뉴스를 불러오지 못했습니다.".to_string());
        }
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sections_present_on_success() {
        let report = compose(
            Ok("📅 다음 일정: 회의 (08월 08일 15:00)".to_string()),
            Ok("🌤️ Seoul 현재 날씨: 맑음, 기온 29.0°C".to_string()),
            Ok("📰 주요 뉴스:\n- 첫 번째".to_string()),
        );
        let sections: Vec<&str> = report.split("\n\n").collect();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("📅"));
        assert!(sections[1].starts_with("🌤️"));
        assert!(sections[2].starts_with("📰"));
    }

    #[test]
    fn failed_sections_degrade_without_suppressing_others() {
        let report = compose(
            Err("no token".to_string()),
            Err("timeout".to_string()),
            Ok("📰 주요 뉴스:\n- 살아남은 섹션".to_string()),
        );
        let sections: Vec<&str> = report.split("\n\n").collect();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0], "📅 일정 정보를 불러오지 못했습니다.");
        assert_eq!(sections[1], "🌤️ 날씨 정보를 불러오지 못했습니다.");
        assert!(sections[2].contains("살아남은 섹션"));
    }

    #[test]
    fn total_failure_still_reports_three_notices() {
        let report = compose(
            Err("a".to_string()),
            Err("b".to_string()),
            Err("c".to_string()),
        );
        assert_eq!(report.split("\n\n").count(), 3);
        assert!(report.contains("일정 정보를"));
        assert!(report.contains("날씨 정보를"));
        assert!(report.contains("뉴스를"));
    }

    #[test]
    fn headline_rendering() {
        let section = render_headlines(&["하나".to_string(), "둘".to_string()]);
        assert_eq!(section, "📰 주요 뉴스:\n- 하나\n- 둘");
    }
}
