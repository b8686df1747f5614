//! External collaborators reached over plain HTTP: weather and news, plus
//! the shared agent/JSON helpers the other collaborator modules use.

use std::time::Duration;

use log::warn;

use crate::config::Config;

// Bounded timeouts so an unresponsive provider degrades a section instead of
// hanging the serve loop.
const HTTP_TIMEOUT_MS: u64 = 10_000;

pub(crate) fn http_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_millis(HTTP_TIMEOUT_MS))
        .timeout_read(Duration::from_millis(HTTP_TIMEOUT_MS))
        .timeout_write(Duration::from_millis(HTTP_TIMEOUT_MS))
        .build()
}

pub(crate) fn get_json(url: &str, bearer: Option<&str>) -> Result<serde_json::Value, String> {
    let mut request = http_agent().get(url);
    if let Some(token) = bearer {
        request = request.set("authorization", &format!("Bearer {token}"));
    }
    match request.call() {
        Ok(resp) => resp
            .into_json()
            .map_err(|e| format!("response parse: {e}")),
        Err(ureq::Error::Status(code, resp)) => {
            let text = resp.into_string().unwrap_or_default();
            Err(format!("HTTP {code}: {}", text.trim()))
        }
        Err(err) => Err(format!("request failed: {err}")),
    }
}

// ── Weather ─────────────────────────────────────────────────────────────

const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Current conditions for the configured city, one line, Korean description.
pub(crate) fn current_weather(config: &Config) -> Result<String, String> {
    let key = config
        .weather_key
        .as_deref()
        .ok_or("OPENWEATHER_API_KEY가 설정되지 않았습니다")?;
    let url = format!(
        "{WEATHER_URL}?q={}&appid={}&units=metric&lang=kr",
        urlencoding::encode(&config.city),
        urlencoding::encode(key),
    );
    let body = get_json(&url, None)?;
    let description = body
        .pointer("/weather/0/description")
        .and_then(|v| v.as_str())
        .unwrap_or("알 수 없음");
    let mut line = format!("{} 현재 날씨: {description}", config.city);
    if let Some(temp) = body.pointer("/main/temp").and_then(|v| v.as_f64()) {
        line.push_str(&format!(", 기온 {temp:.1}°C"));
    }
    if let Some(feels) = body.pointer("/main/feels_like").and_then(|v| v.as_f64()) {
        line.push_str(&format!(" (체감 {feels:.1}°C)"));
    }
    Ok(line)
}

// ── News + translation ──────────────────────────────────────────────────

const NEWS_URL: &str = "https://newsapi.org/v2/top-headlines";
const HEADLINE_COUNT: usize = 3;

/// Top headlines, first three titles translated to Korean. A failed
/// translation degrades that one title, not the section.
pub(crate) fn top_headlines(config: &Config) -> Result<Vec<String>, String> {
    let key = config
        .news_key
        .as_deref()
        .ok_or("NEWS_API_KEY가 설정되지 않았습니다")?;
    let url = format!(
        "{NEWS_URL}?country=us&pageSize=5&apiKey={}",
        urlencoding::encode(key),
    );
    let body = get_json(&url, None)?;
    let articles = body
        .get("articles")
        .and_then(|v| v.as_array())
        .ok_or("뉴스 응답 형식이 예상과 다릅니다")?;
    let titles: Vec<&str> = articles
        .iter()
        .filter_map(|a| a.get("title").and_then(|v| v.as_str()))
        .filter(|t| !t.trim().is_empty())
        .take(HEADLINE_COUNT)
        .collect();
    if titles.is_empty() {
        return Err("헤드라인이 없습니다".to_string());
    }
    Ok(titles
        .into_iter()
        .map(|title| {
            translate_to_korean(title).unwrap_or_else(|e| {
                warn!("[news] translate failed: {e}");
                title.to_string()
            })
        })
        .collect())
}

const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Public translate endpoint. The response is a nested array; the translated
/// text is the first element of each chunk in the first segment list.
pub(crate) fn translate_to_korean(text: &str) -> Result<String, String> {
    let url = format!(
        "{TRANSLATE_URL}?client=gtx&sl=auto&tl=ko&dt=t&q={}",
        urlencoding::encode(text),
    );
    let body = get_json(&url, None)?;
    let segments = body
        .as_array()
        .and_then(|a| a.first())
        .and_then(|v| v.as_array())
        .ok_or("번역 응답 형식이 예상과 다릅니다")?;
    let mut out = String::new();
    for segment in segments {
        if let Some(piece) = segment
            .as_array()
            .and_then(|a| a.first())
            .and_then(|v| v.as_str())
        {
            out.push_str(piece);
        }
    }
    if out.trim().is_empty() {
        Err("빈 번역 결과".to_string())
    } else {
        Ok(out)
    }
}
