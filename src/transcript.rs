//! YouTube transcript retrieval: video-id extraction, caption track
//! selection with a language-preference chain, fragment concatenation.

use serde::Deserialize;
use url::Url;

use crate::services::http_agent;

const MAX_TRANSCRIPT_CHARS: usize = 8_000;
const TRUNCATION_MARKER: &str = " ... (이하 생략)";
const LANGUAGE_PREFERENCE: [&str; 2] = ["ko", "en"];

pub(crate) const INVALID_URL_TEXT: &str =
    "잘못된 유튜브 URL입니다. 영상 주소나 영상 ID를 확인해 주세요.";
pub(crate) const NO_CAPTIONS_TEXT: &str = "이 영상에는 사용할 수 있는 자막이 없습니다.";

/// The raw transcript text (truncated), never a summary.
pub(crate) fn get_transcript(reference: &str) -> Result<String, String> {
    let video_id = extract_video_id(reference).ok_or_else(|| INVALID_URL_TEXT.to_string())?;
    let page = fetch_text(&format!("https://www.youtube.com/watch?v={video_id}"))?;
    let tracks = caption_tracks(&page)?;
    let track = select_track(&tracks).ok_or_else(|| NO_CAPTIONS_TEXT.to_string())?;
    let xml = fetch_text(&track.base_url)?;
    let text = concat_fragments(&xml);
    if text.is_empty() {
        return Err(NO_CAPTIONS_TEXT.to_string());
    }
    Ok(truncate_chars(&text, MAX_TRANSCRIPT_CHARS))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTrack {
    pub(crate) base_url: String,
    #[serde(default)]
    pub(crate) language_code: String,
}

/// Known reference shapes: watch?v= on a YouTube host, youtu.be short links,
/// /embed/, /shorts/, /live/ paths, or a bare 11-character id.
pub(crate) fn extract_video_id(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    if is_video_id(trimmed) {
        return Some(trimmed.to_string());
    }
    let parsed = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .ok()?;
    let host = parsed
        .host_str()?
        .trim_start_matches("www.")
        .trim_start_matches("m.");
    if host == "youtu.be" {
        let id = parsed.path_segments()?.next()?.to_string();
        return is_video_id(&id).then_some(id);
    }
    if host == "youtube.com" || host.ends_with(".youtube.com") {
        if let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "v") {
            let id = id.to_string();
            return is_video_id(&id).then_some(id);
        }
        let mut segments = parsed.path_segments()?;
        if let Some(first) = segments.next() {
            if matches!(first, "embed" | "shorts" | "live") {
                let id = segments.next()?.to_string();
                return is_video_id(&id).then_some(id);
            }
        }
    }
    None
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// The captionTracks JSON array embedded in the watch page. An absent key
/// means the video has no captions at all.
pub(crate) fn caption_tracks(page: &str) -> Result<Vec<CaptionTrack>, String> {
    let key = "\"captionTracks\":";
    let Some(key_pos) = page.find(key) else {
        return Err(NO_CAPTIONS_TEXT.to_string());
    };
    let rest = &page[key_pos + key.len()..];
    let json = extract_json_array(rest).ok_or_else(|| NO_CAPTIONS_TEXT.to_string())?;
    let tracks: Vec<CaptionTrack> = serde_json::from_str(json)
        .map_err(|e| format!("자막 목록을 해석하지 못했습니다: {e}"))?;
    if tracks.is_empty() {
        return Err(NO_CAPTIONS_TEXT.to_string());
    }
    Ok(tracks)
}

/// Balanced-bracket slice of the array starting at the first '[', skipping
/// brackets inside string literals.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Preference chain: Korean, English, then whatever is first.
pub(crate) fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    for lang in LANGUAGE_PREFERENCE {
        let hit = tracks.iter().find(|t| {
            t.language_code == lang || t.language_code.starts_with(&format!("{lang}-"))
        });
        if hit.is_some() {
            return hit;
        }
    }
    tracks.first()
}

/// Concatenate timedtext <text> fragments, skipping empty ones.
pub(crate) fn concat_fragments(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;
    while let Some(open) = rest.find("<text") {
        let Some(tag_end) = rest[open..].find('>') else {
            break;
        };
        let content_start = open + tag_end + 1;
        if rest[open..content_start].ends_with("/>") {
            rest = &rest[content_start..];
            continue;
        }
        let Some(close) = rest[content_start..].find("</text>") else {
            break;
        };
        let fragment = decode_entities(rest[content_start..content_start + close].trim());
        if !fragment.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&fragment);
        }
        rest = &rest[content_start + close + "</text>".len()..];
    }
    out
}

/// Timedtext payloads arrive double-escaped ("&amp;#39;"), so &amp; is
/// decoded first and the numeric forms after.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}{TRUNCATION_MARKER}")
}

fn fetch_text(url: &str) -> Result<String, String> {
    let response = http_agent()
        .get(url)
        .set("accept-language", "ko,en;q=0.8")
        .call();
    match response {
        Ok(resp) => resp
            .into_string()
            .map_err(|e| format!("응답 읽기 실패: {e}")),
        Err(ureq::Error::Status(code, _)) => Err(format!("HTTP {code}")),
        Err(err) => Err(format!("요청 실패: {err}")),
    }
}
