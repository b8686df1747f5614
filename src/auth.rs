//! Google OAuth credential provider. Owns the token cache file and the
//! refresh-or-reauthorize flow; the calendar collaborator receives it by
//! injection rather than reading the environment itself.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use log::info;
use url::form_urlencoded;

use crate::config::Config;
use crate::services::http_agent;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
/// Refresh this many seconds before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub(crate) struct GoogleAuth {
    client_id: String,
    client_secret: String,
    cache_path: PathBuf,
}

impl GoogleAuth {
    pub(crate) fn from_config(config: &Config) -> Result<GoogleAuth, String> {
        let client_id = config
            .google_client_id
            .clone()
            .ok_or("GOOGLE_CLIENT_ID가 설정되지 않았습니다")?;
        let client_secret = config
            .google_client_secret
            .clone()
            .ok_or("GOOGLE_CLIENT_SECRET가 설정되지 않았습니다")?;
        Ok(GoogleAuth {
            client_id,
            client_secret,
            cache_path: config.token_cache.clone(),
        })
    }

    /// A valid access token: the cached one if still fresh, a refreshed one
    /// otherwise. No cache at all means the interactive flow never ran.
    pub(crate) fn access_token(&self) -> Result<String, String> {
        let token = self
            .load_cache()
            .ok_or("저장된 인증 정보가 없습니다. 먼저 `biseo login`을 실행해 주세요.")?;
        if let Some(access) = fresh_access_token(&token, Utc::now().timestamp()) {
            return Ok(access);
        }
        let refreshed = self.refresh(&token)?;
        refreshed
            .get("access_token")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| "갱신 응답에 access_token이 없습니다".to_string())
    }

    fn load_cache(&self) -> Option<serde_json::Value> {
        let text = fs::read_to_string(&self.cache_path).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn save_cache(&self, token: &serde_json::Value) -> Result<(), String> {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("create {}: {e}", parent.display()))?;
            }
        }
        let pretty = serde_json::to_vec_pretty(token).map_err(|e| format!("encode token: {e}"))?;
        fs::write(&self.cache_path, pretty)
            .map_err(|e| format!("write {}: {e}", self.cache_path.display()))
    }

    fn refresh(&self, token: &serde_json::Value) -> Result<serde_json::Value, String> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or("refresh_token이 없습니다. `biseo login`을 다시 실행해 주세요.")?;
        let payload = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token)
            .finish();
        let mut refreshed = post_token_form(&payload)?;
        // Google omits the refresh_token on refresh responses; keep the old one.
        if refreshed.get("refresh_token").is_none() {
            if let Some(rt) = token.get("refresh_token") {
                refreshed["refresh_token"] = rt.clone();
            }
        }
        stamp_obtained_at(&mut refreshed);
        self.save_cache(&refreshed)?;
        Ok(refreshed)
    }

    /// Interactive authorization: consent URL, localhost callback, code
    /// exchange, cache write.
    pub(crate) fn login(&self, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let redirect_uri = format!("http://localhost:{port}/oauth/callback");
        let auth_url = format!(
            "{AUTH_URL}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&prompt=consent",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(CALENDAR_SCOPE),
        );
        println!("브라우저에서 아래 주소를 열어 인증해 주세요:\n{auth_url}");

        let addr = format!("127.0.0.1:{port}");
        let server = tiny_http::Server::http(&addr)
            .map_err(|e| format!("callback server on {addr}: {e}"))?;
        info!("OAuth callback listening on http://{addr}");

        for request in server.incoming_requests() {
            let url = request.url().to_string();
            if !url.starts_with("/oauth/callback") {
                let _ = request.respond(tiny_http::Response::from_string("ok"));
                continue;
            }
            let query = url.splitn(2, '?').nth(1).unwrap_or("");
            let params: HashMap<String, String> = form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
            let Some(code) = params.get("code") else {
                let _ = request.respond(tiny_http::Response::from_string("missing code"));
                continue;
            };
            let mut token = self.exchange_code(&redirect_uri, code)?;
            stamp_obtained_at(&mut token);
            self.save_cache(&token)?;
            let _ = request.respond(tiny_http::Response::from_string(
                "인증이 완료되었습니다. 이 탭을 닫아도 됩니다.",
            ));
            println!("토큰을 저장했습니다: {}", self.cache_path.display());
            break;
        }
        Ok(())
    }

    fn exchange_code(&self, redirect_uri: &str, code: &str) -> Result<serde_json::Value, String> {
        let payload = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("grant_type", "authorization_code")
            .append_pair("code", code)
            .append_pair("redirect_uri", redirect_uri)
            .finish();
        post_token_form(&payload)
    }
}

fn post_token_form(payload: &str) -> Result<serde_json::Value, String> {
    let response = http_agent()
        .post(TOKEN_URL)
        .set("content-type", "application/x-www-form-urlencoded")
        .send_string(payload);
    match response {
        Ok(resp) => resp.into_json().map_err(|e| format!("token parse: {e}")),
        Err(ureq::Error::Status(code, resp)) => {
            let text = resp.into_string().unwrap_or_default();
            Err(format!("token error {code}: {}", text.trim()))
        }
        Err(err) => Err(format!("token request failed: {err}")),
    }
}

fn stamp_obtained_at(token: &mut serde_json::Value) {
    token["obtained_at"] = serde_json::json!(Utc::now().timestamp());
}

/// The cached access token, if its expiry window (minus a safety margin)
/// has not passed yet.
fn fresh_access_token(token: &serde_json::Value, now: i64) -> Option<String> {
    let access = token.get("access_token")?.as_str()?;
    let obtained = token.get("obtained_at")?.as_i64()?;
    let expires_in = token.get("expires_in")?.as_i64()?;
    if now < obtained + expires_in - EXPIRY_MARGIN_SECS {
        Some(access.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_within_window() {
        let token = serde_json::json!({
            "access_token": "abc",
            "obtained_at": 1_000,
            "expires_in": 3_600,
        });
        assert_eq!(fresh_access_token(&token, 1_100), Some("abc".to_string()));
        // Inside the safety margin counts as expired.
        assert_eq!(fresh_access_token(&token, 1_000 + 3_600 - 30), None);
        assert_eq!(fresh_access_token(&token, 10_000), None);
    }

    #[test]
    fn unstamped_token_is_never_fresh() {
        let token = serde_json::json!({ "access_token": "abc", "expires_in": 3_600 });
        assert_eq!(fresh_access_token(&token, 0), None);
    }
}
