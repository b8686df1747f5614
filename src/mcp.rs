//! MCP stdio transport: a JSON-RPC 2.0 serve loop, one request at a time.
//!
//! Messages arrive either LSP-framed (`Content-Length` header, blank line,
//! body) or as bare JSON on a single line; responses always go out framed.
//! stdout carries only protocol frames — logging stays on stderr.

use std::io::{self, BufRead, BufReader, Read, Write};

use log::{info, warn};

use crate::tool_defs::tool_definitions_json;
use crate::tool_exec::{ToolContext, execute_tool};

const MAX_MESSAGE_BYTES: usize = 10 * 1024 * 1024;

pub(crate) fn read_message(
    reader: &mut BufReader<impl Read>,
) -> io::Result<Option<serde_json::Value>> {
    let mut first_line = String::new();
    if reader.read_line(&mut first_line)? == 0 {
        return Ok(None);
    }
    if first_line.trim().is_empty() {
        return Ok(None);
    }

    if first_line
        .to_ascii_lowercase()
        .starts_with("content-length:")
    {
        let mut content_length = parse_content_length(&first_line).unwrap_or(0);
        loop {
            let mut line = String::new();
            reader.read_line(&mut line)?;
            if line == "\r\n" || line == "\n" || line.is_empty() {
                break;
            }
            if line.to_ascii_lowercase().starts_with("content-length:") {
                content_length = parse_content_length(&line).unwrap_or(content_length);
            }
        }
        if content_length == 0 {
            return Ok(None);
        }
        if content_length > MAX_MESSAGE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("message too large ({content_length} bytes)"),
            ));
        }
        let mut buffer = vec![0u8; content_length];
        reader.read_exact(&mut buffer)?;
        let value = serde_json::from_slice(&buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid json: {e}")))?;
        Ok(Some(value))
    } else {
        let value = serde_json::from_str(first_line.trim())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid json: {e}")))?;
        Ok(Some(value))
    }
}

fn parse_content_length(line: &str) -> Option<usize> {
    line.split(':').nth(1).and_then(|v| v.trim().parse().ok())
}

pub(crate) fn write_message(writer: &mut impl Write, value: &serde_json::Value) -> io::Result<()> {
    let payload = serde_json::to_vec(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{e}")))?;
    write!(writer, "Content-Length: {}\r\n\r\n", payload.len())?;
    writer.write_all(&payload)?;
    writer.flush()
}

pub(crate) fn run_server(ctx: &ToolContext<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(io::stdin());
    let mut writer = io::stdout();
    let tools = tool_definitions_json();
    info!("serving {} tools over stdio", tools.len());

    loop {
        let Some(msg) = read_message(&mut reader)? else {
            break;
        };
        let id = msg.get("id").cloned();
        let has_id = id.as_ref().is_some_and(|v| !v.is_null());
        let method = msg.get("method").and_then(|m| m.as_str()).unwrap_or("");
        let params = msg
            .get("params")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        let response = match method {
            "initialize" => {
                let protocol = params
                    .get("protocolVersion")
                    .and_then(|v| v.as_str())
                    .unwrap_or("2024-11-05");
                serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "protocolVersion": protocol,
                        "capabilities": {
                            "tools": { "list": true, "call": true }
                        },
                        "serverInfo": {
                            "name": "biseo",
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }
                })
            }
            "tools/list" => serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "tools": tools }
            }),
            "tools/call" => {
                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                let arguments = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| serde_json::json!({}));
                info!("tools/call {name}");
                match execute_tool(name, arguments, ctx) {
                    Ok(result) => serde_json::json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": {
                            "content": [
                                { "type": "text", "text": result.output }
                            ],
                            "isError": result.is_error
                        }
                    }),
                    Err(err) => {
                        warn!("tools/call {name}: {err}");
                        serde_json::json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "error": { "code": -32000, "message": err }
                        })
                    }
                }
            }
            "shutdown" => {
                let response = serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": null
                });
                write_message(&mut writer, &response)?;
                break;
            }
            _ => {
                // Notifications (no id) are ignored; unknown requests get
                // the standard method-not-found error.
                if !has_id {
                    continue;
                }
                serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32601, "message": "method not found" }
                })
            }
        };

        if has_id || matches!(method, "initialize" | "tools/list" | "tools/call") {
            write_message(&mut writer, &response)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_from(input: &[u8]) -> io::Result<Option<serde_json::Value>> {
        let mut reader = BufReader::new(input);
        read_message(&mut reader)
    }

    #[test]
    fn reads_framed_message() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let framed = format!("Content-Length: {}\r\n\r\n{body}", body.len());
        let msg = read_from(framed.as_bytes()).unwrap().unwrap();
        assert_eq!(
            msg.get("method").and_then(|v| v.as_str()),
            Some("tools/list")
        );
    }

    #[test]
    fn reads_bare_line_message() {
        let msg = read_from(b"{\"id\":2,\"method\":\"shutdown\"}\n")
            .unwrap()
            .unwrap();
        assert_eq!(msg.get("id").and_then(|v| v.as_i64()), Some(2));
    }

    #[test]
    fn eof_and_blank_lines_end_the_stream() {
        assert!(read_from(b"").unwrap().is_none());
        assert!(read_from(b"\n").unwrap().is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(read_from(b"{not json}\n").is_err());
    }

    #[test]
    fn write_emits_content_length_frame() {
        let mut out = Vec::new();
        write_message(&mut out, &serde_json::json!({ "ok": true })).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Content-Length: "));
        assert!(text.ends_with(r#"{"ok":true}"#));
    }
}
