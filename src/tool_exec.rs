//! Tool dispatch: named operation + JSON arguments in, text result out.
//!
//! Recoverable outcomes (not-found ids, empty inputs, parse failures,
//! collaborator errors) come back as `ToolExecution` text; only malformed
//! arguments, unknown tool names, and storage I/O surface as `Err`, which
//! the transport turns into a JSON-RPC error.

use chrono::{DateTime, Local};
use log::warn;

use crate::auth::GoogleAuth;
use crate::briefing;
use crate::calendar::Calendar;
use crate::config::Config;
use crate::expenses;
use crate::store::Store;
use crate::tasks;
use crate::timeparse::{self, TIME_GUIDANCE};
use crate::tool_args::{
    AddTaskArgs, CompleteTaskArgs, DeleteTaskArgs, ListTasksArgs, LogExpenseArgs,
    ScheduleEventArgs, VideoTranscriptArgs,
};
use crate::transcript;

pub(crate) struct ToolExecution {
    pub(crate) output: String,
    pub(crate) is_error: bool,
}

impl ToolExecution {
    fn ok(output: String) -> ToolExecution {
        ToolExecution {
            output,
            is_error: false,
        }
    }

    fn fail(output: String) -> ToolExecution {
        ToolExecution {
            output,
            is_error: true,
        }
    }
}

pub(crate) struct ToolContext<'a> {
    pub(crate) config: &'a Config,
    pub(crate) store: &'a Store,
}

pub(crate) fn execute_tool(
    name: &str,
    args: serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolExecution, String> {
    match name {
        "get_current_time" => Ok(ToolExecution::ok(current_time_text(Local::now()))),
        "add_task" => {
            let args: AddTaskArgs = parse_args(args)?;
            tasks::add_task(ctx.store, &args.description).map(ToolExecution::ok)
        }
        "list_tasks" => {
            let args: ListTasksArgs = parse_args(args)?;
            tasks::list_tasks(ctx.store, args.filter.as_deref().unwrap_or("all"))
                .map(ToolExecution::ok)
        }
        "complete_task" => {
            let args: CompleteTaskArgs = parse_args(args)?;
            tasks::complete_task(ctx.store, args.id).map(ToolExecution::ok)
        }
        "delete_task" => {
            let args: DeleteTaskArgs = parse_args(args)?;
            tasks::delete_task(ctx.store, args.id).map(ToolExecution::ok)
        }
        "log_expense" => {
            let args: LogExpenseArgs = parse_args(args)?;
            expenses::log_expense(ctx.store, &args.item, args.amount).map(ToolExecution::ok)
        }
        "summarize_expenses" => expenses::summarize_expenses(ctx.store).map(ToolExecution::ok),
        "schedule_event" => {
            let args: ScheduleEventArgs = parse_args(args)?;
            Ok(schedule_event(ctx, &args))
        }
        "get_daily_briefing" => Ok(ToolExecution::ok(briefing::daily_briefing(ctx.config))),
        "get_video_transcript" => {
            let args: VideoTranscriptArgs = parse_args(args)?;
            match transcript::get_transcript(&args.video_reference) {
                Ok(text) => Ok(ToolExecution::ok(text)),
                Err(message) => Ok(ToolExecution::fail(message)),
            }
        }
        _ => Err(format!("unknown tool '{name}'")),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("invalid arguments: {e}"))
}

fn current_time_text(now: DateTime<Local>) -> String {
    format!("지금은 {}입니다.", now.format("%Y년 %m월 %d일 %H시 %M분"))
}

fn schedule_event(ctx: &ToolContext<'_>, args: &ScheduleEventArgs) -> ToolExecution {
    let window = match timeparse::parse_time(&args.time_phrase) {
        Ok(window) => window,
        Err(reason) => {
            warn!("[schedule] parse '{}' failed: {reason}", args.time_phrase);
            return ToolExecution::fail(TIME_GUIDANCE.to_string());
        }
    };
    let calendar = match GoogleAuth::from_config(ctx.config).map(Calendar::new) {
        Ok(calendar) => calendar,
        Err(reason) => {
            return ToolExecution::fail(format!("📅 캘린더에 연결할 수 없습니다: {reason}"));
        }
    };
    match calendar.insert_event(&args.summary, &window) {
        Ok(()) => ToolExecution::ok(format!(
            "📅 '{}' 일정을 등록했습니다.\n🕐 {} ~ {}",
            args.summary,
            window.start.format("%m월 %d일 %H:%M"),
            window.end.format("%m월 %d일 %H:%M"),
        )),
        Err(reason) => ToolExecution::fail(format!("📅 일정 등록에 실패했습니다: {reason}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_ctx(name: &str) -> (Config, Store) {
        let dir = std::env::temp_dir().join("biseo_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("exec_{}_{name}.sqlite", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let store = Store::new(&path);
        store.ensure_schema().unwrap();
        let config = Config {
            db_path: path,
            token_cache: dir.join("never_written.json"),
            city: "Seoul".to_string(),
            weather_key: None,
            news_key: None,
            google_client_id: None,
            google_client_secret: None,
        };
        (config, store)
    }

    #[test]
    fn task_roundtrip_through_dispatch() {
        let (config, store) = temp_ctx("roundtrip");
        let ctx = ToolContext {
            config: &config,
            store: &store,
        };

        let added = execute_tool(
            "add_task",
            serde_json::json!({ "description": "회의 준비" }),
            &ctx,
        )
        .unwrap();
        assert!(!added.is_error);
        assert!(added.output.contains("회의 준비"));

        let listed = execute_tool("list_tasks", serde_json::json!({}), &ctx).unwrap();
        assert!(listed.output.contains("회의 준비"));

        let completed =
            execute_tool("complete_task", serde_json::json!({ "id": 1 }), &ctx).unwrap();
        assert!(completed.output.contains("완료"));

        let deleted = execute_tool("delete_task", serde_json::json!({ "id": 1 }), &ctx).unwrap();
        assert!(deleted.output.contains("삭제"));
    }

    #[test]
    fn unknown_tool_is_a_dispatch_error() {
        let (config, store) = temp_ctx("unknown");
        let ctx = ToolContext {
            config: &config,
            store: &store,
        };
        assert!(execute_tool("no_such_tool", serde_json::json!({}), &ctx).is_err());
    }

    #[test]
    fn malformed_arguments_are_a_dispatch_error() {
        let (config, store) = temp_ctx("badargs");
        let ctx = ToolContext {
            config: &config,
            store: &store,
        };
        let result = execute_tool("add_task", serde_json::json!({ "wrong": 1 }), &ctx);
        assert!(result.is_err());
    }

    #[test]
    fn schedule_with_bad_phrase_returns_guidance() {
        let (config, store) = temp_ctx("schedule");
        let ctx = ToolContext {
            config: &config,
            store: &store,
        };
        let result = execute_tool(
            "schedule_event",
            serde_json::json!({ "summary": "회의", "time_phrase": "언젠가" }),
            &ctx,
        )
        .unwrap();
        assert!(result.is_error);
        assert_eq!(result.output, TIME_GUIDANCE);
    }

    #[test]
    fn current_time_format() {
        let now = Local.with_ymd_and_hms(2026, 8, 7, 14, 5, 0).unwrap();
        assert_eq!(
            current_time_text(now),
            "지금은 2026년 08월 07일 14시 05분입니다."
        );
    }
}
