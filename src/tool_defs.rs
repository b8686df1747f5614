pub(crate) fn tool_definitions_json() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "name": "get_current_time",
            "description": "현재 시간을 알려줍니다.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        serde_json::json!({
            "name": "add_task",
            "description": "할 일 목록에 새로운 항목을 추가합니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "description": { "type": "string" }
                },
                "required": ["description"]
            }
        }),
        serde_json::json!({
            "name": "list_tasks",
            "description": "저장된 할 일 목록을 보여줍니다. filter: all | incomplete | complete",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "filter": { "type": "string" }
                }
            }
        }),
        serde_json::json!({
            "name": "complete_task",
            "description": "할 일을 완료 상태로 표시합니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" }
                },
                "required": ["id"]
            }
        }),
        serde_json::json!({
            "name": "delete_task",
            "description": "할 일 목록에서 항목을 삭제합니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" }
                },
                "required": ["id"]
            }
        }),
        serde_json::json!({
            "name": "log_expense",
            "description": "지출 내역을 기록합니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item": { "type": "string" },
                    "amount": { "type": "number" }
                },
                "required": ["item", "amount"]
            }
        }),
        serde_json::json!({
            "name": "summarize_expenses",
            "description": "오늘 지출 합계를 알려줍니다.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        serde_json::json!({
            "name": "schedule_event",
            "description": "자연어 시간 표현으로 구글 캘린더에 일정을 등록합니다. 예: '내일 오후 3시'",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "summary": { "type": "string" },
                    "time_phrase": { "type": "string" }
                },
                "required": ["summary", "time_phrase"]
            }
        }),
        serde_json::json!({
            "name": "get_daily_briefing",
            "description": "오늘의 일정, 날씨, 주요 뉴스를 한 번에 브리핑합니다.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        serde_json::json!({
            "name": "get_video_transcript",
            "description": "유튜브 영상의 자막(스크립트)을 가져옵니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "video_reference": { "type": "string" }
                },
                "required": ["video_reference"]
            }
        }),
    ]
}
