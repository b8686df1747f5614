use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AddTaskArgs {
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTasksArgs {
    #[serde(default)]
    pub(crate) filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteTaskArgs {
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteTaskArgs {
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogExpenseArgs {
    pub(crate) item: String,
    pub(crate) amount: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleEventArgs {
    pub(crate) summary: String,
    pub(crate) time_phrase: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoTranscriptArgs {
    pub(crate) video_reference: String,
}
