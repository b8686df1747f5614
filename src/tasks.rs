//! Task manager: user-facing operations over the task collection.

use crate::store::{StatusFilter, Store, Task, TaskStatus};

pub(crate) fn add_task(store: &Store, description: &str) -> Result<String, String> {
    let description = description.trim();
    if description.is_empty() {
        return Ok("할 일 내용을 입력해 주세요.".to_string());
    }
    store.add_task(description)?;
    Ok(format!(
        "✅ '{description}' 항목을 할 일 목록에 추가했습니다."
    ))
}

pub(crate) fn list_tasks(store: &Store, filter: &str) -> Result<String, String> {
    let tasks = store.list_tasks(StatusFilter::parse(filter))?;
    if tasks.is_empty() {
        return Ok("현재 할 일 목록이 비어있습니다.".to_string());
    }
    Ok(render_tasks(&tasks))
}

fn render_tasks(tasks: &[Task]) -> String {
    let mut out = String::from("📝 할 일 목록:");
    for task in tasks {
        let mark = match task.status {
            TaskStatus::Complete => "✅",
            TaskStatus::Incomplete => "⬜",
        };
        out.push_str(&format!("\n#{} {mark} {}", task.id, task.description));
    }
    out
}

pub(crate) fn complete_task(store: &Store, id: i64) -> Result<String, String> {
    if store.complete_task(id)? {
        Ok(format!("✅ #{id} 항목을 완료 처리했습니다."))
    } else {
        Ok(format!("🤔 #{id} 항목을 찾을 수 없습니다."))
    }
}

pub(crate) fn delete_task(store: &Store, id: i64) -> Result<String, String> {
    if store.delete_task(id)? {
        Ok(format!("🗑️ #{id} 항목을 할 일 목록에서 삭제했습니다."))
    } else {
        Ok(format!("🤔 #{id} 항목을 찾을 수 없습니다."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> Store {
        let dir = std::env::temp_dir().join("biseo_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("tasks_{}_{name}.sqlite", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let store = Store::new(&path);
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn add_then_list_shows_new_entry() {
        let store = temp_store("add_list");
        let confirmation = add_task(&store, "우유 사기").unwrap();
        assert!(confirmation.contains("우유 사기"));

        let listing = list_tasks(&store, "all").unwrap();
        assert!(listing.contains("우유 사기"));
        assert!(listing.contains("⬜"));
    }

    #[test]
    fn empty_description_is_rejected_without_a_row() {
        let store = temp_store("empty_desc");
        add_task(&store, "   ").unwrap();
        let listing = list_tasks(&store, "all").unwrap();
        assert_eq!(listing, "현재 할 일 목록이 비어있습니다.");
    }

    #[test]
    fn unknown_filter_means_all() {
        let store = temp_store("filter");
        add_task(&store, "one").unwrap();
        add_task(&store, "two").unwrap();
        let listing = list_tasks(&store, "whatever").unwrap();
        assert!(listing.contains("one"));
        assert!(listing.contains("two"));
    }

    #[test]
    fn complete_twice_reports_success_both_times() {
        let store = temp_store("twice");
        add_task(&store, "task").unwrap();
        let first = complete_task(&store, 1).unwrap();
        let second = complete_task(&store, 1).unwrap();
        assert!(first.contains("완료"));
        assert!(second.contains("완료"));
    }

    #[test]
    fn missing_id_reports_not_found() {
        let store = temp_store("missing");
        let completed = complete_task(&store, 42).unwrap();
        assert!(completed.contains("찾을 수 없습니다"));
        let deleted = delete_task(&store, 42).unwrap();
        assert!(deleted.contains("찾을 수 없습니다"));
    }
}
