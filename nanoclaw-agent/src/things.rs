//! Mapping Things tool arguments onto CLI argument lists
//!
//! The host runs `things <command> <cli_args...>` without interpreting the
//! arguments, so the flag spelling here is the whole contract: options are
//! `--name=value`, booleans are `--name` or `--name=false`, and free text
//! always follows a `--` separator so a title like `--delete-all` stays text.

use serde::Deserialize;

use nanoclaw_protocol::{SearchStatus, ThingsView};

/// A tool call that becomes one Things CLI invocation
pub trait ThingsCall {
    /// CLI subcommand
    fn command(&self) -> String;

    /// Ordered arguments after the subcommand
    fn cli_args(&self) -> Vec<String>;
}

/// Append `--name=value` when the value is present and non-empty
fn push_option(args: &mut Vec<String>, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        args.push(format!("--{}={}", name, value));
    }
}

/// Append `--name=value` whenever the value was supplied, even if empty
fn push_present(args: &mut Vec<String>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(format!("--{}={}", name, value));
    }
}

fn push_bool(args: &mut Vec<String>, name: &str, value: Option<bool>) {
    match value {
        Some(true) => args.push(format!("--{}", name)),
        Some(false) => args.push(format!("--{}=false", name)),
        None => {}
    }
}

fn push_text(args: &mut Vec<String>, text: &str) {
    args.push("--".into());
    args.push(text.into());
}

/// `things_list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListArgs {
    #[serde(default)]
    pub view: ThingsView,
    pub project: Option<String>,
    pub area: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
}

impl ThingsCall for ListArgs {
    fn command(&self) -> String {
        self.view.as_str().into()
    }

    fn cli_args(&self) -> Vec<String> {
        let mut args = vec!["--json".to_string()];
        push_option(&mut args, "project", self.project.as_deref());
        push_option(&mut args, "area", self.area.as_deref());
        push_option(&mut args, "tag", self.tag.as_deref());
        push_option(&mut args, "search", self.search.as_deref());
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            args.push(format!("--limit={}", limit));
        }
        push_option(&mut args, "sort", self.sort.as_deref());
        args
    }
}

/// `things_search`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    pub limit: Option<u64>,
    pub status: Option<SearchStatus>,
}

impl ThingsCall for SearchArgs {
    fn command(&self) -> String {
        "search".into()
    }

    fn cli_args(&self) -> Vec<String> {
        let mut args = vec!["--json".to_string()];
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            args.push(format!("--limit={}", limit));
        }
        if let Some(status) = self.status {
            args.push(format!("--status={}", status.as_str()));
        }
        push_text(&mut args, &self.query);
        args
    }
}

/// `things_add`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddArgs {
    pub title: String,
    pub notes: Option<String>,
    pub deadline: Option<String>,
    pub list: Option<String>,
    pub tags: Option<String>,
    pub when: Option<String>,
}

impl ThingsCall for AddArgs {
    fn command(&self) -> String {
        "add".into()
    }

    fn cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_option(&mut args, "notes", self.notes.as_deref());
        push_option(&mut args, "deadline", self.deadline.as_deref());
        push_option(&mut args, "list", self.list.as_deref());
        push_option(&mut args, "tags", self.tags.as_deref());
        push_option(&mut args, "when", self.when.as_deref());
        push_text(&mut args, &self.title);
        args
    }
}

/// `things_update`
///
/// `notes` and `tags` are sent even when empty so they can be cleared.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateArgs {
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub append_notes: Option<String>,
    pub deadline: Option<String>,
    pub list: Option<String>,
    pub tags: Option<String>,
    pub add_tags: Option<String>,
    pub when: Option<String>,
    pub completed: Option<bool>,
    pub canceled: Option<bool>,
}

impl ThingsCall for UpdateArgs {
    fn command(&self) -> String {
        "update".into()
    }

    fn cli_args(&self) -> Vec<String> {
        let mut args = vec![format!("--id={}", self.id)];
        push_present(&mut args, "notes", self.notes.as_deref());
        push_option(&mut args, "append-notes", self.append_notes.as_deref());
        push_option(&mut args, "deadline", self.deadline.as_deref());
        push_option(&mut args, "list", self.list.as_deref());
        push_present(&mut args, "tags", self.tags.as_deref());
        push_option(&mut args, "add-tags", self.add_tags.as_deref());
        push_option(&mut args, "when", self.when.as_deref());
        push_bool(&mut args, "completed", self.completed);
        push_bool(&mut args, "canceled", self.canceled);
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            push_text(&mut args, title);
        }
        args
    }
}

/// `things_delete`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteArgs {
    pub id: String,
}

impl ThingsCall for DeleteArgs {
    fn command(&self) -> String {
        "delete".into()
    }

    fn cli_args(&self) -> Vec<String> {
        vec![format!("--id={}", self.id), format!("--confirm={}", self.id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: for<'de> Deserialize<'de>>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    // ==================== List Tests ====================

    #[test]
    fn test_list_defaults_to_today_json() {
        let args: ListArgs = parse(json!({}));
        assert_eq!(args.command(), "today");
        assert_eq!(args.cli_args(), vec!["--json"]);
    }

    #[test]
    fn test_list_today_with_project() {
        let args: ListArgs = parse(json!({"view": "today", "project": "Work"}));
        assert_eq!(args.cli_args(), vec!["--json", "--project=Work"]);
    }

    #[test]
    fn test_list_all_filters_in_order() {
        let args: ListArgs = parse(json!({
            "view": "upcoming",
            "sort": "-deadline,title",
            "limit": 10,
            "search": "tax",
            "tag": "urgent",
            "area": "Home",
            "project": "Work",
        }));
        assert_eq!(args.command(), "upcoming");
        assert_eq!(
            args.cli_args(),
            vec![
                "--json",
                "--project=Work",
                "--area=Home",
                "--tag=urgent",
                "--search=tax",
                "--limit=10",
                "--sort=-deadline,title",
            ]
        );
    }

    #[test]
    fn test_list_skips_empty_filters() {
        let args: ListArgs = parse(json!({"project": "", "tag": ""}));
        assert_eq!(args.cli_args(), vec!["--json"]);
    }

    #[test]
    fn test_list_rejects_unknown_view() {
        let result = serde_json::from_value::<ListArgs>(json!({"view": "tomorrow"}));
        assert!(result.is_err());
    }

    // ==================== Search Tests ====================

    #[test]
    fn test_search_query_after_separator() {
        let args: SearchArgs = parse(json!({"query": "--status=any", "status": "completed", "limit": 5}));
        assert_eq!(args.command(), "search");
        assert_eq!(
            args.cli_args(),
            vec!["--json", "--limit=5", "--status=completed", "--", "--status=any"]
        );
    }

    // ==================== Add Tests ====================

    #[test]
    fn test_add_title_only() {
        let args: AddArgs = parse(json!({"title": "Buy milk"}));
        assert_eq!(args.command(), "add");
        assert_eq!(args.cli_args(), vec!["--", "Buy milk"]);
    }

    #[test]
    fn test_add_all_fields() {
        let args: AddArgs = parse(json!({
            "title": "File taxes",
            "notes": "use the new form",
            "deadline": "2026-04-15",
            "list": "Admin",
            "tags": "work,urgent",
            "when": "tomorrow",
        }));
        assert_eq!(
            args.cli_args(),
            vec![
                "--notes=use the new form",
                "--deadline=2026-04-15",
                "--list=Admin",
                "--tags=work,urgent",
                "--when=tomorrow",
                "--",
                "File taxes",
            ]
        );
    }

    // ==================== Update Tests ====================

    #[test]
    fn test_update_id_only() {
        let args: UpdateArgs = parse(json!({"id": "ABC"}));
        assert_eq!(args.command(), "update");
        assert_eq!(args.cli_args(), vec!["--id=ABC"]);
    }

    #[test]
    fn test_update_booleans() {
        let args: UpdateArgs = parse(json!({"id": "ABC", "completed": true, "canceled": false}));
        assert_eq!(args.cli_args(), vec!["--id=ABC", "--completed", "--canceled=false"]);

        let args: UpdateArgs = parse(json!({"id": "ABC", "completed": false, "canceled": true}));
        assert_eq!(args.cli_args(), vec!["--id=ABC", "--completed=false", "--canceled"]);
    }

    #[test]
    fn test_update_empty_notes_and_tags_clear() {
        let args: UpdateArgs = parse(json!({"id": "ABC", "notes": "", "tags": "", "when": ""}));
        assert_eq!(args.cli_args(), vec!["--id=ABC", "--notes=", "--tags="]);
    }

    #[test]
    fn test_update_full() {
        let args: UpdateArgs = parse(json!({
            "id": "ABC",
            "title": "Renamed",
            "notes": "n",
            "append_notes": "more",
            "deadline": "2026-05-01",
            "list": "Work",
            "tags": "a,b",
            "add_tags": "c",
            "when": "evening",
            "completed": true,
        }));
        assert_eq!(
            args.cli_args(),
            vec![
                "--id=ABC",
                "--notes=n",
                "--append-notes=more",
                "--deadline=2026-05-01",
                "--list=Work",
                "--tags=a,b",
                "--add-tags=c",
                "--when=evening",
                "--completed",
                "--",
                "Renamed",
            ]
        );
    }

    #[test]
    fn test_update_empty_title_omitted() {
        let args: UpdateArgs = parse(json!({"id": "ABC", "title": ""}));
        assert_eq!(args.cli_args(), vec!["--id=ABC"]);
    }

    // ==================== Delete Tests ====================

    #[test]
    fn test_delete_confirms_id() {
        let args: DeleteArgs = parse(json!({"id": "ABC"}));
        assert_eq!(args.command(), "delete");
        assert_eq!(args.cli_args(), vec!["--id=ABC", "--confirm=ABC"]);
    }

    #[test]
    fn test_delete_requires_id() {
        assert!(serde_json::from_value::<DeleteArgs>(json!({})).is_err());
    }
}
