//! Conversions between tracker issues, CSV rows, and field bags.

use sheaf_core::csv_store::IssueRow;
use sheaf_core::names::normalize_login;
use sheaf_jira::{FieldBag, JiraIssue, JiraUser};

/// Flatten an issue and its watchers into a CSV row with a blank update flag
pub fn row_from_issue(issue: &JiraIssue, watchers: &[JiraUser], custom_field_id: &str) -> IssueRow {
  let fields = &issue.fields;
  let person = |user: &Option<JiraUser>| user.as_ref().map(ToString::to_string).unwrap_or_default();

  IssueRow {
    update: String::new(),
    key: issue.key.clone(),
    project: fields.project_key(),
    summary: fields.summary.clone(),
    issue_type: fields.issue_type_name(),
    priority: fields.priority_name(),
    components: fields.component_names(),
    labels: fields.labels.clone(),
    custom_field: fields.custom_value(custom_field_id).unwrap_or_default(),
    status: fields.status_name(),
    resolution: fields.resolution_name(),
    assignee: person(&fields.assignee),
    reporter: person(&fields.reporter),
    watchers: watchers.iter().map(ToString::to_string).collect(),
    due_date: fields.duedate.clone().unwrap_or_default(),
    created: fields.created.clone().unwrap_or_default(),
    description: fields.description.clone().unwrap_or_default(),
  }
}

/// Build the update for a flagged CSV row.
///
/// Read-only columns (marked `*` in the header) and watchers are not part of
/// the update. A blank issue type or priority is left unchanged; a blank
/// assignee, custom value, or due date clears the field.
pub fn fields_from_row(row: &IssueRow, custom_field_id: &str) -> FieldBag {
  let mut bag = FieldBag::new().summary(&row.summary);
  if !row.issue_type.trim().is_empty() {
    bag = bag.issue_type(row.issue_type.trim());
  }
  if !row.priority.trim().is_empty() {
    bag = bag.priority(row.priority.trim());
  }

  bag
    .components(&row.components)
    .labels(&row.labels)
    .custom_option(custom_field_id, row.custom_field.trim())
    .assignee(&normalize_login(&row.assignee))
    .due_date(row.due_date.trim())
    .description(&row.description)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn issue() -> JiraIssue {
    serde_json::from_value(json!({
        "id": "10000",
        "key": "PROJ-1",
        "fields": {
            "project": { "key": "PROJ" },
            "summary": "[ccIC24] Analysis",
            "issuetype": { "name": "Sub-task" },
            "priority": { "name": "P2" },
            "components": [{ "name": "ES94111-01" }, { "name": "ES94111-02" }],
            "labels": ["ccIC24_CLU_WBS"],
            "customfield_43801": { "value": "ccIC24" },
            "status": { "name": "Open" },
            "assignee": { "name": "gildong.hong", "displayName": "Hong Gildong (gildong.hong)" },
            "reporter": { "name": "cheolsu.kim", "displayName": "Kim Cheolsu (cheolsu.kim)" },
            "duedate": "2023-08-31",
            "created": "2023-08-01T10:00:00.000+0900",
            "description": "설명 텍스트입니다"
        }
    }))
    .unwrap()
  }

  #[test]
  fn test_row_from_issue() {
    let watchers = vec![JiraUser {
      name: "younghee.lee".to_string(),
      display_name: "Lee Younghee (younghee.lee)".to_string(),
      email_address: None,
    }];
    let row = row_from_issue(&issue(), &watchers, "customfield_43801");

    assert_eq!(row.update, "");
    assert_eq!(row.key, "PROJ-1");
    assert_eq!(row.project, "PROJ");
    assert_eq!(row.components, ["ES94111-01", "ES94111-02"]);
    assert_eq!(row.custom_field, "ccIC24");
    assert_eq!(row.resolution, "");
    assert_eq!(row.assignee, "Hong Gildong (gildong.hong)");
    assert_eq!(row.watchers, ["Lee Younghee (younghee.lee)"]);
    assert_eq!(row.due_date, "2023-08-31");
  }

  #[test]
  fn test_fields_from_row() {
    let mut row = row_from_issue(&issue(), &[], "customfield_43801");
    row.update = "x".to_string();
    row.summary = "[ccIC24] Analysis (rev)".to_string();

    let bag = fields_from_row(&row, "customfield_43801");
    assert_eq!(
      serde_json::to_value(&bag).unwrap(),
      json!({
          "summary": "[ccIC24] Analysis (rev)",
          "issuetype": { "name": "Sub-task" },
          "priority": { "name": "P2" },
          "components": [{ "name": "ES94111-01" }, { "name": "ES94111-02" }],
          "labels": ["ccIC24_CLU_WBS"],
          "customfield_43801": { "value": "ccIC24" },
          "assignee": { "name": "gildong.hong" },
          "duedate": "2023-08-31",
          "description": "설명 텍스트입니다"
      })
    );
  }

  #[test]
  fn test_blank_cells() {
    let row = IssueRow {
      update: "x".to_string(),
      key: "PROJ-1".to_string(),
      summary: "Only a summary".to_string(),
      ..Default::default()
    };
    let bag = fields_from_row(&row, "customfield_43801");

    assert!(!bag.contains("issuetype"));
    assert!(!bag.contains("priority"));
    assert!(bag.get("assignee").unwrap().is_null());
    assert!(bag.get("duedate").unwrap().is_null());
    assert!(bag.get("customfield_43801").unwrap().is_null());
    assert_eq!(bag.get("components"), Some(&json!([])));
  }
}
