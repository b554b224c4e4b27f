use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use sheaf_core::names::{matches_login, normalize_login};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub password: String,
}

impl fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Represents a Jira user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  /// Login name
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub display_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email_address: Option<String>,
}

impl JiraUser {
  /// The login used for watcher and assignee calls.
  ///
  /// Falls back to the normalized display name when the tracker did not send
  /// a login.
  pub fn login(&self) -> String {
    if self.name.is_empty() {
      normalize_login(&self.display_name)
    } else {
      self.name.clone()
    }
  }

  /// Whether this user is the given login, by login or by display name
  pub fn matches_login(&self, login: &str) -> bool {
    let login = login.trim();
    (!login.is_empty() && self.name == login) || matches_login(&self.display_name, login)
  }
}

impl fmt::Display for JiraUser {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.display_name.is_empty() {
      f.write_str(&self.name)
    } else {
      f.write_str(&self.display_name)
    }
  }
}

/// A reference carrying only a name (issue type, priority, component, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
}

/// Represents a Jira project reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
  #[serde(default)]
  pub key: String,
  #[serde(default)]
  pub name: String,
}

/// Reference to another issue, e.g. a parent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
  pub key: String,
}

/// Represents a Jira issue
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
  #[serde(default)]
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueFields {
  pub project: Option<ProjectRef>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub summary: String,
  pub issuetype: Option<NamedRef>,
  pub priority: Option<NamedRef>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub components: Vec<NamedRef>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub labels: Vec<String>,
  pub status: Option<NamedRef>,
  pub resolution: Option<NamedRef>,
  pub assignee: Option<JiraUser>,
  pub reporter: Option<JiraUser>,
  pub duedate: Option<String>,
  pub created: Option<String>,
  pub description: Option<String>,
  pub parent: Option<IssueRef>,
  /// Affects versions
  #[serde(default, deserialize_with = "null_as_default")]
  pub versions: Vec<NamedRef>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub fix_versions: Vec<NamedRef>,
  /// Every other field, custom fields included
  #[serde(flatten)]
  pub extra: HashMap<String, Value>,
}

impl JiraIssueFields {
  /// Project key, falling back to the project name
  pub fn project_key(&self) -> String {
    self
      .project
      .as_ref()
      .map(|p| if p.key.is_empty() { p.name.clone() } else { p.key.clone() })
      .unwrap_or_default()
  }

  pub fn issue_type_name(&self) -> String {
    self.issuetype.as_ref().map(|t| t.name.clone()).unwrap_or_default()
  }

  pub fn priority_name(&self) -> String {
    self.priority.as_ref().map(|p| p.name.clone()).unwrap_or_default()
  }

  pub fn status_name(&self) -> String {
    self.status.as_ref().map(|s| s.name.clone()).unwrap_or_default()
  }

  pub fn resolution_name(&self) -> String {
    self.resolution.as_ref().map(|r| r.name.clone()).unwrap_or_default()
  }

  pub fn component_names(&self) -> Vec<String> {
    self.components.iter().map(|c| c.name.clone()).collect()
  }

  pub fn version_names(&self) -> Vec<String> {
    self.versions.iter().map(|v| v.name.clone()).collect()
  }

  pub fn fix_version_names(&self) -> Vec<String> {
    self.fix_versions.iter().map(|v| v.name.clone()).collect()
  }

  /// Display value of a custom field.
  ///
  /// Option objects yield their `value`, plain strings and numbers are used
  /// as is, and multi-value fields are joined with `, `.
  pub fn custom_value(&self, field_id: &str) -> Option<String> {
    fn render(value: &Value) -> Option<String> {
      match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map
          .get("value")
          .or_else(|| map.get("name"))
          .and_then(Value::as_str)
          .map(str::to_string),
        Value::Array(items) => {
          let parts: Vec<String> = items.iter().filter_map(render).collect();
          (!parts.is_empty()).then(|| parts.join(", "))
        }
      }
    }

    self.extra.get(field_id).and_then(render)
  }
}

/// Response of a search request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
  #[serde(default)]
  pub start_at: u32,
  #[serde(default)]
  pub max_results: u32,
  #[serde(default)]
  pub total: u32,
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
}

/// Response of a watcher listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WatchersResponse {
  #[serde(default)]
  pub watchers: Vec<JiraUser>,
}

/// Response of an issue creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
  #[serde(default)]
  pub id: String,
  pub key: String,
}

/// Error body returned by the REST API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorCollection {
  #[serde(default)]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: HashMap<String, String>,
}

impl ErrorCollection {
  /// Flatten messages and per-field errors (`field: message`, sorted by
  /// field)
  pub fn messages(&self) -> Vec<String> {
    let mut fields: Vec<_> = self.errors.iter().collect();
    fields.sort();
    self
      .error_messages
      .iter()
      .cloned()
      .chain(fields.into_iter().map(|(field, message)| format!("{field}: {message}")))
      .collect()
  }
}

/// A partial set of issue fields for create and update calls.
///
/// Fields that are not set are left unchanged by an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldBag(Map<String, Value>);

impl FieldBag {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set a raw field value
  pub fn set(mut self, field: &str, value: Value) -> Self {
    self.0.insert(field.to_string(), value);
    self
  }

  pub fn get(&self, field: &str) -> Option<&Value> {
    self.0.get(field)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn project(self, key: &str) -> Self {
    self.set("project", json!({ "key": key }))
  }

  pub fn summary(self, summary: &str) -> Self {
    self.set("summary", json!(summary))
  }

  pub fn issue_type(self, name: &str) -> Self {
    self.set("issuetype", json!({ "name": name }))
  }

  pub fn priority(self, name: &str) -> Self {
    self.set("priority", json!({ "name": name }))
  }

  pub fn components<S: AsRef<str>>(self, names: &[S]) -> Self {
    self.set("components", named_list(names))
  }

  pub fn labels<S: AsRef<str>>(self, labels: &[S]) -> Self {
    let labels: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
    self.set("labels", json!(labels))
  }

  /// Set a single-select custom field; an empty value clears it
  pub fn custom_option(self, field_id: &str, value: &str) -> Self {
    let value = if value.is_empty() { Value::Null } else { json!({ "value": value }) };
    self.set(field_id, value)
  }

  /// Set the assignee by login; an empty login unassigns
  pub fn assignee(self, login: &str) -> Self {
    let value = if login.is_empty() { Value::Null } else { json!({ "name": login }) };
    self.set("assignee", value)
  }

  /// Set the due date (`YYYY-MM-DD`); an empty date clears it
  pub fn due_date(self, date: &str) -> Self {
    let value = if date.is_empty() { Value::Null } else { json!(date) };
    self.set("duedate", value)
  }

  pub fn description(self, description: &str) -> Self {
    self.set("description", json!(description))
  }

  pub fn parent(self, key: &str) -> Self {
    self.set("parent", json!({ "key": key }))
  }

  /// Affects versions
  pub fn versions<S: AsRef<str>>(self, names: &[S]) -> Self {
    self.set("versions", named_list(names))
  }

  pub fn fix_versions<S: AsRef<str>>(self, names: &[S]) -> Self {
    self.set("fixVersions", named_list(names))
  }

  /// String value of a plain text field
  pub fn text(&self, field: &str) -> Option<&str> {
    self.0.get(field).and_then(Value::as_str)
  }

  /// `name`, `key`, or `value` of a reference field
  pub fn reference(&self, field: &str) -> Option<&str> {
    let object = self.0.get(field)?.as_object()?;
    ["name", "key", "value"]
      .iter()
      .find_map(|k| object.get(*k).and_then(Value::as_str))
  }
}

fn named_list<S: AsRef<str>>(names: &[S]) -> Value {
  Value::Array(names.iter().map(|n| json!({ "name": n.as_ref() })).collect())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn sample_issue() -> Value {
    json!({
        "id": "10000",
        "key": "PROJ-123",
        "fields": {
            "project": { "key": "PROJ", "name": "Project" },
            "summary": "[ccIC24] Analysis",
            "issuetype": { "name": "Sub-task" },
            "priority": { "name": "P2" },
            "components": [{ "name": "ES94111-01" }],
            "labels": ["ccIC24_CLU_WBS"],
            "customfield_43801": { "value": "ccIC24", "id": "5" },
            "status": { "name": "Open" },
            "resolution": null,
            "assignee": { "name": "gildong.hong", "displayName": "Hong Gildong (gildong.hong)" },
            "reporter": { "name": "cheolsu.kim", "displayName": "Kim Cheolsu (cheolsu.kim)" },
            "duedate": "2023-08-31",
            "created": "2023-08-01T10:00:00.000+0900",
            "description": null,
            "parent": { "key": "PROJ-100" },
            "versions": null,
            "fixVersions": [{ "name": "N/A" }]
        }
    })
  }

  #[test]
  fn test_jira_issue_deserialization() {
    let issue: JiraIssue = serde_json::from_value(sample_issue()).unwrap();

    assert_eq!(issue.id, "10000");
    assert_eq!(issue.key, "PROJ-123");
    assert_eq!(issue.fields.project_key(), "PROJ");
    assert_eq!(issue.fields.summary, "[ccIC24] Analysis");
    assert_eq!(issue.fields.issue_type_name(), "Sub-task");
    assert_eq!(issue.fields.component_names(), vec!["ES94111-01"]);
    assert_eq!(issue.fields.custom_value("customfield_43801").as_deref(), Some("ccIC24"));
    assert_eq!(issue.fields.resolution_name(), "");
    assert!(issue.fields.versions.is_empty());
    assert_eq!(issue.fields.fix_version_names(), vec!["N/A"]);
    assert_eq!(issue.fields.parent.as_ref().map(|p| p.key.as_str()), Some("PROJ-100"));
    assert!(issue.fields.description.is_none());
  }

  #[test]
  fn test_minimal_issue_deserialization() {
    let issue: JiraIssue = serde_json::from_value(json!({ "key": "PROJ-1", "fields": {} })).unwrap();
    assert_eq!(issue.fields.summary, "");
    assert!(issue.fields.components.is_empty());
    assert!(issue.fields.assignee.is_none());
    assert_eq!(issue.fields.custom_value("customfield_43801"), None);
  }

  #[test]
  fn test_custom_value_shapes() {
    let fields: JiraIssueFields = serde_json::from_value(json!({
        "customfield_1": "plain",
        "customfield_2": [{ "value": "a" }, { "value": "b" }],
        "customfield_3": 42,
        "customfield_4": null
    }))
    .unwrap();

    assert_eq!(fields.custom_value("customfield_1").as_deref(), Some("plain"));
    assert_eq!(fields.custom_value("customfield_2").as_deref(), Some("a, b"));
    assert_eq!(fields.custom_value("customfield_3").as_deref(), Some("42"));
    assert_eq!(fields.custom_value("customfield_4"), None);
  }

  #[test]
  fn test_user_login_and_matching() {
    let user = JiraUser {
      name: String::new(),
      display_name: "Hong Gildong (gildong.hong)".to_string(),
      email_address: None,
    };
    assert_eq!(user.login(), "gildong.hong");
    assert!(user.matches_login("gildong.hong"));
    assert_eq!(user.to_string(), "Hong Gildong (gildong.hong)");

    let user = JiraUser {
      name: "gd.hong".to_string(),
      display_name: "Hong Gildong".to_string(),
      email_address: None,
    };
    assert_eq!(user.login(), "gd.hong");
    assert!(user.matches_login("gd.hong"));
    assert!(!user.matches_login("gildong.hong"));
    assert!(!user.matches_login(""));
  }

  #[test]
  fn test_field_bag_serialization() {
    let bag = FieldBag::new()
      .project("PROJ")
      .summary("[ccIC24] SyRS")
      .issue_type("Sub-task")
      .priority("P2")
      .components(&["ES94111-01"])
      .labels(&["ccIC24_CLU_WBS"])
      .custom_option("customfield_43801", "ccIC24")
      .assignee("gildong.hong")
      .due_date("2023-08-31")
      .parent("PROJ-100")
      .versions::<&str>(&[])
      .fix_versions(&["N/A"]);

    assert_eq!(
      serde_json::to_value(&bag).unwrap(),
      json!({
          "project": { "key": "PROJ" },
          "summary": "[ccIC24] SyRS",
          "issuetype": { "name": "Sub-task" },
          "priority": { "name": "P2" },
          "components": [{ "name": "ES94111-01" }],
          "labels": ["ccIC24_CLU_WBS"],
          "customfield_43801": { "value": "ccIC24" },
          "assignee": { "name": "gildong.hong" },
          "duedate": "2023-08-31",
          "parent": { "key": "PROJ-100" },
          "versions": [],
          "fixVersions": [{ "name": "N/A" }]
      })
    );
    assert_eq!(bag.text("summary"), Some("[ccIC24] SyRS"));
    assert_eq!(bag.reference("parent"), Some("PROJ-100"));
    assert_eq!(bag.reference("assignee"), Some("gildong.hong"));
  }

  #[test]
  fn test_field_bag_clears_empty_values() {
    let bag = FieldBag::new()
      .assignee("")
      .due_date("")
      .custom_option("customfield_43801", "");
    assert_eq!(bag.get("assignee"), Some(&Value::Null));
    assert_eq!(bag.get("duedate"), Some(&Value::Null));
    assert_eq!(bag.get("customfield_43801"), Some(&Value::Null));
  }

  #[test]
  fn test_error_collection_messages() {
    let errors: ErrorCollection = serde_json::from_value(json!({
        "errorMessages": ["Issue does not exist"],
        "errors": { "priority": "invalid", "assignee": "unknown user" }
    }))
    .unwrap();

    assert_eq!(
      errors.messages(),
      vec!["Issue does not exist", "assignee: unknown user", "priority: invalid"]
    );
  }

  #[test]
  fn test_auth_debug_redacts_password() {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      password: "secret".to_string(),
    };
    let debug = format!("{auth:?}");
    assert!(debug.contains("test_user"));
    assert!(!debug.contains("secret"));
  }
}
