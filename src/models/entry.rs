use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use super::user::UserId;

pub type EntryId = i64;

/// What a caller submits. Hours are derived, never supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
    pub work_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub description: String,
}

/// A validated entry ready for insertion.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: UserId,
    pub work_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
    pub hours: f64,
}

/// An entry joined with its owner's display name.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub id: EntryId,
    pub user_id: UserId,
    pub user_name: String,
    pub work_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
    pub hours: f64,
}

/// Which entries a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryScope {
    All,
    ForUser(UserId),
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HourUsage {
    pub logged: f64,
    pub limit: f64,
}

impl HourUsage {
    pub fn remaining(&self) -> f64 {
        (self.limit - self.logged).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_optional() {
        let request: EntryRequest = serde_json::from_str(
            r#"{"work_type":"dev","start_time":"2024-05-01T09:00:00","end_time":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(request.description, "");
    }
}
