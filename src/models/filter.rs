//! Wire types for knowledge-store filter requests
//!
//! A filter asks the knowledge store to watch a grounded predicate and
//! notify the dispatcher when its truth value becomes known at runtime.
//! One request is sent per plan, batched over every distinct predicate
//! referenced by a branch condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::condition::GroundedPredicate;

/// When the knowledge store should notify the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Notify when the predicate's truth value first becomes known
    #[default]
    Known,
    /// Notify on every change to the predicate's value
    Changed,
}

impl std::str::FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "known" => Ok(NotificationKind::Known),
            "changed" => Ok(NotificationKind::Changed),
            other => anyhow::bail!("Unknown notification kind: {other} (expected known or changed)"),
        }
    }
}

/// One watched predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub predicate: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub notification: NotificationKind,
}

impl FilterEntry {
    pub fn new(predicate: &GroundedPredicate, notification: NotificationKind) -> Self {
        Self {
            predicate: predicate.name.clone(),
            arguments: predicate.arguments.clone(),
            notification,
        }
    }
}

/// Batched subscription request sent to the knowledge store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub plan_id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub entries: Vec<FilterEntry>,
}

impl FilterRequest {
    pub fn new(plan_id: Uuid, entries: Vec<FilterEntry>) -> Self {
        Self {
            plan_id,
            requested_at: Utc::now(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_shape() {
        let predicate = GroundedPredicate::new(
            "door_open".to_string(),
            vec!["wp1".to_string()],
        );
        let entry = FilterEntry::new(&predicate, NotificationKind::Known);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["predicate"], "door_open");
        assert_eq!(json["arguments"][0], "wp1");
        assert_eq!(json["notification"], "known");
    }

    #[test]
    fn test_notification_kind_parse() {
        assert_eq!(
            "known".parse::<NotificationKind>().unwrap(),
            NotificationKind::Known
        );
        assert_eq!(
            "Changed".parse::<NotificationKind>().unwrap(),
            NotificationKind::Changed
        );
        assert!("sometimes".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn test_request_roundtrip() {
        let request = FilterRequest::new(Uuid::new_v4(), Vec::new());
        let json = serde_json::to_string(&request).unwrap();
        let back: FilterRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.plan_id, request.plan_id);
        assert!(back.is_empty());
    }
}
