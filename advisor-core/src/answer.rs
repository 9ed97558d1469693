use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::fields::FixedField;

/// Resolution state of a single question slot.
///
/// Absence from the store is the third state: the question is still open
/// and will be offered as the current slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerValue {
    /// Permanently skipped after exhausting retries; never re-asked
    Skipped,
    /// Answered with the stored text
    Answered(String),
}

impl AnswerValue {
    pub fn answered_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Answered(text) => Some(text),
            AnswerValue::Skipped => None,
        }
    }
}

/// Session-scoped mapping from slot id to its resolution, plus the
/// reserved email and report-dispatch flags as typed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    entries: HashMap<String, AnswerValue>,
    /// Collected recipient address; set once, never overwritten
    pub email: Option<String>,
    /// Guard for the one-shot report dispatch
    pub report_sent: bool,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: &str) -> Option<&AnswerValue> {
        self.entries.get(id)
    }

    /// True when the slot has no entry at all (neither answered nor skipped)
    pub fn is_unanswered(&self, id: &str) -> bool {
        !self.entries.contains_key(id)
    }

    pub fn answered_text(&self, id: &str) -> Option<&str> {
        self.entries.get(id).and_then(|v| v.answered_text())
    }

    pub fn set_answered(&mut self, id: &str, text: impl Into<String>) {
        self.entries
            .insert(id.to_string(), AnswerValue::Answered(text.into()));
    }

    pub fn set_skipped(&mut self, id: &str) {
        self.entries.insert(id.to_string(), AnswerValue::Skipped);
    }

    pub fn fixed_field(&self, field: FixedField) -> Option<&str> {
        self.answered_text(field.id())
    }

    /// All fixed fields carry a non-empty answer
    pub fn fixed_fields_complete(&self) -> bool {
        FixedField::ALL
            .iter()
            .all(|f| self.answered_text(f.id()).is_some())
    }

    /// Serializable snapshot in the shape clients expect: answered slots map
    /// to their text, skipped slots to the empty string, and the reserved
    /// `email` / `report_sent` keys are included when set.
    pub fn snapshot(&self) -> BTreeMap<String, serde_json::Value> {
        let mut map = BTreeMap::new();
        for (id, value) in &self.entries {
            let rendered = match value {
                AnswerValue::Answered(text) => serde_json::Value::String(text.clone()),
                AnswerValue::Skipped => serde_json::Value::String(String::new()),
            };
            map.insert(id.clone(), rendered);
        }
        if let Some(email) = &self.email {
            map.insert("email".to_string(), serde_json::Value::String(email.clone()));
        }
        if self.report_sent {
            map.insert("report_sent".to_string(), serde_json::Value::Bool(true));
        }
        map
    }
}
