//! User-visible strings for the roster screen.
//!
//! English defaults are built in; other locales are loaded from JSON with the
//! same field names.

use serde::{Deserialize, Serialize};

/// Short confirmation or warning shown after a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Name or email was empty; nothing was written.
    EmptyFieldWarning,
    RecordSaved,
    RecordUpdated,
    RecordDeleted,
}

/// Localized message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub empty_field_warning: String,
    pub record_saved: String,
    pub record_updated: String,
    pub record_deleted: String,
    pub no_records_available: String,
    pub delete_prompt_title: String,
    pub delete_label: String,
    pub update_label: String,
    pub cancel_label: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            empty_field_warning: "Name or Email cannot be blank".to_string(),
            record_saved: "Record saved".to_string(),
            record_updated: "Record Updated.".to_string(),
            record_deleted: "Record deleted successfully.".to_string(),
            no_records_available: "No records available".to_string(),
            delete_prompt_title: "Delete Record".to_string(),
            delete_label: "Delete".to_string(),
            update_label: "Update".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

impl MessageCatalog {
    /// Parses a catalog; fields missing from `json` keep their English default.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn text(&self, notice: Notice) -> &str {
        match notice {
            Notice::EmptyFieldWarning => &self.empty_field_warning,
            Notice::RecordSaved => &self.record_saved,
            Notice::RecordUpdated => &self.record_updated,
            Notice::RecordDeleted => &self.record_deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageCatalog, Notice};

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let catalog =
            MessageCatalog::from_json_str(r#"{"record_saved": "Kayit kaydedildi"}"#).unwrap();
        assert_eq!(catalog.text(Notice::RecordSaved), "Kayit kaydedildi");
        assert_eq!(
            catalog.text(Notice::RecordDeleted),
            MessageCatalog::default().record_deleted
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(MessageCatalog::from_json_str("{").is_err());
    }
}
