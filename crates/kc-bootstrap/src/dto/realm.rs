//! Realm DTOs for the Admin API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Sparse update of realm settings.
///
/// Only fields that are `Some` are written; everything else on the fetched
/// realm document is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmSettingsPatch {
    /// Allow user self-registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_allowed: Option<bool>,
    /// Use the email address as username on registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_email_as_username: Option<bool>,
    /// Require email verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    /// Allow password reset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_allowed: Option<bool>,
    /// Enable "Remember Me" checkbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
    /// Allow login with email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_with_email_allowed: Option<bool>,
}

impl RealmSettingsPatch {
    /// Patch that only toggles self-registration.
    #[must_use]
    pub fn registration(allowed: bool) -> Self {
        Self {
            registration_allowed: Some(allowed),
            ..Self::default()
        }
    }

    /// The set fields, keyed by their wire name.
    #[must_use]
    pub fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Full realm document as returned by the provider.
///
/// Kept untyped so that fields this tool does not know about are written
/// back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmDocument(Map<String, Value>);

impl RealmDocument {
    /// Wraps a decoded realm document.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Boolean value of `name`, `None` if missing or not a boolean.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    /// Names of the patch fields whose current value differs.
    #[must_use]
    pub fn differing(&self, patch: &Map<String, Value>) -> Vec<String> {
        patch
            .iter()
            .filter(|(name, desired)| self.0.get(name.as_str()) != Some(*desired))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Merges `patch` onto the document.
    pub fn apply(&mut self, patch: &Map<String, Value>) {
        for (name, value) in patch {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Underlying fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Realm representation for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct RealmSnapshot {
    /// Realm name.
    #[tabled(rename = "Realm")]
    pub realm: String,
    /// Whether the realm is enabled.
    #[tabled(rename = "Enabled", display_with = "display_flag")]
    pub enabled: Option<bool>,
    /// Self-registration.
    #[tabled(rename = "Registration", display_with = "display_flag")]
    pub registration_allowed: Option<bool>,
    /// Email as username.
    #[tabled(rename = "Email As Username", display_with = "display_flag")]
    pub registration_email_as_username: Option<bool>,
    /// Email verification.
    #[tabled(rename = "Verify Email", display_with = "display_flag")]
    pub verify_email: Option<bool>,
    /// Password reset.
    #[tabled(rename = "Reset Password", display_with = "display_flag")]
    pub reset_password_allowed: Option<bool>,
}

impl RealmSnapshot {
    /// Extracts the displayed fields from a realm document.
    #[must_use]
    pub fn from_document(name: &str, document: &RealmDocument) -> Self {
        Self {
            realm: document
                .fields()
                .get("realm")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            enabled: document.flag("enabled"),
            registration_allowed: document.flag("registrationAllowed"),
            registration_email_as_username: document.flag("registrationEmailAsUsername"),
            verify_email: document.flag("verifyEmail"),
            reset_password_allowed: document.flag("resetPasswordAllowed"),
        }
    }
}

#[allow(clippy::ref_option)]
fn display_flag(flag: &Option<bool>) -> String {
    flag.map_or_else(|| "-".to_string(), |f| f.to_string())
}
