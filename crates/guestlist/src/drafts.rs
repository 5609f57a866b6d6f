//! File-backed form drafts.
//!
//! Unsent form values are kept under a form key in one JSON file so an
//! interrupted `guests add` can be resumed later:
//!
//! ```json
//! { "drafts": { "add-guest-form": { "saved_at": "...", "values": { ... } } } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use guestlist_client::GuestInput;
use serde::{Deserialize, Serialize};

/// Form key used by `guests add`.
pub const ADD_GUEST_FORM: &str = "add-guest-form";

/// One saved form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub saved_at: DateTime<Utc>,
    pub values: serde_json::Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DraftFile {
    #[serde(default)]
    drafts: BTreeMap<String, Draft>,
}

/// Draft storage backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved draft for `form`, if any.
    pub fn get(&self, form: &str) -> Result<Option<Draft>> {
        Ok(self.load()?.drafts.remove(form))
    }

    /// Replace the draft for `form`.
    pub fn set(&self, form: &str, values: serde_json::Value) -> Result<()> {
        let mut file = self.load()?;
        file.drafts.insert(
            form.to_string(),
            Draft {
                saved_at: Utc::now(),
                values,
            },
        );
        self.save(&file)
    }

    /// Remove the draft for `form`. Returns whether one existed.
    pub fn clear(&self, form: &str) -> Result<bool> {
        let mut file = self.load()?;
        let existed = file.drafts.remove(form).is_some();
        if existed {
            self.save(&file)?;
        }
        Ok(existed)
    }

    /// All drafts, ordered by form key.
    pub fn list(&self) -> Result<Vec<(String, Draft)>> {
        Ok(self.load()?.drafts.into_iter().collect())
    }

    fn load(&self) -> Result<DraftFile> {
        if !self.path.exists() {
            return Ok(DraftFile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read drafts from {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(DraftFile::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse drafts in {}", self.path.display()))
    }

    fn save(&self, file: &DraftFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create draft directory {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write drafts to {}", self.path.display()))
    }
}

/// Partially filled guest form. Every field is optional so a half-typed form
/// can be stored and later completed from flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accompany_quota: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GuestDraft {
    /// Fill every field `self` leaves unset from `base`.
    pub fn or(self, base: GuestDraft) -> GuestDraft {
        GuestDraft {
            name: self.name.or(base.name),
            email: self.email.or(base.email),
            mobile: self.mobile.or(base.mobile),
            accompany_quota: self.accompany_quota.or(base.accompany_quota),
            description: self.description.or(base.description),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == GuestDraft::default()
    }

    /// Form values with empty defaults for missing fields.
    pub fn to_input(&self) -> GuestInput {
        GuestInput {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            mobile: self.mobile.clone().unwrap_or_default(),
            accompany_quota: self.accompany_quota.unwrap_or(0),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read a stored draft; unknown or mistyped fields are ignored.
    pub fn from_value(value: &serde_json::Value) -> GuestDraft {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

impl From<GuestInput> for GuestDraft {
    fn from(input: GuestInput) -> Self {
        GuestDraft {
            name: Some(input.name),
            email: Some(input.email),
            mobile: Some(input.mobile),
            accompany_quota: Some(input.accompany_quota),
            description: Some(input.description),
        }
    }
}
