use crate::StoreError;
use serde::{Deserialize, Serialize};

pub type ProfileId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub display_name: String,
    pub created_at: String,
}

/// Result of a create-or-get profile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCreation {
    pub profile: Profile,
    pub created: bool,
}

/// The profile a client session acts as, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveProfile {
    #[default]
    NoProfile,
    Active(Profile),
}

impl ActiveProfile {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::NoProfile => None,
            Self::Active(profile) => Some(profile),
        }
    }

    pub fn id(&self) -> Option<ProfileId> {
        self.profile().map(|profile| profile.id)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Trims a display name and rejects blank ones.
pub fn normalize_display_name(raw: &str) -> Result<String, StoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(StoreError::Validation(
            "display name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
