//! Request and response types for the guestlist admin API.
//!
//! These types mirror the server's JSON contract (camelCase, Mongo-style `_id`).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// User profile as returned by `/api/admin/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<ProfileResponse> for User {
    fn from(profile: ProfileResponse) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
        }
    }
}

/// Response from `/api/admin/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<ProfileResponse>,
}

/// Login credentials.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Forgot-password request.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Generic `{message}` response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Guests
// ─────────────────────────────────────────────────────────────────────────────

/// A registered guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    #[serde(rename = "_id")]
    pub id: String,
    /// Registration number assigned by the server.
    #[serde(default)]
    pub reg_num: Option<String>,
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub accompany_quota: u32,
    /// Welcome message, as HTML.
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for creating or updating a guest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInput {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub accompany_quota: u32,
    /// Welcome message, as HTML. Empty when not set.
    #[serde(default)]
    pub description: String,
}

impl From<&Guest> for GuestInput {
    fn from(guest: &Guest) -> Self {
        Self {
            name: guest.name.clone(),
            email: guest.email.clone(),
            mobile: guest.mobile.clone(),
            accompany_quota: guest.accompany_quota,
            description: guest.description.clone().unwrap_or_default(),
        }
    }
}

/// Guest payload wrapped in `{data}` or returned bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GuestEnvelope {
    Wrapped { data: Guest },
    Bare(Guest),
}

impl GuestEnvelope {
    pub(crate) fn into_guest(self) -> Guest {
        match self {
            GuestEnvelope::Wrapped { data } => data,
            GuestEnvelope::Bare(guest) => guest,
        }
    }
}

/// An accompanying-guest group. The console does not interpret these.
pub type AccompanyGroup = serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Invitations
// ─────────────────────────────────────────────────────────────────────────────

/// Invitation details behind a registration token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub guest_name: String,
    pub reg_num: String,
    pub accompany_quota: u32,
}

/// One accompanying guest on the public registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccompanyEntry {
    pub name: String,
    pub email: String,
    pub mobile: String,
}

/// Body of a registration submission.
#[derive(Debug, Clone, Serialize)]
pub struct AccompanyRegistration {
    pub accompanies: Vec<AccompanyEntry>,
}
