//! Public invitation API.
//!
//! These endpoints are addressed by an invitation token rather than the admin
//! session, so they never trigger a refresh and never touch session state.
//! Server messages are replaced with fixed ones, as the invitee sees them.

use reqwest::Method;

use crate::client::RequestClient;
use crate::error::{Error, Result};
use crate::types::{AccompanyEntry, AccompanyRegistration, Invitation};
use crate::validation::validate_registration;

const INVALID_INVITATION: &str = "Invalid or expired invitation";
const SUBMISSION_FAILED: &str = "Submission failed";

/// Invitation API client.
pub struct InvitationsApi {
    client: RequestClient,
}

impl InvitationsApi {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    fn path(token: &str) -> String {
        format!("api/invitation/accompany-registration/{token}")
    }

    /// Look up the invitation behind `token`.
    pub async fn get(&self, token: &str) -> Result<Invitation> {
        let request = self
            .client
            .request(Method::GET, &Self::path(token))?
            .without_refresh();
        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| generic(e, INVALID_INVITATION))?;
        RequestClient::decode(response).await
    }

    /// Register accompanying guests; exactly `invitation.accompany_quota`
    /// entries are required.
    pub async fn register(
        &self,
        token: &str,
        invitation: &Invitation,
        accompanies: Vec<AccompanyEntry>,
    ) -> Result<()> {
        let errors = validate_registration(invitation.accompany_quota, &accompanies);
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let request = self
            .client
            .request(Method::POST, &Self::path(token))?
            .json(&AccompanyRegistration { accompanies })?
            .without_refresh();
        self.client
            .send(request)
            .await
            .map_err(|e| generic(e, SUBMISSION_FAILED))?;
        Ok(())
    }
}

fn generic(error: Error, message: &str) -> Error {
    match error {
        Error::Request { status, .. } => Error::Request {
            status,
            message: message.to_string(),
        },
        other => other,
    }
}
