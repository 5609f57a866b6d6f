//! Guests API.

use crate::client::RequestClient;
use crate::error::{Error, Result};
use crate::types::{Guest, GuestEnvelope, GuestInput};
use crate::validation::validate_guest;

/// Guests API client.
pub struct GuestsApi {
    client: RequestClient,
}

impl GuestsApi {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// List all guests.
    pub async fn list(&self) -> Result<Vec<Guest>> {
        self.client.get("api/admin/guests").await
    }

    /// Get a guest by ID.
    pub async fn get(&self, id: &str) -> Result<Guest> {
        let envelope: GuestEnvelope = self.client.get(&format!("api/admin/guests/{id}")).await?;
        Ok(envelope.into_guest())
    }

    /// Create a guest. The input is validated before anything is sent.
    pub async fn create(&self, input: &GuestInput) -> Result<Guest> {
        check(input)?;
        let envelope: GuestEnvelope = self.client.post("api/admin/guests", input).await?;
        Ok(envelope.into_guest())
    }

    /// Replace a guest's details.
    pub async fn update(&self, id: &str, input: &GuestInput) -> Result<Guest> {
        check(input)?;
        let envelope: GuestEnvelope = self
            .client
            .put(&format!("api/admin/guests/{id}"), input)
            .await?;
        Ok(envelope.into_guest())
    }

    /// Delete a guest.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("api/admin/guests/{id}")).await
    }
}

fn check(input: &GuestInput) -> Result<()> {
    let errors = validate_guest(input);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}
