//! Accompanies API.

use crate::client::RequestClient;
use crate::error::Result;
use crate::types::AccompanyGroup;

/// Accompanying-guest groups, read-only.
pub struct AccompaniesApi {
    client: RequestClient,
}

impl AccompaniesApi {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// List every accompanying-guest group.
    pub async fn list(&self) -> Result<Vec<AccompanyGroup>> {
        self.client.get("api/admin/accompanies").await
    }
}
