//! Auth API.

use reqwest::Method;

use crate::client::RequestClient;
use crate::error::Result;
use crate::types::{ForgotPasswordRequest, LoginRequest, MeResponse, MessageResponse};

/// Auth API client.
///
/// Session state transitions belong to [`crate::SessionStore`]; these are the
/// raw calls it is built on.
pub struct AuthApi {
    client: RequestClient,
}

impl AuthApi {
    pub(crate) fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session cookie.
    ///
    /// A 401 here means bad credentials, so it is never treated as an
    /// expired session.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<MessageResponse> {
        let request = self
            .client
            .request(Method::POST, "api/admin/login")?
            .json(credentials)?
            .without_refresh();
        RequestClient::decode(self.client.send(request).await?).await
    }

    /// Ask the server who the current cookie belongs to.
    pub async fn me(&self) -> Result<MeResponse> {
        self.client.get("api/admin/me").await
    }

    /// Invalidate the session server-side.
    pub async fn logout(&self) -> Result<()> {
        let request = self
            .client
            .request(Method::POST, "api/admin/logout")?
            .without_refresh();
        self.client.send(request).await?;
        Ok(())
    }

    /// Request a password reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        self.client
            .post(
                "api/admin/forgot-password",
                &ForgotPasswordRequest {
                    email: email.to_string(),
                },
            )
            .await
    }
}
