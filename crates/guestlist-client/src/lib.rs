//! Session-aware HTTP client for the guestlist admin API.
//!
//! All authenticated calls go through [`RequestClient`], which keeps the
//! session alive transparently: an expired access cookie is refreshed once,
//! shared by every request that noticed the expiry at the same time, and the
//! failed request is retried. When the refresh itself fails the session held
//! by [`SessionStore`] is torn down and callers get [`Error::SessionExpired`].
//!
//! # Example
//!
//! ```no_run
//! use guestlist_client::{LoginRequest, RequestClient, SessionStore};
//!
//! # async fn example() -> guestlist_client::Result<()> {
//! let store = SessionStore::connect(
//!     RequestClient::builder().base_url("http://localhost:5000"),
//! )?;
//!
//! if !store.hydrate().await.is_authenticated {
//!     store
//!         .login(&LoginRequest {
//!             email: "admin@example.com".into(),
//!             password: "secret".into(),
//!         })
//!         .await?;
//! }
//!
//! for guest in store.client().guests().list().await? {
//!     println!("{} <{}>", guest.name, guest.email);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Auth**: login, who-am-I, logout, forgot-password
//! - **Guests**: list, get, create, update, delete
//! - **Accompanies**: list
//! - **Invitations**: public token lookup and accompany registration

pub mod api;
pub mod client;
pub mod error;
pub mod refresh;
pub mod session;
pub mod types;
pub mod validation;

pub use client::{ClientBuilder, MultipartField, RequestBody, RequestClient, RequestDescriptor};
pub use error::{Error, Result};
pub use session::{Session, SessionEvent, SessionHandle, SessionStore, SessionTeardown};
pub use types::*;
pub use validation::FieldError;
