//! API endpoint implementations.

mod accompanies;
mod auth;
mod guests;
mod invitations;

pub use accompanies::AccompaniesApi;
pub use auth::AuthApi;
pub use guests::GuestsApi;
pub use invitations::InvitationsApi;
