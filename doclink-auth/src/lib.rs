//! Identity-provider adapter.
//!
//! Wraps the remote identity provider's sign-in, sign-up, sign-out and
//! verification-email operations behind the same uniform contract as the
//! store layer: every call is a single attempt that resolves to either a
//! domain value or one [`doclink_types::ErrorObject`]. Recognizable
//! provider errors keep their code and message verbatim; anything else
//! becomes the unknown error.
//!
//! The role claim is not part of the [`doclink_types::Principal`]; it is
//! resolved separately from the active session and re-resolved whenever the
//! principal changes (see [`RoleWatcher`]).

mod client;
mod error;
mod role;

pub use client::{AuthConfig, AuthMessage, IdentityClient, Session};
pub use error::{AuthError, AuthResult};
pub use role::{RoleWatcher, ADMIN_ROLE};
