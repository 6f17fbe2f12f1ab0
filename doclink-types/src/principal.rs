//! Authenticated identity snapshot.

use serde::{Deserialize, Serialize};

/// A serializable snapshot of the identity provider's user record.
///
/// Created by the provider on sign-in and dropped on sign-out. The role
/// claim is deliberately not part of this type: it is resolved
/// asynchronously from the session's ID token and re-resolved whenever the
/// principal changes (see the auth crate's role module).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub provider_id: String,
}
