//! User projection shared by the API and the client.

use serde::{Deserialize, Serialize};

/// Public view of an account.
///
/// This is the only shape in which a user ever leaves the server: the
/// password hash and timestamps stay in the credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric account identifier
    pub id: i64,
    /// Unique handle
    pub username: String,
    /// Unique, normalized email address
    pub email: String,
    /// Absolute or server-relative avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Free-form profile text
    #[serde(default)]
    pub bio: Option<String>,
}
