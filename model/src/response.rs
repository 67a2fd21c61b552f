//! Response bodies.

use serde::{Deserialize, Serialize};

/// Acknowledgement of a login.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    /// A bearer token to authenticate with.
    ///
    /// Only issued when the server is configured with an auth secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
