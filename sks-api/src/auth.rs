use serde::{Serialize, Deserialize};

/// body of POST /auth. the key is the full cookie value issued at login,
/// marker prefix included
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyStreamKey {
    pub key: String,
}
