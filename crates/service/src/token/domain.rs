use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity payload supplied at login. Arbitrary by design; the gate only
/// ever looks at the `email` claim.
pub type IdentityPayload = serde_json::Map<String, Value>;

/// Decoded session credential: the identity payload flattened next to the
/// registered expiry claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: IdentityPayload,
    pub exp: usize,
}

impl SessionClaims {
    /// The authenticated email, when the identity payload carried one.
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}
