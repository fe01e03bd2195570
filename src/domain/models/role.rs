use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Who authored a transcript entry. Persisted lowercase, which also matches
/// the role strings the Gemini API expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}
