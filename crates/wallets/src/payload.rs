use base64::{engine::general_purpose, Engine as _};

/// Broadcast-ready bytes: the bag-of-cells form of a signed external
/// message.
///
/// Opaque by design; it is created by the signing service, handed to the
/// broadcast endpoint exactly once and then discarded, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedPayload(Vec<u8>);

impl SignedPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Standard-base64 form for JSON transports.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.0)
    }
}

impl std::fmt::Debug for SignedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not dump full payloads into logs.
        write!(f, "SignedPayload({} bytes)", self.0.len())
    }
}
