use bytes::Bytes;

/// A packet whose body layout is unknown, kept as raw bytes.
///
/// Produced for unregistered tags and for registered tags without a body
/// decoder. Encoding writes the body back unchanged under the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueRecord {
    pub tag: u16,
    pub body: Bytes,
}

impl OpaqueRecord {
    pub fn new(tag: u16, body: impl Into<Bytes>) -> Self {
        Self {
            tag,
            body: body.into(),
        }
    }
}
