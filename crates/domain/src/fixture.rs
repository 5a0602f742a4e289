//! The binary payload uploaded when a clause needs a non-RDF source.

use crate::request::RequestBody;

const BUILTIN_NAME: &str = "fixture.bin";
const BUILTIN_CONTENT_TYPE: &str = "application/octet-stream";
const BUILTIN_PAYLOAD: &[u8] = b"ldpcheck non-RDF fixture\n\x00\x01\x02\x03\xfe\xff\n";

/// Shared read-only upload payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFixture {
    /// File name announced to the server.
    pub file_name: String,
    /// Media type of the payload.
    pub content_type: String,
    /// Payload bytes; never empty.
    pub bytes: Vec<u8>,
}

impl BinaryFixture {
    /// Creates a fixture. Returns `None` for an empty payload.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        })
    }

    /// The built-in payload used when no fixture file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            file_name: BUILTIN_NAME.to_string(),
            content_type: BUILTIN_CONTENT_TYPE.to_string(),
            bytes: BUILTIN_PAYLOAD.to_vec(),
        }
    }

    /// Builds the upload body, either raw or as a single-file multipart form.
    #[must_use]
    pub fn to_body(&self, multipart: bool) -> RequestBody {
        if multipart {
            RequestBody::Multipart {
                field: "file".to_string(),
                file_name: self.file_name.clone(),
                content_type: self.content_type.clone(),
                content: self.bytes.clone(),
            }
        } else {
            RequestBody::Binary {
                content: self.bytes.clone(),
                content_type: self.content_type.clone(),
                file_name: Some(self.file_name.clone()),
            }
        }
    }
}

impl Default for BinaryFixture {
    fn default() -> Self {
        Self::builtin()
    }
}
