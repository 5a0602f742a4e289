//! HTTP Request body types

/// HTTP request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// Raw binary payload sent as the entity body.
    Binary {
        /// Payload bytes.
        content: Vec<u8>,
        /// The content type (e.g., "image/jpeg")
        content_type: String,
        /// File name announced through `Content-Disposition`, if any.
        file_name: Option<String>,
    },
    /// Single-file multipart form upload.
    Multipart {
        /// Form field name.
        field: String,
        /// File name of the part.
        file_name: String,
        /// The content type of the part.
        content_type: String,
        /// Payload bytes.
        content: Vec<u8>,
    },
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Returns whether there is no payload to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Binary { content, .. } | Self::Multipart { content, .. } => content.is_empty(),
        }
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Binary { content, .. } | Self::Multipart { content, .. } => content.len(),
        }
    }

    /// Returns the content type of the payload, if applicable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Binary { content_type, .. } => Some(content_type),
            Self::Multipart { .. } => Some("multipart/form-data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        let body = RequestBody::none();
        assert!(body.is_empty());
        assert_eq!(body.len(), 0);
        assert_eq!(body.content_type(), None);
    }

    #[test]
    fn test_binary_content_type() {
        let body = RequestBody::Binary {
            content: vec![1, 2, 3],
            content_type: "image/jpeg".to_string(),
            file_name: Some("image.jpg".to_string()),
        };
        assert!(!body.is_empty());
        assert_eq!(body.len(), 3);
        assert_eq!(body.content_type(), Some("image/jpeg"));
    }

    #[test]
    fn test_multipart_content_type() {
        let body = RequestBody::Multipart {
            field: "file".to_string(),
            file_name: "image.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            content: vec![0xff],
        };
        assert_eq!(body.content_type(), Some("multipart/form-data"));
    }
}
