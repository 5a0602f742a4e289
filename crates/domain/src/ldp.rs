//! LDP and Fedora vocabulary, plus the small header grammars built on it.

use crate::request::{Headers, HttpMethod};

/// Link relation pointing at the server's constraints document.
pub const LDP_CONSTRAINED_BY: &str = "http://www.w3.org/ns/ldp#constrainedBy";
/// Link relation from a non-RDF source to its RDF description.
pub const REL_DESCRIBED_BY: &str = "describedby";
/// Link relation from an RDF description back to the described resource.
pub const REL_DESCRIBES: &str = "describes";

/// Containment predicate, full IRI.
pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
/// Parent back-reference predicate, full IRI.
pub const FEDORA_HAS_PARENT: &str = "http://fedora.info/definitions/v4/repository#hasParent";

/// Prefer include URI asking for the descriptions of contained resources.
pub const PREFER_CONTAINED_DESCRIPTIONS: &str = "http://w3.org/ns/oa#PreferContainedDescriptions";
/// Prefer include URI asking for triples that reference the resource.
pub const PREFER_INBOUND_REFERENCES: &str =
    "http://fedora.info/definitions/fcrepo#PreferInboundReferences";

/// Path segment under which a deleted resource's tombstone lives.
pub const TOMBSTONE_SEGMENT: &str = "fcr:tombstone";

/// Headers describing the payload, which a HEAD response must not carry.
pub const PAYLOAD_HEADERS: [&str; 4] = [
    "content-length",
    "content-range",
    "trailer",
    "transfer-encoding",
];

/// Headers whose presence legitimately differs from one message to the next.
pub const PER_MESSAGE_HEADERS: [&str; 1] = ["date"];

/// Returns the tombstone URL of a resource.
#[must_use]
pub fn tombstone_url(resource: &str) -> String {
    format!("{}/{TOMBSTONE_SEGMENT}", resource.trim_end_matches('/'))
}

/// The `return` preference of a `Prefer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnPreference {
    /// `return=representation`
    Representation,
    /// `return=minimal`
    Minimal,
}

impl ReturnPreference {
    /// Returns the header token, e.g. `return=minimal`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Representation => "return=representation",
            Self::Minimal => "return=minimal",
        }
    }
}

/// Builds a `Prefer` header value, optionally with an `include` URI.
#[must_use]
pub fn prefer_header(preference: ReturnPreference, include: Option<&str>) -> String {
    match include {
        Some(uri) => format!("{}; include=\"{uri}\"", preference.as_str()),
        None => preference.as_str().to_string(),
    }
}

/// Value of the `Depth` header on DELETE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteDepth {
    /// Delete only the target.
    Zero,
    /// Delete the target and every contained descendant.
    Infinity,
    /// Any other token, sent verbatim.
    Other(String),
}

impl DeleteDepth {
    /// Returns the header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Zero => "0",
            Self::Infinity => "infinity",
            Self::Other(token) => token,
        }
    }
}

/// Parses an `Allow` header value. Unknown tokens are ignored.
#[must_use]
pub fn parse_allow(value: &str) -> Vec<HttpMethod> {
    value
        .split(',')
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Returns true if any `Allow` header in `headers` lists `method`.
#[must_use]
pub fn allows(headers: &Headers, method: HttpMethod) -> bool {
    headers
        .get_all("Allow")
        .any(|value| parse_allow(value).contains(&method))
}

/// Returns true if `name` is a payload header.
#[must_use]
pub fn is_payload_header(name: &str) -> bool {
    PAYLOAD_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}
