//! In-memory LDP server implementing the `HttpClient` port.
//!
//! Behaves like a small conforming Fedora repository by default; each
//! [`Flaw`] switches one behaviour to a non-conforming variant.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ldpcheck_application::{HttpClient, HttpClientError};
use ldpcheck_domain::ldp::{LDP_CONSTRAINED_BY, TOMBSTONE_SEGMENT, is_payload_header};
use ldpcheck_domain::{
    DigestAlgorithm, Headers, HttpMethod, RequestBody, RequestSpec, ResponseSnapshot,
    parse_digest_header,
};

pub const ROOT: &str = "http://fake.test/rest";
const CONSTRAINTS: &str = "http://fake.test/static/constraints.rdf";
const DATE: &str = "Sun, 18 Oct 2026 09:00:00 GMT";

/// A deliberate deviation from LDP/Fedora behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flaw {
    /// Creation responses carry no constrainedBy link.
    NoConstrainedBy,
    /// A Digest that does not match the payload is accepted.
    AcceptsBadDigest,
    /// Unknown digest algorithms are ignored.
    AcceptsUnknownAlgorithm,
    /// `Preference-Applied` is never sent.
    NoPreferenceApplied,
    /// HEAD responses repeat the GET body.
    HeadBody,
    /// HEAD responses carry `Content-Length`.
    HeadContentLength,
    /// HEAD responses drop the `Link` headers.
    HeadDropsLinks,
    /// `Depth: 0` deletes recursively.
    IgnoresDepth,
    /// The root `Allow` header omits DELETE.
    NoDeleteAllowed,
    /// `Want-Digest` is answered with a digest of other bytes.
    WrongDigestValue,
    /// The description has no `describes` link.
    NoDescribesLink,
    /// Containment listings omit `fedora:hasParent` triples.
    NoParentTriples,
    /// Resource DELETEs answer 500.
    DeleteFails,
    /// `Want-Digest: sha1` is answered with the `sha` token.
    ShaToken,
    /// Descriptions of binaries answer 404.
    NoDescription,
    /// `Depth: infinity` deletes only the target.
    NotRecursive,
    /// An unknown `Depth` token is treated as `infinity`.
    AcceptsAnyDepth,
}

#[derive(Debug, Clone)]
enum Kind {
    Container,
    Binary { bytes: Vec<u8> },
    Description { describes: String },
}

#[derive(Debug, Clone)]
struct Node {
    kind: Kind,
    parent: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, Node>,
    tombstones: BTreeSet<String>,
    next_id: u64,
    log: Vec<(HttpMethod, String)>,
}

pub struct FakeLdp {
    state: Mutex<State>,
    flaws: Vec<Flaw>,
    reachable_for: Option<usize>,
}

impl Default for FakeLdp {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLdp {
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.insert(
            ROOT.to_string(),
            Node {
                kind: Kind::Container,
                parent: None,
            },
        );
        Self {
            state: Mutex::new(state),
            flaws: Vec::new(),
            reachable_for: None,
        }
    }

    pub fn with_flaw(mut self, flaw: Flaw) -> Self {
        self.flaws.push(flaw);
        self
    }

    /// Answers `requests` requests, then refuses every connection.
    pub const fn reachable_for(mut self, requests: usize) -> Self {
        self.reachable_for = Some(requests);
        self
    }

    fn has(&self, flaw: Flaw) -> bool {
        self.flaws.contains(&flaw)
    }

    /// URLs of live resources other than the root and descriptions.
    pub fn live(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .filter(|(url, node)| {
                url.as_str() != ROOT && !matches!(node.kind, Kind::Description { .. })
            })
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn tombstones(&self) -> Vec<String> {
        self.state.lock().unwrap().tombstones.iter().cloned().collect()
    }

    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn request_count(&self, method: HttpMethod) -> usize {
        self.requests().iter().filter(|(m, _)| *m == method).count()
    }

    fn respond(&self, state: &mut State, request: &RequestSpec) -> (u16, Headers, Vec<u8>) {
        match request.method {
            HttpMethod::Post => self.post(state, request),
            HttpMethod::Get => self.get(state, request),
            HttpMethod::Head => self.head(state, request),
            HttpMethod::Delete => self.delete(state, request),
            _ => (405, Headers::new(), Vec::new()),
        }
    }

    fn post(&self, state: &mut State, request: &RequestSpec) -> (u16, Headers, Vec<u8>) {
        let parent = request.url.trim_end_matches('/').to_string();
        match state.nodes.get(&parent) {
            Some(Node {
                kind: Kind::Container,
                ..
            }) => {}
            Some(_) => return (405, Headers::new(), Vec::new()),
            None if state.tombstones.contains(&parent) => return (410, Headers::new(), Vec::new()),
            None => return (404, Headers::new(), Vec::new()),
        }

        let payload = match &request.body {
            RequestBody::None => None,
            RequestBody::Binary { content, .. } | RequestBody::Multipart { content, .. } => {
                Some(content.clone())
            }
        };

        if let Some(header) = request.headers.get("Digest") {
            let bytes = payload.clone().unwrap_or_default();
            for digest in parse_digest_header(header) {
                match digest.algorithm.parse::<DigestAlgorithm>() {
                    Err(_) if !self.has(Flaw::AcceptsUnknownAlgorithm) => {
                        return (400, Headers::new(), b"unsupported digest".to_vec());
                    }
                    Ok(_) if !digest.matches(&bytes) && !self.has(Flaw::AcceptsBadDigest) => {
                        return (409, Headers::new(), b"checksum mismatch".to_vec());
                    }
                    _ => {}
                }
            }
        }

        state.next_id += 1;
        let url = format!("{parent}/{}", state.next_id);
        let mut headers = Headers::new().with("Location", url.as_str());
        if !self.has(Flaw::NoConstrainedBy) {
            headers.add(ldpcheck_domain::Header::new(
                "Link",
                format!("<{CONSTRAINTS}>; rel=\"{LDP_CONSTRAINED_BY}\""),
            ));
        }

        let kind = match payload {
            Some(bytes) => {
                let description = description_url(&url);
                state.nodes.insert(
                    description.clone(),
                    Node {
                        kind: Kind::Description {
                            describes: url.clone(),
                        },
                        parent: None,
                    },
                );
                headers.add(ldpcheck_domain::Header::new(
                    "Link",
                    format!("<{description}>; rel=\"describedby\""),
                ));
                Kind::Binary { bytes }
            }
            None => Kind::Container,
        };
        state.nodes.insert(
            url.clone(),
            Node {
                kind,
                parent: Some(parent),
            },
        );
        (201, headers, url.into_bytes())
    }

    fn get(&self, state: &State, request: &RequestSpec) -> (u16, Headers, Vec<u8>) {
        let url = request.url.trim_end_matches('/');
        let Some(node) = state.nodes.get(url) else {
            let status = if state.tombstones.contains(url) { 410 } else { 404 };
            return (status, Headers::new(), Vec::new());
        };

        let mut headers = Headers::new()
            .with("Date", DATE)
            .with("ETag", format!("\"{}\"", url.len()));
        let body = match &node.kind {
            Kind::Container => {
                headers = headers
                    .with("Content-Type", "text/turtle")
                    .with("Link", "<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\"")
                    .with("Link", "<http://www.w3.org/ns/ldp#Resource>; rel=\"type\"");
                if url == ROOT {
                    let allow = if self.has(Flaw::NoDeleteAllowed) {
                        "GET, HEAD, OPTIONS, POST"
                    } else {
                        "GET, HEAD, OPTIONS, POST, DELETE"
                    };
                    headers = headers.with("Allow", allow);
                }
                if let Some(prefer) = request.headers.get("Prefer") {
                    if !self.has(Flaw::NoPreferenceApplied) {
                        let token = prefer.split(';').next().unwrap_or_default().trim();
                        headers = headers.with("Preference-Applied", token);
                    }
                }
                let include_children = request
                    .headers
                    .get("Prefer")
                    .is_some_and(|p| p.contains("PreferContainedDescriptions"));
                self.turtle(state, url, include_children).into_bytes()
            }
            Kind::Binary { bytes } => {
                headers = headers
                    .with("Content-Type", "application/octet-stream")
                    .with("Link", format!("<{}>; rel=\"describedby\"", description_url(url)));
                if let Some(wanted) = request.headers.get("Want-Digest") {
                    if let Ok(algorithm) = wanted.parse::<DigestAlgorithm>() {
                        let digested: &[u8] = if self.has(Flaw::WrongDigestValue) {
                            b"something else"
                        } else {
                            bytes
                        };
                        let token = match algorithm {
                            DigestAlgorithm::Sha1 if self.has(Flaw::ShaToken) => "sha",
                            other => other.as_str(),
                        };
                        headers = headers.with(
                            "Digest",
                            format!("{token}={}", algorithm.base64(digested)),
                        );
                    }
                }
                bytes.clone()
            }
            Kind::Description { .. } if self.has(Flaw::NoDescription) => {
                return (404, Headers::new(), Vec::new());
            }
            Kind::Description { describes } => {
                headers = headers.with("Content-Type", "text/turtle");
                if !self.has(Flaw::NoDescribesLink) {
                    headers = headers.with("Link", format!("<{describes}>; rel=\"describes\""));
                }
                format!("<{describes}> <http://purl.org/dc/terms/title> \"fixture\" .\n")
                    .into_bytes()
            }
        };
        let headers = headers.with("Content-Length", body.len().to_string());
        (200, headers, body)
    }

    fn turtle(&self, state: &State, url: &str, include_children: bool) -> String {
        let mut out = String::from("@prefix ldp: <http://www.w3.org/ns/ldp#> .\n");
        out.push_str("@prefix fedora: <http://fedora.info/definitions/v4/repository#> .\n");
        for (child, node) in &state.nodes {
            if node.parent.as_deref() != Some(url) {
                continue;
            }
            out.push_str(&format!("<{url}> ldp:contains <{child}> .\n"));
            if include_children && !self.has(Flaw::NoParentTriples) {
                out.push_str(&format!("<{child}> fedora:hasParent <{url}> .\n"));
            }
        }
        out
    }

    fn head(&self, state: &State, request: &RequestSpec) -> (u16, Headers, Vec<u8>) {
        let (status, headers, body) = self.get(state, request);
        let headers = headers
            .iter()
            .filter(|h| {
                !(is_payload_header(&h.name) && !self.has(Flaw::HeadContentLength))
                    && !(h.is("Link") && self.has(Flaw::HeadDropsLinks))
            })
            .cloned()
            .collect();
        let body = if self.has(Flaw::HeadBody) {
            body
        } else {
            Vec::new()
        };
        (status, headers, body)
    }

    fn delete(&self, state: &mut State, request: &RequestSpec) -> (u16, Headers, Vec<u8>) {
        let url = request.url.trim_end_matches('/');
        if let Some(resource) = url.strip_suffix(&format!("/{TOMBSTONE_SEGMENT}")) {
            let status = if state.tombstones.remove(resource) { 204 } else { 404 };
            return (status, Headers::new(), Vec::new());
        }
        if self.has(Flaw::DeleteFails) {
            return (500, Headers::new(), Vec::new());
        }
        if !state.nodes.contains_key(url) {
            let status = if state.tombstones.contains(url) { 410 } else { 404 };
            return (status, Headers::new(), Vec::new());
        }

        let recursive = match request.headers.get("Depth").map(str::trim) {
            None => true,
            Some("infinity") => !self.has(Flaw::NotRecursive),
            Some("0") => self.has(Flaw::IgnoresDepth),
            Some(_) if self.has(Flaw::AcceptsAnyDepth) => true,
            Some(_) => return (400, Headers::new(), b"invalid Depth".to_vec()),
        };

        let mut doomed = vec![url.to_string()];
        if recursive {
            let prefix = format!("{url}/");
            doomed.extend(
                state
                    .nodes
                    .keys()
                    .filter(|k| k.starts_with(&prefix) && !k.ends_with("/fcr:metadata"))
                    .cloned(),
            );
        }
        for target in doomed {
            state.nodes.remove(&target);
            state.nodes.remove(&description_url(&target));
            state.tombstones.insert(target);
        }
        (204, Headers::new(), Vec::new())
    }
}

fn description_url(url: &str) -> String {
    format!("{url}/fcr:metadata")
}

#[async_trait]
impl HttpClient for FakeLdp {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSnapshot, HttpClientError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;
        if self
            .reachable_for
            .is_some_and(|limit| state.log.len() >= limit)
        {
            return Err(HttpClientError::ConnectionRefused {
                host: "fake.test".to_string(),
                port: 80,
            });
        }
        state.log.push((request.method, request.url.clone()));
        let (status, headers, body) = self.respond(&mut state, request);
        Ok(ResponseSnapshot::new(
            request.method,
            request.url.clone(),
            status,
            headers,
            body,
            Duration::from_millis(1),
        ))
    }
}
