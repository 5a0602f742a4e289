//! Clause catalogue and clause results.
//!
//! Every clause maps to one acceptance behaviour of the Fedora API.
//! The catalogue here is pure metadata; execution lives in
//! the application layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A named clause set, one per HTTP method section of the Fedora API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    /// Section 3.3, resource creation.
    Post,
    /// Section 3.5, retrieval.
    Get,
    /// Section 3.6, HEAD.
    Head,
    /// Section 3.7, deletion.
    Delete,
}

impl Module {
    /// Returns all modules in run order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Post, Self::Get, Self::Head, Self::Delete]
    }

    /// Returns the module name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Get => "get",
            Self::Head => "head",
            Self::Delete => "delete",
        }
    }

    /// Returns the Fedora API section covered by this module.
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::Post => "3.3",
            Self::Get => "3.5",
            Self::Head => "3.6",
            Self::Delete => "3.7",
        }
    }

    /// Returns the clauses of this module in declared order.
    pub fn clauses(self) -> impl Iterator<Item = ClauseId> {
        ClauseId::all()
            .iter()
            .copied()
            .filter(move |c| c.module() == self)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Module {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "get" => Ok(Self::Get),
            "head" => Ok(Self::Head),
            "delete" => Ok(Self::Delete),
            other => Err(DomainError::UnknownModule(other.to_string())),
        }
    }
}

/// Identifier of one conformance clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClauseId {
    /// POST to root creates an RDF source and advertises constraints.
    CreateRdfSource,
    /// POST with a payload creates a non-RDF source with constraints and description links.
    CreateNonRdfSource,
    /// The description of a new non-RDF source is retrievable.
    DescriptionExists,
    /// A correct `Digest` on upload is accepted.
    DigestAccepted,
    /// A wrong digest value is rejected with 409.
    BadDigestValue,
    /// An unknown digest algorithm is rejected with 400.
    BadDigestAlgorithm,
    /// The description links back to the non-RDF source it describes.
    DescriptionLinksBack,
    /// `Preference-Applied` echoes the honoured `return` preference.
    PreferApplied,
    /// Contained descriptions are included when asked for.
    ContainedDescriptions,
    /// Inbound references can be asked for.
    InboundReferences,
    /// `Want-Digest` yields a `Digest` of the requested algorithm.
    WantDigest,
    /// The `Digest` returned for `Want-Digest: md5` is the payload's MD5.
    WantDigestValue,
    /// HEAD responses carry no body.
    HeadNoBody,
    /// HEAD responses omit payload headers.
    HeadOmitsPayloadHeaders,
    /// HEAD and GET return the same headers apart from payload headers.
    HeadGetParity,
    /// `Depth: 0` deletes only the target.
    DeleteDepthZero,
    /// `Depth: infinity` deletes the target and its descendants.
    DeleteDepthInfinity,
    /// An invalid `Depth` token is rejected with 400.
    DeleteUnsupportedDepth,
}

impl ClauseId {
    /// Returns every clause in declared order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CreateRdfSource,
            Self::CreateNonRdfSource,
            Self::DescriptionExists,
            Self::DigestAccepted,
            Self::BadDigestValue,
            Self::BadDigestAlgorithm,
            Self::DescriptionLinksBack,
            Self::PreferApplied,
            Self::ContainedDescriptions,
            Self::InboundReferences,
            Self::WantDigest,
            Self::WantDigestValue,
            Self::HeadNoBody,
            Self::HeadOmitsPayloadHeaders,
            Self::HeadGetParity,
            Self::DeleteDepthZero,
            Self::DeleteDepthInfinity,
            Self::DeleteUnsupportedDepth,
        ]
    }

    /// Returns the stable kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateRdfSource => "create-rdf-source",
            Self::CreateNonRdfSource => "create-non-rdf-source",
            Self::DescriptionExists => "description-exists",
            Self::DigestAccepted => "digest-accepted",
            Self::BadDigestValue => "bad-digest-value",
            Self::BadDigestAlgorithm => "bad-digest-algorithm",
            Self::DescriptionLinksBack => "description-links-back",
            Self::PreferApplied => "prefer-applied",
            Self::ContainedDescriptions => "contained-descriptions",
            Self::InboundReferences => "inbound-references",
            Self::WantDigest => "want-digest",
            Self::WantDigestValue => "want-digest-value",
            Self::HeadNoBody => "head-no-body",
            Self::HeadOmitsPayloadHeaders => "head-omits-payload-headers",
            Self::HeadGetParity => "head-get-parity",
            Self::DeleteDepthZero => "delete-depth-zero",
            Self::DeleteDepthInfinity => "delete-depth-infinity",
            Self::DeleteUnsupportedDepth => "delete-unsupported-depth",
        }
    }

    /// Returns the module this clause belongs to.
    #[must_use]
    pub const fn module(self) -> Module {
        match self {
            Self::CreateRdfSource
            | Self::CreateNonRdfSource
            | Self::DescriptionExists
            | Self::DigestAccepted
            | Self::BadDigestValue
            | Self::BadDigestAlgorithm => Module::Post,
            Self::DescriptionLinksBack
            | Self::PreferApplied
            | Self::ContainedDescriptions
            | Self::InboundReferences
            | Self::WantDigest
            | Self::WantDigestValue => Module::Get,
            Self::HeadNoBody | Self::HeadOmitsPayloadHeaders | Self::HeadGetParity => Module::Head,
            Self::DeleteDepthZero | Self::DeleteDepthInfinity | Self::DeleteUnsupportedDepth => {
                Module::Delete
            }
        }
    }

    /// Returns the Fedora API section label, e.g. `3.5.2`.
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::CreateRdfSource | Self::CreateNonRdfSource | Self::DescriptionExists => "3.3",
            Self::DigestAccepted | Self::BadDigestValue | Self::BadDigestAlgorithm => "3.3.1",
            Self::DescriptionLinksBack => "3.5",
            Self::ContainedDescriptions | Self::InboundReferences => "3.5.1",
            Self::PreferApplied => "3.5.2",
            Self::WantDigest | Self::WantDigestValue => "3.5.3",
            Self::HeadNoBody | Self::HeadOmitsPayloadHeaders | Self::HeadGetParity => "3.6",
            Self::DeleteDepthZero | Self::DeleteDepthInfinity | Self::DeleteUnsupportedDepth => {
                "3.7.1"
            }
        }
    }

    /// Returns the required behaviour in one sentence.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateRdfSource => {
                "POST to the root creates an RDF source (201, Location, Link rel=constrainedBy)"
            }
            Self::CreateNonRdfSource => {
                "POST with a payload creates a non-RDF source (201, Location, Link rel=constrainedBy and rel=describedby)"
            }
            Self::DescriptionExists => {
                "The describedby target of a new non-RDF source is retrievable (200)"
            }
            Self::DigestAccepted => "POST with a matching Digest header is accepted (201)",
            Self::BadDigestValue => "POST with a mismatching Digest value is rejected (409)",
            Self::BadDigestAlgorithm => {
                "POST with an unsupported Digest algorithm is rejected (400)"
            }
            Self::DescriptionLinksBack => {
                "The RDF description of a non-RDF source links to it with rel=describes"
            }
            Self::PreferApplied => {
                "GET honours Prefer return=representation|minimal and echoes it in Preference-Applied"
            }
            Self::ContainedDescriptions => {
                "(MAY) GET with PreferContainedDescriptions includes containment and parent triples"
            }
            Self::InboundReferences => "(SHOULD) GET with PreferInboundReferences is honoured (200)",
            Self::WantDigest => {
                "GET with Want-Digest md5|sha1 returns a Digest header of that algorithm"
            }
            Self::WantDigestValue => "The md5 Digest of a non-RDF source matches the uploaded payload",
            Self::HeadNoBody => "HEAD responses carry no body",
            Self::HeadOmitsPayloadHeaders => {
                "HEAD responses omit Content-Length, Content-Range, Trailer and Transfer-Encoding"
            }
            Self::HeadGetParity => "HEAD returns the same headers as GET, payload headers aside",
            Self::DeleteDepthZero => {
                "DELETE with Depth: 0 removes the target (410) but keeps its child (200)"
            }
            Self::DeleteDepthInfinity => {
                "DELETE with Depth: infinity removes the target, child and grandchild (410)"
            }
            Self::DeleteUnsupportedDepth => "DELETE with an invalid Depth token is rejected (400)",
        }
    }

    /// Returns true if the clause can only run against a server supporting DELETE.
    #[must_use]
    pub const fn requires_delete(self) -> bool {
        matches!(self.module(), Module::Delete)
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ClauseId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownClause(wanted.to_string()))
    }
}

/// Outcome of one clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClauseOutcome {
    /// Every condition held.
    Passed,
    /// A condition did not hold.
    Failed {
        /// What was expected and what was observed.
        reason: String,
    },
    /// A precondition was not met; nothing was asserted.
    Skipped {
        /// Why the clause did not run.
        reason: String,
    },
}

impl ClauseOutcome {
    /// Returns the short status label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed { .. } => "FAIL",
            Self::Skipped { .. } => "SKIP",
        }
    }
}

/// Result of running a single clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseResult {
    /// The clause that was run.
    pub clause: ClauseId,
    /// Fedora API section label.
    pub section: String,
    /// Required behaviour.
    pub description: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: ClauseOutcome,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl ClauseResult {
    /// Creates a result for `clause`.
    #[must_use]
    pub fn new(clause: ClauseId, outcome: ClauseOutcome, duration_ms: u64) -> Self {
        Self {
            clause,
            section: clause.section().to_string(),
            description: clause.description().to_string(),
            outcome,
            duration_ms,
        }
    }

    /// Creates a passed result.
    #[must_use]
    pub fn pass(clause: ClauseId) -> Self {
        Self::new(clause, ClauseOutcome::Passed, 0)
    }

    /// Creates a failed result.
    #[must_use]
    pub fn fail(clause: ClauseId, reason: impl Into<String>) -> Self {
        Self::new(
            clause,
            ClauseOutcome::Failed {
                reason: reason.into(),
            },
            0,
        )
    }

    /// Creates a skipped result.
    #[must_use]
    pub fn skip(clause: ClauseId, reason: impl Into<String>) -> Self {
        Self::new(
            clause,
            ClauseOutcome::Skipped {
                reason: reason.into(),
            },
            0,
        )
    }

    /// Sets the execution time (builder pattern).
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns true if the clause passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, ClauseOutcome::Passed)
    }

    /// Returns true if the clause failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        matches!(self.outcome, ClauseOutcome::Failed { .. })
    }

    /// Returns true if the clause was skipped.
    #[must_use]
    pub const fn skipped(&self) -> bool {
        matches!(self.outcome, ClauseOutcome::Skipped { .. })
    }
}
