//! Clause execution.
//!
//! Every [`ClauseId`] maps to one async function in the per-module files.
//! A clause talks to the server only through its [`ClauseContext`], which
//! registers every created resource the moment the creation response
//! arrives, before any assertion runs on it.

mod check;
mod delete;
mod get;
mod head;
mod post;

use ldpcheck_domain::{BinaryFixture, ClauseId, RequestSpec, ResponseSnapshot};
use thiserror::Error;

use crate::ports::{HttpClient, HttpClientError};
use crate::registry::ResourceRegistry;

pub use check::same_resource;

/// Ways a clause can end other than passing.
#[derive(Debug, Error)]
pub enum ClauseError {
    /// A condition did not hold.
    #[error("{0}")]
    Failed(String),

    /// The server could not be reached; the run must stop.
    #[error(transparent)]
    Fatal(#[from] HttpClientError),
}

/// Everything a clause may use.
pub struct ClauseContext<'a, C: HttpClient + ?Sized> {
    /// Adapter to the server under test.
    pub client: &'a C,
    /// Registry of the running module.
    pub registry: &'a mut ResourceRegistry,
    /// Shared upload payload.
    pub fixture: &'a BinaryFixture,
    /// Root URL, without trailing slash.
    pub root: &'a str,
    /// Upload non-RDF content as multipart form data.
    pub multipart: bool,
}

impl<C: HttpClient + ?Sized> ClauseContext<'_, C> {
    /// Sends a request. Any status is a response; only network failures
    /// are errors, and those are fatal.
    pub async fn send(&mut self, request: RequestSpec) -> Result<ResponseSnapshot, ClauseError> {
        Ok(self.client.execute(&request).await?)
    }

    /// Sends a creation request and registers the `Location` it returns.
    ///
    /// Registration happens whatever the status, so a server that creates a
    /// resource while answering unexpectedly still gets cleaned up.
    pub async fn create(&mut self, request: RequestSpec) -> Result<ResponseSnapshot, ClauseError> {
        let response = self.send(request).await?;
        if let Some(location) = response.location() {
            self.registry.register(location);
        }
        Ok(response)
    }

    /// POSTs the fixture payload under `parent` with extra headers.
    pub async fn post_fixture(
        &mut self,
        parent: &str,
        headers: &[(&str, &str)],
    ) -> Result<ResponseSnapshot, ClauseError> {
        let mut request = RequestSpec::post(parent).with_body(self.fixture.to_body(self.multipart));
        for (name, value) in headers {
            request = request.with_header(*name, *value);
        }
        self.create(request).await
    }

    /// Creates an RDF source under `parent` as set-up for a clause.
    pub async fn create_container(&mut self, parent: &str) -> Result<String, ClauseError> {
        let response = self.create(RequestSpec::post(parent)).await?;
        Self::created_location(&response, "RDF source")
    }

    /// Creates a non-RDF source under the root as set-up for a clause.
    pub async fn create_binary(&mut self) -> Result<String, ClauseError> {
        let root = self.root;
        let response = self.post_fixture(root, &[]).await?;
        Self::created_location(&response, "non-RDF source")
    }

    fn created_location(response: &ResponseSnapshot, what: &str) -> Result<String, ClauseError> {
        match (response.status, response.location()) {
            (201, Some(location)) => Ok(location.to_string()),
            (201, None) => Err(ClauseError::Failed(format!(
                "set-up: creating a {what} under {} returned 201 without Location",
                response.url
            ))),
            (_, _) => Err(ClauseError::Failed(format!(
                "set-up: creating a {what} under {} returned {}",
                response.url,
                response.status_code()
            ))),
        }
    }
}

/// Runs one clause to completion.
///
/// # Errors
///
/// Returns the clause's failure, skip, or fatal transport error.
pub async fn execute<C: HttpClient + ?Sized>(
    clause: ClauseId,
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    match clause {
        ClauseId::CreateRdfSource => post::create_rdf_source(ctx).await,
        ClauseId::CreateNonRdfSource => post::create_non_rdf_source(ctx).await,
        ClauseId::DescriptionExists => post::description_exists(ctx).await,
        ClauseId::DigestAccepted => post::digest_accepted(ctx).await,
        ClauseId::BadDigestValue => post::bad_digest_value(ctx).await,
        ClauseId::BadDigestAlgorithm => post::bad_digest_algorithm(ctx).await,
        ClauseId::DescriptionLinksBack => get::description_links_back(ctx).await,
        ClauseId::PreferApplied => get::prefer_applied(ctx).await,
        ClauseId::ContainedDescriptions => get::contained_descriptions(ctx).await,
        ClauseId::InboundReferences => get::inbound_references(ctx).await,
        ClauseId::WantDigest => get::want_digest(ctx).await,
        ClauseId::WantDigestValue => get::want_digest_value(ctx).await,
        ClauseId::HeadNoBody => head::head_no_body(ctx).await,
        ClauseId::HeadOmitsPayloadHeaders => head::head_omits_payload_headers(ctx).await,
        ClauseId::HeadGetParity => head::head_get_parity(ctx).await,
        ClauseId::DeleteDepthZero => delete::delete_depth_zero(ctx).await,
        ClauseId::DeleteDepthInfinity => delete::delete_depth_infinity(ctx).await,
        ClauseId::DeleteUnsupportedDepth => delete::delete_unsupported_depth(ctx).await,
    }
}
