//! Section 3.5: reading resources with GET.

use ldpcheck_domain::ldp::{
    FEDORA_HAS_PARENT, LDP_CONTAINS, PREFER_CONTAINED_DESCRIPTIONS, PREFER_INBOUND_REFERENCES,
    REL_DESCRIBED_BY, REL_DESCRIBES, ReturnPreference, prefer_header,
};
use ldpcheck_domain::{
    DigestAlgorithm, DigestValue, RequestSpec, ResponseSnapshot, parse_digest_header,
};
use regex::Regex;

use super::check::{ensure, expect_status, require_header, require_link, same_resource};
use super::{ClauseContext, ClauseError};
use crate::ports::HttpClient;

pub async fn description_links_back<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let binary = ctx.create_binary().await?;

    let response = ctx.send(RequestSpec::get(binary.as_str())).await?;
    expect_status(&response, 200)?;
    let description = require_link(&response, REL_DESCRIBED_BY)?;

    let described = ctx.send(RequestSpec::get(description)).await?;
    expect_status(&described, 200)?;
    let targets = described.link_targets(REL_DESCRIBES);
    ensure(targets.iter().any(|t| same_resource(t, &binary)), || {
        format!(
            "GET {}: expected Link <{binary}>; rel=\"{REL_DESCRIBES}\", found targets {targets:?}",
            described.url
        )
    })
}

pub async fn prefer_applied<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let resource = ctx.create_container(root).await?;

    for preference in [ReturnPreference::Representation, ReturnPreference::Minimal] {
        let response = ctx
            .send(
                RequestSpec::get(resource.as_str())
                    .with_header("Prefer", prefer_header(preference, None)),
            )
            .await?;
        expect_status(&response, 200)?;
        let applied = require_header(&response, "Preference-Applied")?;
        ensure(applied.trim().eq_ignore_ascii_case(preference.as_str()), || {
            format!(
                "GET {}: sent Prefer {}, got Preference-Applied {applied:?}",
                response.url,
                preference.as_str()
            )
        })?;
    }
    Ok(())
}

pub async fn contained_descriptions<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let parent = ctx.create_container(root).await?;
    let child = ctx.create_container(&parent).await?;

    let prefer = prefer_header(
        ReturnPreference::Representation,
        Some(PREFER_CONTAINED_DESCRIPTIONS),
    );
    let response = ctx
        .send(RequestSpec::get(parent.as_str()).with_header("Prefer", prefer))
        .await?;
    expect_status(&response, 200)?;

    expect_triple(&response, "ldp:contains", LDP_CONTAINS, &child)?;
    expect_triple(&response, "fedora:hasParent", FEDORA_HAS_PARENT, &parent)
}

pub async fn inbound_references<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let resource = ctx.create_container(root).await?;

    let prefer = prefer_header(
        ReturnPreference::Representation,
        Some(PREFER_INBOUND_REFERENCES),
    );
    let response = ctx
        .send(RequestSpec::get(resource.as_str()).with_header("Prefer", prefer))
        .await?;
    expect_status(&response, 200)?;
    tracing::debug!(url = %resource, "inbound reference content is not checked");
    Ok(())
}

pub async fn want_digest<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let binary = ctx.create_binary().await?;

    for algorithm in [DigestAlgorithm::Md5, DigestAlgorithm::Sha1] {
        let response = ctx
            .send(RequestSpec::get(binary.as_str()).with_header("Want-Digest", algorithm.as_str()))
            .await?;
        expect_status(&response, 200)?;
        expect_digest_algorithm(&response, algorithm)?;
    }
    Ok(())
}

pub async fn want_digest_value<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let binary = ctx.create_binary().await?;

    let algorithm = DigestAlgorithm::Md5;
    let response = ctx
        .send(RequestSpec::get(binary.as_str()).with_header("Want-Digest", algorithm.as_str()))
        .await?;
    expect_status(&response, 200)?;
    let digest = expect_digest_algorithm(&response, algorithm)?;
    let payload = &ctx.fixture.bytes;
    ensure(digest.matches(payload), || {
        format!(
            "GET {}: Digest {}={} does not match the uploaded payload (expected {} or {})",
            response.url,
            digest.algorithm,
            digest.value,
            algorithm.base64(payload),
            algorithm.hex(payload)
        )
    })
}

/// Returns the leading `Digest` entry, failing unless its algorithm token is
/// exactly the one asked for.
pub(super) fn expect_digest_algorithm(
    response: &ResponseSnapshot,
    algorithm: DigestAlgorithm,
) -> Result<DigestValue, ClauseError> {
    let header = require_header(response, "Digest")?;
    parse_digest_header(header)
        .into_iter()
        .next()
        .filter(|first| algorithm.is_token(&first.algorithm))
        .ok_or_else(|| {
            ClauseError::Failed(format!(
                "{} {}: asked for a {algorithm} Digest, got {header:?}",
                response.method, response.url
            ))
        })
}

/// Fails unless the body states `<predicate> <object>`, with the predicate
/// written either as a prefixed name or as a full IRI.
fn expect_triple(
    response: &ResponseSnapshot,
    prefixed: &str,
    iri: &str,
    object: &str,
) -> Result<(), ClauseError> {
    let pattern = format!(
        r"(?:{}|<{}>)\s*<{}/?>",
        regex::escape(prefixed),
        regex::escape(iri),
        regex::escape(object.trim_end_matches('/'))
    );
    let regex = Regex::new(&pattern)
        .map_err(|e| ClauseError::Failed(format!("bad triple pattern {pattern:?}: {e}")))?;
    ensure(regex.is_match(&response.body), || {
        format!(
            "GET {}: body lacks a `{prefixed} <{object}>` statement",
            response.url
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldpcheck_domain::{Headers, HttpMethod};
    use std::time::Duration;

    fn response(body: &str, headers: Headers) -> ResponseSnapshot {
        ResponseSnapshot::new(
            HttpMethod::Get,
            "http://x/rest/p",
            200u16,
            headers,
            body.as_bytes().to_vec(),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_triple_prefixed_and_full_iri() {
        let turtle = response(
            "<http://x/rest/p> ldp:contains <http://x/rest/p/c> .\n\
             <http://x/rest/p/c> <http://fedora.info/definitions/v4/repository#hasParent>   <http://x/rest/p> .",
            Headers::new(),
        );
        assert!(expect_triple(&turtle, "ldp:contains", LDP_CONTAINS, "http://x/rest/p/c").is_ok());
        assert!(
            expect_triple(&turtle, "fedora:hasParent", FEDORA_HAS_PARENT, "http://x/rest/p").is_ok()
        );
        assert!(expect_triple(&turtle, "ldp:contains", LDP_CONTAINS, "http://x/rest/q").is_err());
    }

    #[test]
    fn test_triple_object_is_literal_text() {
        let turtle = response("ldp:contains <http://x/rest/pXc>", Headers::new());
        assert!(expect_triple(&turtle, "ldp:contains", LDP_CONTAINS, "http://x/rest/p.c").is_err());
    }

    #[test]
    fn test_digest_must_lead_with_requested_algorithm() {
        let resp = response("", Headers::new().with("Digest", "SHA1=abc, md5=def"));
        let found = expect_digest_algorithm(&resp, DigestAlgorithm::Sha1);
        assert!(matches!(found, Ok(ref d) if d.value == "abc"));

        for header in ["sha=abc", "sha-1=abc", "md5=def, sha1=abc", "sha256=abc"] {
            let resp = response("", Headers::new().with("Digest", header));
            assert!(
                expect_digest_algorithm(&resp, DigestAlgorithm::Sha1).is_err(),
                "{header} accepted"
            );
        }
        assert!(expect_digest_algorithm(&response("", Headers::new()), DigestAlgorithm::Md5).is_err());
    }
}
