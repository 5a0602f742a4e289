//! Section 3.6: HEAD.

use std::collections::BTreeSet;

use ldpcheck_domain::ldp::{PAYLOAD_HEADERS, PER_MESSAGE_HEADERS, is_payload_header};
use ldpcheck_domain::{DigestAlgorithm, RequestSpec, ResponseSnapshot};

use super::check::{ensure, expect_header_absent, expect_status};
use super::get::expect_digest_algorithm;
use super::{ClauseContext, ClauseError};
use crate::ports::HttpClient;

fn expect_no_body(response: &ResponseSnapshot) -> Result<(), ClauseError> {
    ensure(response.body_is_empty(), || {
        format!(
            "HEAD {}: response carried a {}-byte body",
            response.url,
            response.body_bytes.len()
        )
    })
}

pub async fn head_no_body<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let response = ctx.send(RequestSpec::head(root)).await?;
    expect_status(&response, 200)?;
    expect_no_body(&response)?;

    let binary = ctx.create_binary().await?;
    let algorithm = DigestAlgorithm::Sha1;
    let response = ctx
        .send(RequestSpec::head(binary.as_str()).with_header("Want-Digest", algorithm.as_str()))
        .await?;
    expect_status(&response, 200)?;
    expect_digest_algorithm(&response, algorithm)?;
    expect_no_body(&response)
}

pub async fn head_omits_payload_headers<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let resource = ctx.create_container(root).await?;

    let response = ctx.send(RequestSpec::head(resource.as_str())).await?;
    expect_status(&response, 200)?;
    for name in PAYLOAD_HEADERS {
        expect_header_absent(&response, name)?;
    }
    Ok(())
}

pub async fn head_get_parity<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let resource = ctx.create_container(root).await?;

    let get = ctx.send(RequestSpec::get(resource.as_str())).await?;
    expect_status(&get, 200)?;
    let head = ctx.send(RequestSpec::head(resource.as_str())).await?;
    expect_status(&head, 200)?;

    let (only_head, only_get) = header_difference(&head, &get);
    ensure(only_head.is_empty() && only_get.is_empty(), || {
        format!(
            "HEAD {resource}: header names differ from GET (only in HEAD: {only_head:?}, only in GET: {only_get:?})"
        )
    })
}

/// Header names present in only one of the two responses, ignoring payload
/// and per-message headers.
fn header_difference(
    head: &ResponseSnapshot,
    get: &ResponseSnapshot,
) -> (Vec<String>, Vec<String>) {
    let comparable = |response: &ResponseSnapshot| -> BTreeSet<String> {
        response
            .headers
            .names()
            .into_iter()
            .filter(|name| !is_payload_header(name) && !PER_MESSAGE_HEADERS.contains(&name.as_str()))
            .collect()
    };
    let head = comparable(head);
    let get = comparable(get);
    (
        head.difference(&get).cloned().collect(),
        get.difference(&head).cloned().collect(),
    )
}
