//! Section 3.3: creating resources with POST.

use ldpcheck_domain::ldp::{LDP_CONSTRAINED_BY, REL_DESCRIBED_BY};
use ldpcheck_domain::{DigestAlgorithm, RequestSpec};

use super::check::{expect_status, require_header, require_link};
use super::{ClauseContext, ClauseError};
use crate::ports::HttpClient;

pub async fn create_rdf_source<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let response = ctx.create(RequestSpec::post(root)).await?;
    expect_status(&response, 201)?;
    require_header(&response, "Location")?;
    require_link(&response, LDP_CONSTRAINED_BY)?;
    Ok(())
}

pub async fn create_non_rdf_source<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let response = ctx.post_fixture(root, &[]).await?;
    expect_status(&response, 201)?;
    require_header(&response, "Location")?;
    require_link(&response, LDP_CONSTRAINED_BY)?;
    require_link(&response, REL_DESCRIBED_BY)?;
    Ok(())
}

pub async fn description_exists<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let response = ctx.post_fixture(root, &[]).await?;
    expect_status(&response, 201)?;
    let description = require_link(&response, REL_DESCRIBED_BY)?;

    let described = ctx.send(RequestSpec::get(description)).await?;
    expect_status(&described, 200)
}

pub async fn digest_accepted<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let digest = DigestAlgorithm::Md5.header_value(&ctx.fixture.bytes);
    let response = ctx.post_fixture(root, &[("Digest", digest.as_str())]).await?;
    expect_status(&response, 201)
}

pub async fn bad_digest_value<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let response = ctx.post_fixture(root, &[("Digest", "md5=deadbeef")]).await?;
    expect_status(&response, 409)
}

pub async fn bad_digest_algorithm<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let response = ctx.post_fixture(root, &[("Digest", "md1=fakealgo")]).await?;
    expect_status(&response, 400)
}
