//! Section 3.7: DELETE with a `Depth` header.

use ldpcheck_domain::RequestSpec;
use ldpcheck_domain::ldp::DeleteDepth;

use super::check::{expect_status, expect_success};
use super::{ClauseContext, ClauseError};
use crate::ports::HttpClient;

fn delete_with_depth(url: &str, depth: &DeleteDepth) -> RequestSpec {
    RequestSpec::delete(url).with_header("Depth", depth.as_str())
}

async fn expect_gone<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
    url: &str,
) -> Result<(), ClauseError> {
    let response = ctx.send(RequestSpec::get(url)).await?;
    expect_status(&response, 410)
}

pub async fn delete_depth_zero<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let parent = ctx.create_container(root).await?;
    let child = ctx.create_container(&parent).await?;

    let response = ctx.send(delete_with_depth(&parent, &DeleteDepth::Zero)).await?;
    expect_success(&response)?;

    expect_gone(ctx, &parent).await?;
    let response = ctx.send(RequestSpec::get(child.as_str())).await?;
    expect_status(&response, 200)
}

pub async fn delete_depth_infinity<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let parent = ctx.create_container(root).await?;
    let child = ctx.create_container(&parent).await?;
    let grandchild = ctx.create_container(&child).await?;

    let response = ctx
        .send(delete_with_depth(&parent, &DeleteDepth::Infinity))
        .await?;
    expect_success(&response)?;

    for url in [&parent, &child, &grandchild] {
        expect_gone(ctx, url).await?;
    }
    Ok(())
}

pub async fn delete_unsupported_depth<C: HttpClient + ?Sized>(
    ctx: &mut ClauseContext<'_, C>,
) -> Result<(), ClauseError> {
    let root = ctx.root;
    let resource = ctx.create_container(root).await?;

    let depth = DeleteDepth::Other("forfty".to_string());
    let response = ctx.send(delete_with_depth(&resource, &depth)).await?;
    expect_status(&response, 400)
}
