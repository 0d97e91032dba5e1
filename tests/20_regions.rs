mod common;

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;

use murojaat_admin::models::{AssignedRegion, RegionInput};
use murojaat_admin::region::resolve_chain;
use murojaat_admin::types::RegionLevel;
use murojaat_admin::ClientError;

#[tokio::test]
async fn street_assignment_resolves_every_level() -> Result<()> {
    let server = common::start().await;
    let street = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/s1").header("authorization", common::BEARER);
            then.status(200).json_body(common::region_json("s1", "street", Some("n1")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/n1");
            then.status(200).json_body(common::region_json("n1", "neighborhood", Some("d1")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/d1");
            then.status(200)
                .json_body(json!({ "data": common::region_json("d1", "district", Some("r1")) }));
        })
        .await;
    let top = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/r1");
            then.status(200).json_body(common::region_json("r1", "region", None));
        })
        .await;

    let client = common::client(&server)?;
    let assigned = AssignedRegion::new("s1", RegionLevel::Street);
    let chain = resolve_chain(&client, Some(&assigned)).await?;

    assert_eq!(chain.get(RegionLevel::Region), Some("r1"));
    assert_eq!(chain.get(RegionLevel::District), Some("d1"));
    assert_eq!(chain.get(RegionLevel::Neighborhood), Some("n1"));
    assert_eq!(chain.get(RegionLevel::Street), Some("s1"));
    street.assert_async().await;
    // The top level is never fetched; its id comes from the district's parent
    assert_eq!(top.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn failed_hop_keeps_the_levels_already_known() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/s1");
            then.status(200).json_body(common::region_json("s1", "street", Some("n1")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/n1");
            then.status(404).json_body(json!({ "message": "Hudud topilmadi" }));
        })
        .await;

    let client = common::client(&server)?;
    let assigned = AssignedRegion::new("s1", RegionLevel::Street);
    let chain = resolve_chain(&client, Some(&assigned)).await?;

    assert_eq!(chain.get(RegionLevel::Street), Some("s1"));
    assert_eq!(chain.get(RegionLevel::Neighborhood), Some("n1"));
    assert_eq!(chain.get(RegionLevel::District), None);
    assert_eq!(chain.get(RegionLevel::Region), None);
    Ok(())
}

#[tokio::test]
async fn expired_session_stops_resolution() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/d1");
            then.status(401);
        })
        .await;

    let client = common::client(&server)?;
    let assigned = AssignedRegion::new("d1", RegionLevel::District);
    let err = resolve_chain(&client, Some(&assigned)).await.unwrap_err();
    assert!(err.is_session_expired());
    Ok(())
}

#[tokio::test]
async fn listing_filters_by_level_and_parent() -> Result<()> {
    let server = common::start().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/regions")
                .query_param("type", "district")
                .query_param("parent", "r1");
            then.status(200).json_body(json!({
                "data": [
                    common::region_json("d1", "district", Some("r1")),
                    common::region_json("d2", "district", Some("r1")),
                ]
            }));
        })
        .await;

    let client = common::client(&server)?;
    let districts = client.region_options(RegionLevel::District, Some("r1")).await?;

    list.assert_async().await;
    assert_eq!(districts.len(), 2);
    assert!(districts.iter().all(|d| d.parent_id() == Some("r1")));
    Ok(())
}

#[tokio::test]
async fn child_level_without_parent_has_no_options() -> Result<()> {
    // Nothing listens here; a request would fail the test
    let client = common::unreachable()?;
    assert!(client.region_options(RegionLevel::Street, None).await?.is_empty());
    assert!(client.region_options(RegionLevel::District, Some("")).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_checks_the_parent_level_first() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/r1");
            then.status(200).json_body(common::region_json("r1", "region", None));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/regions");
            then.status(201);
        })
        .await;

    let client = common::client(&server)?;
    let input = RegionInput::new("Qatortol", RegionLevel::Neighborhood, Some("r1".into()));
    let err = client.create_region(&input).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation { field: Some(ref f), .. } if f == "parent"));
    assert_eq!(create.hits_async().await, 0);

    let orphan = RegionInput::new("Yunusobod", RegionLevel::District, None);
    assert!(client.create_region(&orphan).await.is_err());
    assert_eq!(create.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn create_sends_trimmed_name_and_parent() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/regions/r1");
            then.status(200).json_body(common::region_json("r1", "region", None));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/regions")
                .json_body(json!({ "name": "Chilonzor", "type": "district", "parent": "r1" }));
            then.status(201)
                .json_body(json!({ "_id": "d9", "name": "Chilonzor", "type": "district", "parent": "r1" }));
        })
        .await;

    let client = common::client(&server)?;
    let input = RegionInput::new("  Chilonzor ", RegionLevel::District, Some("r1".into()));
    let region = client.create_region(&input).await?;

    create.assert_async().await;
    assert_eq!(region.id, "d9");
    assert_eq!(region.level, RegionLevel::District);
    Ok(())
}
