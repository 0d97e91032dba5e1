//! Ancestry resolution.
//!
//! Given an assigned `{region, regionType}` pair, walk `parent` links upward
//! one fetch at a time and fill every level from the target up to the top.
//! Hops are sequential since each one needs the previous result. A missing
//! or unreadable parent stops the walk and leaves the higher levels empty.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::chain::RegionChain;
use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{AssignedRegion, Region};

/// Single-region lookup used by the resolver
#[async_trait]
pub trait RegionLookup: Send + Sync {
    async fn region(&self, id: &str) -> ClientResult<Region>;
}

#[async_trait]
impl RegionLookup for ApiClient {
    async fn region(&self, id: &str) -> ClientResult<Region> {
        self.get_region(id).await
    }
}

/// Resolve the picker chain for `assigned`.
///
/// Only an expired session is returned as an error; every other failed hop
/// yields the chain resolved so far.
pub async fn resolve_chain<L>(lookup: &L, assigned: Option<&AssignedRegion>) -> ClientResult<RegionChain>
where
    L: RegionLookup + ?Sized,
{
    resolve(lookup, assigned, None).await
}

/// Same as `resolve_chain`, abandoning the walk with `ClientError::Cancelled`
/// once `cancel` fires
pub async fn resolve_chain_cancellable<L>(
    lookup: &L,
    assigned: Option<&AssignedRegion>,
    cancel: &CancellationToken,
) -> ClientResult<RegionChain>
where
    L: RegionLookup + ?Sized,
{
    resolve(lookup, assigned, Some(cancel)).await
}

async fn resolve<L>(
    lookup: &L,
    assigned: Option<&AssignedRegion>,
    cancel: Option<&CancellationToken>,
) -> ClientResult<RegionChain>
where
    L: RegionLookup + ?Sized,
{
    let mut chain = RegionChain::default();
    let Some(assigned) = assigned else {
        return Ok(chain);
    };
    let Some(target) = assigned.region_id() else {
        return Ok(chain);
    };

    let mut level = assigned.region_type;
    let mut current = target.to_string();
    chain.fill(level, current.clone());

    while let Some(parent_level) = level.parent() {
        let fetched = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ClientError::Cancelled),
                    r = lookup.region(&current) => r,
                }
            }
            None => lookup.region(&current).await,
        };

        let region = match fetched {
            Ok(region) => region,
            Err(ClientError::SessionExpired) => return Err(ClientError::SessionExpired),
            Err(e) => {
                warn!(id = %current, level = %level, error = %e, "region lookup failed, keeping partial chain");
                break;
            }
        };

        let Some(parent_id) = region.parent_id() else {
            warn!(id = %current, level = %level, "region has no parent, keeping partial chain");
            break;
        };

        debug!(id = %current, parent = parent_id, "resolved parent");
        chain.fill(parent_level, parent_id);
        current = parent_id.to_string();
        level = parent_level;
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityRef;
    use crate::types::RegionLevel;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Directory {
        regions: HashMap<String, Region>,
        calls: AtomicUsize,
    }

    impl Directory {
        fn new(entries: &[(&str, RegionLevel, Option<&str>)]) -> Self {
            let regions = entries
                .iter()
                .map(|(id, level, parent)| {
                    (
                        id.to_string(),
                        Region {
                            id: id.to_string(),
                            name: id.to_uppercase(),
                            level: *level,
                            parent: parent.map(EntityRef::from),
                        },
                    )
                })
                .collect();
            Self {
                regions,
                calls: AtomicUsize::new(0),
            }
        }

        fn full() -> Self {
            Self::new(&[
                ("r1", RegionLevel::Region, None),
                ("d1", RegionLevel::District, Some("r1")),
                ("n1", RegionLevel::Neighborhood, Some("d1")),
                ("s1", RegionLevel::Street, Some("n1")),
            ])
        }
    }

    #[async_trait]
    impl RegionLookup for Directory {
        async fn region(&self, id: &str) -> ClientResult<Region> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.regions.get(id).cloned().ok_or(ClientError::Api {
                status: 404,
                message: Some("Region not found".into()),
            })
        }
    }

    #[tokio::test]
    async fn every_level_fills_itself_and_its_ancestors() {
        let dir = Directory::full();
        let ids = ["r1", "d1", "n1", "s1"];
        for (depth, level) in RegionLevel::ALL.into_iter().enumerate() {
            let chain = resolve_chain(&dir, Some(&AssignedRegion::new(ids[depth], level)))
                .await
                .unwrap();
            for l in RegionLevel::ALL {
                let expected = (l.depth() <= depth).then(|| ids[l.depth()]);
                assert_eq!(chain.get(l), expected, "{} assigned, checking {}", level, l);
            }
        }
    }

    #[tokio::test]
    async fn top_level_assignment_needs_no_fetch() {
        let dir = Directory::full();
        let chain = resolve_chain(&dir, Some(&AssignedRegion::new("r1", RegionLevel::Region)))
            .await
            .unwrap();
        assert_eq!(chain.region_id.as_deref(), Some("r1"));
        assert_eq!(dir.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn district_without_parent_leaves_region_empty() {
        let dir = Directory::new(&[
            ("d1", RegionLevel::District, None),
            ("n1", RegionLevel::Neighborhood, Some("d1")),
            ("s1", RegionLevel::Street, Some("n1")),
        ]);
        let chain = resolve_chain(&dir, Some(&AssignedRegion::new("s1", RegionLevel::Street)))
            .await
            .unwrap();
        assert_eq!(chain.street_id.as_deref(), Some("s1"));
        assert_eq!(chain.neighborhood_id.as_deref(), Some("n1"));
        assert_eq!(chain.district_id.as_deref(), Some("d1"));
        assert_eq!(chain.region_id, None);
    }

    #[tokio::test]
    async fn failed_lookup_is_a_partial_result() {
        let dir = Directory::new(&[("s1", RegionLevel::Street, Some("n-missing"))]);
        let chain = resolve_chain(&dir, Some(&AssignedRegion::new("s1", RegionLevel::Street)))
            .await
            .unwrap();
        assert_eq!(chain.neighborhood_id.as_deref(), Some("n-missing"));
        assert_eq!(chain.district_id, None);
    }

    #[tokio::test]
    async fn absent_assignment_is_an_empty_chain() {
        let dir = Directory::full();
        assert!(resolve_chain(&dir, None).await.unwrap().is_empty());

        let unset = AssignedRegion {
            region: None,
            region_type: RegionLevel::District,
        };
        assert!(resolve_chain(&dir, Some(&unset)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolution_is_repeatable() {
        let dir = Directory::full();
        let assigned = AssignedRegion::new("n1", RegionLevel::Neighborhood);
        let first = resolve_chain(&dir, Some(&assigned)).await.unwrap();
        let second = resolve_chain(&dir, Some(&assigned)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn cancelled_resolution_stops() {
        let dir = Directory::full();
        let token = CancellationToken::new();
        token.cancel();
        let result =
            resolve_chain_cancellable(&dir, Some(&AssignedRegion::new("s1", RegionLevel::Street)), &token).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }
}
