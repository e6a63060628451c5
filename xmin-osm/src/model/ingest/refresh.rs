use std::time::Duration;

use xmin_core::model::poi::{CategoryRuleSet, PointOfInterest, PoiId};

use super::{PoiCache, RetryPolicy};
use crate::model::overpass::{
    build_category_query, OverpassClient, OverpassResponse, QueryBounds,
};

/// maps one category's Overpass response to POIs.
///
/// each element is classified against the full ordered rule set; elements
/// whose resolved category differs from the one being refreshed are
/// discarded: the query selectors are imprecise (an `amenity` regex for one
/// category can match elements another category owns). elements without a
/// valid finite coordinate are dropped and logged with enough context to
/// diagnose upstream data quality, but never abort the batch.
pub fn collect_category_pois(
    category: &str,
    rules: &CategoryRuleSet,
    response: &OverpassResponse,
) -> Vec<PointOfInterest> {
    let mut pois = Vec::new();
    for element in &response.elements {
        match rules.classify(&element.tags) {
            Some(resolved) if resolved == category => {}
            _ => continue,
        }
        let (lat, lon) = match element.resolve_coordinate() {
            Some(coordinate) => coordinate,
            None => {
                log::warn!(
                    "dropping invalid overpass element: category={} type={} id={} raw_lat={:?} raw_lon={:?} center={:?} tags={:?}",
                    category,
                    element.element_type,
                    element.id,
                    element.lat,
                    element.lon,
                    element.center,
                    element.tags,
                );
                continue;
            }
        };
        pois.push(PointOfInterest {
            id: PoiId::Osm(element.id),
            lat,
            lon,
            category: String::from(category),
            name: element.name(),
        });
    }
    pois
}

/// fetches one category to completion under the retry policy. returns the
/// category's POIs, or an empty (degraded) collection if a configured
/// max-attempts ceiling is exhausted first.
pub async fn fetch_category(
    client: &OverpassClient,
    rules: &CategoryRuleSet,
    category: &str,
    bounds: &QueryBounds,
    query_timeout_seconds: u64,
    policy: &RetryPolicy,
) -> Vec<PointOfInterest> {
    let query = build_category_query(rules, category, bounds, query_timeout_seconds);
    let mut attempt: u32 = 1;
    loop {
        log::info!("overpass request '{category}' (attempt {attempt})");
        match client.fetch(&query).await {
            Ok(response) => return collect_category_pois(category, rules, &response),
            Err(e) => {
                if policy.exhausted(attempt) {
                    log::error!(
                        "giving up on category '{category}' after {attempt} attempts, marking degraded: {e}"
                    );
                    return Vec::new();
                }
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "overpass failure for '{category}': {e}, retrying in {}s",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// startup warm-up: refreshes every configured category, strictly one at a
/// time, pausing a fixed cooldown between categories so the upstream source
/// is not hammered. serving must not begin before this returns.
pub async fn warm_up(
    client: &OverpassClient,
    rules: &CategoryRuleSet,
    bounds: &QueryBounds,
    query_timeout_seconds: u64,
    policy: &RetryPolicy,
    cooldown: Duration,
) -> PoiCache {
    let mut cache = PoiCache::default();
    let categories = rules
        .categories()
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    log::info!("starting poi cache warm-up for {} categories", categories.len());
    for (i, category) in categories.iter().enumerate() {
        let pois = fetch_category(
            client,
            rules,
            category,
            bounds,
            query_timeout_seconds,
            policy,
        )
        .await;
        log::info!("category '{}': {} pois cached", category, pois.len());
        cache.insert(category, pois);
        if i + 1 < categories.len() {
            tokio::time::sleep(cooldown).await;
        }
    }
    log::info!("poi cache warm-up finished, {} pois total", cache.total_pois());
    cache
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::overpass::OverpassResponse;

    fn response(raw: &str) -> OverpassResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_collects_matching_elements() {
        let rules = CategoryRuleSet::default();
        let r = response(
            r#"{"elements":[
                {"type":"node","id":1,"lat":51.2,"lon":6.9,"tags":{"amenity":"school","name":"a school"}},
                {"type":"way","id":2,"center":{"lat":51.3,"lon":7.0},"tags":{"amenity":"university"}}
            ]}"#,
        );
        let pois = collect_category_pois("education", &rules, &r);
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].id, PoiId::Osm(1));
        assert_eq!(pois[0].name.as_deref(), Some("a school"));
        assert_eq!(pois[1].category, "education");
    }

    #[test]
    fn test_discards_off_category_elements() {
        // a cafe shows up in an education response: the selectors were
        // imprecise, classification must reject it
        let rules = CategoryRuleSet::default();
        let r = response(
            r#"{"elements":[
                {"type":"node","id":3,"lat":51.2,"lon":6.9,"tags":{"amenity":"cafe"}}
            ]}"#,
        );
        assert!(collect_category_pois("education", &rules, &r).is_empty());
        assert_eq!(collect_category_pois("restaurant", &rules, &r).len(), 1);
    }

    #[test]
    fn test_drops_invalid_coordinates_without_aborting() {
        let rules = CategoryRuleSet::default();
        let r = response(
            r#"{"elements":[
                {"type":"node","id":4,"lat":"bogus","lon":6.9,"tags":{"amenity":"school"}},
                {"type":"node","id":5,"lat":51.2,"lon":6.9,"tags":{"amenity":"school"}},
                {"type":"way","id":6,"tags":{"amenity":"school"}}
            ]}"#,
        );
        let pois = collect_category_pois("education", &rules, &r);
        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].id, PoiId::Osm(5));
    }

    #[test]
    fn test_untagged_elements_skipped() {
        let rules = CategoryRuleSet::default();
        let r = response(r#"{"elements":[{"type":"node","id":7,"lat":51.0,"lon":7.0}]}"#);
        assert!(collect_category_pois("education", &rules, &r).is_empty());
    }
}
