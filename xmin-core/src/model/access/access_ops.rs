use std::collections::{BTreeMap, HashMap};

use crate::model::poi::{PointOfInterest, PoiId};
use crate::model::routing::TravelTimeObservation;

/// destination id -> category lookup for one request's effective POI set.
pub fn category_index(pois: &[PointOfInterest]) -> HashMap<PoiId, String> {
    pois.iter()
        .map(|p| (p.id, p.category.clone()))
        .collect()
}

/// step one of the aggregation: fold the sparse matrix into the minimum
/// travel time per (origin id, category) pair, the time to the nearest POI
/// of that category.
///
/// observations with a non-finite or missing travel time are skipped here,
/// so "unreachable" can never leak into the output as a numeric infinity.
/// observations whose destination is not in the index (the engine echoing an
/// id we never sent) are skipped as well. BTreeMap keys keep the result
/// deterministic for identical inputs.
pub fn minimum_time_by_category(
    observations: &[TravelTimeObservation],
    categories_by_id: &HashMap<PoiId, String>,
) -> BTreeMap<(String, String), f64> {
    let mut minima: BTreeMap<(String, String), f64> = BTreeMap::new();
    for observation in observations {
        let minutes = match observation.minutes {
            Some(m) if m.is_finite() => m,
            _ => continue,
        };
        let category = match categories_by_id.get(&observation.destination) {
            Some(c) => c,
            None => continue,
        };
        let key = (observation.origin.clone(), category.clone());
        minima
            .entry(key)
            .and_modify(|current| *current = current.min(minutes))
            .or_insert(minutes);
    }
    minima
}

/// step two: reshape the minima into one record per origin id with exactly
/// one optional entry per requested category. only origins with at least one
/// observation appear; the response assembler left-joins this table onto the
/// queried cells so cells without data are still emitted.
pub fn materialize_category_times(
    minima: &BTreeMap<(String, String), f64>,
    requested: &[String],
) -> BTreeMap<String, BTreeMap<String, Option<f64>>> {
    let mut table: BTreeMap<String, BTreeMap<String, Option<f64>>> = BTreeMap::new();
    for ((origin, category), minutes) in minima {
        let row = table.entry(origin.clone()).or_insert_with(|| {
            requested
                .iter()
                .map(|c| (c.clone(), None))
                .collect::<BTreeMap<_, _>>()
        });
        if let Some(slot) = row.get_mut(category) {
            *slot = Some(*minutes);
        }
    }
    table
}
