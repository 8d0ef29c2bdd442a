//! Waypoint sequencing between fixed anchors.
//!
//! Resolvable waypoints are ordered with a lookahead-greedy heuristic: every
//! candidate for the next slot is scored by simulating the rest of the trip
//! (plain nearest-neighbor, then the leg to the end anchor) and the cheapest
//! full path wins. Waypoint counts are small, so the cost is acceptable.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::StopCatalog;
use crate::haversine::distance_between;
use crate::place::{location_key, KnownCoords, Place, Stop};

/// Improvement threshold for 2-opt moves, in km.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-9;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceOptions {
    /// Rounds of 2-opt refinement over the greedy order. Zero disables it.
    #[serde(default)]
    pub two_opt_rounds: usize,
}

/// Result of [`order_waypoints`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedWaypoints {
    /// Every input name: resolved ones in route order, then unresolved in input order.
    pub ordered_names: Vec<String>,
    /// Coordinate-resolved stops, one per distinct location, in route order.
    pub ordered_stops: Vec<Stop>,
}

/// One distinct resolved location and every input name that mapped to it.
#[derive(Debug, Clone)]
struct ResolvedGroup {
    identity: String,
    location: (f64, f64),
    names: Vec<String>,
}

/// Resolve a waypoint name: supplied coordinates first, then the catalog.
///
/// Returns the canonical identity alongside the location.
pub fn resolve_waypoint(
    name: &str,
    known: &KnownCoords,
    catalog: &StopCatalog,
) -> Option<(String, (f64, f64))> {
    if let Some(location) = known.get(name) {
        return Some((format!("coord:{}", location_key(location)), location));
    }
    catalog
        .find(name)
        .map(|entry| (format!("catalog:{}", entry.id), entry.coords()))
}

/// Order `raw_names` into a travel-logical sequence from `start` to `end`.
///
/// Deterministic. Never adds or drops a name. Names that resolve to the same
/// canonical stop are kept together, behind the first occurrence.
pub fn order_waypoints(
    start: &Place,
    end: Option<&Place>,
    raw_names: &[String],
    known: &KnownCoords,
    catalog: &StopCatalog,
    options: &SequenceOptions,
) -> OrderedWaypoints {
    let mut groups: Vec<ResolvedGroup> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();

    for name in raw_names {
        match resolve_waypoint(name, known, catalog) {
            Some((identity, location)) => {
                if let Some(group) = groups.iter_mut().find(|g| g.identity == identity) {
                    group.names.push(name.clone());
                } else {
                    groups.push(ResolvedGroup {
                        identity,
                        location,
                        names: vec![name.clone()],
                    });
                }
            }
            None => unresolved.push(name.clone()),
        }
    }

    if groups.is_empty() {
        return OrderedWaypoints {
            ordered_names: raw_names.to_vec(),
            ordered_stops: Vec::new(),
        };
    }

    let points: Vec<(f64, f64)> = groups.iter().map(|g| g.location).collect();
    let end_location = end.map(Place::coords);
    let mut order = lookahead_order(start.coords(), end_location, &points);
    if options.two_opt_rounds > 0 {
        two_opt_refine(start.coords(), end_location, &points, &mut order, options.two_opt_rounds);
    }

    debug!(
        resolved = groups.len(),
        unresolved = unresolved.len(),
        "ordered waypoints"
    );

    let mut ordered_names = Vec::with_capacity(raw_names.len());
    let mut ordered_stops = Vec::with_capacity(order.len());
    for index in order {
        let group = &groups[index];
        ordered_names.extend(group.names.iter().cloned());
        ordered_stops.push(Stop::new(group.names[0].clone(), Some(group.location)));
    }
    ordered_names.extend(unresolved);

    OrderedWaypoints {
        ordered_names,
        ordered_stops,
    }
}

/// Lookahead-greedy visiting order over `points`, as indices.
pub fn lookahead_order(
    start: (f64, f64),
    end: Option<(f64, f64)>,
    points: &[(f64, f64)],
) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut order = Vec::with_capacity(points.len());
    let mut current = start;

    while !remaining.is_empty() {
        let best = remaining
            .par_iter()
            .enumerate()
            .map(|(position, &candidate)| {
                let rest: Vec<usize> = remaining
                    .iter()
                    .copied()
                    .filter(|&index| index != candidate)
                    .collect();
                let cost = distance_between(current, points[candidate])
                    + nearest_neighbor_completion(points[candidate], &rest, points, end);
                (cost, position)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let Some((_, position)) = best else {
            break;
        };
        let chosen = remaining.remove(position);
        current = points[chosen];
        order.push(chosen);
    }

    order
}

/// Length of finishing the trip from `from` by nearest-neighbor over `rest`.
fn nearest_neighbor_completion(
    from: (f64, f64),
    rest: &[usize],
    points: &[(f64, f64)],
    end: Option<(f64, f64)>,
) -> f64 {
    let mut pending = rest.to_vec();
    let mut current = from;
    let mut total = 0.0;

    while !pending.is_empty() {
        let nearest = pending
            .iter()
            .enumerate()
            .map(|(position, &index)| (distance_between(current, points[index]), position))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let Some((distance, position)) = nearest else {
            break;
        };
        total += distance;
        current = points[pending.remove(position)];
    }

    if let Some(end) = end {
        total += distance_between(current, end);
    }
    total
}

/// Total length of `start -> order... -> end`.
pub fn path_length(
    start: (f64, f64),
    end: Option<(f64, f64)>,
    points: &[(f64, f64)],
    order: &[usize],
) -> f64 {
    let mut total = 0.0;
    let mut current = start;
    for &index in order {
        total += distance_between(current, points[index]);
        current = points[index];
    }
    if let Some(end) = end {
        total += distance_between(current, end);
    }
    total
}

/// 2-opt: reverse waypoint segments while that shortens the path.
/// Anchors stay fixed.
fn two_opt_refine(
    start: (f64, f64),
    end: Option<(f64, f64)>,
    points: &[(f64, f64)],
    order: &mut [usize],
    rounds: usize,
) {
    let n = order.len();
    if n < 2 {
        return;
    }

    let mut current_cost = path_length(start, end, points, order);
    for _ in 0..rounds {
        let mut improved = false;
        for i in 0..n - 1 {
            for j in i + 1..n {
                order[i..=j].reverse();
                let cost = path_length(start, end, points, order);
                if cost + IMPROVEMENT_EPSILON_KM < current_cost {
                    current_cost = cost;
                    improved = true;
                } else {
                    order[i..=j].reverse();
                }
            }
        }
        if !improved {
            break;
        }
    }
}
