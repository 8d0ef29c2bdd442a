//! Night allocation across route stops.

/// Spread `total_units` over `stop_count` stops: one each, then the remainder
/// round-robin from the first stop.
///
/// When `total_units < stop_count` every stop still gets one unit, so the sum
/// exceeds the requested total.
pub fn allocate_nights(stop_count: usize, total_units: i64) -> Vec<u32> {
    if stop_count == 0 || total_units <= 0 {
        return Vec::new();
    }

    let mut nights = vec![1u32; stop_count];
    let mut remaining = total_units - stop_count as i64;
    let mut index = 0;
    while remaining > 0 {
        nights[index] += 1;
        index = (index + 1) % stop_count;
        remaining -= 1;
    }
    nights
}

/// Allocate `total_units` over a route where `is_road[i]` marks zero-night stops.
///
/// Road positions get 0. Itinerary positions share the total, base quotient
/// first and the remainder to the earliest itinerary stops.
pub fn allocate_for_sectors(is_road: &[bool], total_units: i64) -> Vec<u32> {
    let itinerary_count = is_road.iter().filter(|road| !**road).count();
    let shares = allocate_nights(itinerary_count, total_units);

    let mut shares = shares.into_iter();
    is_road
        .iter()
        .map(|road| if *road { 0 } else { shares.next().unwrap_or(0) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(allocate_nights(3, 6), vec![2, 2, 2]);
    }

    #[test]
    fn test_remainder_goes_to_earliest() {
        assert_eq!(allocate_nights(3, 7), vec![3, 2, 2]);
        assert_eq!(allocate_nights(3, 8), vec![3, 3, 2]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(allocate_nights(0, 5).is_empty());
        assert!(allocate_nights(3, 0).is_empty());
        assert!(allocate_nights(3, -2).is_empty());
    }

    #[test]
    fn test_fewer_units_than_stops_over_allocates() {
        let nights = allocate_nights(4, 2);
        assert_eq!(nights, vec![1, 1, 1, 1]);
        assert_eq!(nights.iter().sum::<u32>(), 4);
    }

    #[test]
    fn test_sum_property() {
        for n in 1..8usize {
            for d in 1..20i64 {
                let nights = allocate_nights(n, d);
                assert_eq!(nights.len(), n);
                let expected = d.max(n as i64) as u32;
                assert_eq!(nights.iter().sum::<u32>(), expected, "n={n} d={d}");
            }
        }
    }

    #[test]
    fn test_road_positions_get_zero() {
        let nights = allocate_for_sectors(&[true, false, false, true], 7);
        assert_eq!(nights, vec![0, 4, 3, 0]);
    }

    #[test]
    fn test_all_itinerary_matches_plain_allocation() {
        assert_eq!(allocate_for_sectors(&[false, false, false], 7), allocate_nights(3, 7));
    }

    #[test]
    fn test_all_road_allocates_nothing() {
        assert_eq!(allocate_for_sectors(&[true, true], 5), vec![0, 0]);
    }
}
