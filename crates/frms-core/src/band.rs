//! Shared threshold-band lookup.
//!
//! Every table in the engine (rest tables, duty-hour bands, MBTT
//! categories) is an ordered list of [`Band`]s searched with
//! [`find_band`], so non-overlap and totality hold by construction
//! instead of per-table conditional chains.

/// One row of an ordered threshold table.
///
/// Bands are ordered by ascending upper bound; the last band of a total
/// table has `upper: None` (open-ended).
#[derive(Debug, Clone)]
pub struct Band<T> {
    /// Inclusive upper bound, or `None` for the open-ended last band.
    pub upper: Option<f64>,
    pub label: &'static str,
    pub value: T,
}

impl<T> Band<T> {
    pub const fn up_to(upper: f64, label: &'static str, value: T) -> Self {
        Self {
            upper: Some(upper),
            label,
            value,
        }
    }

    pub const fn over(label: &'static str, value: T) -> Self {
        Self {
            upper: None,
            label,
            value,
        }
    }
}

/// Find the band containing `x`: the first band whose upper bound is
/// `>= x`, or the open-ended band. Returns `None` only for tables whose
/// last band is bounded and `x` exceeds it.
pub fn find_band<T>(bands: &[Band<T>], x: f64) -> Option<&Band<T>> {
    bands.iter().find(|band| match band.upper {
        Some(upper) => x <= upper,
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Band<u32>> {
        vec![
            Band::up_to(11.0, "<=11", 10),
            Band::up_to(12.0, ">11 and <=12", 11),
            Band::over(">12", 14),
        ]
    }

    #[test]
    fn test_band_boundaries_are_inclusive() {
        let bands = table();
        assert_eq!(find_band(&bands, 11.0).unwrap().value, 10);
        assert_eq!(find_band(&bands, 11.01).unwrap().value, 11);
        assert_eq!(find_band(&bands, 12.0).unwrap().value, 11);
        assert_eq!(find_band(&bands, 12.5).unwrap().value, 14);
    }

    #[test]
    fn test_open_ended_band_is_total() {
        let bands = table();
        assert_eq!(find_band(&bands, 1000.0).unwrap().value, 14);
    }

    #[test]
    fn test_bounded_table_can_miss() {
        let bands = vec![Band::up_to(5.0, "<=5", 1u32)];
        assert!(find_band(&bands, 6.0).is_none());
    }
}
