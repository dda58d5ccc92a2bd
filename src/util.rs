/// Arithmetic mean, `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;

    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Rounds half away from zero and saturates into `u32`.
///
/// Negative and NaN inputs become 0.
pub fn round_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }

    let rounded = value.round();
    if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// `part / whole` as a rounded percentage, `empty` when `whole` is zero.
pub fn percent(part: usize, whole: usize, empty: u32) -> u32 {
    if whole == 0 {
        return empty;
    }

    round_u32(part as f64 / whole as f64 * 100.0).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[60., 60., 60.]), Some(60.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(
            std_dev(&[100., 120., 90., 102., 94.]),
            Some(10.322790320451151)
        );
        assert_eq!(std_dev(&[15., 7., 55.]), Some(20.997354330698162));
    }

    #[test]
    fn test_std_dev_identical_values() {
        assert_eq!(std_dev(&[5.0, 5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty_slice() {
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_round_u32() {
        assert_eq!(round_u32(3.5), 4);
        assert_eq!(round_u32(3.49), 3);
        assert_eq!(round_u32(-12.0), 0);
        assert_eq!(round_u32(f64::NAN), 0);
        assert_eq!(round_u32(f64::INFINITY), u32::MAX);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(3, 4, 100), 75);
        assert_eq!(percent(2, 3, 100), 67);
        assert_eq!(percent(0, 0, 100), 100);
        assert_eq!(percent(0, 5, 100), 0);
    }
}
