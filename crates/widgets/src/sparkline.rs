const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the last `width` values as a block-character line chart scaled
/// to `[min, max]`. Values outside the range are pinned to the ends.
pub fn sparkline(values: &[f64], min: f64, max: f64, width: usize) -> String {
    let start = values.len().saturating_sub(width);
    let span = (max - min).max(f64::EPSILON);

    values[start..]
        .iter()
        .map(|v| {
            let t = ((v - min) / span).clamp(0.0, 1.0);
            BARS[(t * (BARS.len() - 1) as f64).round() as usize]
        })
        .collect()
}

/// Scale bounds for a temperature series: at least 0..60, padded by 5
/// around the observed values.
pub fn heat_bounds<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> (f64, f64) {
    let (lo, hi) = series
        .into_iter()
        .flatten()
        .fold((20.0_f64, 60.0_f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    ((lo - 5.0).floor().max(0.0), (hi + 5.0).ceil().max(60.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_between_bounds() {
        assert_eq!(sparkline(&[0.0, 50.0, 100.0], 0.0, 100.0, 10), "▁▅█");
    }

    #[test]
    fn keeps_only_the_tail() {
        let line = sparkline(&[0.0, 0.0, 100.0, 100.0], 0.0, 100.0, 2);
        assert_eq!(line, "██");
    }

    #[test]
    fn out_of_range_is_pinned() {
        assert_eq!(sparkline(&[-10.0, 250.0], 0.0, 100.0, 8), "▁█");
        assert_eq!(sparkline(&[], 0.0, 100.0, 8), "");
    }

    #[test]
    fn heat_bounds_pad_the_observed_range() {
        assert_eq!(heat_bounds([&[50.0, 70.0][..]]), (15.0, 75.0));
        assert_eq!(heat_bounds([&[][..]]), (15.0, 65.0));
        assert_eq!(heat_bounds([&[2.0][..], &[99.5][..]]), (0.0, 105.0));
    }
}
