/// How much of `target` has been saved, as a percentage between 0 and 100.
///
/// A goal without a positive target has made no progress.
pub fn progress_percent(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        // Adding zero turns -0.0 into 0.0.
        (current / target * 100.0).clamp(0.0, 100.0) + 0.0
    } else {
        0.0
    }
}

/// The percentage rounded to a whole number, e.g. "42%".
pub fn progress_label(percent: f64) -> String {
    format!("{}%", percent.round() + 0.0)
}

#[cfg(test)]
mod tests {
    use super::{progress_label, progress_percent};

    #[test]
    fn percent_of_target() {
        assert_eq!(progress_percent(25.0, 100.0), 25.0);
        assert_eq!(progress_percent(300.0, 400.0), 75.0);
    }

    #[test]
    fn percent_is_capped_at_one_hundred() {
        assert_eq!(progress_percent(150.0, 100.0), 100.0);
    }

    #[test]
    fn negative_savings_show_no_progress() {
        assert_eq!(progress_percent(-20.0, 100.0), 0.0);
    }

    #[test]
    fn zero_or_negative_target_shows_no_progress() {
        for current in [-5.0, 0.0, 10.0, 1e9] {
            assert_eq!(progress_percent(current, 0.0), 0.0);
            assert_eq!(progress_percent(current, -10.0), 0.0);
        }
    }

    #[test]
    fn percent_stays_in_range_for_many_inputs() {
        let values = [-1e6, -1.0, 0.0, 0.001, 1.0, 33.3, 99.9, 100.0, 1e6];

        for current in values {
            for target in values {
                let percent = progress_percent(current, target);
                assert!(
                    (0.0..=100.0).contains(&percent),
                    "got {percent} for {current} / {target}"
                );

                if target > 0.0 {
                    let want = (current / target * 100.0).clamp(0.0, 100.0);
                    assert_eq!(percent, want);
                    assert!(percent.is_sign_positive(), "got {percent} for {current} / {target}");
                }
            }
        }
    }

    #[test]
    fn label_rounds_to_whole_percent() {
        assert_eq!(progress_label(33.333), "33%");
        assert_eq!(progress_label(66.5), "67%");
        assert_eq!(progress_label(0.0), "0%");
        assert_eq!(progress_label(100.0), "100%");
    }

    #[test]
    fn negative_zero_savings_read_as_zero_percent() {
        let percent = progress_percent(-0.0, 100.0);

        assert!(percent.is_sign_positive());
        assert_eq!(progress_label(percent), "0%");
        assert_eq!(progress_label(-0.0), "0%");
        assert_eq!(progress_label(-0.4), "0%");
    }
}
