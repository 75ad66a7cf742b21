//! Period-over-period growth of collected cash.
//!
//! All figures are percentages rounded to two decimals, computed from the
//! `paid_total` of an ascending bucket series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::bucket::TimeBucket;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendSummary {
    /// Last bucket against the one before it.
    pub daily_growth: f64,
    /// Mean of the last window against the mean of the window before it.
    pub weekly_growth: f64,
    /// `weekly_growth` times the weeks-per-month factor. A linear
    /// extrapolation, not a comparison of monthly buckets.
    pub monthly_growth_estimate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendOptions {
    /// Buckets per comparison window.
    pub window: usize,
    pub monthly_factor: f64,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            window: 7,
            monthly_factor: 4.0,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change from `previous` to `current`, 0 when `previous` is 0.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

fn mean_paid(buckets: &[TimeBucket]) -> Option<f64> {
    if buckets.is_empty() {
        None
    } else {
        Some(buckets.iter().map(|b| b.paid_total).sum::<f64>() / buckets.len() as f64)
    }
}

/// Growth figures with the default 7-bucket window and 4-week month.
pub fn analyze_trends(series: &[TimeBucket]) -> TrendSummary {
    analyze_trends_with(series, TrendOptions::default())
}

pub fn analyze_trends_with(series: &[TimeBucket], options: TrendOptions) -> TrendSummary {
    let n = series.len();
    if n < 2 {
        return TrendSummary::default();
    }

    let daily = growth_percent(series[n - 1].paid_total, series[n - 2].paid_total);

    let window = options.window.max(1);
    let recent_start = n.saturating_sub(window);
    let prior_start = n.saturating_sub(window.saturating_mul(2));
    let recent = &series[recent_start..];
    let prior = &series[prior_start..recent_start];

    let weekly = match (mean_paid(recent), mean_paid(prior)) {
        (Some(current), Some(previous)) => growth_percent(current, previous),
        _ => 0.0,
    };
    let weekly = round2(weekly);

    TrendSummary {
        daily_growth: round2(daily),
        weekly_growth: weekly,
        monthly_growth_estimate: round2(weekly * options.monthly_factor),
    }
}

/// Growth figures as seen on `as_of`: buckets starting after it are ignored.
pub fn analyze_trends_as_of(
    series: &[TimeBucket],
    as_of: NaiveDate,
    options: TrendOptions,
) -> TrendSummary {
    let visible = series.partition_point(|b| b.key.start <= as_of);
    analyze_trends_with(&series[..visible], options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{Granularity, WeekStart};

    fn series(paid: &[f64]) -> Vec<TimeBucket> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        paid.iter()
            .enumerate()
            .map(|(i, p)| {
                let day = start + chrono::Duration::days(i as i64);
                let mut b = TimeBucket::empty(Granularity::Day.key(day, WeekStart::Monday));
                b.paid_total = *p;
                b
            })
            .collect()
    }

    #[test]
    fn test_fewer_than_two_buckets() {
        assert_eq!(analyze_trends(&[]), TrendSummary::default());
        assert_eq!(analyze_trends(&series(&[500.0])), TrendSummary::default());
    }

    #[test]
    fn test_daily_growth() {
        let t = analyze_trends(&series(&[200.0, 300.0]));
        assert_eq!(t.daily_growth, 50.0);
        // No prior window yet.
        assert_eq!(t.weekly_growth, 0.0);
        assert_eq!(t.monthly_growth_estimate, 0.0);
    }

    #[test]
    fn test_daily_growth_prior_zero() {
        let t = analyze_trends(&series(&[0.0, 300.0]));
        assert_eq!(t.daily_growth, 0.0);
    }

    #[test]
    fn test_daily_growth_rounded() {
        let t = analyze_trends(&series(&[300.0, 400.0]));
        assert_eq!(t.daily_growth, 33.33);
    }

    #[test]
    fn test_weekly_full_windows() {
        let mut paid = vec![100.0; 7];
        paid.extend(vec![150.0; 7]);
        let t = analyze_trends(&series(&paid));
        assert_eq!(t.weekly_growth, 50.0);
        assert_eq!(t.monthly_growth_estimate, 200.0);
        assert_eq!(t.daily_growth, 0.0);
    }

    #[test]
    fn test_weekly_partial_prior_window() {
        // 10 buckets: recent = last 7, prior = first 3.
        let paid = [100.0, 100.0, 100.0, 200.0, 200.0, 200.0, 200.0, 200.0, 200.0, 200.0];
        let t = analyze_trends(&series(&paid));
        assert_eq!(t.weekly_growth, 100.0);
        assert_eq!(t.monthly_growth_estimate, 400.0);
    }

    #[test]
    fn test_weekly_ignores_older_buckets() {
        let mut paid = vec![9999.0; 3];
        paid.extend(vec![100.0; 7]);
        paid.extend(vec![90.0; 7]);
        let t = analyze_trends(&series(&paid));
        assert_eq!(t.weekly_growth, -10.0);
        assert_eq!(t.monthly_growth_estimate, -40.0);
    }

    #[test]
    fn test_monthly_is_four_times_rounded_weekly() {
        let mut paid = vec![300.0; 7];
        paid.extend(vec![400.0; 7]);
        let t = analyze_trends(&series(&paid));
        assert_eq!(t.weekly_growth, 33.33);
        assert_eq!(t.monthly_growth_estimate, 133.32);
    }

    #[test]
    fn test_custom_window() {
        let t = analyze_trends_with(
            &series(&[100.0, 100.0, 300.0, 300.0]),
            TrendOptions {
                window: 2,
                monthly_factor: 4.0,
            },
        );
        assert_eq!(t.weekly_growth, 200.0);
    }

    #[test]
    fn test_huge_window_has_no_prior() {
        let t = analyze_trends_with(
            &series(&[100.0, 200.0, 300.0]),
            TrendOptions {
                window: usize::MAX,
                monthly_factor: 4.0,
            },
        );
        assert_eq!(t.daily_growth, 50.0);
        assert_eq!(t.weekly_growth, 0.0);
    }

    #[test]
    fn test_as_of_hides_later_buckets() {
        let s = series(&[100.0, 200.0, 1000.0]);
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let t = analyze_trends_as_of(&s, as_of, TrendOptions::default());
        assert_eq!(t.daily_growth, 100.0);

        let before_all = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(
            analyze_trends_as_of(&s, before_all, TrendOptions::default()),
            TrendSummary::default()
        );
    }
}
