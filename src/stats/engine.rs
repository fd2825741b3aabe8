// src/stats/engine.rs

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::key::TenantId;
use crate::stats::period::PeriodWindow;

/// A current-vs-previous comparison. `growth` is always finite: a zero
/// previous period yields 100 (signaling "new") when the current period has
/// activity and 0 otherwise, never NaN or Infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub current: f64,
    pub previous: f64,
    pub growth: f64,
}

impl Metric {
    pub fn from_counts(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            growth: growth_percent(current, previous),
        }
    }
}

/// Percentage change from `previous` to `current`, rounded to one decimal.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        ((current - previous) / previous * 1000.0).round() / 10.0
    }
}

/// Zero-guarded division for derived ratios (orders per client, averages).
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Evaluates an aggregator over the calendar comparison windows and folds the
/// two numbers into a [`Metric`]. Generic over the aggregator so the window
/// and growth arithmetic is written once, not per entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsEngine;

impl StatsEngine {
    pub fn new() -> Self {
        Self
    }

    pub async fn compare<F, Fut, E>(&self, tenant: TenantId, aggregate: F) -> Result<Metric, E>
    where
        F: Fn(TenantId, PeriodWindow) -> Fut,
        Fut: Future<Output = Result<f64, E>>,
    {
        self.compare_at(Utc::now(), tenant, aggregate).await
    }

    /// Same as [`compare`](Self::compare) with an injected clock, for
    /// deterministic tests and backdated reports.
    pub async fn compare_at<F, Fut, E>(
        &self,
        now: DateTime<Utc>,
        tenant: TenantId,
        aggregate: F,
    ) -> Result<Metric, E>
    where
        F: Fn(TenantId, PeriodWindow) -> Fut,
        Fut: Future<Output = Result<f64, E>>,
    {
        let current = aggregate(tenant, PeriodWindow::current_month(now)).await?;
        let previous = aggregate(tenant, PeriodWindow::previous_month(now)).await?;
        Ok(Metric::from_counts(current, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use chrono::TimeZone;

    #[test]
    fn test_zero_baseline_growth_law() {
        assert_eq!(growth_percent(5.0, 0.0), 100.0);
        assert_eq!(growth_percent(250.0, 0.0), 100.0);
        assert_eq!(growth_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_growth_symmetry() {
        for previous in [1.0, 10.0, 1000.0, 0.5] {
            assert_eq!(growth_percent(previous, previous), 0.0);
        }
    }

    #[test]
    fn test_growth_is_always_finite() {
        for (current, previous) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1e12, 1e-9)] {
            assert!(growth_percent(current, previous).is_finite());
        }
    }

    #[test]
    fn test_growth_rounded_to_one_decimal() {
        // 10 -> 12 orders: +20.0%; 1000 -> 1100 revenue: +10.0%
        assert_eq!(growth_percent(12.0, 10.0), 20.0);
        assert_eq!(growth_percent(1100.0, 1000.0), 10.0);
        // 3 -> 4: +33.3%, not +33.333...
        assert_eq!(growth_percent(4.0, 3.0), 33.3);
        // decline
        assert_eq!(growth_percent(8.0, 10.0), -20.0);
    }

    #[test]
    fn test_ratio_zero_guard() {
        assert_eq!(ratio(10.0, 0.0), 0.0);
        assert_eq!(ratio(10.0, 4.0), 2.5);
    }

    #[tokio::test]
    async fn test_compare_new_tenant_scenario() {
        // Tenant 7: 0 orders last month, 5 this month; $0 then $250.
        let engine = StatsEngine::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let tenant = TenantId(7);

        let orders = engine
            .compare_at(now, tenant, |_, window| async move {
                Ok::<f64, StatsError>(if window.end == now { 5.0 } else { 0.0 })
            })
            .await
            .unwrap();
        let revenue = engine
            .compare_at(now, tenant, |_, window| async move {
                Ok::<f64, StatsError>(if window.end == now { 250.0 } else { 0.0 })
            })
            .await
            .unwrap();

        assert_eq!(orders, Metric { current: 5.0, previous: 0.0, growth: 100.0 });
        assert_eq!(revenue, Metric { current: 250.0, previous: 0.0, growth: 100.0 });
    }

    #[tokio::test]
    async fn test_compare_growing_tenant_scenario() {
        // Tenant 7: 10 orders / $1000 last month, 12 orders / $1100 this month.
        let engine = StatsEngine::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let tenant = TenantId(7);

        let orders = engine
            .compare_at(now, tenant, |_, window| async move {
                Ok::<f64, StatsError>(if window.end == now { 12.0 } else { 10.0 })
            })
            .await
            .unwrap();
        let revenue = engine
            .compare_at(now, tenant, |_, window| async move {
                Ok::<f64, StatsError>(if window.end == now { 1100.0 } else { 1000.0 })
            })
            .await
            .unwrap();

        assert_eq!(orders.growth, 20.0);
        assert_eq!(revenue.growth, 10.0);
    }

    #[tokio::test]
    async fn test_aggregator_error_propagates() {
        let engine = StatsEngine::new();
        let res = engine
            .compare(TenantId(1), |_, _| async {
                Err::<f64, StatsError>(StatsError::Source("query failed".into()))
            })
            .await;
        assert!(res.is_err());
    }
}
