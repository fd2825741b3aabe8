// src/stats/dashboard.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::gateway::CacheGateway;
use crate::cache::key::TenantId;
use crate::cache::policy::CacheKind;
use crate::error::StatsResult;
use crate::stats::engine::{growth_percent, ratio, Metric};
use crate::stats::period::PeriodWindow;

/// Durable-store queries the dashboard composes. Implementations run the
/// entity-specific SQL; this layer never sees the schema.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn revenue(&self, tenant: TenantId, window: PeriodWindow) -> StatsResult<f64>;
    async fn order_count(&self, tenant: TenantId, window: PeriodWindow) -> StatsResult<f64>;
    async fn active_clients(&self, tenant: TenantId, window: PeriodWindow) -> StatsResult<f64>;
    /// Clients in the window with at least one completed order.
    async fn converted_clients(&self, tenant: TenantId, window: PeriodWindow) -> StatsResult<f64>;
    async fn top_products(
        &self,
        tenant: TenantId,
        window: PeriodWindow,
        limit: usize,
    ) -> StatsResult<Vec<ProductRevenue>>;
    async fn recent_transactions(
        &self,
        tenant: TenantId,
        limit: usize,
    ) -> StatsResult<Vec<TransactionSummary>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product_id: i64,
    pub name: String,
    pub revenue: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub order_id: i64,
    pub total: f64,
    pub payment_method: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Full dashboard payload for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub revenue: Metric,
    pub orders: Metric,
    pub active_clients: Metric,
    /// Converted / active clients per window, as a percentage.
    pub conversion_rate: Metric,
    pub orders_per_client: Metric,
    pub top_products: Vec<ProductRevenue>,
    pub recent_transactions: Vec<TransactionSummary>,
    pub generated_at: DateTime<Utc>,
}

const DEFAULT_TOP_PRODUCTS: usize = 5;
const DEFAULT_RECENT_TRANSACTIONS: usize = 10;

/// Composes the comparative metrics and ranked lists into one payload.
///
/// The aggregator is cache-oblivious; caching is applied once around the
/// whole composition (see [`cached_snapshot`](Self::cached_snapshot)), so a
/// single entry and a single invalidation point cover the dashboard.
pub struct DashboardAggregator<S> {
    source: S,
    top_limit: usize,
    recent_limit: usize,
}

impl<S: DashboardSource> DashboardAggregator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            top_limit: DEFAULT_TOP_PRODUCTS,
            recent_limit: DEFAULT_RECENT_TRANSACTIONS,
        }
    }

    pub fn with_limits(source: S, top_limit: usize, recent_limit: usize) -> Self {
        Self {
            source,
            top_limit,
            recent_limit,
        }
    }

    pub async fn snapshot(&self, tenant: TenantId) -> StatsResult<DashboardSnapshot> {
        self.snapshot_at(Utc::now(), tenant).await
    }

    pub async fn snapshot_at(
        &self,
        now: DateTime<Utc>,
        tenant: TenantId,
    ) -> StatsResult<DashboardSnapshot> {
        let current = PeriodWindow::current_month(now);
        let previous = PeriodWindow::previous_month(now);

        let revenue = Metric::from_counts(
            self.source.revenue(tenant, current).await?,
            self.source.revenue(tenant, previous).await?,
        );

        let orders_current = self.source.order_count(tenant, current).await?;
        let orders_previous = self.source.order_count(tenant, previous).await?;
        let orders = Metric::from_counts(orders_current, orders_previous);

        let active_current = self.source.active_clients(tenant, current).await?;
        let active_previous = self.source.active_clients(tenant, previous).await?;
        let active_clients = Metric::from_counts(active_current, active_previous);

        // Ratio metrics apply the zero guard to each window independently
        // before comparing the two rates.
        let conversion_current =
            ratio(self.source.converted_clients(tenant, current).await?, active_current) * 100.0;
        let conversion_previous =
            ratio(self.source.converted_clients(tenant, previous).await?, active_previous) * 100.0;
        let conversion_rate = Metric {
            current: conversion_current,
            previous: conversion_previous,
            growth: growth_percent(conversion_current, conversion_previous),
        };

        let opc_current = ratio(orders_current, active_current);
        let opc_previous = ratio(orders_previous, active_previous);
        let orders_per_client = Metric {
            current: opc_current,
            previous: opc_previous,
            growth: growth_percent(opc_current, opc_previous),
        };

        // Ties keep source order; the consumer is a display, not a sort key.
        let mut top_products = self.source.top_products(tenant, current, self.top_limit).await?;
        top_products.truncate(self.top_limit);

        let recent_transactions = self
            .source
            .recent_transactions(tenant, self.recent_limit)
            .await?;

        Ok(DashboardSnapshot {
            revenue,
            orders,
            active_clients,
            conversion_rate,
            orders_per_client,
            top_products,
            recent_transactions,
            generated_at: now,
        })
    }

    /// The read path used by handlers: one `DashboardMetrics` entry per
    /// tenant, recomputed on miss.
    pub async fn cached_snapshot(
        &self,
        gateway: &CacheGateway,
        tenant: TenantId,
    ) -> StatsResult<DashboardSnapshot> {
        gateway
            .remember(CacheKind::DashboardMetrics, tenant, None, || {
                self.snapshot(tenant)
            })
            .await
    }
}
