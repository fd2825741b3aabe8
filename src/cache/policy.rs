// src/cache/policy.rs

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Category of cached artifact. Each kind maps to exactly one TTL entry in
/// [`CachePolicy`]; the match in `CachePolicy::ttl` is exhaustive, so a kind
/// without a policy cannot compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    ClientStats,
    ClientList,
    ProductStats,
    ProductList,
    CategoryList,
    TableStats,
    TableList,
    OrderStats,
    OrderList,
    OrderData,
    PaymentMethodList,
    PermissionList,
    RoleList,
    SalesPerformance,
    TopProducts,
    RecentTransactions,
    DashboardData,
    DashboardMetrics,
}

impl CacheKind {
    pub const ALL: &'static [CacheKind] = &[
        CacheKind::ClientStats,
        CacheKind::ClientList,
        CacheKind::ProductStats,
        CacheKind::ProductList,
        CacheKind::CategoryList,
        CacheKind::TableStats,
        CacheKind::TableList,
        CacheKind::OrderStats,
        CacheKind::OrderList,
        CacheKind::OrderData,
        CacheKind::PaymentMethodList,
        CacheKind::PermissionList,
        CacheKind::RoleList,
        CacheKind::SalesPerformance,
        CacheKind::TopProducts,
        CacheKind::RecentTransactions,
        CacheKind::DashboardData,
        CacheKind::DashboardMetrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::ClientStats => "client_stats",
            CacheKind::ClientList => "client_list",
            CacheKind::ProductStats => "product_stats",
            CacheKind::ProductList => "product_list",
            CacheKind::CategoryList => "category_list",
            CacheKind::TableStats => "table_stats",
            CacheKind::TableList => "table_list",
            CacheKind::OrderStats => "order_stats",
            CacheKind::OrderList => "order_list",
            CacheKind::OrderData => "order_data",
            CacheKind::PaymentMethodList => "payment_method_list",
            CacheKind::PermissionList => "permission_list",
            CacheKind::RoleList => "role_list",
            CacheKind::SalesPerformance => "sales_performance",
            CacheKind::TopProducts => "top_products",
            CacheKind::RecentTransactions => "recent_transactions",
            CacheKind::DashboardData => "dashboard_data",
            CacheKind::DashboardMetrics => "dashboard_metrics",
        }
    }

    /// Kinds whose keys carry a query-parameter discriminator. Writers do not
    /// know which discriminators are live, so invalidation uses a prefix scan.
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            CacheKind::ClientList
                | CacheKind::ProductList
                | CacheKind::CategoryList
                | CacheKind::TableList
                | CacheKind::OrderList
                | CacheKind::OrderData
                | CacheKind::PaymentMethodList
                | CacheKind::PermissionList
                | CacheKind::RoleList
                | CacheKind::TopProducts
                | CacheKind::RecentTransactions
        )
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TTLs tuned by data volatility, not uniformly. Expensive cross-entity
/// composites stay short to bound staleness; reference catalogs are
/// invalidated on write anyway, so their long TTL is only a safety net.
pub struct CachePolicy;

const TTL_COMPOSITE: Duration = Duration::from_secs(5 * 60);
const TTL_STATS: Duration = Duration::from_secs(10 * 60);
const TTL_LISTING: Duration = Duration::from_secs(30 * 60);
const TTL_CATALOG: Duration = Duration::from_secs(6 * 60 * 60);

impl CachePolicy {
    pub fn ttl(kind: CacheKind) -> Duration {
        match kind {
            CacheKind::DashboardData
            | CacheKind::DashboardMetrics
            | CacheKind::SalesPerformance => TTL_COMPOSITE,
            CacheKind::ClientStats
            | CacheKind::ProductStats
            | CacheKind::TableStats
            | CacheKind::OrderStats
            | CacheKind::TopProducts
            | CacheKind::RecentTransactions => TTL_STATS,
            CacheKind::ClientList
            | CacheKind::ProductList
            | CacheKind::CategoryList
            | CacheKind::TableList
            | CacheKind::OrderList
            | CacheKind::OrderData => TTL_LISTING,
            CacheKind::PaymentMethodList | CacheKind::PermissionList | CacheKind::RoleList => {
                TTL_CATALOG
            }
        }
    }

    /// Full policy table, for the admin TTL report.
    pub fn report() -> Vec<(CacheKind, Duration)> {
        CacheKind::ALL
            .iter()
            .map(|&kind| (kind, Self::ttl(kind)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_covers_every_kind() {
        let report = CachePolicy::report();
        assert_eq!(report.len(), CacheKind::ALL.len());
        for (kind, ttl) in report {
            assert!(ttl > Duration::ZERO, "zero ttl for {}", kind);
        }
    }

    #[test]
    fn test_composites_expire_before_catalogs() {
        assert!(
            CachePolicy::ttl(CacheKind::DashboardMetrics)
                < CachePolicy::ttl(CacheKind::PermissionList)
        );
        assert!(CachePolicy::ttl(CacheKind::OrderStats) < CachePolicy::ttl(CacheKind::RoleList));
    }

    #[test]
    fn test_kind_names_are_unique() {
        let mut names: Vec<&str> = CacheKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CacheKind::ALL.len());
    }

    #[test]
    fn test_listings_are_parameterized() {
        assert!(CacheKind::OrderList.is_parameterized());
        assert!(!CacheKind::ClientStats.is_parameterized());
        assert!(!CacheKind::DashboardMetrics.is_parameterized());
    }
}
