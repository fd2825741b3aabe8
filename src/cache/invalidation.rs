// src/cache/invalidation.rs

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::key::{cache_key, TenantId};
use crate::cache::policy::CacheKind;
use crate::cache::store::KeyValueStore;
use crate::config::CacheConfig;

/// Entity whose write-side change triggers cache invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Product,
    Category,
    Table,
    Order,
    PaymentMethod,
    Permission,
    Role,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Product => "product",
            EntityKind::Category => "category",
            EntityKind::Table => "table",
            EntityKind::Order => "order",
            EntityKind::PaymentMethod => "payment_method",
            EntityKind::Permission => "permission",
            EntityKind::Role => "role",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dashboard aggregates across every entity type, so these two kinds are
/// purged on any change regardless of the adjacency table.
const DASHBOARD_KINDS: &[CacheKind] = &[CacheKind::DashboardData, CacheKind::DashboardMetrics];

/// Cache kinds directly derived from each entity.
fn direct_kinds(entity: EntityKind) -> &'static [CacheKind] {
    match entity {
        EntityKind::Client => &[CacheKind::ClientStats, CacheKind::ClientList],
        EntityKind::Product => &[
            CacheKind::ProductStats,
            CacheKind::ProductList,
            CacheKind::TopProducts,
            CacheKind::SalesPerformance,
        ],
        EntityKind::Category => &[CacheKind::CategoryList, CacheKind::ProductList],
        EntityKind::Table => &[CacheKind::TableStats, CacheKind::TableList],
        EntityKind::Order => &[
            CacheKind::OrderStats,
            CacheKind::OrderList,
            CacheKind::OrderData,
            CacheKind::SalesPerformance,
            CacheKind::RecentTransactions,
            CacheKind::TopProducts,
        ],
        EntityKind::PaymentMethod => &[
            CacheKind::PaymentMethodList,
            CacheKind::RecentTransactions,
        ],
        EntityKind::Permission => &[CacheKind::PermissionList],
        EntityKind::Role => &[CacheKind::RoleList, CacheKind::PermissionList],
    }
}

/// Every cache kind a change to `entity` fans out to, dashboards included.
pub fn affected_kinds(entity: EntityKind) -> Vec<CacheKind> {
    direct_kinds(entity)
        .iter()
        .chain(DASHBOARD_KINDS)
        .copied()
        .collect()
}

/// Purges the cache kinds affected by an entity change. Write-path services
/// call [`entity_changed`](InvalidationRouter::entity_changed) after the
/// durable commit, never before. Every purge here is best-effort: one failed
/// kind is logged and the rest are still attempted, so the write that
/// triggered the invalidation can never fail on it.
#[derive(Clone)]
pub struct InvalidationRouter {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl InvalidationRouter {
    pub fn new(store: Arc<dyn KeyValueStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: key_prefix.into(),
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &CacheConfig) -> Self {
        Self::new(store, config.key_prefix.clone())
    }

    /// Fan out an entity change to every dependent cache kind for the tenant.
    /// Returns the number of kinds purged without error.
    pub async fn entity_changed(&self, entity: EntityKind, tenant: TenantId) -> usize {
        let mut purged = 0;
        for kind in affected_kinds(entity) {
            if self.purge_kind(kind, tenant).await {
                purged += 1;
            }
        }
        debug!(entity = %entity, tenant = %tenant, purged, "invalidation fan-out");
        purged
    }

    /// Administrative purge of every known kind for one tenant.
    pub async fn purge_tenant(&self, tenant: TenantId) -> usize {
        let mut purged = 0;
        for &kind in CacheKind::ALL {
            if self.purge_kind(kind, tenant).await {
                purged += 1;
            }
        }
        debug!(tenant = %tenant, purged, "tenant cache purged");
        purged
    }

    /// Administrative purge of the whole configured namespace, all tenants.
    pub async fn purge_all(&self) -> u64 {
        match self
            .store
            .delete_by_prefix(&format!("{}:", self.prefix))
            .await
        {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "global purge failed");
                0
            }
        }
    }

    async fn purge_kind(&self, kind: CacheKind, tenant: TenantId) -> bool {
        let base = cache_key(&self.prefix, kind, tenant, None);
        let mut ok = true;

        if let Err(e) = self.store.delete(&base).await {
            warn!(kind = %kind, tenant = %tenant, error = %e, "cache delete failed");
            ok = false;
        }

        if kind.is_parameterized() {
            // Discriminated keys live under `{base}:{disc}`; the writer does
            // not know the live discriminators, so scan the prefix.
            if let Err(e) = self.store.delete_by_prefix(&format!("{}:", base)).await {
                warn!(kind = %kind, tenant = %tenant, error = %e, "prefix invalidation failed");
                ok = false;
            }
        }

        ok
    }
}
