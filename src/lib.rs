pub mod config;
pub mod error;
pub mod cache {
    pub mod gateway;
    pub mod invalidation;
    pub mod key;
    pub mod policy;
    pub mod redis_store;
    pub mod store;
}
pub mod stats {
    pub mod dashboard;
    pub mod engine;
    pub mod period;
}
pub mod api;

pub use cache::gateway::{CacheGateway, GatewayStats};
pub use cache::invalidation::{EntityKind, InvalidationRouter};
pub use cache::key::TenantId;
pub use cache::policy::{CacheKind, CachePolicy};
pub use cache::redis_store::RedisStore;
pub use cache::store::{KeyValueStore, MemoryStore};
pub use stats::dashboard::{DashboardAggregator, DashboardSource};
pub use stats::engine::{Metric, StatsEngine};
pub use stats::period::PeriodWindow;
