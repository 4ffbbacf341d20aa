//! Database models, one file per entity.

pub mod ad_account;
pub mod campaign;
pub mod customer;
pub mod insight;
pub mod order;
pub mod product;
pub mod store;
pub mod sync_run;
pub mod tenant;

pub use ad_account::{CreateMetaAdAccount, MetaAdAccount};
pub use campaign::{MetaAdCampaign, UpsertCampaign};
pub use customer::{ShopifyCustomer, UpsertCustomer};
pub use insight::{CreateInsight, Insight, InsightSeverity};
pub use order::{NewOrderItem, Order, OrderItem, UpsertOrder};
pub use product::{Product, ProductSales, UpsertProduct};
pub use store::{CreateShopifyStore, ShopifyStore};
pub use sync_run::{RunOwner, SyncRun, SyncRunStatus, SyncType};
pub use tenant::Tenant;
