//! Meta Marketing API connector.
//!
//! Lists campaigns and insights for one ad account and writes back
//! campaigns, ad sets, ads and audiences.

pub mod config;
pub mod connector;
pub mod money;
pub mod records;

pub use config::{MetaConfig, API_VERSION, GRAPH_URL};
pub use connector::{
    CreateAd, CreateAdSet, CreateCampaign, CreateCustomAudience, CreateLookalikeAudience,
    MetaConnector,
};
pub use records::{MetaCampaign, MetaInsights, PURCHASE_ACTION};
