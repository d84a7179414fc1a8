//! Typed endpoints, one module per API resource.
//!
//! Each module adds its operations to `Client` (and to the entities that
//! parent nested resources) in its own `impl` block.

pub mod authorized_apps;
pub mod automations;
pub mod batches;
pub mod campaign_folders;
pub mod campaigns;
pub mod conditions;
pub mod ecommerce;
pub mod lists;
pub mod members;
pub mod search;
pub mod webhooks;
