pub mod api;
pub mod error;
pub mod manager;
pub mod page;
pub mod pool;
pub mod settings;
pub mod subscription;
pub mod toggle;
pub mod update;

#[cfg(test)]
mod test_util;

pub use error::*;
pub use manager::SubscriptionManager;
pub use pool::PoolSubscriptions;
