//! Host configuration

mod loader;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{HostConfig, IpcConfig, StoreConfig, ThingsConfig};
