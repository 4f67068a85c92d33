pub mod config;
pub mod db;
pub mod logging;
pub mod runtime;

pub use config::StoreConfig;
pub use db::{Store, StoreError};

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
#[cfg(feature = "uniffi")]
pub mod uniffi_interface;
