pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::CartSession;
pub use config::CartConfig;
pub use core::cart::CartManager;
pub use domain::model::{Domain, Rejection, Suffix};
pub use utils::error::{CartError, Result};
