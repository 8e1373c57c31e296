//! Huntcraft: AI-written mad-lib stories for bar crawls and treasure hunts.
//!
//! This facade re-exports the workspace crates and adds the pieces the
//! `huntcraft` binary needs: file configuration and logging setup.
//!
//! # Example
//!
//! ```
//! use huntcraft::{HuntcraftConfig, LogFormat};
//!
//! let config = HuntcraftConfig::from_toml_str(
//!     r#"
//!     [gateway]
//!     model = "gpt-4o-mini"
//!
//!     [logging]
//!     format = "json"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.gateway().model(), "gpt-4o-mini");
//! assert_eq!(*config.logging().format(), LogFormat::Json);
//! assert_eq!(config.database().url_env(), "DATABASE_URL");
//! ```

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{
    DEFAULT_CONFIG_FILE, HuntcraftConfig, HuntcraftConfigBuilder, LogFormat, LoggingConfig,
};
pub use logging::{build_filter, init_logging};

pub use huntcraft_core::*;
pub use huntcraft_database::*;
pub use huntcraft_error::*;
pub use huntcraft_interface::*;
pub use huntcraft_models::*;
pub use huntcraft_story::*;
