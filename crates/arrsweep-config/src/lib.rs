#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, dead_code, unused)]

//! YAML and environment configuration for a cleanup run.
//!
//! Layout: `model.rs` (typed document), `defaults.rs` (stock endpoints and
//! thresholds), `loader.rs` (file + `ARRSWEEP_*` layering), `validate.rs`
//! (validation and URL normalisation).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::CONFIG_FILE;
pub use error::{ConfigError, ConfigResult};
pub use loader::{apply_env_overrides, from_yaml_str, load, load_dotenv, load_file, normalize};
pub use model::{
    HttpConfig, KnownRequires, LogFormat, LoggingSettings, MediaServiceConfig, QbittorrentConfig,
    RemovalConfig, SweepConfig, ThresholdConfig,
};
pub use validate::validate;
