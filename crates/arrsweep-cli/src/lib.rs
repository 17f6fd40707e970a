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
#![allow(clippy::redundant_pub_crate)]

//! Command-line sweeper for stalled qBittorrent downloads.
//!
//! Layout:
//! - `cli.rs`: argument parsing, configuration bootstrap, and command dispatch
//! - `client.rs`: shared HTTP client, errors, and run context
//! - `commands/`: command handlers and the sweeper wiring they share
//! - `services/`: HTTP adapters for qBittorrent, Sonarr, and Radarr
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod services;

pub use cli::run;
