//! TCP reachability checks for IPv4 destinations given on the command line
//! or listed in a JSON settings file.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;

pub use app::App;
pub use config::{load_settings, Destination, Settings};
pub use error::{exit, ConfigError, ProbeError};
pub use output::{Reporter, Severity, Verbosity};
