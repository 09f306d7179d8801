//! Layered configuration for the command-line front end.
//!
//! Values are resolved in order of precedence: explicit CLI flags, `-S/--set KEY=VALUE`
//! overrides, the TOML config file, and finally the built-in defaults. The result is a
//! validated core [`FoldingConfig`](qfold::engine::config::FoldingConfig).

pub mod builder;
pub mod defaults;
pub mod file;

pub use builder::build_config;
