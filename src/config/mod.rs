//! Layered configuration
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `./planet-upload.toml` when present)
//! 3. CLI flags
//!
//! Layers are deep-merged as JSON values, then read into [`Settings`].

mod defaults;
mod effective;
mod merge;

pub use defaults::{CatalogSettings, Settings, StoreSettings, DEFAULT_CONFIG_FILE};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
