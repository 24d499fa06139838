pub mod app_config;
pub mod model;

pub use app_config::{
    ConfigError, apply_env_overrides, default_root_store, load_settings, load_settings_from_str,
    setup_resolver,
};
pub use model::ProbeSettings;
