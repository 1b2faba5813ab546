/// Runtime settings loaded from environment variables
pub mod settings;

/// Economy tuning loaded from config.toml
pub mod economy;

pub use economy::{EconomyConfig, load_economy_config};
pub use settings::Settings;
