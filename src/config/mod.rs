mod settings;

pub use settings::{LiveKitConfig, OtelConfig, ServerConfig, SessionSettings, Settings};
