// src/language/mod.rs - Language/tooling registry: formatters and language servers

pub mod formatter;
pub mod registry;
pub mod server;

pub use formatter::FormatterConfig;
pub use registry::{LanguageConfig, Registry};
pub use server::{
    FeatureFilter, LanguageServerConfig, LanguageServerFeature, LanguageServerFeatures,
};
