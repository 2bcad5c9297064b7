pub mod toml_loader;

pub use toml_loader::{load_custom_metrics, parse_custom_metrics};
