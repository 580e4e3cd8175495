use crate::config::{Config, DEFAULT_CONFIG_PATH};
use mbent_kernel::{Registry, registry};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

pub fn load_config_or_exit(explicit: Option<&str>) -> Config {
    let (path, required) = match explicit {
        Some(path) => (Path::new(path), true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };
    if !required && !path.exists() {
        return Config::default();
    }
    let config = Config::load(path).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });
    tracing::debug!(path = %path.display(), "configuration loaded");
    config
}

pub fn registry_or_exit() -> &'static Registry {
    registry().unwrap_or_else(|err| {
        eprintln!("error: drive registry rejected a declaration: {err}");
        std::process::exit(2);
    })
}

/// Read a drive document. `.toml` files are parsed as TOML, everything
/// else as JSON.
pub fn read_document_or_exit(path: &str) -> Value {
    let text = std::fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("error: failed to read {path}: {err}");
        std::process::exit(1);
    });
    let is_toml = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let parsed = if is_toml {
        toml::from_str::<Value>(&text).map_err(|err| err.to_string())
    } else {
        serde_json::from_str::<Value>(&text).map_err(|err| err.to_string())
    };
    parsed.unwrap_or_else(|err| {
        eprintln!("error: failed to parse {path}: {err}");
        std::process::exit(1);
    })
}

pub fn print_json_or_exit<T: Serialize + ?Sized>(payload: &T, what: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {what} json: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
