//! TOML loading and serialization for option tables.
//!
//! An option table is a flat TOML table whose keys are option names. Values
//! may be strings, booleans or integers; they are kept as raw strings and
//! only interpreted by [`resolve`](crate::options::resolve).

use std::path::Path;

use toml::{Table, Value};

use crate::error::{ConfigError, Result};
use crate::options::{keys, BuildConfiguration, RawOptions};

/// Load raw options from a TOML file.
pub fn load_options_toml(path: &Path) -> Result<RawOptions> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_options_toml(&content)
}

/// Parse raw options from a TOML document whose top level is the option table.
pub fn parse_options_toml(toml_str: &str) -> Result<RawOptions> {
    let table: Table = toml::from_str(toml_str)?;
    raw_options_from_table(&table)
}

/// Convert a TOML table into raw options.
pub fn raw_options_from_table(table: &Table) -> Result<RawOptions> {
    let mut raw = RawOptions::new();
    for (name, value) in table {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            other => {
                return Err(ConfigError::InvalidOptionValue {
                    name: name.clone(),
                    value: other.to_string(),
                    expected: "a string, boolean or integer",
                })
            }
        };
        raw.set(name, text);
    }
    Ok(raw)
}

/// Serialize a resolved configuration back into an option table.
///
/// Resolving the result yields the same configuration.
pub fn options_to_toml(config: &BuildConfiguration) -> Result<String> {
    let mut table = Table::new();
    table.insert(
        keys::TARGET.into(),
        Value::String(config.platform.to_string()),
    );
    table.insert(
        keys::OPTIMIZE.into(),
        Value::String(config.optimize.as_str().into()),
    );
    table.insert(keys::STATIC.into(), Value::Boolean(config.build_static));
    table.insert(keys::SHARED.into(), Value::Boolean(config.build_shared));
    table.insert(keys::STRIP.into(), Value::Boolean(config.strip));
    table.insert(keys::UBSAN.into(), Value::Boolean(config.ubsan));
    table.insert(keys::TSAN.into(), Value::Boolean(config.tsan));
    table.insert(keys::FREESTANDING.into(), Value::Boolean(config.freestanding));
    table.insert(
        keys::HEAP_MODE.into(),
        Value::String(config.heap_mode.as_str().into()),
    );
    table.insert(
        keys::MEMORY_ACCESS.into(),
        Value::String(
            config
                .memory_access
                .map_or("default", |m| m.as_str())
                .into(),
        ),
    );
    Ok(toml::to_string_pretty(&table)?)
}

/// Template option table listing every option at its default.
pub fn generate_template() -> Result<String> {
    options_to_toml(&BuildConfiguration::default())
}
