//! Build script for tessera-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest string the firmware stores for names and topics
const MAX_STRING_LEN: usize = 64;

const DISPLAY_KEYS: &[&str] = &[
    "mode",
    "frame_interval_ms",
    "brightness",
    "alive_color",
    "dead_color",
    "bar_source",
];

const NETWORK_KEYS: &[&str] = &[
    "link_retry_ms",
    "session_retry_ms",
    "device_name",
    "presence_topic",
    "data_topic",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a display.toml configuration file.          ║\n\
            ║  Please create one in the tessera-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_network(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid display.toml                                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=display.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only [display] and [network] tables are allowed, each with known keys
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        let known = match name.as_str() {
            "display" => DISPLAY_KEYS,
            "network" => NETWORK_KEYS,
            _ => {
                errors.push(format!("unknown section [{}]", name));
                continue;
            }
        };

        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for key in table.keys() {
            if !known.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Validate the [display] section
fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };

    check_choice(display, "display", "mode", &["life", "bars"], errors);
    check_choice(display, "display", "bar_source", &["fast", "slow"], errors);
    check_range(display, "display", "frame_interval_ms", 1, u32::MAX as i64, errors);
    check_range(display, "display", "brightness", 0, 255, errors);

    for key in ["alive_color", "dead_color"] {
        match display.get(key) {
            None => {}
            Some(toml::Value::String(color)) if is_hex_color(color) => {}
            Some(_) => errors.push(format!("[display] {} must be \"#RRGGBB\"", key)),
        }
    }
}

/// Validate the [network] section
fn validate_network(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(network) = config.get("network") else {
        return;
    };

    check_range(network, "network", "link_retry_ms", 1, u32::MAX as i64, errors);
    check_range(network, "network", "session_retry_ms", 1, u32::MAX as i64, errors);

    for key in ["device_name", "presence_topic", "data_topic"] {
        match network.get(key) {
            None => {}
            Some(toml::Value::String(s)) if !s.is_empty() && s.len() <= MAX_STRING_LEN => {}
            Some(_) => errors.push(format!(
                "[network] {} must be a string of 1-{} bytes",
                key, MAX_STRING_LEN
            )),
        }
    }
}

fn check_choice(
    table: &toml::Value,
    section: &str,
    key: &str,
    choices: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(s)) if choices.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be one of {}",
            section,
            key,
            choices.join(", ")
        )),
    }
}

fn check_range(
    table: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(n)) if (min..=max).contains(n) => {}
        Some(_) => errors.push(format!("[{}] {} must be {}-{}", section, key, min, max)),
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
