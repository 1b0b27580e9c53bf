//! Generates `compile_time` constants from `config/<profile>.toml`

use serde::Deserialize;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on `max_file_size` for every profile
const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
const PRODUCTION_MAX_FILE_SIZE: u64 = 100_000_000;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Limits {
    text: TextLimits,
    scanner: ScannerLimits,
    file_processing: FileLimits,
    logging: LoggingLimits,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TextLimits {
    initial_capacity: usize,
    growth_factor: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScannerLimits {
    long_identifier_threshold: usize,
    metrics_usage_capacity: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLimits {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_events_per_file: usize,
    max_log_message_length: usize,
}

fn main() -> Result<(), String> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TOKE_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=TOKE_CONFIG_DIR");

    let profile = env::var("TOKE_BUILD_PROFILE").unwrap_or_else(|_| "development".into());
    let config_path = config_path(&profile)?;
    println!("cargo:rerun-if-changed={}", config_path.display());

    let content = fs::read_to_string(&config_path)
        .map_err(|e| format!("cannot read {}: {}", config_path.display(), e))?;
    let limits: Limits = toml::from_str(&content)
        .map_err(|e| format!("invalid limits in {}: {}", config_path.display(), e))?;

    check(&limits, &profile)?;

    let out_dir = env::var("OUT_DIR").map_err(|e| format!("OUT_DIR: {}", e))?;
    let out_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&out_path, render(&limits, &profile))
        .map_err(|e| format!("cannot write {}: {}", out_path.display(), e))
}

/// `<workspace>/<TOKE_CONFIG_DIR or config>/<profile>.toml`
fn config_path(profile: &str) -> Result<PathBuf, String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|e| format!("CARGO_MANIFEST_DIR: {}", e))?;
    let workspace = Path::new(&manifest_dir)
        .parent()
        .ok_or("toke must live inside a workspace directory")?;
    let config_dir = env::var("TOKE_CONFIG_DIR").unwrap_or_else(|_| "config".into());

    let path = workspace.join(config_dir).join(format!("{}.toml", profile));
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("no limits file for profile '{}' at {}", profile, path.display()))
    }
}

fn check(limits: &Limits, profile: &str) -> Result<(), String> {
    let files = &limits.file_processing;
    let failures = [
        (limits.text.initial_capacity == 0, "text.initial_capacity must be at least 1"),
        (limits.text.growth_factor < 2, "text.growth_factor must be at least 2"),
        (limits.scanner.long_identifier_threshold == 0, "scanner.long_identifier_threshold must be at least 1"),
        (files.max_file_size > ABSOLUTE_MAX_FILE_SIZE, "file_processing.max_file_size exceeds 1 GB"),
        (files.large_file_threshold > files.max_file_size, "file_processing.large_file_threshold exceeds max_file_size"),
        (
            limits.logging.max_log_events_per_file > limits.logging.log_buffer_size,
            "logging.max_log_events_per_file exceeds log_buffer_size",
        ),
        (
            profile == "production" && files.max_file_size > PRODUCTION_MAX_FILE_SIZE,
            "production builds cap file_processing.max_file_size at 100 MB",
        ),
    ];

    match failures.iter().find(|(failed, _)| *failed) {
        Some((_, message)) => Err(format!("{} (profile '{}')", message, profile)),
        None => Ok(()),
    }
}

fn render(limits: &Limits, profile: &str) -> String {
    let sections: [(&str, Vec<(&str, &str, String)>); 4] = [
        ("text", vec![
            ("INITIAL_CAPACITY", "usize", limits.text.initial_capacity.to_string()),
            ("GROWTH_FACTOR", "usize", limits.text.growth_factor.to_string()),
        ]),
        ("scanner", vec![
            ("LONG_IDENTIFIER_THRESHOLD", "usize", limits.scanner.long_identifier_threshold.to_string()),
            ("METRICS_USAGE_CAPACITY", "usize", limits.scanner.metrics_usage_capacity.to_string()),
        ]),
        ("file_processing", vec![
            ("MAX_FILE_SIZE", "u64", limits.file_processing.max_file_size.to_string()),
            ("LARGE_FILE_THRESHOLD", "u64", limits.file_processing.large_file_threshold.to_string()),
        ]),
        ("logging", vec![
            ("LOG_BUFFER_SIZE", "usize", limits.logging.log_buffer_size.to_string()),
            ("MAX_LOG_EVENTS_PER_FILE", "usize", limits.logging.max_log_events_per_file.to_string()),
            ("MAX_LOG_MESSAGE_LENGTH", "usize", limits.logging.max_log_message_length.to_string()),
        ]),
    ];

    let mut code = format!("// Generated by build.rs from the '{}' profile.\n\npub mod compile_time {{\n", profile);
    for (module, constants) in &sections {
        let _ = writeln!(code, "    pub mod {} {{", module);
        for (name, ty, value) in constants {
            let _ = writeln!(code, "        pub const {}: {} = {};", name, ty, value);
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    code
}
