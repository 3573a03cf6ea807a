//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::OasisConfig;
use crate::config::secret_string;
use crate::domain::errors::OasisError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into OasisConfig
/// 4. Applies environment variable overrides (OASIS_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<OasisConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(OasisError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        OasisError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: OasisConfig = toml::from_str(&contents)
        .map_err(|e| OasisError::Configuration(format!("Failed to parse TOML: {e}")))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config
        .validate()
        .map_err(|e| OasisError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(OasisError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the OASIS_* prefix
///
/// Environment variables follow the pattern: OASIS_<SECTION>_<KEY>
/// For example: OASIS_PORTAL_BASE_URL, OASIS_SYNC_LOOKBACK_DAYS
fn apply_env_overrides(config: &mut OasisConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("OASIS_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("OASIS_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Portal overrides
    if let Ok(val) = std::env::var("OASIS_PORTAL_BASE_URL") {
        config.portal.base_url = val;
    }
    if let Ok(val) = std::env::var("OASIS_PORTAL_USERNAME") {
        config.portal.username = val;
    }
    if let Ok(val) = std::env::var("OASIS_PORTAL_PASSWORD") {
        config.portal.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("OASIS_PORTAL_HEADLESS") {
        config.portal.headless = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("OASIS_PORTAL_NAVIGATION_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.portal.navigation_timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("OASIS_PORTAL_DIAGNOSTICS_DIR") {
        config.portal.diagnostics_dir = val;
    }

    // Sync overrides
    if let Ok(val) = std::env::var("OASIS_SYNC_ENABLED") {
        config.sync.enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("OASIS_SYNC_LOOKBACK_DAYS") {
        if let Ok(days) = val.parse() {
            config.sync.lookback_days = days;
        }
    }
    if let Ok(val) = std::env::var("OASIS_SYNC_PAGE_NOTIFY") {
        config.sync.notify_on_new_rejections = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("OASIS_SYNC_NOTIFICATION_EMAIL") {
        config.sync.notification_email = Some(val);
    }

    // Store overrides
    if let Ok(val) = std::env::var("OASIS_STORE_PATH") {
        config.store.path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("OASIS_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("OASIS_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("OASIS_TEST_VAR", "test_value");
        let input = "password = \"${OASIS_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("OASIS_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("OASIS_MISSING_VAR");
        let input = "password = \"${OASIS_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# ${OASIS_NOT_SET_ANYWHERE}\nkey = \"v\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${OASIS_NOT_SET_ANYWHERE}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "secret"

[sync]
lookback_days = 14

[store]
backend = "jsonl"
path = "data/rejections.jsonl"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.portal.base_url, "https://oasis.example.sa/portal");
        assert_eq!(config.sync.lookback_days, 14);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "secret"

[sync]
lookback_days = 400
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
