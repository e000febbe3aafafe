use std::env;
use std::path::{Path, PathBuf};

use haggle_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let policy_fields: [(&str, String, Option<&str>); 8] = [
        (
            "policy.anchor_ratio",
            config.policy.anchor_ratio.to_string(),
            Some("HAGGLE_ANCHOR_RATIO"),
        ),
        ("policy.max_rounds", config.policy.max_rounds.to_string(), Some("HAGGLE_MAX_ROUNDS")),
        ("policy.opening_rate", config.policy.opening_rate.to_string(), None),
        ("policy.moderate_rate", config.policy.moderate_rate.to_string(), None),
        ("policy.pressure_rate", config.policy.pressure_rate.to_string(), None),
        ("policy.early_accept_ratio", config.policy.early_accept_ratio.to_string(), None),
        ("policy.pressure_accept_ratio", config.policy.pressure_accept_ratio.to_string(), None),
        (
            "policy.keywords",
            format!("{} entries", config.policy.keywords.len()),
            Some("HAGGLE_KEYWORDS"),
        ),
    ];

    for (field, value, env_var) in policy_fields {
        lines.push(render_line(
            field,
            &value,
            field_source(field, env_var, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            Some("HAGGLE_LOG_LEVEL"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source(
            "logging.format",
            Some("HAGGLE_LOG_FORMAT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    lines.join("\n")
}

fn render_line(field: &str, value: &str, source: String) -> String {
    format!("  {field} = {value} ({source})")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("haggle.toml"), PathBuf::from("config/haggle.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = std::fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &str,
    env_var: Option<&str>,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env {var}");
        }
        let alias = var.replace("HAGGLE_LOG_", "HAGGLE_LOGGING_");
        if alias != var && env::var(&alias).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env {alias}");
        }
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        let mut cursor = Some(doc);
        for part in field.split('.') {
            cursor = cursor.and_then(|value| value.get(part));
        }
        if cursor.is_some() {
            return format!("file {}", path.display());
        }
    }

    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn config_inspection_lists_policy_and_logging_fields() {
        let output = run();

        assert!(output.contains("policy.anchor_ratio"));
        assert!(output.contains("policy.max_rounds"));
        assert!(output.contains("logging.level"));
        assert!(output.contains("source precedence"));
    }
}
