//! Defines the configuration settings for the mailforge application.

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Command line arguments for the `generate` subcommand.
#[derive(Args, Debug, Default)]
pub(crate) struct GenerateArgs {
    /// Path to a JSON file with a person roster (multi-user mode)
    #[arg(short, long, env = "MAILFORGE_INPUT")]
    pub input: Option<PathBuf>,

    /// First name (single-user mode)
    #[arg(short, long, env = "MAILFORGE_FIRST")]
    pub first: Option<String>,

    /// Last name (single-user mode)
    #[arg(short, long, env = "MAILFORGE_LAST")]
    pub last: Option<String>,

    /// Password assigned to generated accounts
    #[arg(short, long, env = "MAILFORGE_PASSWORD")]
    pub password: Option<String>,

    /// Email domain for generated addresses
    #[arg(short, long, env = "MAILFORGE_DOMAIN")]
    pub domain: Option<String>,

    /// Username template (repeatable, comma-separated also accepted)
    #[arg(short, long = "template", env = "MAILFORGE_TEMPLATES", value_delimiter = ',')]
    pub templates: Vec<String>,

    /// Path to a file with one template per line
    #[arg(long, env = "MAILFORGE_TEMPLATES_FILE")]
    pub templates_file: Option<PathBuf>,

    /// Number of shared records to generate (default: one per template)
    #[arg(short, long, env = "MAILFORGE_COUNT")]
    pub count: Option<usize>,

    /// Template for the distinguished main identity
    #[arg(long, env = "MAILFORGE_MAIN_TEMPLATE")]
    pub main_template: Option<String>,

    /// Permit repeated templates instead of failing validation
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Path to the output JSON file (stdout when omitted)
    #[arg(short, long, env = "MAILFORGE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Path to configuration file (TOML format)
    #[arg(long, env = "MAILFORGE_CONFIG")]
    pub config_file: Option<PathBuf>,
}

/// TOML Configuration file structure
#[derive(Deserialize, Debug, Default)]
struct ConfigFile {
    generation: Option<GenerationConfig>,
    output: Option<OutputConfig>,
}

#[derive(Deserialize, Debug, Default)]
struct GenerationConfig {
    domain: Option<String>,
    templates: Option<Vec<String>>,
    target_count: Option<usize>,
    password: Option<String>,
    main_template: Option<String>,
    allow_duplicate_templates: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
struct OutputConfig {
    output_file: Option<String>,
    pretty: Option<bool>,
}

/// Resolved generation settings after layering defaults, the config file,
/// and command line arguments.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    /// Email domain; required at generation time.
    pub domain: Option<String>,
    /// Username templates, applied in order.
    pub templates: Vec<String>,
    /// Explicit shared-record target; `None` derives it from the
    /// template count.
    pub target_count: Option<usize>,
    /// Default password for generated accounts.
    pub password: String,
    /// Template for the distinguished main identity.
    pub main_template: Option<String>,
    /// Whether repeated templates pass validation.
    pub allow_duplicate_templates: bool,
    /// Output file path; `None` writes to stdout.
    pub output_file: Option<PathBuf>,
    /// Pretty-print the output JSON.
    pub pretty: bool,
}

impl Settings {
    fn default() -> Self {
        Settings {
            domain: None,
            templates: Vec::new(),
            target_count: None,
            password: String::new(),
            main_template: None,
            allow_duplicate_templates: false,
            output_file: None,
            pretty: true,
        }
    }
}

/// Load configuration from a TOML file
fn load_config_file(file_path: &Path) -> anyhow::Result<ConfigFile> {
    if !file_path.exists() {
        tracing::warn!(
            "Configuration file {} not found, using defaults",
            file_path.display()
        );
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read configuration file: {}", file_path.display()))?;

    let config: ConfigFile = toml::from_str(&content).with_context(|| {
        format!(
            "Failed to parse TOML configuration from {}",
            file_path.display()
        )
    })?;

    tracing::info!("Loaded configuration from {}", file_path.display());
    Ok(config)
}

fn apply_file_config(settings: &mut Settings, file_config: &ConfigFile) {
    if let Some(generation) = &file_config.generation {
        if let Some(domain) = &generation.domain {
            settings.domain = Some(domain.clone());
        }
        if let Some(templates) = &generation.templates {
            settings.templates = templates.clone();
        }
        if let Some(count) = generation.target_count {
            settings.target_count = Some(count);
        }
        if let Some(password) = &generation.password {
            settings.password = password.clone();
        }
        if let Some(template) = &generation.main_template {
            settings.main_template = Some(template.clone());
        }
        if let Some(allow) = generation.allow_duplicate_templates {
            settings.allow_duplicate_templates = allow;
        }
    }

    if let Some(output) = &file_config.output {
        if let Some(file) = &output.output_file {
            settings.output_file = Some(PathBuf::from(file));
        }
        if let Some(pretty) = output.pretty {
            settings.pretty = pretty;
        }
    }
}

/// Apply command line arguments on top of the current settings.
fn apply_cli_args(settings: &mut Settings, args: &GenerateArgs) -> anyhow::Result<()> {
    if let Some(domain) = &args.domain {
        settings.domain = Some(domain.clone());
    }

    let mut templates = args.templates.clone();
    if let Some(path) = &args.templates_file {
        templates.extend(read_templates_file(path)?);
    }
    if !templates.is_empty() {
        settings.templates = templates;
    }

    if let Some(count) = args.count {
        settings.target_count = Some(count);
    }
    if let Some(password) = &args.password {
        settings.password = password.clone();
    }
    if let Some(template) = &args.main_template {
        settings.main_template = Some(template.clone());
    }
    if args.allow_duplicates {
        settings.allow_duplicate_templates = true;
    }
    if let Some(output) = &args.output {
        settings.output_file = Some(output.clone());
    }
    if args.compact {
        settings.pretty = false;
    }

    Ok(())
}

fn validate_settings(settings: &mut Settings) {
    if settings.target_count == Some(0) {
        settings.target_count = Some(1);
        tracing::warn!("Target count was set to 0. Setting to 1.");
    }
}

/// Reads username templates from a file, one per line, dropping blanks.
pub(crate) fn read_templates_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read templates file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

pub(crate) fn build_settings(args: &GenerateArgs) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(file_path) = &args.config_file {
        let file_config = load_config_file(file_path)?;
        apply_file_config(&mut settings, &file_config);
    } else {
        for path in ["./mailforge.toml", "./config.toml"] {
            if Path::new(path).exists() {
                match load_config_file(Path::new(path)) {
                    Ok(file_config) => {
                        apply_file_config(&mut settings, &file_config);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load configuration from {}: {}", path, e);
                    }
                }
            }
        }
    }

    apply_cli_args(&mut settings, args)?;
    validate_settings(&mut settings);

    tracing::debug!("Final settings: {:?}", settings);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_file_config() {
        let file_config: ConfigFile = toml::from_str(
            r#"
            [generation]
            domain = "acme.com"
            templates = ["{first}.{last}", "admin"]
            target_count = 10
            password = "hunter2"
            allow_duplicate_templates = true

            [output]
            pretty = false
            output_file = "out.json"
            "#,
        )
        .unwrap();

        let mut settings = Settings::default();
        apply_file_config(&mut settings, &file_config);

        assert_eq!(settings.domain.as_deref(), Some("acme.com"));
        assert_eq!(settings.templates, vec!["{first}.{last}", "admin"]);
        assert_eq!(settings.target_count, Some(10));
        assert_eq!(settings.password, "hunter2");
        assert!(settings.allow_duplicate_templates);
        assert!(!settings.pretty);
        assert_eq!(settings.output_file, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_cli_args_override_file_config() {
        let file_config: ConfigFile = toml::from_str(
            r#"
            [generation]
            domain = "acme.com"
            templates = ["admin"]
            target_count = 5
            "#,
        )
        .unwrap();

        let mut settings = Settings::default();
        apply_file_config(&mut settings, &file_config);

        let args = GenerateArgs {
            domain: Some("example.org".to_string()),
            templates: vec!["{first}".to_string()],
            count: Some(2),
            compact: true,
            ..GenerateArgs::default()
        };
        apply_cli_args(&mut settings, &args).unwrap();

        assert_eq!(settings.domain.as_deref(), Some("example.org"));
        assert_eq!(settings.templates, vec!["{first}"]);
        assert_eq!(settings.target_count, Some(2));
        assert!(!settings.pretty);
    }

    #[test]
    fn test_validate_bumps_zero_target() {
        let mut settings = Settings::default();
        settings.target_count = Some(0);
        validate_settings(&mut settings);
        assert_eq!(settings.target_count, Some(1));
    }

    #[test]
    fn test_empty_config_file_keeps_defaults() {
        let file_config: ConfigFile = toml::from_str("").unwrap();
        let mut settings = Settings::default();
        apply_file_config(&mut settings, &file_config);

        assert!(settings.domain.is_none());
        assert!(settings.templates.is_empty());
        assert!(settings.pretty);
    }
}
