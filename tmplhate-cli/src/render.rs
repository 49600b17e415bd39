//! `tmplhate [--tmpl <loc>] --values <loc> [--case ...] [--output <path>]`

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args};

use tmplhate_core::{config, CaseConvention, ConfigError, EnvPolicy, FileConfig};
use tmplhate_renderer::{RenderOptions, Renderer};

/// Flags for the root command. Each also reads a `TMPLHATE_*` variable and
/// falls back to the config file, then to its default.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Template location: path, ~/path, ../path or http(s):// URL.
    /// Omit to read the template from stdin.
    #[arg(short = 't', long = "tmpl", env = "TMPLHATE_TMPL", value_name = "LOCATION")]
    pub tmpl: Option<String>,

    /// Values location (YAML mapping), same forms as --tmpl.
    #[arg(short = 'l', long = "values", env = "TMPLHATE_VALUES", value_name = "LOCATION")]
    pub values: Option<String>,

    /// Don't normalize the case of value keys and environment names.
    /// TMPLHATE_DONT_NORMALIZE accepts 1/0, true/false, yes/no and on/off.
    #[arg(
        long,
        env = "TMPLHATE_DONT_NORMALIZE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub dont_normalize: bool,

    /// Case used to reference values: lower | upper | title [default: lower].
    #[arg(long = "case", env = "TMPLHATE_CASE", value_name = "CASE")]
    pub case: Option<String>,

    /// Environment layout: duplicate-both-spellings | single-uppercased
    /// [default: duplicate-both-spellings].
    #[arg(long = "env-policy", env = "TMPLHATE_ENV_POLICY", value_name = "POLICY")]
    pub env_policy: Option<String>,

    /// Write the rendered template here instead of stdout.
    #[arg(short = 'o', long = "output", env = "TMPLHATE_OUTPUT", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Config file [default: ~/.tmplhate.yaml].
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tmpl: String,
    pub values: String,
    pub output: Option<PathBuf>,
    pub options: RenderOptions,
}

impl Settings {
    /// Merge flags (already merged with env vars by clap) over the config file.
    pub fn resolve(args: &RenderArgs, file: &FileConfig) -> Result<Settings, ConfigError> {
        let case = match &args.case {
            Some(raw) => raw.parse()?,
            None => file.case.unwrap_or(CaseConvention::Lower),
        };
        let env_policy = match &args.env_policy {
            Some(raw) => raw.parse()?,
            None => file.env_policy.unwrap_or(EnvPolicy::DuplicateBothSpellings),
        };
        let dont_normalize = args.dont_normalize || file.dont_normalize.unwrap_or(false);

        let values = args
            .values
            .clone()
            .or_else(|| file.values.clone())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingValues)?;
        let tmpl = args.tmpl.clone().or_else(|| file.tmpl.clone()).unwrap_or_default();
        let output = args
            .output
            .clone()
            .or_else(|| file.output.as_ref().map(PathBuf::from));

        Ok(Settings {
            tmpl,
            values,
            output,
            options: RenderOptions {
                normalize: !dont_normalize,
                case,
                env_policy,
            },
        })
    }
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let loaded = config::load(self.config.as_deref())?;
        if let Some(loaded) = &loaded {
            eprintln!("Using config file: {}", loaded.path.display());
        }
        let file = loaded.map(|l| l.config).unwrap_or_default();
        let settings = Settings::resolve(&self, &file)?;
        tracing::debug!(?settings, "resolved settings");

        let renderer = Renderer::new(settings.options);
        let prepared = renderer.prepare(&settings.tmpl, &settings.values)?;

        match &settings.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot create output file '{}'", path.display()))?;
                let mut out = BufWriter::new(file);
                prepared.render_to(&mut out)?;
                out.flush()
                    .with_context(|| format!("cannot write output file '{}'", path.display()))?;
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                prepared.render_to(&mut out)?;
                out.flush().context("cannot write to stdout")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_values() -> RenderArgs {
        RenderArgs {
            values: Some("v.yaml".to_string()),
            ..RenderArgs::default()
        }
    }

    #[test]
    fn defaults() {
        let s = Settings::resolve(&args_with_values(), &FileConfig::default()).unwrap();
        assert_eq!(s.tmpl, "");
        assert_eq!(s.values, "v.yaml");
        assert_eq!(s.options, RenderOptions::default());
        assert!(s.output.is_none());
    }

    #[test]
    fn flags_override_config_file() {
        let args = RenderArgs {
            case: Some("upper".to_string()),
            ..args_with_values()
        };
        let file = FileConfig {
            values: Some("other.yaml".to_string()),
            case: Some(CaseConvention::Title),
            env_policy: Some(EnvPolicy::SingleUppercased),
            ..FileConfig::default()
        };
        let s = Settings::resolve(&args, &file).unwrap();
        assert_eq!(s.values, "v.yaml");
        assert_eq!(s.options.case, CaseConvention::Upper);
        assert_eq!(s.options.env_policy, EnvPolicy::SingleUppercased);
    }

    #[test]
    fn config_file_supplies_values_and_dont_normalize() {
        let file = FileConfig {
            values: Some("cfg.yaml".to_string()),
            dont_normalize: Some(true),
            output: Some("out.txt".to_string()),
            ..FileConfig::default()
        };
        let s = Settings::resolve(&RenderArgs::default(), &file).unwrap();
        assert_eq!(s.values, "cfg.yaml");
        assert!(!s.options.normalize);
        assert_eq!(s.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn missing_values_is_config_error() {
        let err = Settings::resolve(&RenderArgs::default(), &FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValues), "got: {err}");
        let empty = RenderArgs {
            values: Some(String::new()),
            ..RenderArgs::default()
        };
        assert!(Settings::resolve(&empty, &FileConfig::default()).is_err());
    }

    #[test]
    fn invalid_case_and_policy_are_config_errors() {
        let args = RenderArgs {
            case: Some("camel".to_string()),
            ..args_with_values()
        };
        let err = Settings::resolve(&args, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCase(ref c) if c == "camel"), "got: {err}");

        let args = RenderArgs {
            env_policy: Some("both".to_string()),
            ..args_with_values()
        };
        let err = Settings::resolve(&args, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvPolicy(_)), "got: {err}");
    }
}
