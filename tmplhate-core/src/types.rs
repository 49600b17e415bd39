//! Domain types shared by the loader, renderer and CLI.
//!
//! Both enums parse from the spelling users type on the command line or in
//! `~/.tmplhate.yaml`, and serialize back to that same spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// CaseConvention
// ---------------------------------------------------------------------------

/// Case rule applied to top-level value keys and environment variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseConvention {
    #[default]
    Lower,
    Upper,
    Title,
}

impl CaseConvention {
    /// All conventions in a stable order.
    pub fn all() -> &'static [CaseConvention] {
        &[CaseConvention::Lower, CaseConvention::Upper, CaseConvention::Title]
    }

    /// Rewrite `s` under this convention.
    pub fn apply(&self, s: &str) -> String {
        match self {
            CaseConvention::Lower => s.to_lowercase(),
            CaseConvention::Upper => s.to_uppercase(),
            CaseConvention::Title => title_case(s),
        }
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// Letters, digits, `_` and `'` continue a word; anything else ends it, so
/// `HOME_DIR` becomes `Home_dir` and `foo-bar` becomes `Foo-Bar`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() || c == '_' || c == '\'' {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

impl fmt::Display for CaseConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseConvention::Lower => "lower",
            CaseConvention::Upper => "upper",
            CaseConvention::Title => "title",
        };
        f.write_str(s)
    }
}

impl FromStr for CaseConvention {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lower" => Ok(CaseConvention::Lower),
            "upper" => Ok(CaseConvention::Upper),
            "title" => Ok(CaseConvention::Title),
            other => Err(ConfigError::InvalidCase(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// EnvPolicy
// ---------------------------------------------------------------------------

/// How environment variables are laid out in the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvPolicy {
    /// With normalization on, expose each variable under its original and
    /// its normalized name, and the whole mapping under both `env` and the
    /// normalized spelling of `env`.
    #[default]
    DuplicateBothSpellings,
    /// Expose the mapping once under `env` with upper-cased variable names.
    SingleUppercased,
}

impl fmt::Display for EnvPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnvPolicy::DuplicateBothSpellings => "duplicate-both-spellings",
            EnvPolicy::SingleUppercased => "single-uppercased",
        };
        f.write_str(s)
    }
}

impl FromStr for EnvPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "duplicate-both-spellings" => Ok(EnvPolicy::DuplicateBothSpellings),
            "single-uppercased" => Ok(EnvPolicy::SingleUppercased),
            other => Err(ConfigError::InvalidEnvPolicy(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_and_upper() {
        assert_eq!(CaseConvention::Lower.apply("HoMe"), "home");
        assert_eq!(CaseConvention::Upper.apply("HoMe"), "HOME");
    }

    #[test]
    fn title_keeps_underscore_words_together() {
        assert_eq!(CaseConvention::Title.apply("HOME_DIR"), "Home_dir");
        assert_eq!(CaseConvention::Title.apply("env"), "Env");
        assert_eq!(CaseConvention::Title.apply("foo-bar baz"), "Foo-Bar Baz");
        assert_eq!(CaseConvention::Title.apply(""), "");
    }

    #[test]
    fn every_convention_is_idempotent() {
        for case in CaseConvention::all() {
            for key in ["Name", "HOME_DIR", "x-Y z", "already"] {
                let once = case.apply(key);
                assert_eq!(case.apply(&once), once, "{case} not idempotent on {key}");
            }
        }
    }

    #[test]
    fn case_parses_and_displays() {
        for case in CaseConvention::all() {
            assert_eq!(case.to_string().parse::<CaseConvention>().unwrap(), *case);
        }
        let err = "camel".parse::<CaseConvention>().unwrap_err();
        assert!(err.to_string().contains("camel"));
    }

    #[test]
    fn env_policy_parses() {
        assert_eq!(
            "single-uppercased".parse::<EnvPolicy>().unwrap(),
            EnvPolicy::SingleUppercased
        );
        assert_eq!(EnvPolicy::default(), EnvPolicy::DuplicateBothSpellings);
        assert!("both".parse::<EnvPolicy>().is_err());
    }

    #[test]
    fn serde_uses_cli_spelling() {
        let case: CaseConvention = serde_yaml::from_str("title").unwrap();
        assert_eq!(case, CaseConvention::Title);
        let policy: EnvPolicy = serde_yaml::from_str("duplicate-both-spellings").unwrap();
        assert_eq!(policy, EnvPolicy::DuplicateBothSpellings);
    }
}
