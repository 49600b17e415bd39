//! Environment injection.
//!
//! The process environment is read through [`EnvSource`] so callers can
//! substitute a fixed set of variables.
//!
//! | policy                     | normalize | outer keys               | variable names        |
//! |----------------------------|-----------|--------------------------|-----------------------|
//! | `duplicate-both-spellings` | on        | `env` + `case("env")`    | original + normalized |
//! | `duplicate-both-spellings` | off       | `env`                    | original              |
//! | `single-uppercased`        | either    | `env`                    | upper-cased           |

use serde_json::{Map, Value};

use tmplhate_core::{CaseConvention, EnvPolicy};

use crate::namespace::Namespace;

/// Outer key the environment mapping is always stored under.
pub const ENV_KEY: &str = "env";

/// Source of environment variables.
pub trait EnvSource {
    /// Every variable as a `(name, value)` pair.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The real process environment. Variables that are not valid Unicode are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// A fixed list of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedEnv(pub Vec<(String, String)>);

impl EnvSource for FixedEnv {
    fn vars(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FixedEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FixedEnv(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Store the environment in `namespace`, overwriting any existing `env`
/// (or normalized `env`) key.
///
/// `case` is `Some` when normalization is enabled.
pub fn inject(
    namespace: &mut Namespace,
    source: &dyn EnvSource,
    case: Option<CaseConvention>,
    policy: EnvPolicy,
) {
    let vars = source.vars();
    let mut env = Map::new();

    match (policy, case) {
        (EnvPolicy::SingleUppercased, _) => {
            for (name, value) in vars {
                env.insert(name.to_uppercase(), Value::String(value));
            }
            namespace.insert(ENV_KEY, Value::Object(env));
        }
        (EnvPolicy::DuplicateBothSpellings, Some(case)) => {
            for (name, value) in &vars {
                env.insert(name.clone(), Value::String(value.clone()));
            }
            for (name, value) in vars {
                env.insert(case.apply(&name), Value::String(value));
            }
            let env = Value::Object(env);
            namespace.insert(case.apply(ENV_KEY), env.clone());
            namespace.insert(ENV_KEY, env);
        }
        (EnvPolicy::DuplicateBothSpellings, None) => {
            for (name, value) in vars {
                env.insert(name, Value::String(value));
            }
            namespace.insert(ENV_KEY, Value::Object(env));
        }
    }
    tracing::debug!(%policy, normalized = case.is_some(), "environment injected");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
