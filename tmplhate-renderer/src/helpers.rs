//! Named helper functions exposed to templates.
//!
//! A [`Helper`] declares its parameter names up front; [`HelperRegistry`]
//! installs every helper into a [`Tera`] instance twice:
//!
//! - as a function, all parameters by name: `{{ mul(a=2, b=3) }}`
//! - as a filter, the piped value bound to the first parameter and the rest
//!   by name: `{{ name | upper }}`, `{{ count | mul(b=3) }}`
//!
//! Arity is checked on every call: a missing or unexpected argument is a
//! render error, as is a value of the wrong type.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tera::{Tera, Value};

/// A pure function callable from templates.
pub trait Helper: Send + Sync {
    /// Name used in templates.
    fn name(&self) -> &'static str;

    /// Parameter names, in positional order.
    fn params(&self) -> &'static [&'static str];

    /// Invoke with `self.params().len()` arguments, in order. Any other
    /// count is an error, never a panic.
    fn call(&self, args: &[Value]) -> tera::Result<Value>;
}

// ---------------------------------------------------------------------------
// Built-in helpers
// ---------------------------------------------------------------------------

/// `lower(s)`: Unicode lower-casing.
pub struct Lower;

impl Helper for Lower {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn params(&self) -> &'static [&'static str] {
        &["s"]
    }

    fn call(&self, args: &[Value]) -> tera::Result<Value> {
        let [s] = args else {
            return Err(wrong_count(self, args));
        };
        let s = expect_str(self, "s", s)?;
        Ok(Value::String(s.to_lowercase()))
    }
}

/// `upper(s)`: Unicode upper-casing.
pub struct Upper;

impl Helper for Upper {
    fn name(&self) -> &'static str {
        "upper"
    }

    fn params(&self) -> &'static [&'static str] {
        &["s"]
    }

    fn call(&self, args: &[Value]) -> tera::Result<Value> {
        let [s] = args else {
            return Err(wrong_count(self, args));
        };
        let s = expect_str(self, "s", s)?;
        Ok(Value::String(s.to_uppercase()))
    }
}

/// `mul(a, b)`: integer product; overflow is an error.
pub struct Mul;

impl Helper for Mul {
    fn name(&self) -> &'static str {
        "mul"
    }

    fn params(&self) -> &'static [&'static str] {
        &["a", "b"]
    }

    fn call(&self, args: &[Value]) -> tera::Result<Value> {
        let [a, b] = args else {
            return Err(wrong_count(self, args));
        };
        let a = expect_int(self, "a", a)?;
        let b = expect_int(self, "b", b)?;
        a.checked_mul(b)
            .map(Value::from)
            .ok_or_else(|| tera::Error::msg(format!("`mul` overflowed computing {a} * {b}")))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn expect_str<'a>(helper: &dyn Helper, param: &str, value: &'a Value) -> tera::Result<&'a str> {
    value.as_str().ok_or_else(|| {
        tera::Error::msg(format!(
            "`{}` expects a string for `{param}`, got {}",
            helper.name(),
            type_name(value)
        ))
    })
}

fn expect_int(helper: &dyn Helper, param: &str, value: &Value) -> tera::Result<i64> {
    value.as_i64().ok_or_else(|| {
        tera::Error::msg(format!(
            "`{}` expects an integer for `{param}`, got {}",
            helper.name(),
            type_name(value)
        ))
    })
}

// ---------------------------------------------------------------------------
// Argument binding
// ---------------------------------------------------------------------------

/// Order named arguments by the helper's parameter list.
///
/// `piped` fills the first parameter when the helper is used as a filter.
fn bind_args(
    helper: &dyn Helper,
    piped: Option<&Value>,
    named: &HashMap<String, Value>,
) -> tera::Result<Vec<Value>> {
    let params = helper.params();
    let by_name = match piped {
        Some(_) => params.get(1..).unwrap_or_default(),
        None => params,
    };

    if let Some(extra) = named.keys().find(|k| !by_name.contains(&k.as_str())) {
        return Err(arity_error(helper, &format!("unexpected argument `{extra}`")));
    }

    let mut args = Vec::with_capacity(params.len());
    if let Some(value) = piped {
        if params.is_empty() {
            return Err(arity_error(helper, "cannot be used as a filter"));
        }
        args.push(value.clone());
    }
    for param in by_name {
        match named.get(*param) {
            Some(value) => args.push(value.clone()),
            None => return Err(arity_error(helper, &format!("missing argument `{param}`"))),
        }
    }
    Ok(args)
}

fn wrong_count(helper: &dyn Helper, args: &[Value]) -> tera::Error {
    arity_error(helper, &format!("called with {}", args.len()))
}

fn arity_error(helper: &dyn Helper, detail: &str) -> tera::Error {
    let params = helper.params();
    tera::Error::msg(format!(
        "`{}` takes {} argument(s) ({}): {detail}",
        helper.name(),
        params.len(),
        params.join(", ")
    ))
}

// ---------------------------------------------------------------------------
// HelperRegistry
// ---------------------------------------------------------------------------

/// Set of helpers bound into every template.
#[derive(Clone)]
pub struct HelperRegistry {
    helpers: BTreeMap<&'static str, Arc<dyn Helper>>,
}

impl HelperRegistry {
    /// Registry with no helpers.
    pub fn empty() -> Self {
        HelperRegistry { helpers: BTreeMap::new() }
    }

    /// Registry with `lower`, `upper` and `mul`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Lower).register(Upper).register(Mul);
        registry
    }

    /// Add or replace a helper by name.
    pub fn register(&mut self, helper: impl Helper + 'static) -> &mut Self {
        self.helpers.insert(helper.name(), Arc::new(helper));
        self
    }

    /// Helper names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.keys().copied()
    }

    /// Register every helper as both a tera function and a tera filter.
    pub fn install(&self, tera: &mut Tera) {
        for (name, helper) in &self.helpers {
            let f = Arc::clone(helper);
            tera.register_function(name, move |named: &HashMap<String, Value>| {
                let args = bind_args(f.as_ref(), None, named)?;
                f.call(&args)
            });

            let f = Arc::clone(helper);
            tera.register_filter(name, move |piped: &Value, named: &HashMap<String, Value>| {
                let args = bind_args(f.as_ref(), Some(piped), named)?;
                f.call(&args)
            });
        }
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    fn render(src: &str) -> tera::Result<String> {
        let mut tera = Tera::default();
        HelperRegistry::builtin().install(&mut tera);
        tera.add_raw_template("t", src)?;
        let mut ctx = Context::new();
        ctx.insert("name", "World");
        ctx.insert("n", &4);
        tera.render("t", &ctx)
    }

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn builtin_names() {
        let names: Vec<_> = HelperRegistry::builtin().names().collect();
        assert_eq!(names, ["lower", "mul", "upper"]);
    }

    #[test]
    fn mul_as_function_and_filter() {
        assert_eq!(render("{{ mul(a=2, b=3) }}").unwrap(), "6");
        assert_eq!(render("{{ n | mul(b=3) }}").unwrap(), "12");
    }

    #[test]
    fn case_helpers() {
        assert_eq!(render("{{ upper(s=name) }}").unwrap(), "WORLD");
        assert_eq!(render("{{ name | lower }}").unwrap(), "world");
    }

    #[test]
    fn missing_argument_is_error() {
        let err = bind_args(&Mul, None, &args(&[("a", Value::from(2))])).unwrap_err();
        assert!(err.to_string().contains("missing argument `b`"), "got: {err}");
    }

    #[test]
    fn unexpected_argument_is_error() {
        let named = args(&[("a", Value::from(2)), ("b", Value::from(3)), ("c", Value::from(4))]);
        let err = bind_args(&Mul, None, &named).unwrap_err();
        assert!(err.to_string().contains("unexpected argument `c`"), "got: {err}");
    }

    #[test]
    fn filter_binds_first_param() {
        let bound = bind_args(&Mul, Some(&Value::from(5)), &args(&[("b", Value::from(2))])).unwrap();
        assert_eq!(bound, vec![Value::from(5), Value::from(2)]);
        assert!(bind_args(&Mul, Some(&Value::from(5)), &args(&[("a", Value::from(2))])).is_err());
    }

    #[test]
    fn wrong_types_are_errors() {
        let err = Mul.call(&[Value::from("2"), Value::from(3)]).unwrap_err();
        assert!(err.to_string().contains("expects an integer for `a`, got string"), "got: {err}");
        let err = Upper.call(&[Value::from(1)]).unwrap_err();
        assert!(err.to_string().contains("expects a string"), "got: {err}");
        assert!(render("{{ mul(a=1.5, b=2) }}").is_err());
    }

    #[test]
    fn wrong_argument_count_is_error() {
        let err = Mul.call(&[]).unwrap_err();
        assert!(err.to_string().contains("`mul` takes 2 argument(s) (a, b): called with 0"), "got: {err}");
        assert!(Lower.call(&[]).is_err());
        assert!(Upper.call(&[Value::from("a"), Value::from("b")]).is_err());
        assert!(Mul.call(&[Value::from(2)]).is_err());
    }

    #[test]
    fn mul_overflow_is_error() {
        assert!(Mul.call(&[Value::from(i64::MAX), Value::from(2)]).is_err());
    }

    #[test]
    fn custom_helper_can_be_registered() {
        struct Twice;
        impl Helper for Twice {
            fn name(&self) -> &'static str {
                "twice"
            }
            fn params(&self) -> &'static [&'static str] {
                &["s"]
            }
            fn call(&self, args: &[Value]) -> tera::Result<Value> {
                let [s] = args else {
                    return Err(tera::Error::msg("twice takes one argument"));
                };
                let s = s.as_str().unwrap_or_default();
                Ok(Value::String(format!("{s}{s}")))
            }
        }

        let mut registry = HelperRegistry::builtin();
        registry.register(Twice);
        let mut tera = Tera::default();
        registry.install(&mut tera);
        tera.add_raw_template("t", "{{ twice(s='ab') }}").unwrap();
        assert_eq!(tera.render("t", &Context::new()).unwrap(), "abab");
    }
}
