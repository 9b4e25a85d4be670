//! # Zod Expression Text
//!
//! Every leaf of the intermediate tree is an already-rendered Zod expression.
//! [`Expr`] wraps that text so the builders that produce it (scalars, enums,
//! arrays, objects, nullable and refine suffixes) live in one place.
//!
//! ## Custom Types
//!
//! Structured allow-list entries can replace the registry-derived type with a
//! named custom type:
//!
//! | Type | Expression |
//! |------|------------|
//! | `email` | `z.string().email()` |
//! | `uuid` | `z.string().uuid()` |
//! | `url` | `z.string().url()` |
//! | `currency` | `z.string().regex(/^[A-Z]{3}$/)` |
//! | `nonempty` | `z.string().min(1)` |
//! | `string` / `number` / `boolean` | `z.string()` / `z.number()` / `z.boolean()` |
//! | `length(a,b)` | `z.string().min(a).max(b)` |
//! | `regex(/p/)` | `z.string().regex(/p/)` |
//! | `min(n)` / `max(n)` | `z.number().min(n)` / `z.number().max(n)` |
//!
//! A trailing `?` appends `.nullish()`. Unknown names and malformed
//! parameters fall back to `z.any()`.

use std::borrow::Cow;
use std::fmt;

use zscope_core::TypeOverride;

const NULLISH: &str = ".nullish()";

/// A rendered Zod expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(String);

impl Expr {
    /// Wrap expression text as-is.
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// `z.any()`, the fallback for anything that cannot be typed.
    pub fn any() -> Self {
        Self::raw("z.any()")
    }

    /// `z.string()`.
    pub fn string() -> Self {
        Self::raw("z.string()")
    }

    /// `z.number()`.
    pub fn number() -> Self {
        Self::raw("z.number()")
    }

    /// `z.boolean()`.
    pub fn boolean() -> Self {
        Self::raw("z.boolean()")
    }

    /// `z.enum([...])` over exactly `values`, JSON-quoted, order kept.
    pub fn enumeration<S: AsRef<str>>(values: &[S]) -> Self {
        let quoted: Vec<String> = values
            .iter()
            .map(|v| serde_json::Value::from(v.as_ref()).to_string())
            .collect();
        Self(format!("z.enum([{}])", quoted.join(",")))
    }

    /// `z.array(inner)`.
    pub fn array(inner: Expr) -> Self {
        Self(format!("z.array({})", inner.0))
    }

    /// `z.object({ k: v, ... })`, or `z.object({})` when empty.
    ///
    /// Keys that are not bare identifiers are single-quoted.
    pub fn object<'k, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'k str, Expr)>,
    {
        let rendered: Vec<String> = entries
            .into_iter()
            .map(|(k, v)| format!("{}: {}", object_key(k), v.0))
            .collect();
        if rendered.is_empty() {
            Self::raw("z.object({})")
        } else {
            Self(format!("z.object({{ {} }})", rendered.join(", ")))
        }
    }

    /// Whether the expression already ends in `.nullish()`.
    pub fn is_nullish(&self) -> bool {
        self.0.ends_with(NULLISH)
    }

    /// Append `.nullish()` unless already present.
    pub fn nullish(mut self) -> Self {
        if !self.is_nullish() {
            self.0.push_str(NULLISH);
        }
        self
    }

    /// Attach a validation message through an always-true refinement.
    pub fn with_message(mut self, message: &str) -> Self {
        let quoted = serde_json::Value::from(message).to_string();
        self.0
            .push_str(&format!(".refine((val) => true, {{ message: {quoted} }})"));
        self
    }

    /// The expression text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the expression text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `key` matches `^[a-zA-Z_$][0-9a-zA-Z_$]*$`.
pub fn is_bare_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render an object key, single-quoting it when it is not a bare identifier.
pub fn object_key(key: &str) -> Cow<'_, str> {
    if is_bare_identifier(key) {
        Cow::Borrowed(key)
    } else {
        let escaped = key.replace('\\', "\\\\").replace('\'', "\\'");
        Cow::Owned(format!("'{escaped}'"))
    }
}

// ---------------------------------------------------------------------------
// Custom types
// ---------------------------------------------------------------------------

/// Map a custom type override to an expression.
pub fn custom_type(ty: &TypeOverride) -> Expr {
    match ty {
        TypeOverride::Named(name) => named_type(name),
        TypeOverride::List(items) => Expr::array(items.first().map_or_else(Expr::any, custom_type)),
        TypeOverride::Object(fields) => {
            Expr::object(fields.iter().map(|(k, v)| (k.as_str(), custom_type(v))))
        }
        TypeOverride::Other(_) => Expr::any(),
    }
}

fn named_type(name: &str) -> Expr {
    let (base, nullable) = match name.strip_suffix('?') {
        Some(base) => (base, true),
        None => (name, false),
    };

    let expr = if base.starts_with("length") {
        length_type(base)
    } else if base.starts_with("regex") {
        regex_type(base)
    } else if base.starts_with("min") || base.starts_with("max") {
        bound_type(base)
    } else {
        match base {
            "email" => Expr::raw("z.string().email()"),
            "uuid" => Expr::raw("z.string().uuid()"),
            "url" => Expr::raw("z.string().url()"),
            "currency" => Expr::raw("z.string().regex(/^[A-Z]{3}$/)"),
            "nonempty" => Expr::raw("z.string().min(1)"),
            "string" => Expr::string(),
            "number" => Expr::number(),
            "boolean" => Expr::boolean(),
            other => {
                tracing::debug!(custom_type = other, "unknown custom type, using z.any()");
                Expr::any()
            }
        }
    };

    if nullable {
        expr.nullish()
    } else {
        expr
    }
}

/// The argument list of `name(...)`, if `text` is exactly that call.
fn call_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `length(a,b)` => `z.string().min(a).max(b)`.
fn length_type(text: &str) -> Expr {
    let parsed = call_args(text, "length")
        .and_then(|args| args.split_once(','))
        .filter(|(min, max)| is_digits(min) && is_digits(max));
    match parsed {
        Some((min, max)) => Expr(format!("z.string().min({min}).max({max})")),
        None => Expr::any(),
    }
}

/// `regex(/p/)` => `z.string().regex(/p/)`.
fn regex_type(text: &str) -> Expr {
    match call_args(text, "regex").filter(|p| p.len() >= 2 && p.starts_with('/') && p.ends_with('/')) {
        Some(pattern) => Expr(format!("z.string().regex({pattern})")),
        None => Expr::any(),
    }
}

/// `min(n)` / `max(n)` => `z.number().min(n)` / `z.number().max(n)`.
fn bound_type(text: &str) -> Expr {
    for method in ["min", "max"] {
        if let Some(n) = call_args(text, method).filter(|n| is_digits(n)) {
            return Expr(format!("z.number().{method}({n})"));
        }
    }
    Expr::any()
}
