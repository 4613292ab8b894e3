//! Per-scope storage of scalar child element text.
//!
//! A [`FieldAccumulator`] belongs to one handler. It knows which child element
//! names it accepts, keeps the last text seen for each of them while the
//! handler's element is open, and converts that text on read. Writes never
//! fail and never parse.
//!
//! Reads are lenient: an absent or unparsable value yields the type's zero
//! default (`0`, `Decimal::ZERO`, `""`, `false`) through the plain getters, or
//! `None` through the `*_opt` getters. Unparsable input is logged at `warn`
//! so upstream corruption stays visible without failing the message.

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Raw text of the scalar children seen in the current scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAccumulator {
    declared: HashSet<&'static str>,
    values: HashMap<&'static str, String>,
}

impl FieldAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator accepting the given child element names.
    pub fn with_fields(names: &[&'static str]) -> Self {
        let mut fields = Self::new();
        for name in names {
            fields.declare(name);
        }
        fields
    }

    /// Accept text for `name` from now on.
    pub fn declare(&mut self, name: &'static str) -> &mut Self {
        self.declared.insert(name);
        self
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Record the text of a closed child element, replacing any earlier value.
    ///
    /// Returns `false` (and stores nothing) if `name` was never declared.
    pub fn store(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.declared.get(name) {
            Some(key) => {
                self.values.insert(*key, value.into());
                true
            }
            None => false,
        }
    }

    /// The raw text stored for `name`, untouched.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True when no value has been stored since the last reset.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the stored `(name, raw text)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Forget every stored value. Declarations are kept.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    // ========================================================================
    // Typed reads
    // ========================================================================

    /// String value, or `""` when absent.
    pub fn string(&self, name: &str) -> String {
        self.raw(name).map(|s| s.trim().to_string()).unwrap_or_default()
    }

    /// String value, or `None` when absent or empty.
    pub fn string_opt(&self, name: &str) -> Option<String> {
        self.raw(name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Integer value, or `0` when absent or unparsable.
    pub fn i64(&self, name: &str) -> i64 {
        self.i64_opt(name).unwrap_or_default()
    }

    pub fn i64_opt(&self, name: &str) -> Option<i64> {
        self.parse(name, "integer")
    }

    /// Decimal value, or `Decimal::ZERO` when absent or unparsable.
    pub fn decimal(&self, name: &str) -> Decimal {
        self.decimal_opt(name).unwrap_or_default()
    }

    /// Decimal value, or `None` when absent, empty or unparsable.
    pub fn decimal_opt(&self, name: &str) -> Option<Decimal> {
        self.parse(name, "decimal")
    }

    /// Boolean value (`true`/`false`), or `false` when absent or unparsable.
    pub fn bool(&self, name: &str) -> bool {
        self.parse(name, "boolean").unwrap_or_default()
    }

    fn parse<T>(&self, name: &str, kind: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.raw(name)?.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(field = name, value, "unparsable {kind} ({e}), using default");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
