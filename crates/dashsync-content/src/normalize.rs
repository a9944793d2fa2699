//! Canonical form computation

use serde_json::{Map, Number, Value};

use crate::digest::{StorageMode, compute_digest};
use crate::error::Result;
use crate::input::ConfigInput;
use crate::rules::{LibraryPanelRefs, ServerManagedFields, StripRule, walk_objects_mut};

/// Result of normalizing a dashboard body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm {
    /// Key-sorted JSON text with server-managed data removed
    pub json: String,
    /// SHA-256 of `json`, only computed in [`StorageMode::Sha256`]
    pub digest: Option<String>,
}

impl CanonicalForm {
    /// The value to persist and compare: the digest if present, else the text
    pub fn stored_value(&self) -> &str {
        self.digest.as_deref().unwrap_or(&self.json)
    }
}

/// Produces canonical forms by running strip rules then sorting keys
///
/// A `Normalizer` holds no mutable state and can be shared between threads.
#[derive(Debug)]
pub struct Normalizer {
    rules: Vec<Box<dyn StripRule>>,
}

impl Default for Normalizer {
    /// The dashboard rule set: server-managed fields and library panel refs
    fn default() -> Self {
        Self::with_rules(vec![
            Box::new(ServerManagedFields::default()),
            Box::new(LibraryPanelRefs),
        ])
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalizer from an explicit rule list
    pub fn with_rules(rules: Vec<Box<dyn StripRule>>) -> Self {
        Self { rules }
    }

    /// Append a rule, applied after the existing ones
    pub fn push_rule(&mut self, rule: Box<dyn StripRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Normalize an input into canonical JSON text
    ///
    /// [`ConfigInput::Raw`] is returned unchanged.
    pub fn normalize(&self, input: impl Into<ConfigInput>) -> Result<String> {
        match input.into() {
            ConfigInput::Raw(text) => Ok(text),
            ConfigInput::Structured(map) => self.render(map),
        }
    }

    /// Normalize and, in [`StorageMode::Sha256`], digest the result
    pub fn canonicalize(
        &self,
        input: impl Into<ConfigInput>,
        mode: StorageMode,
    ) -> Result<CanonicalForm> {
        let json = self.normalize(input)?;
        let digest = match mode {
            StorageMode::Json => None,
            StorageMode::Sha256 => Some(compute_digest(&json)),
        };
        Ok(CanonicalForm { json, digest })
    }

    /// Apply the strip rules to a body and put it in canonical order
    ///
    /// This is the cleaned body that gets sent to the remote service.
    pub fn clean(&self, map: Map<String, Value>) -> Map<String, Value> {
        let mut value = Value::Object(map);
        walk_objects_mut(&mut value, &mut |parent, object| {
            for rule in &self.rules {
                rule.strip(parent, object);
            }
        });
        match canonical_value(value) {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn render(&self, map: Map<String, Value>) -> Result<String> {
        let cleaned = self.clean(map);
        Ok(serde_json::to_string(&cleaned)?)
    }
}

/// Normalize with the default dashboard rules
pub fn normalize_config(input: impl Into<ConfigInput>) -> Result<String> {
    Normalizer::default().normalize(input)
}

fn canonical_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let mut sorted = Map::new();
            for (key, v) in entries {
                sorted.insert(key, canonical_value(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical_value).collect()),
        Value::Number(n) => Value::Number(canonical_number(n)),
        other => other,
    }
}

fn canonical_number(n: Number) -> Number {
    if n.is_i64() || n.is_u64() {
        return n;
    }
    // Integral floats in range convert exactly; 2^63 and 2^64 are exclusive bounds.
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Number::from(f as i64)
            } else if f > 0.0 && f < u64::MAX as f64 {
                Number::from(f as u64)
            } else {
                n
            }
        }
        _ => n,
    }
}
