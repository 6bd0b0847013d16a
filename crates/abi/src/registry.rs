//! The registry type itself, independent of what it is populated with
//! (spec §4.7: "A registry maps canonical helper names to descriptors").

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use viper_il::Type;

/// Spec §4.7: `{side_effects, reads_memory, writes_memory, may_trap}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTags {
    pub side_effects: bool,
    pub reads_memory: bool,
    pub writes_memory: bool,
    pub may_trap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelperDescriptor {
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
    pub effect: EffectTags,
}

/// A `BTreeMap` rather than a `HashMap` so `Registry`'s `serde_json`
/// snapshot (spec §1.3 ambient config: "the registry *is* serializable")
/// is byte-stable across runs, the same determinism concern the writer
/// holds for canonical IL text (spec §4.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    entries: BTreeMap<String, HelperDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateName(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateName(name) => write!(f, "duplicate ABI entry: {name}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register(&mut self, descriptor: HelperDescriptor) -> Result<(), RegistryError> {
        if self.entries.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }
        self.entries.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&HelperDescriptor> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HelperDescriptor> {
        self.entries.values()
    }

    /// Matches spec §4.3's cross-check: an extern with a registry-known
    /// name must have an identical parameter list and return type.
    pub fn signature_matches(&self, name: &str, params: &[Type], ret: Type) -> bool {
        match self.lookup(name) {
            Some(d) => d.params == params && d.ret == ret,
            None => true, // spec §4.7: unknown names are opaque, no check possible
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> HelperDescriptor {
        HelperDescriptor {
            name: name.to_string(),
            params: vec![Type::I64],
            ret: Type::Void,
            effect: EffectTags { side_effects: true, ..Default::default() },
        }
    }

    #[test]
    fn registering_the_same_name_twice_is_an_error() {
        let mut r = Registry::new();
        r.register(descriptor("Viper.Terminal.SayInt")).unwrap();
        assert_eq!(
            r.register(descriptor("Viper.Terminal.SayInt")),
            Err(RegistryError::DuplicateName("Viper.Terminal.SayInt".into()))
        );
    }

    #[test]
    fn unknown_names_are_opaque_and_always_match() {
        let r = Registry::new();
        assert!(r.signature_matches("Host.Unknown", &[], Type::Void));
    }

    #[test]
    fn known_names_require_an_exact_signature_match() {
        let mut r = Registry::new();
        r.register(descriptor("Viper.Terminal.SayInt")).unwrap();
        assert!(r.signature_matches("Viper.Terminal.SayInt", &[Type::I64], Type::Void));
        assert!(!r.signature_matches("Viper.Terminal.SayInt", &[Type::F64], Type::Void));
    }

    #[test]
    fn round_trips_through_json() {
        let mut r = Registry::new();
        r.register(descriptor("Viper.Terminal.SayInt")).unwrap();
        let json = r.to_json().unwrap();
        let r2 = Registry::from_json(&json).unwrap();
        assert_eq!(r2.len(), 1);
        assert!(r2.lookup("Viper.Terminal.SayInt").is_some());
    }
}
