//! `viper-abi`: the runtime bridge ABI registry (spec §4.7, §6.3).
//!
//! A registry is a canonical table mapping runtime helper names to
//! `{params, ret, effect}` descriptors. `viper-verify` cross-checks every
//! extern declared with a name the registry knows against the registry's
//! signature (spec §4.3); `viper-vm`'s bridge adapter looks an extern's
//! descriptor up by name before marshalling a call (spec §4.7).
//!
//! Spec.md deliberately leaves registry *contents* unspecified beyond
//! category names (§6.3); [`catalog::default_registry`] supplies a concrete
//! worked table for those categories, grounded on the teacher's
//! `crates/compiler/src/builtins.rs` (name -> stack-effect map).

pub mod catalog;
pub mod registry;

pub use registry::{EffectTags, HelperDescriptor, Registry, RegistryError};
