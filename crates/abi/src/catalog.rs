//! A concrete default registry covering the categories spec §6.3 names
//! ("console I/O, string operations, numeric formatting, array/list/map/set
//! constructors and accessors, file I/O, math intrinsics, random, time,
//! cryptography"). Spec.md leaves the contents unspecified; this table is
//! illustrative — a stand-in for "a C-style runtime host" (spec §1), not
//! a claim to *be* one. Grounded on the shape of the teacher's
//! `crates/compiler/src/builtins.rs` name -> signature table, generalized
//! from stack-effect pairs to full ABI descriptors (params, ret, effect
//! tags) since this registry is consumed by a typed verifier, not a stack
//! effect checker.

use crate::registry::{EffectTags, HelperDescriptor, Registry};
use viper_il::Type;

fn d(name: &str, params: &[Type], ret: Type, effect: EffectTags) -> HelperDescriptor {
    HelperDescriptor {
        name: name.to_string(),
        params: params.to_vec(),
        ret,
        effect,
    }
}

const PURE: EffectTags = EffectTags { side_effects: false, reads_memory: false, writes_memory: false, may_trap: false };
const PURE_TRAPPING: EffectTags = EffectTags { side_effects: false, reads_memory: false, writes_memory: false, may_trap: true };
const IO_WRITE: EffectTags = EffectTags { side_effects: true, reads_memory: true, writes_memory: false, may_trap: true };
const IO_READ: EffectTags = EffectTags { side_effects: true, reads_memory: false, writes_memory: true, may_trap: true };
const ALLOC: EffectTags = EffectTags { side_effects: true, reads_memory: false, writes_memory: true, may_trap: true };
const READS: EffectTags = EffectTags { side_effects: false, reads_memory: true, writes_memory: false, may_trap: true };
const MUTATES: EffectTags = EffectTags { side_effects: true, reads_memory: true, writes_memory: true, may_trap: true };

/// Builds the default registry. Panics only on a programmer error (a
/// duplicate name within this table), which `#[cfg(test)]` below catches —
/// this function is not itself fallible from a caller's point of view.
pub fn default_registry() -> Registry {
    let mut r = Registry::new();
    for descriptor in all_descriptors() {
        r.register(descriptor).expect("catalog entries must be unique");
    }
    r
}

fn all_descriptors() -> Vec<HelperDescriptor> {
    use Type::*;
    vec![
        // Console I/O
        d("Viper.Terminal.SayInt", &[I64], Void, IO_WRITE),
        d("Viper.Terminal.SayFloat", &[F64], Void, IO_WRITE),
        d("Viper.Terminal.SayStr", &[Str], Void, IO_WRITE),
        d("Viper.Terminal.ReadLine", &[], Str, IO_READ),

        // String operations
        d("Viper.String.Length", &[Str], I64, PURE),
        d("Viper.String.Concat", &[Str, Str], Str, ALLOC),
        d("Viper.String.Slice", &[Str, I64, I64], Str, PURE_TRAPPING),
        d("Viper.String.Eq", &[Str, Str], I1, PURE),
        d("Viper.String.CharAt", &[Str, I64], I32, PURE_TRAPPING),

        // Numeric formatting
        d("Viper.Format.IntToStr", &[I64], Str, ALLOC),
        d("Viper.Format.FloatToStr", &[F64], Str, ALLOC),
        d("Viper.Format.StrToInt", &[Str], I64, PURE_TRAPPING),
        d("Viper.Format.StrToFloat", &[Str], F64, PURE_TRAPPING),

        // Array/list constructors and accessors
        d("Viper.List.New", &[I64], Ptr, ALLOC),
        d("Viper.List.Get", &[Ptr, I64], I64, READS),
        d("Viper.List.Set", &[Ptr, I64, I64], Void, MUTATES),
        d("Viper.List.Len", &[Ptr], I64, READS),
        d("Viper.List.Push", &[Ptr, I64], Void, MUTATES),

        // Map/set constructors and accessors
        d("Viper.Map.New", &[], Ptr, ALLOC),
        d("Viper.Map.Get", &[Ptr, Str], I64, READS),
        d("Viper.Map.Set", &[Ptr, Str, I64], Void, MUTATES),
        d("Viper.Map.Contains", &[Ptr, Str], I1, READS),
        d("Viper.Set.New", &[], Ptr, ALLOC),
        d("Viper.Set.Insert", &[Ptr, I64], Void, MUTATES),
        d("Viper.Set.Contains", &[Ptr, I64], I1, READS),

        // File I/O
        d("Viper.File.ReadAll", &[Str], Str, IO_READ),
        d("Viper.File.WriteAll", &[Str, Str], Void, IO_WRITE),
        d("Viper.File.Exists", &[Str], I1, IO_READ),

        // Math intrinsics
        d("Viper.Math.Sqrt", &[F64], F64, PURE_TRAPPING),
        d("Viper.Math.Pow", &[F64, F64], F64, PURE),
        d("Viper.Math.Abs", &[F64], F64, PURE),
        d("Viper.Math.Floor", &[F64], F64, PURE),
        d("Viper.Math.Ceil", &[F64], F64, PURE),

        // Random
        d("Viper.Random.NextInt", &[I64, I64], I64, EffectTags { side_effects: true, ..PURE }),
        d("Viper.Random.NextFloat", &[], F64, EffectTags { side_effects: true, ..PURE }),

        // Time
        d("Viper.Time.NowMillis", &[], I64, EffectTags { side_effects: true, ..PURE }),
        d("Viper.Time.SleepMillis", &[I64], Void, EffectTags { side_effects: true, ..PURE }),

        // Cryptography
        d("Viper.Crypto.Sha256", &[Str], Str, ALLOC),
        d("Viper.Crypto.RandomBytes", &[I64], Str, EffectTags { side_effects: true, ..ALLOC }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_no_duplicate_names() {
        let r = default_registry();
        assert_eq!(r.len(), all_descriptors().len());
    }

    #[test]
    fn console_category_is_present() {
        let r = default_registry();
        let entry = r.lookup("Viper.Terminal.SayInt").expect("present");
        assert_eq!(entry.params, vec![Type::I64]);
        assert_eq!(entry.ret, Type::Void);
        assert!(entry.effect.side_effects);
    }

    #[test]
    fn every_category_named_in_the_spec_has_at_least_one_entry() {
        let r = default_registry();
        for prefix in [
            "Viper.Terminal", "Viper.String", "Viper.Format", "Viper.List",
            "Viper.Map", "Viper.Set", "Viper.File", "Viper.Math",
            "Viper.Random", "Viper.Time", "Viper.Crypto",
        ] {
            assert!(
                r.iter().any(|e| e.name.starts_with(prefix)),
                "no catalog entry for category {prefix}"
            );
        }
    }
}
