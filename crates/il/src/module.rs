//! The module, the root owner of every other IR node (spec §3.6, §3.8:
//! "All IR is value-owned").

use crate::function::Function;
use crate::types::Type;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Extern {
    pub name: String,
    pub ret: Type,
    pub params: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub ty: Type,
    pub init: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub version: String,
    pub target: Option<String>,
    pub externs: Vec<Extern>,
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(version: impl Into<String>) -> Self {
        Module {
            version: version.into(),
            target: None,
            externs: Vec::new(),
            globals: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn extern_decl(&self, name: &str) -> Option<&Extern> {
        self.externs.iter().find(|e| e.name == name)
    }

    pub fn global(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Every top-level name a `@name` operand may resolve to (spec §3.6:
    /// "names globally unique within the module").
    pub fn resolves(&self, name: &str) -> bool {
        self.function(name).is_some()
            || self.extern_decl(name).is_some()
            || self.global(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Linkage;

    #[test]
    fn resolves_finds_a_function_an_extern_or_a_global() {
        let mut m = Module::new("0.2.0");
        m.functions
            .push(Function::new("main", Type::Void, Linkage::Export));
        m.externs.push(Extern {
            name: "puts".into(),
            ret: Type::Void,
            params: vec![Type::Str],
        });
        m.globals.push(Global {
            name: "g".into(),
            ty: Type::I64,
            init: None,
        });
        assert!(m.resolves("main"));
        assert!(m.resolves("puts"));
        assert!(m.resolves("g"));
        assert!(!m.resolves("nope"));
    }
}
