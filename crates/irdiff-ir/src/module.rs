//! Modules.

use crate::function::Function;
use crate::layout::DataLayout;
use crate::types::{Type, TypeId};
use crate::value::{ConstId, Constant, FunId, GlobalId};

/// A global variable.
#[derive(Clone, Debug)]
pub struct Global {
    /// Symbol name.
    pub name: String,
    /// Type of a reference to this global (a pointer type).
    pub ty: TypeId,
}

/// A compiled module: arenas of types, constants, globals and functions.
#[derive(Clone, Debug)]
pub struct Module {
    /// Module name (for diagnostics).
    pub name: String,
    /// Type arena.
    pub types: Vec<Type>,
    /// Constant arena.
    pub consts: Vec<Constant>,
    /// Global variables.
    pub globals: Vec<Global>,
    /// Functions (declarations and definitions).
    pub funcs: Vec<Function>,
    /// Layout rules for this module.
    pub layout: DataLayout,
}

impl Module {
    /// Create an empty module with the given layout.
    pub const fn new(name: String, layout: DataLayout) -> Self {
        Self {
            name,
            types: Vec::new(),
            consts: Vec::new(),
            globals: Vec::new(),
            funcs: Vec::new(),
            layout,
        }
    }

    /// Get a type by id.
    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// Get a constant by id.
    pub fn constant(&self, id: ConstId) -> &Constant {
        &self.consts[id.index()]
    }

    /// Get a global by id.
    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    /// Get a function by id.
    pub fn func(&self, id: FunId) -> &Function {
        &self.funcs[id.index()]
    }

    /// Get a function by id, mutably.
    pub fn func_mut(&mut self, id: FunId) -> &mut Function {
        &mut self.funcs[id.index()]
    }

    /// Look up a function by name.
    pub fn func_by_name(&self, name: &str) -> Option<FunId> {
        self.funcs
            .iter()
            .position(|f| f.name == name)
            .map(|i| FunId(i as u32))
    }

    /// The declared name of an aggregate type, if `id` names one.
    pub fn struct_name(&self, id: TypeId) -> Option<&str> {
        self.ty(id).struct_name()
    }
}
