//! State shared by the passes of one assembly run.
use std::collections::BTreeMap;

use tracing::{event, Level};

use base::prelude::Address;

use super::diagnostics::Diagnostics;
use super::symtab::SymbolTable;

/// A map which remembers the order in which its keys were first
/// inserted.  Memory is allocated in declaration order, so the
/// tables of the assembler need this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertionOrderedMap<V> {
    in_insertion_order: Vec<V>,
    index: BTreeMap<String, usize>,
}

impl<V> Default for InsertionOrderedMap<V> {
    fn default() -> Self {
        InsertionOrderedMap {
            in_insertion_order: Vec::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<V> InsertionOrderedMap<V> {
    /// Inserts `v` under `k`, unless `k` is already present, in which
    /// case the map is unchanged and `v` is handed back.
    pub(crate) fn insert(&mut self, k: &str, v: V) -> Result<(), V> {
        if self.index.contains_key(k) {
            Err(v)
        } else {
            self.index.insert(k.to_string(), self.in_insertion_order.len());
            self.in_insertion_order.push(v);
            Ok(())
        }
    }

    pub(crate) fn get(&self, k: &str) -> Option<&V> {
        self.index.get(k).map(|&i| &self.in_insertion_order[i])
    }

    pub(crate) fn contains_key(&self, k: &str) -> bool {
        self.index.contains_key(k)
    }

    pub(crate) fn len(&self) -> usize {
        self.in_insertion_order.len()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.in_insertion_order.iter_mut()
    }

    pub(crate) fn into_values(self) -> Vec<V> {
        self.in_insertion_order
    }
}

/// A place in the code.  Labels occupy no memory; a label's address
/// is that of the instruction which follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    /// The address of the first instruction following the
    /// declaration.  Instructions before that may not use the
    /// variable.
    pub decl_address: Address,
    /// The memory cell reserved for the variable.  This is only
    /// known once all the code has been seen.
    pub address: Option<Address>,
}

/// An entry in the constant pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    /// Canonical text of the constant; two `write`s whose payloads
    /// have the same key share a constant.
    pub key: String,
    /// What is stored in the constant's memory cell.
    pub value: String,
    /// False when the payload had no known value.  Such a constant
    /// still occupies a cell (holding 0), but every `write` of it is
    /// faulty.
    pub resolved: bool,
    pub address: Option<Address>,
}

/// Why a name could not be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AlreadyDeclared {
    pub(crate) previous: Address,
}

#[derive(Debug)]
pub(crate) struct AssemblyContext<'s> {
    symtab: &'s SymbolTable,
    next_address: Address,
    labels: InsertionOrderedMap<Label>,
    variables: InsertionOrderedMap<Variable>,
    constants: InsertionOrderedMap<Constant>,
    pub(crate) diagnostics: Diagnostics,
}

impl<'s> AssemblyContext<'s> {
    pub(crate) fn new(symtab: &'s SymbolTable, origin: Address) -> AssemblyContext<'s> {
        AssemblyContext {
            symtab,
            next_address: origin,
            labels: InsertionOrderedMap::default(),
            variables: InsertionOrderedMap::default(),
            constants: InsertionOrderedMap::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub(crate) fn symtab(&self) -> &'s SymbolTable {
        self.symtab
    }

    /// The address the next instruction (or, after allocation, the
    /// next memory cell) will occupy.
    pub(crate) fn next_address(&self) -> Address {
        self.next_address
    }

    pub(crate) fn advance(&mut self) {
        self.next_address = self.next_address.successor();
    }

    pub(crate) fn declare_label(&mut self, name: &str) -> Result<Address, AlreadyDeclared> {
        let address = self.next_address;
        let label = Label {
            name: name.to_string(),
            address,
        };
        match self.labels.insert(name, label) {
            Ok(()) => {
                event!(Level::DEBUG, "label {name} is at {address}");
                Ok(address)
            }
            Err(_) => Err(AlreadyDeclared {
                previous: self.labels.get(name).map_or(address, |l| l.address),
            }),
        }
    }

    pub(crate) fn declare_variable(&mut self, name: &str) -> Result<Address, AlreadyDeclared> {
        let decl_address = self.next_address;
        let variable = Variable {
            name: name.to_string(),
            decl_address,
            address: None,
        };
        match self.variables.insert(name, variable) {
            Ok(()) => {
                event!(Level::DEBUG, "variable {name} is declared at {decl_address}");
                Ok(decl_address)
            }
            Err(_) => Err(AlreadyDeclared {
                previous: self
                    .variables
                    .get(name)
                    .map_or(decl_address, |v| v.decl_address),
            }),
        }
    }

    pub(crate) fn label(&self, name: &str) -> Option<&Label> {
        self.labels.get(name)
    }

    pub(crate) fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub(crate) fn has_constant(&self, key: &str) -> bool {
        self.constants.contains_key(key)
    }

    /// Adds a constant to the pool, unless one with the same key is
    /// already there.
    pub(crate) fn intern_constant(&mut self, key: &str, value: String) {
        self.add_constant(Constant {
            key: key.to_string(),
            value,
            resolved: true,
            address: None,
        });
    }

    /// Adds a constant whose value is unknown.  It holds 0.
    pub(crate) fn intern_unresolved_constant(&mut self, key: &str) {
        self.add_constant(Constant {
            key: key.to_string(),
            value: "0".to_string(),
            resolved: false,
            address: None,
        });
    }

    fn add_constant(&mut self, constant: Constant) {
        let key = constant.key.clone();
        if self.constants.insert(&key, constant).is_ok() {
            event!(Level::DEBUG, "constant {key} added to the pool");
        }
    }

    pub(crate) fn constant(&self, key: &str) -> Option<&Constant> {
        self.constants.get(key)
    }

    /// Places the constant pool immediately after the code, and the
    /// variables immediately after the constants.  This can only
    /// happen once every instruction of every input file has been
    /// counted.
    pub(crate) fn allocate(&mut self) {
        let code_end = self.next_address;
        for constant in self.constants.values_mut() {
            constant.address = Some(self.next_address);
            self.next_address = self.next_address.successor();
        }
        for variable in self.variables.values_mut() {
            variable.address = Some(self.next_address);
            self.next_address = self.next_address.successor();
        }
        event!(
            Level::DEBUG,
            "code ends at {code_end}; {} constants and {} variables follow; next free address is {}",
            self.constants.len(),
            self.variables.len(),
            self.next_address
        );
    }

    pub(crate) fn into_tables(self) -> (Vec<Label>, Vec<Constant>, Vec<Variable>, Diagnostics) {
        (
            self.labels.into_values(),
            self.constants.into_values(),
            self.variables.into_values(),
            self.diagnostics,
        )
    }
}
