use crate::runtime::data_structures::stack::Cell;
use std::collections::HashMap;

/// The address handed out to the first variable when no other base is configured.
pub const DEFAULT_VARIABLE_BASE: Cell = 1000;

/// Storage for the values of named variables.  Each name is mapped to an address the first time it
/// is declared, addresses count up from a fixed base and are never reused.  Every address holds a
/// single cell, starting out as zero.
#[derive(Clone, Debug)]
pub struct VariableStore {
    next_address: Cell,
    addresses: HashMap<String, Cell>,
    values: HashMap<Cell, Cell>,
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new(DEFAULT_VARIABLE_BASE)
    }
}

impl VariableStore {
    /// Create an empty store that will hand out addresses starting at `base`.
    pub fn new(base: Cell) -> VariableStore {
        VariableStore {
            next_address: base,
            addresses: HashMap::new(),
            values: HashMap::new(),
        }
    }

    /// The address of a known variable.
    pub fn address_of(&self, name: &str) -> Option<Cell> {
        self.addresses.get(name).copied()
    }

    /// Get the address for the variable, allocating a fresh zeroed cell the first time the name is
    /// seen.  Declaring the same name again keeps its existing address and value.
    pub fn allocate(&mut self, name: &str) -> Cell {
        if let Some(address) = self.address_of(name) {
            return address;
        }

        let address = self.next_address;

        self.next_address += 1;
        self.addresses.insert(name.to_string(), address);
        self.values.insert(address, 0);

        address
    }

    /// Read the value at the address, None if nothing was ever allocated or stored there.
    pub fn fetch(&self, address: Cell) -> Option<Cell> {
        self.values.get(&address).copied()
    }

    pub fn store(&mut self, address: Cell, value: Cell) {
        self.values.insert(address, value);
    }
}
