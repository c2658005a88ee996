//! Symbolic names for discovered targets.

use std::collections::BTreeMap;

use c8d_isa::{LOAD_ADDRESS, SymbolNames};

use crate::XrefTable;

/// Name of the program entry point in both the label and subroutine namespaces.
pub const ENTRY_NAME: &str = "main";

/// Names assigned to every cross-referenced address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    labels: BTreeMap<u16, String>,
    subroutines: BTreeMap<u16, String>,
    natives: BTreeMap<u16, String>,
}

impl SymbolTable {
    /// Number each namespace in ascending address order.
    pub fn build(labels: &XrefTable, subroutines: &XrefTable, natives: &XrefTable) -> Self {
        let mut table = Self {
            labels: number(labels, "label"),
            subroutines: number(subroutines, "sub"),
            natives: number(natives, "machine"),
        };
        table.labels.insert(LOAD_ADDRESS, ENTRY_NAME.to_string());
        table.subroutines.insert(LOAD_ADDRESS, ENTRY_NAME.to_string());
        table
    }

    pub fn label(&self, addr: u16) -> Option<&str> {
        self.labels.get(&addr).map(String::as_str)
    }

    pub fn subroutine(&self, addr: u16) -> Option<&str> {
        self.subroutines.get(&addr).map(String::as_str)
    }

    pub fn native(&self, addr: u16) -> Option<&str> {
        self.natives.get(&addr).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.labels.iter().map(|(a, n)| (*a, n.as_str()))
    }

    pub fn subroutines(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.subroutines.iter().map(|(a, n)| (*a, n.as_str()))
    }

    pub fn natives(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.natives.iter().map(|(a, n)| (*a, n.as_str()))
    }
}

fn number(table: &XrefTable, prefix: &str) -> BTreeMap<u16, String> {
    table
        .targets()
        .filter(|&addr| addr != LOAD_ADDRESS)
        .enumerate()
        .map(|(n, addr)| (addr, format!("{prefix}-{n}")))
        .collect()
}

impl SymbolNames for SymbolTable {
    fn label(&self, addr: u16) -> Option<&str> {
        Self::label(self, addr)
    }

    fn subroutine(&self, addr: u16) -> Option<&str> {
        Self::subroutine(self, addr)
    }

    fn native(&self, addr: u16) -> Option<&str> {
        Self::native(self, addr)
    }
}
