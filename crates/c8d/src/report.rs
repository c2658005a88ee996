//! JSON export of the analysis tables.

use serde::{Deserialize, Serialize};

use c8d_cfg::{Analysis, Class, SymbolTable, XrefTable};

use crate::Result;

/// Contiguous run of addresses sharing one classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionJson {
    /// First address of the run
    pub start: String,
    /// Number of bytes in the run
    pub len: u32,
    /// "code", "data" or "smc"
    pub class: String,
}

/// A named cross-reference target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolJson {
    pub name: String,
    pub address: String,
    /// Addresses of the referencing instructions
    pub refs: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuirksJson {
    pub shift: bool,
    pub load_store: bool,
    pub vf_order: bool,
}

/// Everything the analysis learned about a ROM.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub rom_len: usize,
    pub quirks: QuirksJson,
    pub regions: Vec<RegionJson>,
    pub labels: Vec<SymbolJson>,
    pub subroutines: Vec<SymbolJson>,
    pub natives: Vec<SymbolJson>,
}

impl Report {
    pub fn new(analysis: &Analysis) -> Self {
        let quirks = analysis.quirks();
        let symbols = analysis.symbols();
        Self {
            rom_len: analysis.program().rom_len(),
            quirks: QuirksJson {
                shift: quirks.shift,
                load_store: quirks.load_store,
                vf_order: quirks.vf_order,
            },
            regions: regions(analysis),
            labels: symbols_json(analysis.labels(), symbols, SymbolTable::label),
            subroutines: symbols_json(analysis.subroutines(), symbols, SymbolTable::subroutine),
            natives: symbols_json(analysis.natives(), symbols, SymbolTable::native),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn hex(addr: u32) -> String {
    format!("0x{addr:04x}")
}

fn regions(analysis: &Analysis) -> Vec<RegionJson> {
    let mut regions = Vec::new();
    let mut current: Option<(u32, u32, Class)> = None;

    for (addr, class) in analysis.classes().iter() {
        match current {
            Some((start, len, run)) if run == class && start + len == addr => {
                current = Some((start, len + 1, run));
            }
            _ => {
                if let Some((start, len, run)) = current.take() {
                    regions.push(region(start, len, run));
                }
                if class != Class::Unclassified {
                    current = Some((addr, 1, class));
                }
            }
        }
    }
    if let Some((start, len, run)) = current {
        regions.push(region(start, len, run));
    }
    regions
}

fn region(start: u32, len: u32, class: Class) -> RegionJson {
    RegionJson {
        start: hex(start),
        len,
        class: class.name().to_string(),
    }
}

fn symbols_json(
    table: &XrefTable,
    symbols: &SymbolTable,
    name_of: fn(&SymbolTable, u16) -> Option<&str>,
) -> Vec<SymbolJson> {
    table
        .iter()
        .filter_map(|(target, refs)| {
            let name = name_of(symbols, target)?;
            Some(SymbolJson {
                name: name.to_string(),
                address: hex(u32::from(target)),
                refs: refs.iter().map(|&r| hex(u32::from(r))).collect(),
            })
        })
        .collect()
}
