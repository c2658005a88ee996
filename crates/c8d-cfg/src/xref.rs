//! Cross-reference tables.

use std::collections::{BTreeMap, BTreeSet};

/// Target address -> addresses of the instructions referencing it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XrefTable {
    refs: BTreeMap<u16, BTreeSet<u16>>,
}

impl XrefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` references `target`. Returns true if the reference is new.
    pub fn add(&mut self, target: u16, from: u16) -> bool {
        self.refs.entry(target).or_default().insert(from)
    }

    pub fn contains(&self, target: u16) -> bool {
        self.refs.contains_key(&target)
    }

    /// Referencing addresses of `target`, ascending.
    pub fn refs(&self, target: u16) -> impl DoubleEndedIterator<Item = u16> + '_ {
        self.refs.get(&target).into_iter().flatten().copied()
    }

    /// Referenced targets, ascending.
    pub fn targets(&self) -> impl Iterator<Item = u16> + '_ {
        self.refs.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &BTreeSet<u16>)> + '_ {
        self.refs.iter().map(|(target, refs)| (*target, refs))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xref_accumulates() {
        let mut table = XrefTable::new();
        assert!(table.add(0x300, 0x204));
        assert!(table.add(0x300, 0x200));
        assert!(!table.add(0x300, 0x204));
        table.add(0x210, 0x220);

        assert_eq!(table.refs(0x300).collect::<Vec<_>>(), vec![0x200, 0x204]);
        assert_eq!(table.targets().collect::<Vec<_>>(), vec![0x210, 0x300]);
        assert_eq!(table.refs(0x999).count(), 0);
        assert_eq!(table.len(), 2);
    }
}
