//! Register value tracking for reaching-set analysis.

use crate::Register;

/// Finite set of possible concrete values (sorted, deduplicated).
///
/// Byte registers hold values in `0..=0xFF`; `i` and the return-address set
/// hold 16-bit addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ValueSet {
    values: Vec<u16>,
}

impl ValueSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Create a set holding a single value.
    pub fn single(value: u16) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Create the set `0..=max`.
    pub fn range(max: u16) -> Self {
        Self {
            values: (0..=max).collect(),
        }
    }

    /// Create the set `{z & mask | z in 0..=0xFF}`.
    pub fn masked(mask: u8) -> Self {
        (0..=0xFFu8).map(|z| u16::from(z & mask)).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: u16) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// Values in ascending order.
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }

    /// Values of a byte register.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().map(|&v| (v & 0xFF) as u8)
    }

    /// Whether every value of `self` is also in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.values.iter().all(|v| other.contains(*v))
    }

    /// Union `other` into this set. Returns true if anything was added.
    pub fn merge(&mut self, other: &Self) -> bool {
        if other.is_subset(self) {
            return false;
        }

        // Sorted merge
        let a = &self.values;
        let b = &other.values;
        let mut merged = Vec::with_capacity(a.len() + b.len());
        let mut i = 0;
        let mut j = 0;
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        self.values = merged;
        true
    }

    /// Transform every value, collecting the distinct results.
    pub fn map(&self, f: impl Fn(u16) -> u16) -> Self {
        self.values.iter().map(|&v| f(v)).collect()
    }

    /// Combine two byte sets pairwise.
    ///
    /// When both operands name the same register each value is paired only
    /// with itself.
    pub fn pairwise<T>(
        lhs: &Self,
        rhs: &Self,
        same: bool,
        mut f: impl FnMut(u8, u8) -> T,
    ) -> Vec<T> {
        if same {
            return lhs.bytes().map(|a| f(a, a)).collect();
        }
        let mut out = Vec::with_capacity(lhs.len() * rhs.len());
        for a in lhs.bytes() {
            for b in rhs.bytes() {
                out.push(f(a, b));
            }
        }
        out
    }

    /// Saturate every value to `limit`.
    pub fn cap(&self, limit: u16) -> Self {
        self.map(|v| v.min(limit))
    }
}

impl FromIterator<u16> for ValueSet {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        let mut values: Vec<u16> = iter.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }
}

/// Abstract register file: one value set per [`Register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterState {
    regs: [ValueSet; Register::COUNT],
}

impl Default for RegisterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterState {
    /// Power-on state: every register zero, plane 1, no return addresses.
    pub fn new() -> Self {
        let mut regs: [ValueSet; Register::COUNT] = std::array::from_fn(|_| ValueSet::single(0));
        regs[Register::Rets.index()] = ValueSet::new();
        regs[Register::Plane.index()] = ValueSet::single(1);
        Self { regs }
    }

    /// Get register value set.
    pub fn get(&self, reg: Register) -> &ValueSet {
        &self.regs[reg.index()]
    }

    /// Replace register value set.
    pub fn set(&mut self, reg: Register, value: ValueSet) {
        self.regs[reg.index()] = value;
    }

    /// Merge another state into this one. Returns true if anything changed.
    pub fn merge(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (mine, theirs) in self.regs.iter_mut().zip(other.regs.iter()) {
            changed |= mine.merge(theirs);
        }
        changed
    }

    /// Whether every register set of `self` is contained in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.regs
            .iter()
            .zip(other.regs.iter())
            .all(|(mine, theirs)| mine.is_subset(theirs))
    }
}
