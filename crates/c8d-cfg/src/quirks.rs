//! Interpreter variant semantics that change how instructions are modelled.

/// Quirk flags, one per instruction family with documented alternate behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Quirks {
    /// `vx >>= vy` and `vx <<= vy` shift `vx` in place and ignore `vy`.
    pub shift: bool,
    /// `save vx` and `load vx` leave `i` unchanged.
    pub load_store: bool,
    /// Carry-producing ops write `vf` before `vx`, so the result wins when `x == f`.
    pub vf_order: bool,
}

impl Quirks {
    pub const fn new() -> Self {
        Self {
            shift: false,
            load_store: false,
            vf_order: false,
        }
    }

    pub const fn with_shift(mut self, enabled: bool) -> Self {
        self.shift = enabled;
        self
    }

    pub const fn with_load_store(mut self, enabled: bool) -> Self {
        self.load_store = enabled;
        self
    }

    pub const fn with_vf_order(mut self, enabled: bool) -> Self {
        self.vf_order = enabled;
        self
    }

    /// Whether any quirk is enabled.
    pub const fn any(&self) -> bool {
        self.shift || self.load_store || self.vf_order
    }
}
