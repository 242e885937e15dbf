//! Fixed-length linear feedback shift registers.
//!
//! Bit 0 is the least significant cell. A clock moves every cell one
//! position toward the most significant end, drops the old top bit and
//! writes the XOR of the tap cells (read before the shift) into bit 0.
//! State is packed into a `u32`; the widest register is 23 bits.

use zeroize::Zeroize;

/// Static description of one register: width, feedback taps and the cell
/// consulted by the majority clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterSpec {
    pub name: &'static str,
    pub len: usize,
    pub taps: &'static [usize],
    pub clock_bit: usize,
}

impl RegisterSpec {
    /// Index of the most significant cell.
    pub const fn top(&self) -> usize {
        self.len - 1
    }

    const fn mask(&self) -> u32 {
        ((1u64 << self.len) - 1) as u32
    }
}

pub const R1: RegisterSpec = RegisterSpec {
    name: "R1",
    len: 19,
    taps: &[13, 16, 17, 18],
    clock_bit: 8,
};

pub const R2: RegisterSpec = RegisterSpec {
    name: "R2",
    len: 22,
    taps: &[20, 21],
    clock_bit: 10,
};

pub const R3: RegisterSpec = RegisterSpec {
    name: "R3",
    len: 23,
    taps: &[7, 20, 21, 22],
    clock_bit: 10,
};

pub const REGISTER_SPECS: [RegisterSpec; 3] = [R1, R2, R3];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    spec: RegisterSpec,
    state: u32,
}

impl Register {
    /// Creates a zero-filled register.
    pub const fn new(spec: RegisterSpec) -> Self {
        Self { spec, state: 0 }
    }

    /// Creates a register holding `state`; bits above the register width
    /// are discarded.
    pub const fn with_state(spec: RegisterSpec, state: u32) -> Self {
        Self {
            spec,
            state: state & spec.mask(),
        }
    }

    pub fn spec(&self) -> &RegisterSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.spec.len
    }

    pub fn is_empty(&self) -> bool {
        self.spec.len == 0
    }

    /// Packed contents, bit `i` of the value is cell `i`.
    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < self.spec.len, "{} has no cell {index}", self.spec.name);
        (self.state >> index) & 1 == 1
    }

    /// Cells from index 0 upward.
    pub fn bits(&self) -> Vec<bool> {
        (0..self.spec.len).map(|i| self.bit(i)).collect()
    }

    /// XOR of the tap cells.
    pub fn feedback(&self) -> bool {
        self.spec
            .taps
            .iter()
            .fold(false, |acc, &tap| acc ^ self.bit(tap))
    }

    pub fn clock_control(&self) -> bool {
        self.bit(self.spec.clock_bit)
    }

    pub fn output(&self) -> bool {
        self.bit(self.spec.top())
    }

    /// Shift one position toward the top cell with linear feedback into cell 0.
    pub fn clock(&mut self) {
        let feedback = self.feedback();
        self.state = ((self.state << 1) | u32::from(feedback)) & self.spec.mask();
    }

    /// XORs `bit` into cell 0.
    pub fn mix_low(&mut self, bit: bool) {
        self.state ^= u32::from(bit);
    }

    pub fn clear(&mut self) {
        self.state = 0;
    }
}

impl Zeroize for Register {
    fn zeroize(&mut self) {
        self.state.zeroize();
    }
}
