//! Majority-clocked keystream generator built from three LFSRs.
//!
//! The engine mixes a 64-bit key and a 22-bit frame number into the
//! registers with regular clocking, runs a fixed warm-up with irregular
//! clocking, and then emits one keystream bit per irregular step: the XOR
//! of the three top cells.

use log::{debug, trace};
use zeroize::Zeroize;

use crate::register::{R1, R2, R3, Register};

pub const KEY_BITS: usize = 64;
pub const FRAME_BITS: usize = 22;
pub const FRAME_MASK: u32 = (1 << FRAME_BITS) - 1;
/// Irregular steps run after mixing whose output is discarded.
pub const WARMUP_CYCLES: usize = 100;
/// Keystream bits consumed by one GSM burst.
pub const GSM_BURST_BITS: usize = 114;
/// A burst rounded up to whole bytes.
pub const BURST_KEYSTREAM_BYTES: usize = GSM_BURST_BITS.div_ceil(8);

/// True when at least two of the three bits are set.
pub fn majority(a: bool, b: bool, c: bool) -> bool {
    u8::from(a) + u8::from(b) + u8::from(c) >= 2
}

/// Keystream state machine. Holds no "initialized" flag: generating from
/// a fresh engine is well defined (the all-zero state yields zero bits).
///
/// Not internally synchronized; share one instance across threads only
/// behind a `Mutex`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeystreamEngine {
    registers: [Register; 3],
}

impl Default for KeystreamEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl KeystreamEngine {
    pub fn new() -> Self {
        Self {
            registers: [Register::new(R1), Register::new(R2), Register::new(R3)],
        }
    }

    pub fn registers(&self) -> &[Register; 3] {
        &self.registers
    }

    /// Resets the registers and loads `key` and the low 22 bits of `frame`,
    /// then runs the warm-up. Each call is a full reset.
    pub fn initialize(&mut self, key: u64, frame: u32) {
        self.load(key, frame);
        self.warm_up(WARMUP_CYCLES);
        debug!(
            "engine initialized frame={} warmup={}",
            frame & FRAME_MASK,
            WARMUP_CYCLES
        );
    }

    fn load(&mut self, key: u64, frame: u32) {
        self.registers.iter_mut().for_each(Register::clear);
        self.mix_bits(key, KEY_BITS);
        self.mix_bits(u64::from(frame & FRAME_MASK), FRAME_BITS);
    }

    /// Bit `i` of `value` (LSB first) goes into cell 0 of every register,
    /// followed by one regular clock, before bit `i + 1` is read.
    fn mix_bits(&mut self, value: u64, width: usize) {
        for i in 0..width {
            let bit = (value >> i) & 1 == 1;
            for register in &mut self.registers {
                register.mix_low(bit);
            }
            self.clock_all();
        }
    }

    fn warm_up(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.clock_irregular();
        }
    }

    pub(crate) fn clock_all(&mut self) {
        for register in &mut self.registers {
            register.clock();
        }
    }

    /// Clocks each register whose control bit agrees with the majority of
    /// the three control bits, all sampled before any register moves.
    /// Returns which registers were clocked.
    pub(crate) fn clock_irregular(&mut self) -> [bool; 3] {
        let controls = self.registers.each_ref().map(Register::clock_control);
        let [a, b, c] = controls;
        let majority = majority(a, b, c);
        let mut clocked = [false; 3];
        for ((register, control), moved) in self
            .registers
            .iter_mut()
            .zip(controls)
            .zip(clocked.iter_mut())
        {
            if control == majority {
                register.clock();
                *moved = true;
            }
        }
        clocked
    }

    /// XOR of the three top cells.
    pub fn output_bit(&self) -> bool {
        self.registers
            .iter()
            .fold(false, |acc, register| acc ^ register.output())
    }

    /// Next `n` keystream bits; each call continues where the last stopped.
    pub fn generate_keystream_bits(&mut self, n: usize) -> Vec<bool> {
        trace!("generating {n} keystream bits");
        (0..n)
            .map(|_| {
                self.clock_irregular();
                self.output_bit()
            })
            .collect()
    }

    /// Next `count` keystream bytes. The first bit of each group of eight
    /// lands in bit 7 of the byte.
    pub fn generate_keystream_bytes(&mut self, count: usize) -> Vec<u8> {
        self.generate_keystream_bits(count * 8)
            .chunks_exact(8)
            .map(pack_byte)
            .collect()
    }

    /// XORs the next `buf.len()` keystream bytes into `buf`.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        let keystream = self.generate_keystream_bytes(buf.len());
        for (byte, key) in buf.iter_mut().zip(keystream) {
            *byte ^= key;
        }
    }

    /// Returns `data` XOR keystream. Decryption is the same call on an
    /// engine initialized with the same key and frame.
    pub fn encrypt(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_keystream(&mut out);
        out
    }
}

impl Drop for KeystreamEngine {
    fn drop(&mut self) {
        self.registers.zeroize();
    }
}

fn pack_byte(bits: &[bool]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
}
