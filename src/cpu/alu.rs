//! Width-polymorphic arithmetic/bitwise/compare primitives (spec §4.4).
//!
//! Every primitive here takes operands already truncated to `width`,
//! updates the five named flags on `regs` per the rules below, and returns
//! the (width-truncated) result. Bits of FLAGS other than the five named
//! ones are never touched. Arithmetic is modular at the operation width;
//! a 64-bit intermediate is used only to derive carry/overflow/the high
//! half of a product.

use crate::cpu::flags::{parity_of, CARRY, OVERFLOW, PARITY, SIGN, ZERO};
use crate::cpu::register::RegisterState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
        }
    }

    pub fn mask(self) -> u64 {
        match self {
            Width::W8 => 0xFF,
            Width::W16 => 0xFFFF,
            Width::W32 => 0xFFFF_FFFF,
        }
    }

    fn sign_bit(self) -> u64 {
        1 << (self.bits() - 1)
    }

    fn truncate(self, v: u64) -> u32 {
        (v & self.mask()) as u32
    }
}

fn set_szp(regs: &mut RegisterState, width: Width, result: u32) {
    regs.set_flag(SIGN, u64::from(result) & width.sign_bit() != 0);
    regs.set_flag(ZERO, u64::from(result) & width.mask() == 0);
    regs.set_flag(PARITY, parity_of(result));
}

/// `dst + src`. CARRY reflects unsigned wraparound regardless of `signed`
/// (matching real x86: CF is computed from the unsigned view of the
/// operands independent of how OF/the caller interprets them). OVERFLOW is
/// 0 unless `signed`, per spec §4.4.
pub fn add(regs: &mut RegisterState, width: Width, dst: u32, src: u32, signed: bool) -> u32 {
    let wide = u64::from(dst) + u64::from(src);
    let result = width.truncate(wide);

    regs.set_flag(CARRY, wide & width.mask() != wide);
    set_szp(regs, width, result);

    let overflow = if signed {
        let (d, s, r) = (u64::from(dst), u64::from(src), u64::from(result));
        (r ^ d) & (r ^ s) & width.sign_bit() != 0
    } else {
        false
    };
    regs.set_flag(OVERFLOW, overflow);

    result
}

/// `dst - src`, shared by SUB and CMP. CARRY is 1 iff `dst < src`.
pub fn sub(regs: &mut RegisterState, width: Width, dst: u32, src: u32, signed: bool) -> u32 {
    let wide = u64::from(dst).wrapping_sub(u64::from(src));
    let result = width.truncate(wide);

    regs.set_flag(CARRY, u64::from(dst) < u64::from(src));
    set_szp(regs, width, result);

    let overflow = if signed {
        let (d, s, r) = (u64::from(dst), u64::from(src), u64::from(result));
        (d ^ s) & (d ^ r) & width.sign_bit() != 0
    } else {
        false
    };
    regs.set_flag(OVERFLOW, overflow);

    result
}

/// sets flags as SUB would, discards the numeric result
pub fn cmp(regs: &mut RegisterState, width: Width, dst: u32, src: u32, signed: bool) {
    sub(regs, width, dst, src, signed);
}

fn bitwise(regs: &mut RegisterState, width: Width, result: u32) -> u32 {
    let result = width.truncate(u64::from(result));
    regs.set_flag(CARRY, false);
    regs.set_flag(OVERFLOW, false);
    set_szp(regs, width, result);
    result
}

pub fn and(regs: &mut RegisterState, width: Width, dst: u32, src: u32) -> u32 {
    bitwise(regs, width, dst & src)
}

pub fn or(regs: &mut RegisterState, width: Width, dst: u32, src: u32) -> u32 {
    bitwise(regs, width, dst | src)
}

pub fn xor(regs: &mut RegisterState, width: Width, dst: u32, src: u32) -> u32 {
    bitwise(regs, width, dst ^ src)
}

pub fn not(regs: &mut RegisterState, width: Width, dst: u32) -> u32 {
    bitwise(regs, width, !dst)
}

/// full `2*width`-bit product. Returns `(low, high)`, both already
/// truncated to `width`; the caller places them into the designated
/// accumulator (AX / EAX / EAX:EDX per spec §4.4). CARRY and OVERFLOW are
/// set iff the high half carries meaning (unsigned: high != 0; signed: the
/// product does not fit back into `width` bits); other flags are
/// unchanged.
pub fn mul(regs: &mut RegisterState, width: Width, dst: u32, src: u32, signed: bool) -> (u32, u32) {
    if signed {
        let sign_extend = |v: u32| -> i64 {
            let bits = width.bits();
            let shift = 64 - bits;
            ((v as i64) << shift) >> shift
        };
        let product = sign_extend(dst) * sign_extend(src);
        let low = width.truncate(product as u64);
        let high = width.truncate((product as u64) >> width.bits());

        let fits = product == sign_extend(low);
        regs.set_flag(CARRY, !fits);
        regs.set_flag(OVERFLOW, !fits);
        (low, high)
    } else {
        let product = u64::from(dst) * u64::from(src);
        let low = width.truncate(product);
        let high = width.truncate(product >> width.bits());

        regs.set_flag(CARRY, high != 0);
        regs.set_flag(OVERFLOW, high != 0);
        (low, high)
    }
}

#[cfg(test)]
#[path = "./alu_test.rs"]
mod alu_test;
