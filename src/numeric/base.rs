//! Integer to prefixed base string conversion

use std::collections::VecDeque;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary,
    Octal,
    Hex,
}

impl Base {
    pub const fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Hex => 16,
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Binary => "0b",
            Self::Octal => "0o",
            Self::Hex => "0x",
        }
    }
}

/// Sign, base marker, then digits most significant first
///
/// Digits are produced least significant first by repeated division and
/// prepended, so no reverse pass is needed.
pub fn convert_to_base(n: i64, base: Base) -> String {
    let radix = u64::from(base.radix());
    let mut magnitude = n.unsigned_abs();
    let mut digits: VecDeque<u8> = VecDeque::with_capacity(64);

    if magnitude == 0 {
        digits.push_front(b'0');
    }
    while magnitude > 0 {
        digits.push_front(DIGITS[(magnitude % radix) as usize]);
        magnitude /= radix;
    }

    let mut out = String::with_capacity(digits.len() + 3);
    if n < 0 {
        out.push('-');
    }
    out.push_str(base.prefix());
    out.extend(digits.into_iter().map(char::from));
    out
}

/// Same result through the standard formatter
pub fn convert_to_base_native(n: i64, base: Base) -> String {
    let sign = if n < 0 { "-" } else { "" };
    let magnitude = n.unsigned_abs();
    match base {
        Base::Binary => format!("{}{:#b}", sign, magnitude),
        Base::Octal => format!("{}{:#o}", sign, magnitude),
        Base::Hex => format!("{}{:#x}", sign, magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_renders_single_digit() {
        assert_eq!(convert_to_base(0, Base::Binary), "0b0");
        assert_eq!(convert_to_base(0, Base::Octal), "0o0");
        assert_eq!(convert_to_base(0, Base::Hex), "0x0");
    }

    #[test]
    fn test_sign_precedes_prefix() {
        assert_eq!(convert_to_base(-5, Base::Binary), "-0b101");
        assert_eq!(convert_to_base(-8, Base::Octal), "-0o10");
        assert_eq!(convert_to_base(-255, Base::Hex), "-0xff");
    }

    #[test]
    fn test_extremes() {
        assert_eq!(convert_to_base(i64::MAX, Base::Hex), "0x7fffffffffffffff");
        assert_eq!(convert_to_base(i64::MIN, Base::Hex), "-0x8000000000000000");
    }

    #[test]
    fn test_native_twin_agrees() {
        // `{:#o}` renders as `0o..`, matching the hand-rolled marker
        for n in [-1024, -7, -1, 0, 1, 7, 42, 1 << 40, i64::MIN, i64::MAX] {
            for base in [Base::Binary, Base::Octal, Base::Hex] {
                assert_eq!(convert_to_base(n, base), convert_to_base_native(n, base));
            }
        }
    }
}
