//! # Resource Quantities
//!
//! Parses human-written resource quantities (`"500Mi"`, `"2Gi"`, `"64m"`,
//! `"2000M"`, `"0.5"`) into a single canonical [`Magnitude`] so that values
//! written in different unit systems compare correctly.
//!
//! ## Grammar
//!
//! ```text
//! quantity := sign? digits ( "." digits? )? suffix?
//!           | sign? "." digits suffix?
//! sign     := "+" | "-"
//! suffix   := "Ki" | "Mi" | "Gi" | "Ti" | "Pi" | "Ei"      (powers of 1024)
//!           | "m" | "k" | "M" | "G" | "T" | "P" | "E"      (powers of 1000)
//! ```
//!
//! No whitespace is accepted anywhere, including around the text.
//!
//! ## Suffix Resolution
//!
//! The trailing alphabetic token is looked up whole in [`SUFFIX_TABLE`],
//! which lists binary suffixes before the decimal suffixes whose letters
//! they share. `"1Gi"` therefore always resolves to gibibytes and never to
//! giga followed by a stray `i`.
//!
//! ## Canonical Form
//!
//! `magnitude = number × suffix factor × family factor`, expressed in the
//! family's base unit (millicores for CPU, bytes for memory). An unsuffixed
//! CPU value means whole cores; `m` always means one thousandth.

use std::cmp::Ordering;
use std::fmt;

use crate::error::QuantityError;
use crate::family::UnitFamily;

/// A recognised unit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSuffix {
    /// `m`: 10^-3.
    Milli,
    /// No suffix: 1.
    Unit,
    /// `k`: 10^3.
    Kilo,
    /// `M`: 10^6.
    Mega,
    /// `G`: 10^9.
    Giga,
    /// `T`: 10^12.
    Tera,
    /// `P`: 10^15.
    Peta,
    /// `E`: 10^18.
    Exa,
    /// `Ki`: 2^10.
    Kibi,
    /// `Mi`: 2^20.
    Mebi,
    /// `Gi`: 2^30.
    Gibi,
    /// `Ti`: 2^40.
    Tebi,
    /// `Pi`: 2^50.
    Pebi,
    /// `Ei`: 2^60.
    Exbi,
}

/// Suffix tokens in resolution priority order: binary before decimal.
pub const SUFFIX_TABLE: &[(&str, UnitSuffix)] = &[
    ("Ki", UnitSuffix::Kibi),
    ("Mi", UnitSuffix::Mebi),
    ("Gi", UnitSuffix::Gibi),
    ("Ti", UnitSuffix::Tebi),
    ("Pi", UnitSuffix::Pebi),
    ("Ei", UnitSuffix::Exbi),
    ("m", UnitSuffix::Milli),
    ("k", UnitSuffix::Kilo),
    ("M", UnitSuffix::Mega),
    ("G", UnitSuffix::Giga),
    ("T", UnitSuffix::Tera),
    ("P", UnitSuffix::Peta),
    ("E", UnitSuffix::Exa),
];

impl UnitSuffix {
    /// Resolve a suffix token. The empty token is [`UnitSuffix::Unit`].
    pub fn from_token(token: &str) -> Option<Self> {
        if token.is_empty() {
            return Some(Self::Unit);
        }
        SUFFIX_TABLE
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, suffix)| *suffix)
    }

    /// The token as written in a manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Milli => "m",
            Self::Unit => "",
            Self::Kilo => "k",
            Self::Mega => "M",
            Self::Giga => "G",
            Self::Tera => "T",
            Self::Peta => "P",
            Self::Exa => "E",
            Self::Kibi => "Ki",
            Self::Mebi => "Mi",
            Self::Gibi => "Gi",
            Self::Tebi => "Ti",
            Self::Pebi => "Pi",
            Self::Exbi => "Ei",
        }
    }

    /// Returns true for the powers-of-1024 suffixes.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Self::Kibi | Self::Mebi | Self::Gibi | Self::Tebi | Self::Pebi | Self::Exbi
        )
    }

    /// Integer multiplier and extra decimal scale applied by this suffix.
    ///
    /// Milli is the only suffix that divides, which it does by raising the
    /// scale rather than by producing a fraction.
    fn factor(&self) -> (i128, u32) {
        match self {
            Self::Milli => (1, 3),
            Self::Unit => (1, 0),
            Self::Kilo => (1_000, 0),
            Self::Mega => (1_000_000, 0),
            Self::Giga => (1_000_000_000, 0),
            Self::Tera => (1_000_000_000_000, 0),
            Self::Peta => (1_000_000_000_000_000, 0),
            Self::Exa => (1_000_000_000_000_000_000, 0),
            Self::Kibi => (1 << 10, 0),
            Self::Mebi => (1 << 20, 0),
            Self::Gibi => (1 << 30, 0),
            Self::Tebi => (1 << 40, 0),
            Self::Pebi => (1 << 50, 0),
            Self::Exbi => (1 << 60, 0),
        }
    }
}

impl fmt::Display for UnitSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exact decimal amount of a family's base unit: `mantissa × 10^-scale`.
///
/// Always stored normalised (no trailing zero digits while `scale > 0`), so
/// equal amounts have equal representations and the derived `Eq` and `Hash`
/// agree with [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Magnitude {
    mantissa: i128,
    scale: u32,
}

impl Magnitude {
    /// Zero base units.
    pub const ZERO: Magnitude = Magnitude {
        mantissa: 0,
        scale: 0,
    };

    /// Build a normalised magnitude.
    pub fn new(mantissa: i128, scale: u32) -> Self {
        let mut m = Self { mantissa, scale };
        while m.scale > 0 && m.mantissa % 10 == 0 {
            m.mantissa /= 10;
            m.scale -= 1;
        }
        if m.mantissa == 0 {
            m.scale = 0;
        }
        m
    }

    /// The integer digits of the amount.
    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Number of decimal places the mantissa is shifted by.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns true if the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }
}

impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => self.mantissa.cmp(&other.mantissa),
            Ordering::Less => {
                compare_shifted(self.mantissa, other.scale - self.scale, other.mantissa)
            }
            Ordering::Greater => {
                compare_shifted(other.mantissa, self.scale - other.scale, self.mantissa).reverse()
            }
        }
    }
}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare `a × 10^shift` against `b`.
fn compare_shifted(a: i128, shift: u32, b: i128) -> Ordering {
    if a == 0 {
        return 0i128.cmp(&b);
    }
    match 10i128.checked_pow(shift).and_then(|f| a.checked_mul(f)) {
        Some(shifted) => shifted.cmp(&b),
        // |a × 10^shift| no longer fits in i128, so it outweighs any b.
        None if a < 0 => Ordering::Less,
        None => Ordering::Greater,
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int}.{frac}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

/// A parsed resource quantity.
///
/// Constructed once per comparison request and never modified. Two
/// quantities are comparable only if they share a [`UnitFamily`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    raw: String,
    family: UnitFamily,
    number: String,
    suffix: UnitSuffix,
    magnitude: Magnitude,
}

impl Quantity {
    /// Parse `text` as a quantity of the given family.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Malformed`] if the numeric part is not a
    /// plain decimal number, the suffix is not in [`SUFFIX_TABLE`], the text
    /// carries whitespace, or the canonical magnitude overflows.
    pub fn parse(text: &str, family: UnitFamily) -> Result<Self, QuantityError> {
        if text.is_empty() {
            return Err(QuantityError::malformed(text, "empty quantity"));
        }

        let number_text = text.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let token = &text[number_text.len()..];
        let suffix = UnitSuffix::from_token(token).ok_or_else(|| {
            QuantityError::malformed(text, format!("unknown unit suffix {token:?}"))
        })?;

        let number = DecimalText::parse(number_text)
            .ok_or_else(|| QuantityError::malformed(text, "invalid numeric value"))?;

        let overflow = || QuantityError::malformed(text, "value out of range");
        let (suffix_factor, suffix_scale) = suffix.factor();
        let mut mantissa = number.digits_value().ok_or_else(overflow)?;
        mantissa = mantissa
            .checked_mul(suffix_factor)
            .and_then(|m| m.checked_mul(family.base_factor()))
            .ok_or_else(overflow)?;
        if number.negative {
            mantissa = -mantissa;
        }
        let scale = number.frac.len() as u32 + suffix_scale;

        Ok(Self {
            raw: text.to_string(),
            family,
            number: number.normalized(),
            suffix,
            magnitude: Magnitude::new(mantissa, scale),
        })
    }

    /// Order two quantities by canonical magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::UnitFamilyMismatch`] if the families differ.
    pub fn compare(&self, other: &Quantity) -> Result<Ordering, QuantityError> {
        if self.family != other.family {
            return Err(QuantityError::UnitFamilyMismatch {
                left: self.family,
                right: other.family,
            });
        }
        Ok(self.magnitude.cmp(&other.magnitude))
    }

    /// Canonical display: the normalised number followed by the suffix as
    /// written (`"+01.50Gi"` formats as `"1.5Gi"`).
    ///
    /// The unit is never recomputed, so a bound written in `Gi` is shown in
    /// `Gi`. Parsing the output yields the same magnitude.
    pub fn format(&self) -> String {
        format!("{}{}", self.number, self.suffix.as_str())
    }

    /// The text exactly as it was parsed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The family this quantity was parsed for.
    pub fn family(&self) -> UnitFamily {
        self.family
    }

    /// The normalised numeric part, without suffix.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The unit suffix as written.
    pub fn suffix(&self) -> UnitSuffix {
        self.suffix
    }

    /// The canonical magnitude in the family's base unit.
    pub fn magnitude(&self) -> Magnitude {
        self.magnitude
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// The numeric part of a quantity, split but not yet scaled.
struct DecimalText<'a> {
    negative: bool,
    int: &'a str,
    frac: &'a str,
}

impl<'a> DecimalText<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (int, frac) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (unsigned, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
            return None;
        }
        Some(Self {
            negative,
            int,
            frac,
        })
    }

    /// Integer value of all digits with the decimal point removed.
    fn digits_value(&self) -> Option<i128> {
        self.int
            .bytes()
            .chain(self.frac.bytes())
            .try_fold(0i128, |acc, b| {
                acc.checked_mul(10)?.checked_add(i128::from(b - b'0'))
            })
    }

    fn normalized(&self) -> String {
        let int = self.int.trim_start_matches('0');
        let frac = self.frac.trim_end_matches('0');
        let int = if int.is_empty() { "0" } else { int };
        let is_zero = int == "0" && frac.is_empty();
        let sign = if self.negative && !is_zero { "-" } else { "" };
        if frac.is_empty() {
            format!("{sign}{int}")
        } else {
            format!("{sign}{int}.{frac}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem(s: &str) -> Quantity {
        Quantity::parse(s, UnitFamily::Memory).unwrap()
    }

    fn cpu(s: &str) -> Quantity {
        Quantity::parse(s, UnitFamily::Cpu).unwrap()
    }

    // ---- suffix resolution ----

    #[test]
    fn test_binary_suffix_wins_over_decimal() {
        assert_eq!(mem("1Gi").suffix(), UnitSuffix::Gibi);
        assert_eq!(mem("1G").suffix(), UnitSuffix::Giga);
        assert_eq!(mem("1Mi").magnitude(), Magnitude::new(1 << 20, 0));
        assert_eq!(mem("1M").magnitude(), Magnitude::new(1_000_000, 0));
    }

    #[test]
    fn test_suffix_table_roundtrip() {
        for (token, suffix) in SUFFIX_TABLE {
            assert_eq!(UnitSuffix::from_token(token), Some(*suffix));
            assert_eq!(suffix.as_str(), *token);
        }
        assert_eq!(UnitSuffix::from_token(""), Some(UnitSuffix::Unit));
        assert_eq!(UnitSuffix::from_token("gi"), None);
    }

    #[test]
    fn test_unknown_suffix_rejected() {
        let err = Quantity::parse("64Q", UnitFamily::Memory).unwrap_err();
        assert!(matches!(err, QuantityError::Malformed { .. }));
        assert!(err.to_string().contains("unknown unit suffix"));
        assert!(Quantity::parse("1Gib", UnitFamily::Memory).is_err());
        assert!(Quantity::parse("1KI", UnitFamily::Memory).is_err());
    }

    // ---- numeric syntax ----

    #[test]
    fn test_zero_without_suffix() {
        assert_eq!(mem("0").magnitude(), Magnitude::ZERO);
        assert_eq!(cpu("0").magnitude(), Magnitude::ZERO);
    }

    #[test]
    fn test_signs_and_fractions() {
        assert_eq!(mem("+5").magnitude(), Magnitude::new(5, 0));
        assert!(mem("-5").magnitude().is_negative());
        assert_eq!(mem("1.5Ki").magnitude(), Magnitude::new(1536, 0));
        assert_eq!(mem(".5k").magnitude(), Magnitude::new(500, 0));
        assert_eq!(mem("5.").magnitude(), Magnitude::new(5, 0));
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        for bad in ["", "Mi", "1.2.3", "--1", "+", ".", "1,5", "0x10", "1e3"] {
            let result = Quantity::parse(bad, UnitFamily::Memory);
            assert!(
                matches!(result, Err(QuantityError::Malformed { .. })),
                "{bad:?} should be malformed, got {result:?}"
            );
        }
    }

    #[test]
    fn test_whitespace_rejected() {
        for bad in [" 1Gi", "1Gi ", "1 Gi", "\t1"] {
            assert!(Quantity::parse(bad, UnitFamily::Memory).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_overflow_rejected() {
        let err = Quantity::parse("999999999999999999999999999Ei", UnitFamily::Memory).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    // ---- CPU ----

    #[test]
    fn test_cpu_milli_equals_fractional_core() {
        assert_eq!(cpu("500m").magnitude(), cpu("0.5").magnitude());
        assert_eq!(cpu("1").magnitude(), Magnitude::new(1000, 0));
        assert_eq!(cpu("250m").magnitude(), Magnitude::new(250, 0));
    }

    #[test]
    fn test_cpu_fraction_of_millicore() {
        let q = cpu("0.0005");
        assert_eq!(q.magnitude(), Magnitude::new(5, 1));
        assert_eq!(q.magnitude().to_string(), "0.5");
    }

    // ---- comparison ----

    #[test]
    fn test_cross_unit_equality() {
        assert_eq!(mem("1Gi").compare(&mem("1024Mi")).unwrap(), Ordering::Equal);
        assert_eq!(mem("1k").compare(&mem("1000")).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_cross_unit_ordering() {
        assert_eq!(mem("2000M").compare(&mem("1Gi")).unwrap(), Ordering::Greater);
        assert_eq!(mem("1G").compare(&mem("1Gi")).unwrap(), Ordering::Less);
        assert_eq!(mem("256m").compare(&mem("64m")).unwrap(), Ordering::Greater);
        assert_eq!(cpu("500Mi").compare(&cpu("100m")).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_compare_negative() {
        assert_eq!(mem("-1Gi").compare(&mem("0")).unwrap(), Ordering::Less);
        assert_eq!(mem("-1Gi").compare(&mem("-1G")).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_family_mismatch() {
        let err = cpu("1").compare(&mem("1")).unwrap_err();
        assert_eq!(
            err,
            QuantityError::UnitFamilyMismatch {
                left: UnitFamily::Cpu,
                right: UnitFamily::Memory,
            }
        );
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_magnitude_ordering_across_scales() {
        assert!(Magnitude::new(1, 3) < Magnitude::new(1, 0));
        assert!(Magnitude::new(1001, 3) > Magnitude::new(1, 0));
        assert_eq!(Magnitude::new(1000, 3), Magnitude::new(1, 0));
        assert!(Magnitude::new(i128::MAX, 0) > Magnitude::new(1, 30));
        assert!(Magnitude::new(i128::MIN, 0) < Magnitude::new(-1, 30));
        assert!(Magnitude::new(0, 0) > Magnitude::new(-1, 40));
    }

    // ---- formatting ----

    #[test]
    fn test_format_keeps_original_unit() {
        assert_eq!(mem("1Gi").format(), "1Gi");
        assert_eq!(mem("64m").format(), "64m");
        assert_eq!(mem("+01.50Gi").format(), "1.5Gi");
        assert_eq!(mem("-0").format(), "0");
        assert_eq!(cpu("0.500").format(), "0.5");
    }

    #[test]
    fn test_format_roundtrip_examples() {
        for s in ["1Gi", "2000M", "64m", "0", "0.25", "+3k", "-7Ei", "007.100Mi"] {
            let q = mem(s);
            let again = mem(&q.format());
            assert_eq!(q.magnitude(), again.magnitude(), "{s}");
        }
    }

    #[test]
    fn test_magnitude_display() {
        assert_eq!(Magnitude::new(1536, 0).to_string(), "1536");
        assert_eq!(Magnitude::new(-15, 1).to_string(), "-1.5");
        assert_eq!(Magnitude::new(5, 3).to_string(), "0.005");
    }

    #[test]
    fn test_raw_preserved() {
        let q = mem("+01.50Gi");
        assert_eq!(q.raw(), "+01.50Gi");
        assert_eq!(q.number(), "1.5");
        assert_eq!(q.family(), UnitFamily::Memory);
    }
}
