//! # Price Grammar
//!
//! Underground records carry a compact, human readable price string next to
//! the canonical `amount` it stands for:
//!
//! ```text
//! PRICE     := COMPONENT (" x " COMPONENT)?
//! "100"            -> 100        direct stake only
//! "100 x 50"       -> 150        direct + tod, summed
//! "100 x กลับ 3"   -> 300        direct times 3
//! "100 x กลับ 6"   -> 600        direct times 6
//! ```
//!
//! [`Price`] is the structured form. `Display` encodes it, `FromStr` is the
//! strict decoder. Data written by older versions goes through
//! [`Price::parse_lenient`] / [`decode_amount`], which never reject a string
//! whose direct stake is readable.

use crate::error::Rejection;
use std::fmt;
use std::str::FromStr;

pub const SEPARATOR: &str = " x ";
pub const REVERSED_3: &str = "กลับ 3";
pub const REVERSED_6: &str = "กลับ 6";

/// Reversed-number multiplier ("กลับ").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reversal {
    Three,
    Six,
}

impl Reversal {
    pub fn multiplier(&self) -> u64 {
        match self {
            Reversal::Three => 3,
            Reversal::Six => 6,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Reversal::Three => REVERSED_3,
            Reversal::Six => REVERSED_6,
        }
    }

    fn from_token(s: &str) -> Option<Self> {
        match s {
            REVERSED_3 => Some(Reversal::Three),
            REVERSED_6 => Some(Reversal::Six),
            _ => None,
        }
    }
}

impl FromStr for Reversal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3" | "ก.3" | REVERSED_3 => Ok(Reversal::Three),
            "6" | "ก.6" | REVERSED_6 => Ok(Reversal::Six),
            other => Err(format!("Unknown reversal '{}' (expected 3 or 6)", other)),
        }
    }
}

/// The optional second component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Secondary {
    None,
    Tod(u64),
    Reversed(Reversal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    direct: u64,
    secondary: Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    Empty,
    InvalidDirect(String),
    InvalidSecondary(String),
    TooManyComponents,
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceError::Empty => write!(f, "price is empty"),
            PriceError::InvalidDirect(s) => write!(f, "invalid direct stake '{}'", s),
            PriceError::InvalidSecondary(s) => write!(f, "invalid second component '{}'", s),
            PriceError::TooManyComponents => write!(f, "too many price components"),
        }
    }
}

impl std::error::Error for PriceError {}

impl Price {
    pub fn new(direct: u64, secondary: Secondary) -> Result<Self, Rejection> {
        if direct == 0 {
            return Err(Rejection::NonPositivePrice);
        }
        if secondary == Secondary::Tod(0) {
            return Err(Rejection::NonPositiveTod);
        }
        Ok(Self { direct, secondary })
    }

    /// Builds a price from the entry form fields.
    ///
    /// A reversal choice replaces whatever was typed into the tod field.
    /// A blank tod field means "direct only".
    pub fn from_form(
        direct: &str,
        tod: Option<&str>,
        reversal: Option<Reversal>,
    ) -> Result<Self, Rejection> {
        let direct = direct.trim();
        if direct.is_empty() {
            return Err(Rejection::MissingPrice);
        }
        let direct = parse_strict(direct).ok_or(Rejection::NonPositivePrice)?;

        let secondary = match (reversal, tod.map(str::trim)) {
            (Some(r), _) => Secondary::Reversed(r),
            (None, None) | (None, Some("")) => Secondary::None,
            (None, Some(t)) => Secondary::Tod(parse_strict(t).ok_or(Rejection::NonPositiveTod)?),
        };

        Self::new(direct, secondary)
    }

    pub fn direct(&self) -> u64 {
        self.direct
    }

    pub fn secondary(&self) -> Secondary {
        self.secondary
    }

    /// Canonical monetary total.
    pub fn amount(&self) -> u64 {
        match self.secondary {
            Secondary::None => self.direct,
            Secondary::Tod(t) => self.direct.saturating_add(t),
            Secondary::Reversed(r) => self.direct.saturating_mul(r.multiplier()),
        }
    }

    /// Decoder for stored legacy strings.
    ///
    /// Returns `None` only when the direct stake is unreadable. A second
    /// component that is neither a number nor a reversal token is dropped,
    /// as is everything after a third separator.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let direct = parse_leading_int(parts[0])?;

        let secondary = if parts.len() == 2 {
            let second = parts[1].trim();
            match Reversal::from_token(second) {
                Some(r) => Secondary::Reversed(r),
                None => match parse_leading_int(second) {
                    Some(t) => Secondary::Tod(t),
                    None => Secondary::None,
                },
            }
        } else {
            Secondary::None
        };

        Some(Self { direct, secondary })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary {
            Secondary::None => write!(f, "{}", self.direct),
            Secondary::Tod(t) => write!(f, "{}{}{}", self.direct, SEPARATOR, t),
            Secondary::Reversed(r) => write!(f, "{}{}{}", self.direct, SEPARATOR, r.token()),
        }
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PriceError::Empty);
        }
        let mut parts = s.split(SEPARATOR);
        let first = parts.next().unwrap_or_default();
        let direct = parse_strict(first).ok_or_else(|| PriceError::InvalidDirect(first.into()))?;

        let secondary = match parts.next() {
            None => Secondary::None,
            Some(second) => match Reversal::from_token(second) {
                Some(r) => Secondary::Reversed(r),
                None => Secondary::Tod(
                    parse_strict(second)
                        .ok_or_else(|| PriceError::InvalidSecondary(second.into()))?,
                ),
            },
        };

        if parts.next().is_some() {
            return Err(PriceError::TooManyComponents);
        }

        Ok(Self { direct, secondary })
    }
}

/// Amount for a stored price string; 0 when the direct stake is unreadable.
pub fn decode_amount(price: &str) -> u64 {
    Price::parse_lenient(price).map(|p| p.amount()).unwrap_or(0)
}

/// All-digit positive integer.
fn parse_strict(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|n| *n > 0)
}

/// Leading digit run after trimming, like the old `parseInt`. Must be positive.
fn parse_leading_int(s: &str) -> Option<u64> {
    let s = s.trim();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_direct_only() {
        let p = Price::from_form("100", None, None).unwrap();
        assert_eq!(p.to_string(), "100");
        assert_eq!(p.amount(), 100);
    }

    #[test]
    fn encodes_reversed_three() {
        let p = Price::from_form("100", None, Some(Reversal::Three)).unwrap();
        assert_eq!(p.to_string(), "100 x กลับ 3");
        assert_eq!(p.amount(), 300);
    }

    #[test]
    fn encodes_tod() {
        let p = Price::from_form("100", Some("50"), None).unwrap();
        assert_eq!(p.to_string(), "100 x 50");
        assert_eq!(p.amount(), 150);
    }

    #[test]
    fn reversal_wins_over_typed_tod() {
        let p = Price::from_form("20", Some("999"), Some(Reversal::Six)).unwrap();
        assert_eq!(p.to_string(), "20 x กลับ 6");
        assert_eq!(p.amount(), 120);
    }

    #[test]
    fn blank_tod_means_direct_only() {
        let p = Price::from_form("40", Some("  "), None).unwrap();
        assert_eq!(p.secondary(), Secondary::None);
    }

    #[test]
    fn form_rejections() {
        assert_eq!(Price::from_form("", None, None), Err(Rejection::MissingPrice));
        assert_eq!(Price::from_form("0", None, None), Err(Rejection::NonPositivePrice));
        assert_eq!(Price::from_form("1.5", None, None), Err(Rejection::NonPositivePrice));
        assert_eq!(Price::from_form("-3", None, None), Err(Rejection::NonPositivePrice));
        assert_eq!(Price::from_form("10", Some("0"), None), Err(Rejection::NonPositiveTod));
        assert_eq!(Price::from_form("10", Some("abc"), None), Err(Rejection::NonPositiveTod));
    }

    #[test]
    fn decode_handles_every_form() {
        assert_eq!(decode_amount("100"), 100);
        assert_eq!(decode_amount("100 x 50"), 150);
        assert_eq!(decode_amount("100 x กลับ 3"), 300);
        assert_eq!(decode_amount("100 x กลับ 6"), 600);
    }

    #[test]
    fn decode_unreadable_direct_is_zero() {
        assert_eq!(decode_amount(""), 0);
        assert_eq!(decode_amount("abc"), 0);
        assert_eq!(decode_amount("abc x 50"), 0);
        assert_eq!(decode_amount("0"), 0);
    }

    #[test]
    fn decode_ignores_unknown_second_component() {
        assert_eq!(decode_amount("100 x กลับ 9"), 100);
        assert_eq!(decode_amount("100 x โต๊ด"), 100);
        assert_eq!(decode_amount("100 x 50 x 20"), 100);
    }

    #[test]
    fn decode_accepts_legacy_number_noise() {
        assert_eq!(decode_amount(" 100 "), 100);
        assert_eq!(decode_amount("100บาท x 20"), 120);
    }

    #[test]
    fn strict_parser_rejects_what_lenient_accepts() {
        assert!("100 x กลับ 9".parse::<Price>().is_err());
        assert!("100 x 50 x 20".parse::<Price>().is_err());
        assert_eq!("".parse::<Price>(), Err(PriceError::Empty));
        assert!(Price::parse_lenient("100 x กลับ 9").is_some());
    }

    fn secondary_strategy() -> impl Strategy<Value = Secondary> {
        prop_oneof![
            Just(Secondary::None),
            (1u64..1_000_000).prop_map(Secondary::Tod),
            Just(Secondary::Reversed(Reversal::Three)),
            Just(Secondary::Reversed(Reversal::Six)),
        ]
    }

    proptest! {
        #[test]
        fn encode_then_decode_preserves_amount(direct in 1u64..1_000_000, secondary in secondary_strategy()) {
            let price = Price::new(direct, secondary).unwrap();
            let encoded = price.to_string();
            prop_assert_eq!(decode_amount(&encoded), price.amount());
            prop_assert_eq!(encoded.parse::<Price>().unwrap(), price);
        }
    }
}
