use std::fmt;

/// Number of nanotons in one TON.
pub const NANO_PER_TON: u128 = 1_000_000_000;

/// A coin amount in nanotons.
///
/// Display renders a decimal TON string with trailing zeros trimmed; the
/// wire form is always the 16-byte-limited varuint written by
/// [`CellBuilder::store_coins`](crate::CellBuilder::store_coins).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coins(u128);

impl Coins {
    pub const ZERO: Self = Self(0);

    pub const fn from_nano(nano: u128) -> Self {
        Self(nano)
    }

    pub const fn from_tons(tons: u64) -> Self {
        Self(tons as u128 * NANO_PER_TON)
    }

    pub const fn nano(self) -> u128 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_mul(self, factor: u128) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// Approximate value as a floating TON count, for display math only.
    pub fn as_tons_f64(self) -> f64 {
        self.0 as f64 / NANO_PER_TON as f64
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / NANO_PER_TON;
        let frac = self.0 % NANO_PER_TON;
        if frac == 0 {
            return write!(f, "{int}");
        }
        let frac = format!("{frac:09}");
        write!(f, "{int}.{}", frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Coins::from_nano(1_000_000_000).to_string(), "1");
        assert_eq!(Coins::from_nano(1_050_000_000).to_string(), "1.05");
        assert_eq!(Coins::from_nano(5_000_000).to_string(), "0.005");
        assert_eq!(Coins::from_nano(1).to_string(), "0.000000001");
        assert_eq!(Coins::ZERO.to_string(), "0");
    }

    #[test]
    fn from_tons_scales() {
        assert_eq!(Coins::from_tons(2), Coins::from_nano(2_000_000_000));
    }
}
