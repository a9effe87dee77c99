//! Fixed-point currency amounts.

use std::fmt;

/// An exact currency amount stored in minor units.
///
/// `$12.50` is `Money { amount: 1250, currency: "USD", scale: 2 }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Money {
    /// Amount in the smallest unit (cents for USD at scale 2).
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Number of decimal places carried by `amount`.
    pub scale: u8,
}

impl Money {
    pub fn new(amount: i64, currency: impl Into<String>, scale: u8) -> Self {
        Money {
            amount,
            currency: currency.into(),
            scale,
        }
    }

    /// The amount expressed at a larger scale, or `None` on overflow.
    ///
    /// Scales never shrink: asking for a smaller scale returns the amount
    /// unchanged.
    pub fn amount_at_scale(&self, scale: u8) -> Option<i64> {
        if scale <= self.scale {
            return Some(self.amount);
        }
        let factor = 10_i64.checked_pow(u32::from(scale - self.scale))?;
        self.amount.checked_mul(factor)
    }

    /// Approximate decimal value, for display and float interop only.
    #[expect(clippy::cast_precision_loss, reason = "display-only conversion")]
    pub fn to_f64(&self) -> f64 {
        self.amount as f64 / 10_f64.powi(i32::from(self.scale))
    }

    /// Short symbol for the common currencies.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self.currency.as_str() {
            "USD" => "$",
            "GBP" => "£",
            "EUR" => "€",
            "JPY" => "¥",
            "CAD" => "CA$",
            "AUD" => "AU$",
            "HKD" => "HK$",
            "SGD" => "S$",
            "CNY" => "CN¥",
            _ => return None,
        };
        Some(symbol)
    }

    /// The amount with exactly `scale` decimals and no currency marker.
    pub fn format_amount(&self) -> String {
        if self.scale == 0 {
            return self.amount.to_string();
        }
        let Some(divisor) = 10_u64.checked_pow(u32::from(self.scale)) else {
            return self.amount.to_string();
        };
        let magnitude = self.amount.unsigned_abs();
        let sign = if self.amount < 0 { "-" } else { "" };
        format!(
            "{sign}{}.{:0width$}",
            magnitude / divisor,
            magnitude % divisor,
            width = usize::from(self.scale)
        )
    }
}

/// `$12.50` for known currencies, `CHF#12.50` otherwise.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => write!(f, "{symbol}{}", self.format_amount()),
            None => write!(f, "{}#{}", self.currency, self.format_amount()),
        }
    }
}

/// Round half to even.
///
/// Returns `None` when `x` is not finite or the result does not fit in an
/// `i64`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast"
)]
pub fn bankers_round(x: f64) -> Option<i64> {
    // 2^63: the first float past i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !x.is_finite() {
        return None;
    }
    let whole = x.floor();
    if whole < -LIMIT || whole >= LIMIT {
        return None;
    }
    let frac = x - whole;
    let whole = whole as i64;
    if frac < 0.5 {
        Some(whole)
    } else if frac > 0.5 || whole % 2 != 0 {
        whole.checked_add(1)
    } else {
        Some(whole)
    }
}
