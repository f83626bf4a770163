//! Checkout pricing: base total, discount, tip, and currency formatting.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

use super::selection::SelectionSet;
use crate::error::{AppError, Result};
use crate::models::LineItem;

/// Checked discount figure.
///
/// Only [`DiscountSpec::percentage`] and [`DiscountSpec::fixed`] build one,
/// so a discount held anywhere is always within its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountValue(Decimal);

impl DiscountValue {
    pub fn get(self) -> Decimal {
        self.0
    }
}

/// Discount applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountSpec {
    #[default]
    None,
    /// Percent of the base total, 0-100.
    Percentage(DiscountValue),
    /// Flat amount off, never negative.
    FixedAmount(DiscountValue),
}

impl DiscountSpec {
    pub fn percentage(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(AppError::validation("Percentage discount must be between 0 and 100"));
        }
        Ok(Self::Percentage(DiscountValue(value)))
    }

    pub fn fixed(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(AppError::validation("Discount amount cannot be negative"));
        }
        Ok(Self::FixedAmount(DiscountValue(value)))
    }

    /// Build from a discount type name and a value.
    ///
    /// The value is ignored for `"none"`.
    pub fn from_kind(kind: &str, value: Decimal) -> Result<Self> {
        match kind {
            "none" => Ok(Self::None),
            "percentage" => Self::percentage(value),
            "fixed" => Self::fixed(value),
            other => Err(AppError::validation(format!("Unknown discount type: {other}"))),
        }
    }

    /// Wire name of the discount type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Percentage(_) => "percentage",
            Self::FixedAmount(_) => "fixed",
        }
    }

    /// Entered value; zero for `None`.
    pub fn value(&self) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::Percentage(v) | Self::FixedAmount(v) => v.get(),
        }
    }

    /// Amount taken off `base`.
    pub fn amount(&self, base: Decimal) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::Percentage(p) => base * p.get() / Decimal::ONE_HUNDRED,
            Self::FixedAmount(f) => f.get(),
        }
    }
}

/// Parses `none`, `percent:<v>` (or `percentage:<v>`), and `fixed:<v>`.
impl FromStr for DiscountSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }

        let (kind, raw) = s
            .split_once(':')
            .ok_or_else(|| AppError::parse(format!("Invalid discount '{s}', expected kind:value")))?;
        let value = Decimal::from_str(raw.trim())
            .map_err(|e| AppError::parse(format!("Invalid discount value '{raw}': {e}")))?;

        match kind.trim().to_ascii_lowercase().as_str() {
            "percent" | "percentage" => Self::percentage(value),
            "fixed" => Self::fixed(value),
            other => Err(AppError::parse(format!("Unknown discount type: {other}"))),
        }
    }
}

/// Sum of prices of the selected items. Unknown ids add nothing.
pub fn selected_total(items: &[LineItem], selected: &SelectionSet) -> Decimal {
    items
        .iter()
        .filter(|item| selected.contains(&item.id))
        .map(|item| item.price)
        .sum()
}

/// Itemised checkout total.
///
/// `total` is not clamped: a fixed discount larger than the base makes it
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base: Decimal,
    pub discount: Decimal,
    pub tip: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn new(base: Decimal, discount: &DiscountSpec, tip: Decimal) -> Self {
        let discount = discount.amount(base);
        Self {
            base,
            discount,
            tip,
            total: base - discount + tip,
        }
    }

    /// Price the current selections against the loaded catalog.
    pub fn compute(
        services: &[LineItem],
        selected_services: &SelectionSet,
        products: &[LineItem],
        selected_products: &SelectionSet,
        discount: &DiscountSpec,
        tip: Decimal,
    ) -> Self {
        let base = selected_total(services, selected_services) + selected_total(products, selected_products);
        Self::new(base, discount, tip)
    }
}

/// Renders money for display.
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: Decimal) -> String;
}

/// Symbol-prefixed, comma-grouped, two decimal places: `-$1,234.50`.
#[derive(Debug, Clone)]
pub struct CurrencyFormat {
    symbol: String,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("$")
    }
}

impl CurrencyFormatter for CurrencyFormat {
    fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let mut abs = rounded.abs();
        abs.rescale(2);
        let text = abs.to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let sign = if negative { "-" } else { "" };
        format!("{sign}{}{}.{frac_part}", self.symbol, group_thousands(int_part))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = CurrencyFormat::default();
        write!(
            f,
            "base {} - discount {} + tip {} = {}",
            money.format(self.base),
            money.format(self.discount),
            money.format(self.tip),
            money.format(self.total)
        )
    }
}
