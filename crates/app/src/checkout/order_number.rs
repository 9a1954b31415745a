//! Order numbers: `PE`, the order date as `YYYYMMDD`, and a random four digit suffix.

use std::fmt;

use jiff::{Zoned, civil::Date};
use rand::Rng;

/// Prefix every order number starts with.
pub const ORDER_NUMBER_PREFIX: &str = "PE";

/// Human-readable order number, e.g. `PE202501011234`.
///
/// Not globally unique; the store's unique constraint catches collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Order number for `date` with a random suffix in `1000..=9999`.
    #[must_use]
    pub fn generate(date: Date, rng: &mut impl Rng) -> Self {
        let suffix: u16 = rng.gen_range(1000..10_000);

        Self(format!(
            "{ORDER_NUMBER_PREFIX}{:04}{:02}{:02}{suffix}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// Order number for today in the system time zone.
    #[must_use]
    pub fn today() -> Self {
        Self::generate(Zoned::now().date(), &mut rand::thread_rng())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn has_order_number_shape(number: &str) -> bool {
        number.len() == 14
            && number.starts_with(ORDER_NUMBER_PREFIX)
            && number.chars().skip(2).all(|c| c.is_ascii_digit())
    }

    #[test]
    fn generate_embeds_date_and_suffix() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let number = OrderNumber::generate(date(2025, 1, 1), &mut rng);

            assert!(has_order_number_shape(number.as_str()), "bad shape {number}");
            assert!(number.as_str().starts_with("PE20250101"), "bad date {number}");

            let suffix: u16 = number.as_str().chars().skip(10).collect::<String>().parse().unwrap_or(0);

            assert!((1000..10_000).contains(&suffix), "bad suffix {number}");
        }
    }

    #[test]
    fn today_has_order_number_shape() {
        let number = OrderNumber::today();

        assert!(has_order_number_shape(number.as_str()), "bad shape {number}");
    }
}
