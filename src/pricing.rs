//! Derived pricing: night counts and booking quotes.

use serde::{Deserialize, Serialize};
use time::Date;

/// Number of chargeable nights between two calendar dates.
///
/// Whole-day difference, with a minimum of one night: same-day or
/// inverted ranges still charge a single night.
pub fn nights(check_in: Date, check_out: Date) -> i64 {
    (check_out - check_in).whole_days().max(1)
}

/// A priced stay: nightly rate times nights, plus fixed fees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingQuote {
    /// Price per night in the listing's currency.
    pub nightly_rate: f64,
    /// Chargeable nights (always >= 1).
    pub nights: i64,
    /// Fixed platform fee per booking.
    pub service_fee: f64,
    /// Fixed cleaning fee per booking.
    pub cleaning_fee: f64,
}

impl BookingQuote {
    /// Create a quote with no fees.
    pub fn new(nightly_rate: f64, nights: i64) -> Self {
        Self {
            nightly_rate,
            nights: nights.max(1),
            service_fee: 0.0,
            cleaning_fee: 0.0,
        }
    }

    /// Quote a stay between two dates.
    pub fn for_stay(nightly_rate: f64, check_in: Date, check_out: Date) -> Self {
        Self::new(nightly_rate, nights(check_in, check_out))
    }

    /// Set the service fee.
    pub fn with_service_fee(mut self, fee: f64) -> Self {
        self.service_fee = fee;
        self
    }

    /// Set the cleaning fee.
    pub fn with_cleaning_fee(mut self, fee: f64) -> Self {
        self.cleaning_fee = fee;
        self
    }

    /// Nightly rate times nights, before fees.
    pub fn lodging_total(&self) -> f64 {
        self.nightly_rate * self.nights as f64
    }

    /// Sum of the fixed fees.
    pub fn fees_total(&self) -> f64 {
        self.service_fee + self.cleaning_fee
    }

    /// Everything: lodging plus fees.
    pub fn grand_total(&self) -> f64 {
        self.lodging_total() + self.fees_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_nights_counts_whole_days() {
        assert_eq!(nights(date!(2025 - 07 - 01), date!(2025 - 07 - 06)), 5);
        assert_eq!(nights(date!(2025 - 07 - 01), date!(2025 - 07 - 02)), 1);
    }

    #[test]
    fn test_nights_minimum_is_one() {
        assert_eq!(nights(date!(2025 - 07 - 01), date!(2025 - 07 - 01)), 1);
        assert_eq!(nights(date!(2025 - 07 - 06), date!(2025 - 07 - 01)), 1);
    }

    #[test]
    fn test_five_night_stay_at_100() {
        let quote = BookingQuote::for_stay(100.0, date!(2025 - 07 - 01), date!(2025 - 07 - 06));
        assert_eq!(quote.nights, 5);
        assert_eq!(quote.lodging_total(), 500.0);
    }

    #[test]
    fn test_fees_add_onto_grand_total() {
        let quote = BookingQuote::new(100.0, 5)
            .with_service_fee(50.0)
            .with_cleaning_fee(75.0);
        assert_eq!(quote.lodging_total(), 500.0);
        assert_eq!(quote.fees_total(), 125.0);
        assert_eq!(quote.grand_total(), 625.0);
    }
}
