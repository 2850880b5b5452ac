use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Peruvian VAT rate applied to every fiscal document.
pub const IGV_RATE: Decimal = dec!(0.18);

/// Kind of fiscal document issued for a completed work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum FiscalDocType {
    #[serde(rename = "FACTURA")]
    #[strum(serialize = "FACTURA")]
    Factura,
    #[serde(rename = "BOLETA")]
    #[strum(serialize = "BOLETA")]
    Boleta,
}

/// Billing state of a work order, orthogonal to its production status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum BillingStatus {
    #[serde(rename = "Pendiente")]
    #[strum(serialize = "Pendiente")]
    Pendiente,
    #[serde(rename = "Facturado")]
    #[strum(serialize = "Facturado")]
    Facturado,
}

impl FiscalDocType {
    /// Series prefix for the document correlative.
    pub fn series(&self) -> &'static str {
        match self {
            FiscalDocType::Factura => "F001",
            FiscalDocType::Boleta => "B001",
        }
    }

    /// Formats the full correlative, e.g. `F001-000042`.
    pub fn correlative(&self, seq: u64) -> String {
        format!("{}-{:06}", self.series(), seq)
    }
}

/// Splits a tax-inclusive total into (subtotal, igv), both rounded to two
/// decimal places. The stored total is authoritative; subtotal is derived.
pub fn igv_breakdown(total: Decimal) -> (Decimal, Decimal) {
    let subtotal = (total / (Decimal::ONE + IGV_RATE)).round_dp(2);
    let igv = (total - subtotal).round_dp(2);
    (subtotal, igv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_of_round_total() {
        let (subtotal, igv) = igv_breakdown(dec!(118.00));
        assert_eq!(subtotal, dec!(100.00));
        assert_eq!(igv, dec!(18.00));
    }

    #[test]
    fn breakdown_parts_always_sum_to_total() {
        for total in [dec!(0.01), dec!(1), dec!(99.99), dec!(1234.56)] {
            let (subtotal, igv) = igv_breakdown(total);
            assert_eq!(subtotal + igv, total);
        }
    }

    #[test]
    fn correlatives_are_zero_padded_per_series() {
        assert_eq!(FiscalDocType::Factura.correlative(1), "F001-000001");
        assert_eq!(FiscalDocType::Boleta.correlative(42), "B001-000042");
    }
}
