//! Display currency conversion
//!
//! Results are always computed in USD. A [`DisplayCurrency`] only scales
//! numbers on their way to the screen.

use anyhow::{Result, anyhow};

pub trait ExchangeRates {
    /// Units of `code` per 1 USD
    fn rate(&self, code: &str) -> Option<f64>;
}

/// Indicative rates used when no live rate is supplied
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleRates;

const SAMPLE_RATES: &[(&str, f64)] = &[
    ("AUD", 1.52),
    ("BRL", 5.40),
    ("CAD", 1.37),
    ("CHF", 0.91),
    ("CNY", 7.24),
    ("EGP", 47.9),
    ("EUR", 0.93),
    ("GBP", 0.80),
    ("GHS", 13.5),
    ("INR", 83.45),
    ("JPY", 154.62),
    ("KES", 133.0),
    ("MXN", 17.05),
    ("NGN", 1400.0),
    ("USD", 1.0),
    ("XOF", 610.0),
    ("ZAR", 18.85),
];

impl SampleRates {
    pub fn all(&self) -> &'static [(&'static str, f64)] {
        SAMPLE_RATES
    }
}

impl ExchangeRates for SampleRates {
    fn rate(&self, code: &str) -> Option<f64> {
        SAMPLE_RATES
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|&(_, rate)| rate)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCurrency {
    pub code: String,
    pub rate: f64,
    /// True when the rate came from the bundled sample table
    pub sample_rate: bool,
}

impl DisplayCurrency {
    pub fn usd() -> Self {
        Self {
            code: "USD".to_string(),
            rate: 1.0,
            sample_rate: false,
        }
    }

    /// Pick a display currency. An explicit rate wins over the provider.
    pub fn select(code: &str, explicit_rate: Option<f64>, rates: &dyn ExchangeRates) -> Result<Self> {
        let code = code.trim().to_ascii_uppercase();

        if let Some(rate) = explicit_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(anyhow!("exchange rate for {} must be positive, got {}", code, rate));
            }
            return Ok(Self {
                code,
                rate,
                sample_rate: false,
            });
        }

        let rate = rates
            .rate(&code)
            .ok_or_else(|| anyhow!("no exchange rate known for '{}'; pass --rate", code))?;
        Ok(Self {
            sample_rate: code != "USD",
            code,
            rate,
        })
    }

    pub fn convert(&self, usd: f64) -> f64 {
        usd * self.rate
    }

    /// Converted and rounded to one decimal, as shown in reports
    pub fn display(&self, usd: f64) -> f64 {
        (self.convert(usd) * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_lookup() {
        let kes = DisplayCurrency::select("kes", None, &SampleRates).unwrap();
        assert_eq!(kes.code, "KES");
        assert_eq!(kes.rate, 133.0);
        assert!(kes.sample_rate);
        assert_eq!(kes.display(10.0), 1330.0);
    }

    #[test]
    fn test_explicit_rate_overrides_table() {
        let eur = DisplayCurrency::select("EUR", Some(0.9), &SampleRates).unwrap();
        assert_eq!(eur.rate, 0.9);
        assert!(!eur.sample_rate);
    }

    #[test]
    fn test_unknown_code_needs_rate() {
        assert!(DisplayCurrency::select("TZS", None, &SampleRates).is_err());
        let tzs = DisplayCurrency::select("TZS", Some(2600.0), &SampleRates).unwrap();
        assert_eq!(tzs.display(1.25), 3250.0);
    }

    #[test]
    fn test_display_rounds_to_one_decimal() {
        let usd = DisplayCurrency::usd();
        assert_eq!(usd.display(4.2168), 4.2);
        assert_eq!(usd.display(128.26), 128.3);
    }
}
