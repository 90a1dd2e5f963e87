//! Monetary amounts.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency attached to an amount by currency-aware endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// ISO 4217 code (e.g. "USD").
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_points: Option<u8>,
}

/// An amount of money held in minor units (cents).
///
/// Encodes as a bare integer of cents. Decodes from:
/// - a bare number of cents (`1250`, or `1250.0`),
/// - a numeric string in major units as legacy endpoints send it (`"12.50"`),
/// - an object `{"amount": 1250, "currency": {...}}`.
///
/// An absent or `null` amount is expressed as `Option<Money>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Money {
    /// Amount in minor units.
    pub cents: i64,
    /// Currency, when the endpoint reports one.
    pub currency: Option<Currency>,
}

impl Money {
    /// An amount in minor units without a currency.
    pub fn from_cents(cents: i64) -> Self {
        Self {
            cents,
            currency: None,
        }
    }

    /// An amount in major units, rounded to the nearest cent.
    pub fn from_major(amount: f64) -> Self {
        Self::from_cents((amount * 100.0).round() as i64)
    }

    /// The amount in major units.
    pub fn as_major(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Attach a currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)?;
        if let Some(currency) = &self.currency {
            write!(f, " {}", currency.code)?;
        }
        Ok(())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.cents)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Cents(i64),
    FractionalCents(f64),
    Major(String),
}

impl Amount {
    fn into_cents<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Cents(cents) => Ok(cents),
            Self::FractionalCents(cents) => Ok(cents.round() as i64),
            Self::Major(text) => {
                let text = text.trim();
                text.parse::<f64>()
                    .map(|major| (major * 100.0).round() as i64)
                    .map_err(|_| E::custom(format!("invalid money amount '{text}'")))
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Bare(Amount),
    Detailed {
        amount: Amount,
        #[serde(default)]
        currency: Option<Currency>,
    },
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MoneyRepr::deserialize(deserializer)? {
            MoneyRepr::Bare(amount) => Ok(Self::from_cents(amount.into_cents()?)),
            MoneyRepr::Detailed { amount, currency } => Ok(Self {
                cents: amount.into_cents()?,
                currency,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default)]
        rate: Option<Money>,
    }

    #[test]
    fn test_money_decodes_bare_number() {
        let money: Money = serde_json::from_str("1250").unwrap();
        assert_eq!(money, Money::from_cents(1250));
    }

    #[test]
    fn test_money_decodes_legacy_string_in_major_units() {
        let money: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(money.cents, 1250);
        assert!(money.currency.is_none());
    }

    #[test]
    fn test_money_decodes_currency_object() {
        let json = r#"{
            "amount": 9900,
            "currency": {"id": 2, "code": "EUR", "symbol": "€", "decimalPoints": 2}
        }"#;
        let money: Money = serde_json::from_str(json).unwrap();
        assert_eq!(money.cents, 9900);
        let currency = money.currency.unwrap();
        assert_eq!(currency.code, "EUR");
        assert_eq!(currency.decimal_points, Some(2));
    }

    #[test]
    fn test_money_absent_or_null_is_none() {
        let absent: Holder = serde_json::from_str("{}").unwrap();
        assert!(absent.rate.is_none());

        let null: Holder = serde_json::from_str(r#"{"rate": null}"#).unwrap();
        assert!(null.rate.is_none());
    }

    #[test]
    fn test_money_rejects_garbage() {
        assert!(serde_json::from_str::<Money>("\"twelve\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_money_encodes_cents() {
        let money = Money::from_major(12.5).with_currency(Currency {
            code: "USD".to_string(),
            id: None,
            symbol: None,
            name: None,
            decimal_points: None,
        });
        assert_eq!(serde_json::to_string(&money).unwrap(), "1250");
        assert_eq!(money.to_string(), "12.50 USD");
    }

    #[test]
    fn test_money_display_negative() {
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }
}
