use {
    super::error::PaymentError,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Currencies whose minor unit equals the major unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Amount in minor currency units (cents for USD, yen for JPY, fils for KWD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    pub fn new(minor: i64) -> Result<Self, PaymentError> {
        if minor < 0 {
            return Err(PaymentError::Validation(format!(
                "MoneyAmount cannot be negative, got: {minor}"
            )));
        }
        Ok(Self(minor))
    }

    pub fn minor(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for MoneyAmount {
    type Error = PaymentError;

    fn try_from(minor: i64) -> Result<Self, Self::Error> {
        Self::new(minor)
    }
}

impl From<MoneyAmount> for i64 {
    fn from(amount: MoneyAmount) -> i64 {
        amount.0
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO-4217 code, always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Result<Self, PaymentError> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentError::Validation(format!(
                "currency code must be 3 ASCII letters, got: {code:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decimal_places(&self) -> u32 {
        decimal_places(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = PaymentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> String {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of fractional digits the processor expects for `currency`.
/// Unknown codes fall back to two.
pub fn decimal_places(currency: &str) -> u32 {
    let upper = currency.trim().to_ascii_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&upper.as_str()) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&upper.as_str()) {
        3
    } else {
        DEFAULT_DECIMAL_PLACES
    }
}

/// Formats a minor-unit amount as the processor's decimal string, e.g.
/// `1003 USD -> "10.03"`, `1003 JPY -> "1003"`, `1003 KWD -> "1.003"`.
pub fn to_wire_amount(amount: MoneyAmount, currency: &CurrencyCode) -> String {
    let places = currency.decimal_places();
    let minor = amount.minor().unsigned_abs();
    if places == 0 {
        return minor.to_string();
    }
    let scale = 10u64.pow(places);
    format!(
        "{}.{:0width$}",
        minor / scale,
        minor % scale,
        width = places as usize
    )
}

/// Parses a processor decimal string back into minor units. Fewer fractional
/// digits than the currency uses are zero-padded; more are rejected.
pub fn from_wire_amount(value: &str, currency: &CurrencyCode) -> Result<MoneyAmount, PaymentError> {
    let places = currency.decimal_places() as usize;
    let invalid = || {
        PaymentError::Validation(format!(
            "invalid {currency} amount from provider: {value:?}"
        ))
    };

    let (major, fraction) = value.split_once('.').unwrap_or((value, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if major.is_empty() || !all_digits(major) || !all_digits(fraction) || fraction.len() > places {
        return Err(invalid());
    }

    let digits = format!("{major}{fraction:0<places$}");
    let minor = digits.parse::<i64>().map_err(|_| invalid())?;
    MoneyAmount::new(minor)
}
