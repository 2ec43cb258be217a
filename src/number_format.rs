use crate::locale::LocaleHeader;

const DEFAULT_DECIMAL_POINT: &str = ".";
const DEFAULT_THOUSANDS_SEP: &str = ",";

/// Options for [`number_format`]. Separators left unset come from the active
/// locale, then from the English defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberFormatOptions {
    pub decimals: usize,
    pub decimal_point: Option<String>,
    pub thousands_sep: Option<String>,
}

impl NumberFormatOptions {
    pub fn new() -> Self {
        NumberFormatOptions::default()
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_decimal_point(mut self, decimal_point: &str) -> Self {
        self.decimal_point = Some(decimal_point.to_string());
        self
    }

    pub fn with_thousands_sep(mut self, thousands_sep: &str) -> Self {
        self.thousands_sep = Some(thousands_sep.to_string());
        self
    }
}

impl From<usize> for NumberFormatOptions {
    fn from(decimals: usize) -> Self {
        NumberFormatOptions::new().with_decimals(decimals)
    }
}

/// Format `value` with a fixed number of decimals and grouped thousands.
pub fn number_format(value: f64, options: &NumberFormatOptions, header: &LocaleHeader) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let decimal_point = options
        .decimal_point
        .as_deref()
        .or(header.decimal_point.as_deref())
        .unwrap_or(DEFAULT_DECIMAL_POINT);
    let thousands_sep = options
        .thousands_sep
        .as_deref()
        .or(header.thousands_sep.as_deref())
        .unwrap_or(DEFAULT_THOUSANDS_SEP);

    let fixed = format!("{:.*}", options.decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut result = String::new();
    // Rounding can turn a tiny negative into zero; don't print "-0".
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.push('-');
    }
    result.push_str(&group_thousands(integer, thousands_sep));
    if let Some(fraction) = fraction {
        result.push_str(decimal_point);
        result.push_str(fraction);
    }
    result
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}
