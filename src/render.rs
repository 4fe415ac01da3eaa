//! Display and parsing policies for each field kind
use chrono::{DateTime, NaiveDate};

use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::locale::{FormatConfig, Locale};
use crate::record::FieldValue;

pub const STORED_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00Z";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Input control a field is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    TextInput,
    NumericInput,
    CurrencyInput,
    DatePicker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    pub widget: Widget,
    pub text: String,
}

impl From<FieldKind> for Widget {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Plain => Widget::TextInput,
            FieldKind::Numeric => Widget::NumericInput,
            FieldKind::Currency => Widget::CurrencyInput,
            FieldKind::Date => Widget::DatePicker,
        }
    }
}

pub fn render(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    config: &FormatConfig,
) -> DisplayValue {
    let text = match (descriptor.kind, value) {
        (FieldKind::Numeric, FieldValue::Number(n)) => format_number(*n, config.locale),
        (FieldKind::Currency, FieldValue::Amount(a)) => format_currency(*a, config.locale),
        (FieldKind::Date, FieldValue::Date(stored)) => format_date(stored).unwrap_or_default(),
        (_, other) => plain_text(other),
    };

    DisplayValue {
        widget: descriptor.kind.into(),
        text,
    }
}

/// Turn what the user typed into the leaf value the descriptor's kind stores.
pub fn parse_input(
    descriptor: &FieldDescriptor,
    text: &str,
    config: &FormatConfig,
) -> FieldValue {
    match descriptor.kind {
        FieldKind::Plain => FieldValue::Text(text.to_string()),
        FieldKind::Numeric => FieldValue::Number(parse_numeric(text, config.locale)),
        FieldKind::Currency => FieldValue::Amount(parse_currency(text, config.locale)),
        FieldKind::Date => FieldValue::Date(
            NaiveDate::parse_from_str(text.trim(), DISPLAY_DATE_FORMAT)
                .map(serialize_date)
                .unwrap_or_default(),
        ),
    }
}

/// Value to store after the date picker returns.
pub fn date_selected(date: NaiveDate) -> FieldValue {
    FieldValue::Date(serialize_date(date))
}

pub fn serialize_date(date: NaiveDate) -> String {
    date.format(STORED_DATE_FORMAT).to_string()
}

/// Accepts the stored form, any RFC 3339 timestamp, or a bare `YYYY-MM-DD`.
/// Timestamps keep the calendar date of their own offset.
pub fn stored_date(stored: &str) -> Option<NaiveDate> {
    let stored = stored.trim();
    DateTime::parse_from_rfc3339(stored)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(stored, "%Y-%m-%d"))
        .ok()
}

pub fn format_date(stored: &str) -> Option<String> {
    stored_date(stored).map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
}

pub fn format_currency(amount: u64, locale: Locale) -> String {
    let digits = amount.to_string();
    let separator = locale.group_separator();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Digits before the locale's decimal separator; grouping characters and
/// anything else are dropped. Empty or overflowing input gives zero.
pub fn parse_currency(text: &str, locale: Locale) -> u64 {
    let whole = text
        .split(locale.decimal_separator())
        .next()
        .unwrap_or_default();
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Keeps digits and the first decimal separator.
pub fn parse_numeric(text: &str, locale: Locale) -> f64 {
    let decimal = locale.decimal_separator();
    let mut seen_decimal = false;
    let mut cleaned = String::with_capacity(text.len());

    for c in text.chars() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if c == decimal && !seen_decimal {
            seen_decimal = true;
            cleaned.push('.');
        }
    }

    cleaned.parse().unwrap_or(0.0)
}

pub fn format_number(value: f64, locale: Locale) -> String {
    let text = value.to_string();
    match locale.decimal_separator() {
        '.' => text,
        sep => text.replace('.', &sep.to_string()),
    }
}

fn plain_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) | FieldValue::Date(s) => s.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Amount(a) => a.to_string(),
    }
}
