//! pt-BR conventions as plain lookup tables.
//!
//! Month names, month ordering, and the `1.234,56` number convention are all
//! fixed tables here so results never depend on the process locale.

use chrono::{Datelike, NaiveDate};

/// Portuguese month names, January first.
pub const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Source-language month names mapped onto [`MONTHS`].
const ENGLISH_TO_PORTUGUESE: [(&str, &str); 12] = [
    ("january", "janeiro"),
    ("february", "fevereiro"),
    ("march", "março"),
    ("april", "abril"),
    ("may", "maio"),
    ("june", "junho"),
    ("july", "julho"),
    ("august", "agosto"),
    ("september", "setembro"),
    ("october", "outubro"),
    ("november", "novembro"),
    ("december", "dezembro"),
];

// ---------------------------------------------------------------------------
// Months
// ---------------------------------------------------------------------------

/// Translate an English month name (any case) to its Portuguese form.
pub fn translate_month(english: &str) -> Option<&'static str> {
    let key = english.trim().to_lowercase();
    ENGLISH_TO_PORTUGUESE
        .iter()
        .find(|(en, _)| *en == key)
        .map(|(_, pt)| *pt)
}

/// Calendar position (1-12) of a Portuguese month name, or 0 when unknown.
///
/// Unknown names share sort key 0 so they consistently sort before January.
pub fn month_index(name: &str) -> u32 {
    let key = name.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == key)
        .map(|i| i as u32 + 1)
        .unwrap_or(0)
}

/// Portuguese month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get((month as usize).checked_sub(1)?).copied()
}

/// Lower-case Portuguese month name of a date.
///
/// Derived from the English calendar name and passed through the fixed
/// translation table.
pub fn month_name_of(date: NaiveDate) -> String {
    let english = date.format("%B").to_string().to_lowercase();
    translate_month(&english)
        .map(str::to_string)
        .unwrap_or(english)
}

/// `fev/2025` style label.
pub fn month_year_label(date: NaiveDate) -> String {
    let abbrev = MONTH_ABBREVIATIONS[date.month0() as usize];
    format!("{}/{}", abbrev, date.year())
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// Parse `MM/YYYY` into the first day of that month.
///
/// The month may have one or two digits; the year must have four.
pub fn parse_month_year(raw: &str) -> Option<NaiveDate> {
    let (month, year) = raw.trim().split_once('/')?;
    let month = parse_month_number(month.trim())?;
    let year = parse_year(year.trim())?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Build a reference date from separate month and year fields.
///
/// The month may be a number or a Portuguese or English month name.
pub fn period_from_parts(month: &str, year: &str) -> Option<NaiveDate> {
    let month = month.trim();
    let number = parse_month_number(month).or_else(|| {
        let pt = translate_month(month).map(month_index).unwrap_or(0);
        let idx = if pt > 0 { pt } else { month_index(month) };
        (idx > 0).then_some(idx)
    })?;
    NaiveDate::from_ymd_opt(parse_year(year.trim())?, number, 1)
}

fn parse_month_number(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 2 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|m| (1..=12).contains(m))
}

fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Parse a pt-BR formatted number (`1.234,56`).
///
/// Every `.` is dropped as a thousands separator and `,` becomes the decimal
/// point. Blank, unparsable, and non-finite values are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format with `.` thousands and `,` decimals, e.g. `1.234,56`.
pub fn format_number(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let mut out: String = grouped.chars().rev().collect();

    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }

    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.insert(0, '-');
    }
    out
}

/// Format as Brazilian currency, e.g. `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", format_number(value, 2))
}
