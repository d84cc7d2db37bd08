//! Compact number rendering (`1.5M`) and currency formatting.

const SUFFIXES: [&str; 6] = ["", "K", "M", "B", "T", "Q"];

/// Insert `sep` every three digits of an integer string, keeping a leading sign.
fn group_digits(integer: &str, sep: char) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// Grouped, at most one fractional digit, no trailing `.0`.
fn format_one_decimal(value: f64) -> String {
    let fixed = format!("{value:.1}");
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let grouped = group_digits(integer, ',');
    if fraction == "0" {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}

/// Render a value with a K/M/B/T/Q suffix, e.g. `1234` → `1.2K`.
///
/// Results longer than four characters lose their fractional part
/// (`12345` → `12K`). Zero, negative and non-finite input is rendered
/// without a suffix.
pub fn friendly_number(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return format_one_decimal(value);
    }

    let mut power = value.log10().floor() as i32;
    // log10 can land a hair under an exact power of ten.
    if 10f64.powi(power + 1) <= value {
        power += 1;
    }
    let index = usize::try_from(power / 3)
        .unwrap_or(0)
        .min(SUFFIXES.len() - 1);
    let reduced = value / 10f64.powi(3 * index as i32);

    let formatted = format!("{}{}", format_one_decimal(reduced), SUFFIXES[index]);
    if formatted.chars().count() > 4 {
        drop_fraction(&formatted)
    } else {
        formatted
    }
}

/// Strip a `.digits` run, leaving any suffix in place.
fn drop_fraction(text: &str) -> String {
    match text.find('.') {
        Some(dot) => {
            let rest = &text[dot + 1..];
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            format!("{}{}", &text[..dot], &rest[digits_end..])
        }
        None => text.to_string(),
    }
}

/// Two fractional digits with group separators: `1,234.50`.
///
/// The alternate convention swaps the separators: `1.234,50`.
pub fn format_currency(value: f64, alternate: bool) -> String {
    let fixed = format!("{value:.2}");
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let formatted = format!("{}.{}", group_digits(integer, ','), fraction);
    if !alternate {
        return formatted;
    }
    let dotted = formatted.replace(',', ".");
    match dotted.rfind('.') {
        Some(last) => format!("{},{}", &dotted[..last], &dotted[last + 1..]),
        None => dotted,
    }
}
