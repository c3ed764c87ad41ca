//! Money formatting for plan costs and budgets.

/// Display symbol for a currency code. Unknown codes render as the code
/// followed by a space.
pub fn currency_symbol(code: &str) -> String {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => "₹".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        other => format!("{} ", other),
    }
}

/// Round to the nearest whole unit and group thousands with commas.
///
/// `20000.4` renders as `"20,000"`.
pub fn format_amount(amount: f64) -> String {
    group_thousands(amount.round() as i64)
}

/// [`format_amount`] prefixed with the currency symbol, e.g. `"₹72,000"`.
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{}{}", currency_symbol(currency), format_amount(amount))
}

pub(crate) fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
