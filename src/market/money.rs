//! Saudi riyal formatting in the ar-SA convention: Arabic-Indic digits,
//! Arabic thousands and decimal separators, symbol after the amount.

const ARABIC_THOUSANDS_SEP: char = '\u{066C}';
const ARABIC_DECIMAL_SEP: char = '\u{066B}';
const RLM: char = '\u{200F}';
const NBSP: char = '\u{00A0}';
const SAR_SYMBOL: &str = "ر.س.";

/// Format `amount` as riyals with two decimals, e.g. `‏١٬٢٣٤٫٥٠ ر.س.‏`.
pub fn format_sar(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(&(cents / 100).to_string());
    let fraction = format!("{:02}", cents % 100);
    let sign = if amount < 0.0 && cents > 0 { "\u{061C}-" } else { "" };

    format!(
        "{RLM}{sign}{}{ARABIC_DECIMAL_SEP}{}{NBSP}{SAR_SYMBOL}{RLM}",
        to_arabic_digits(&whole),
        to_arabic_digits(&fraction)
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(ARABIC_THOUSANDS_SEP);
        }
        out.push(c);
    }
    out
}

/// Replace ASCII digits with Arabic-Indic digits.
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(0x0660 + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}
