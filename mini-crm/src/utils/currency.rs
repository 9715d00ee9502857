//! French display formatting for amounts and rates.

use rust_decimal::{Decimal, RoundingStrategy};

const GROUP_SEPARATOR: char = '\u{202f}';
const NBSP: char = '\u{a0}';

/// Format an amount as euros the way `fr-FR` does: `2 500,00 €`.
pub fn format_eur(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}{},{}{}€",
        if negative { "-" } else { "" },
        group_thousands(integer),
        fraction,
        NBSP
    )
}

/// Format a percentage without trailing zeros: `20 %`, `5,5 %`.
pub fn format_percent(value: Decimal) -> String {
    let text = value.normalize().to_string().replace('.', ",");
    format!("{}{}%", text, NBSP)
}

fn group_thousands(integer: &str) -> String {
    let len = integer.chars().count();
    let mut grouped = String::with_capacity(integer.len() + len / 3 * 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}
