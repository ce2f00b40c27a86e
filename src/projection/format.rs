use rust_decimal::prelude::*;

/// Rounds half away from zero and renders exactly `dp` decimals.
pub fn fixed(value: f64, dp: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(d) => {
            let mut rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(dp);
            rounded.to_string()
        }
        None => format!("{value:.prec$}", prec = dp as usize),
    }
}

/// en-US style grouping: `3,700,000`, `45,123.457`. At most three
/// fraction digits, trailing zeros dropped.
pub fn grouped(value: f64) -> String {
    let Some(d) = Decimal::from_f64_retain(value) else {
        return value.to_string();
    };
    let rounded = d
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
