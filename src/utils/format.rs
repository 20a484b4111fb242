/// Round `value` to `places` decimal places for presentation.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Format a number with commas for thousands separator
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

/// Format a USD amount with the given number of decimal places
pub fn format_currency(amount: f64, decimal_places: u8) -> String {
    format!("${:.*}", decimal_places as usize, amount)
}
