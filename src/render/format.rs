/// Absorbs the representation error of values like `0.29 * 1000.0`
const FLOOR_EPSILON: f64 = 1e-6;

/// Formats a stat value for display: percent-valued stats are floored to one
/// decimal place and suffixed `%`, everything else is floored to an integer.
pub fn format_stat_value(value: f64, percent: bool) -> String {
    if percent {
        let tenths = (value * 1000.0 + FLOOR_EPSILON).floor();
        format!("{:.1}%", tenths / 10.0)
    } else {
        format!("{}", (value + FLOOR_EPSILON).floor() as i64)
    }
}

/// Score with up to two decimals and no trailing zeros
pub fn format_score(score: f64) -> String {
    let text = format!("{:.2}", score);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
