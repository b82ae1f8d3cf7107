//! MathML lengths and their conversion to em.
//!
//! Every dimension the layout works with is a plain `f64` in em. Attribute values such as
//! `"2.5ex"`, `"thickmathspace"`, `"-3mu"` or `"150%"` are turned into em with [`length2em`],
//! and em values are turned back into CSS strings with [`em`].

/// Stand-in for an infinite dimension
pub const BIGDIMEN: f64 = 1_000_000.;

/// Pixels per unit of absolute lengths
fn absolute_unit(unit: &str) -> Option<f64> {
    match unit {
        "px" => Some(1.),
        "in" => Some(96.),
        "cm" => Some(96. / 2.54),
        "mm" => Some(96. / 25.4),
        _ => None,
    }
}

/// Em per unit of font-relative lengths
fn relative_unit(unit: &str) -> Option<f64> {
    match unit {
        "em" => Some(1.),
        "ex" => Some(0.431),
        "pt" => Some(1. / 10.),
        "pc" => Some(12. / 10.),
        "mu" => Some(1. / 18.),
        _ => None,
    }
}

/// Named MathML spaces, in em
pub fn math_space(name: &str) -> Option<f64> {
    let value = match name {
        "veryverythinmathspace"          => 1. / 18.,
        "verythinmathspace"              => 2. / 18.,
        "thinmathspace"                  => 3. / 18.,
        "mediummathspace"                => 4. / 18.,
        "thickmathspace"                 => 5. / 18.,
        "verythickmathspace"             => 6. / 18.,
        "veryverythickmathspace"         => 7. / 18.,
        "negativeveryverythinmathspace"  => -1. / 18.,
        "negativeverythinmathspace"      => -2. / 18.,
        "negativethinmathspace"          => -3. / 18.,
        "negativemediummathspace"        => -4. / 18.,
        "negativethickmathspace"         => -5. / 18.,
        "negativeverythickmathspace"     => -6. / 18.,
        "negativeveryverythickmathspace" => -7. / 18.,
        "thin"     => 0.04,
        "medium"   => 0.06,
        "thick"    => 0.1,
        "normal"   => 1.,
        "big"      => 2.,
        "small"    => std::f64::consts::FRAC_1_SQRT_2,
        "infinity" => BIGDIMEN,
        _ => return None,
    };
    Some(value)
}

/// Split `"  -2.5em"` into `(Some(-2.5), "em")`. A missing number is `None`.
fn split_length(text: &str) -> Option<(Option<f64>, &str)> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let digits_start = end;
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&c) = bytes.get(end) {
        match c {
            b'0' ..= b'9'      => seen_digit = true,
            b'.' if !seen_dot  => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    let number = if seen_digit {
        Some(text[.. end].parse::<f64>().ok()?)
    } else if end > digits_start || digits_start > 0 {
        // a sign or a dot with no digits
        return None;
    } else {
        None
    };
    let rest = &text[end ..];
    let unit_len = rest.bytes().take_while(|c| c.is_ascii_alphabetic() || *c == b'%').count();
    Some((number, &rest[.. unit_len]))
}

/// Convert a MathML length to em.
///
///  - `size` is what a percentage or a unit-less multiplier applies to, and what is returned for an
///    empty or unparsable length;
///  - `scale` is the scaling factor of the element, used to convert absolute units;
///  - `em_px` is the size of an em in pixels.
pub fn length2em(length: &str, size: f64, scale: f64, em_px: f64) -> f64 {
    let length = length.trim();
    if length.is_empty() {
        return size;
    }
    if let Some(space) = math_space(length) {
        return space;
    }
    let Some((number, unit)) = split_length(length) else { return size };
    let m = number.unwrap_or(1.);
    if let Some(px) = absolute_unit(unit) {
        return m * px / em_px / scale;
    }
    if let Some(em) = relative_unit(unit) {
        return m * em;
    }
    match unit {
        "%" => m / 100. * size,
        ""  => m * size,
        _   => size,
    }
}

/// [`length2em`] with the usual defaults: scale 1, 16px em.
pub fn to_em(length: &str, size: f64) -> f64 {
    length2em(length, size, 1., 16.)
}

/// Is the length a percentage?
pub fn is_percent(length: &str) -> bool {
    length.trim_end().ends_with('%')
}

/// CSS form of an em value: three decimals, trailing zeros dropped, tiny values as `0`.
pub fn em(m: f64) -> String {
    if m.abs() < 0.001 {
        return "0".to_string();
    }
    format!("{}em", trim_decimals(format!("{:.3}", m)))
}

/// CSS form of an em value in pixels, never smaller than `min_px` in magnitude (unless zero).
pub fn px(m: f64, min_px: f64, em_px: f64) -> String {
    let m = m * em_px;
    if m.abs() < 0.1 {
        return "0".to_string();
    }
    let m = if m.abs() < min_px { min_px.copysign(m) } else { m };
    format!("{}px", trim_decimals(format!("{:.1}", m)))
}

/// A fraction as a CSS percentage
pub fn percent(m: f64) -> String {
    format!("{}%", trim_decimals(format!("{:.1}", 100. * m)))
}

fn trim_decimals(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" { "0".to_string() } else { text }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn units() {
        assert!(close(to_em("2em", 0.), 2.));
        assert!(close(to_em("1ex", 0.), 0.431));
        assert!(close(to_em("18mu", 0.), 1.));
        assert!(close(to_em("16px", 0.), 1.));
        assert!(close(to_em("10pt", 0.), 1.));
        assert!(close(to_em("-.5em", 0.), -0.5));
        assert!(close(to_em("+3mu", 0.), 3. / 18.));
    }

    #[test]
    fn relative_to_size() {
        assert!(close(to_em("50%", 2.), 1.));
        assert!(close(to_em("2", 1.5), 3.));
        assert!(close(to_em("", 0.7), 0.7));
        assert!(close(to_em("garbage", 0.7), 0.7));
        assert!(close(to_em("em", 0.), 1.));
    }

    #[test]
    fn named_spaces() {
        assert!(close(to_em("thickmathspace", 0.), 5. / 18.));
        assert!(close(to_em("negativethinmathspace", 0.), -3. / 18.));
        assert!(close(to_em("infinity", 0.), BIGDIMEN));
    }

    #[test]
    fn formatting() {
        assert_eq!(em(0.5), "0.5em");
        assert_eq!(em(1.25), "1.25em");
        assert_eq!(em(2.0), "2em");
        assert_eq!(em(0.0004), "0");
        assert_eq!(em(-0.1666), "-0.167em");
        assert_eq!(percent(0.5), "50%");
        assert_eq!(percent(1. / 3.), "33.3%");
        assert_eq!(px(0.05, 1., 16.), "1px");
    }
}
