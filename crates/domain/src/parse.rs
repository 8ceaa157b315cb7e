//! Lenient text conversions shared by the validator and the config store.
//!
//! Numbers are read the way the vehicle firmware reads stored values with
//! `atoi`/`atof`: leading whitespace is skipped, the longest numeric prefix
//! is converted and anything after it ignored. Input without a numeric
//! prefix converts to zero.

/// Convert the integer prefix of `raw` to a C `int`.
///
/// The prefix is read into 64 bits, clamping on overflow, then truncated to
/// 32 bits, so out-of-range input wraps exactly as it does on the firmware.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn lenient_int(raw: &str) -> i32 {
    lenient_long(raw) as i32
}

fn lenient_long(raw: &str) -> i64 {
    let text = raw.trim_start();
    let (negative, digits) = split_sign(text);

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

/// Convert the floating-point prefix of `raw`.
///
/// Besides decimal notation this accepts the other `strtod` forms:
/// `inf`, `infinity` and `nan` in any case, and hexadecimal mantissas with
/// an optional binary exponent (`0x1.8p3`).
#[must_use]
pub fn lenient_float(raw: &str) -> f64 {
    let text = raw.trim_start();
    let (negative, body) = split_sign(text);
    let magnitude = special_float(body)
        .or_else(|| hex_float(body))
        .unwrap_or_else(|| decimal_float(body));
    if negative { -magnitude } else { magnitude }
}

/// Textual form of a stored flag.
#[must_use]
pub fn format_flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Interpret a stored flag value.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(value, "yes" | "true" | "1")
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn special_float(body: &str) -> Option<f64> {
    if starts_with_ignore_case(body, "inf") {
        Some(f64::INFINITY)
    } else if starts_with_ignore_case(body, "nan") {
        Some(f64::NAN)
    } else {
        None
    }
}

/// `0x` hex-digits [`.` hex-digits] [`p` [sign] digits]. `None` when no
/// mantissa digit follows the `0x`, in which case only the `0` is read.
fn hex_float(body: &str) -> Option<f64> {
    if !starts_with_ignore_case(body, "0x") {
        return None;
    }
    let bytes = &body.as_bytes()[2..];

    let mut mantissa = 0.0_f64;
    let mut exponent: i32 = 0;
    let mut digits = 0;
    let mut pos = 0;
    let mut fraction = false;
    while let Some(&byte) = bytes.get(pos) {
        if byte == b'.' && !fraction {
            fraction = true;
        } else if let Some(digit) = char::from(byte).to_digit(16) {
            mantissa = mantissa * 16.0 + f64::from(digit);
            if fraction {
                exponent = exponent.saturating_sub(4);
            }
            digits += 1;
        } else {
            break;
        }
        pos += 1;
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(pos), Some(b'p' | b'P')) {
        // everything consumed so far is ASCII, so this is a char boundary
        let (negative, exp_digits) = split_sign(&body[2 + pos + 1..]);
        if exp_digits.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
            let mut binary: i32 = 0;
            for digit in exp_digits.bytes().take_while(u8::is_ascii_digit) {
                binary = binary
                    .saturating_mul(10)
                    .saturating_add(i32::from(digit - b'0'));
            }
            exponent = if negative {
                exponent.saturating_sub(binary)
            } else {
                exponent.saturating_add(binary)
            };
        }
    }
    Some(mantissa * 2.0_f64.powi(exponent))
}

fn decimal_float(body: &str) -> f64 {
    body[..decimal_prefix_len(body)].parse().unwrap_or(0.0)
}

/// Length in bytes of the `digits [. digits] [e [sign] digits]` prefix, or
/// zero when no mantissa digit is present.
fn decimal_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let count_digits = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let int_digits = count_digits(0);
    let mut pos = int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(pos + 1);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }
    pos
}
