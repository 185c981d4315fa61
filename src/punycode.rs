//! Punycode (RFC 3492) and the per-label ASCII form of domain names.

use alloc::{string::String, vec::Vec};

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

/// The prefix of an ASCII-compatible encoded label.
pub const ACE_PREFIX: &str = "xn--";

fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (BASE - T_MIN + 1) * delta / (delta + SKEW)
}

fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        T_MIN
    } else if k >= bias + T_MAX {
        T_MAX
    } else {
        k - bias
    }
}

fn encode_digit(d: u32) -> char {
    debug_assert!(d < BASE);
    let d = d as u8;
    char::from(if d < 26 { b'a' + d } else { b'0' + d - 26 })
}

fn decode_digit(x: u8) -> Option<u32> {
    match x {
        b'a'..=b'z' => Some(u32::from(x - b'a')),
        b'A'..=b'Z' => Some(u32::from(x - b'A')),
        b'0'..=b'9' => Some(u32::from(x - b'0') + 26),
        _ => None,
    }
}

/// Encodes a Unicode label to punycode, without the `xn--` prefix.
///
/// Returns `None` on arithmetic overflow.
///
/// ```
/// use uri_kit::punycode;
///
/// assert_eq!(punycode::encode("münchen").as_deref(), Some("mnchen-3ya"));
/// ```
#[must_use]
pub fn encode(input: &str) -> Option<String> {
    let code_points: Vec<u32> = input.chars().map(u32::from).collect();
    let total = u32::try_from(code_points.len()).ok()?;

    let mut out: String = input.chars().filter(char::is_ascii).collect();
    let basic = u32::try_from(out.len()).ok()?;
    if basic > 0 {
        out.push('-');
    }

    let (mut n, mut delta, mut bias) = (INITIAL_N, 0u32, INITIAL_BIAS);
    let mut handled = basic;

    while handled < total {
        let m = code_points.iter().copied().filter(|&c| c >= n).min()?;
        delta = delta.checked_add((m - n).checked_mul(handled + 1)?)?;
        n = m;

        for &c in &code_points {
            if c < n {
                delta = delta.checked_add(1)?;
            } else if c == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    out.push(encode_digit(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                out.push(encode_digit(q));
                bias = adapt(delta, handled + 1, handled == basic);
                delta = 0;
                handled += 1;
            }
        }
        delta = delta.checked_add(1)?;
        n = n.checked_add(1)?;
    }
    Some(out)
}

/// Decodes a punycode label, without the `xn--` prefix.
///
/// Returns `None` if the input is not valid punycode.
///
/// ```
/// use uri_kit::punycode;
///
/// assert_eq!(punycode::decode("bcher-kva").as_deref(), Some("bücher"));
/// assert_eq!(punycode::decode("bcher-kv!"), None);
/// ```
#[must_use]
pub fn decode(input: &str) -> Option<String> {
    if !input.is_ascii() {
        return None;
    }
    let (basic, encoded) = match input.rfind('-') {
        Some(i) => (&input[..i], &input[i + 1..]),
        None => ("", input),
    };

    let mut out: Vec<char> = basic.chars().collect();
    let (mut n, mut i, mut bias) = (INITIAL_N, 0u32, INITIAL_BIAS);
    let mut digits = encoded.bytes();

    while digits.len() != 0 {
        let old_i = i;
        let mut w = 1u32;
        let mut k = BASE;
        loop {
            let digit = decode_digit(digits.next()?)?;
            i = i.checked_add(digit.checked_mul(w)?)?;
            let t = threshold(k, bias);
            if digit < t {
                break;
            }
            w = w.checked_mul(BASE - t)?;
            k += BASE;
        }

        let len = u32::try_from(out.len()).ok()? + 1;
        bias = adapt(i - old_i, len, old_i == 0);
        n = n.checked_add(i / len)?;
        i %= len;

        out.insert(i as usize, char::from_u32(n)?);
        i += 1;
    }
    Some(out.into_iter().collect())
}

/// Converts a domain name to its ASCII form, label by label.
///
/// Labels are lowercased. Non-ASCII labels are punycode-encoded and
/// prefixed with `xn--`. Returns `None` if a label cannot be encoded.
///
/// ```
/// use uri_kit::punycode;
///
/// assert_eq!(punycode::to_ascii("Bücher.Example").as_deref(), Some("xn--bcher-kva.example"));
/// ```
#[must_use]
pub fn to_ascii(domain: &str) -> Option<String> {
    let mut out = String::with_capacity(domain.len() + 8);
    for (i, label) in domain.split('.').enumerate() {
        if i != 0 {
            out.push('.');
        }
        if label.is_ascii() {
            out.extend(label.chars().map(|c| c.to_ascii_lowercase()));
        } else {
            let lower: String = label.chars().flat_map(char::to_lowercase).collect();
            out.push_str(ACE_PREFIX);
            out.push_str(&encode(&lower)?);
        }
    }
    Some(out)
}

/// Converts a domain name to its Unicode form, decoding `xn--` labels.
///
/// Returns `None` if an `xn--` label is not valid punycode.
#[must_use]
pub fn to_unicode(domain: &str) -> Option<String> {
    let mut out = String::with_capacity(domain.len());
    for (i, label) in domain.split('.').enumerate() {
        if i != 0 {
            out.push('.');
        }
        match strip_ace_prefix(label) {
            Some(encoded) => out.push_str(&decode(encoded)?),
            None => out.push_str(label),
        }
    }
    Some(out)
}

pub(crate) fn strip_ace_prefix(label: &str) -> Option<&str> {
    let prefix = label.get(..ACE_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(ACE_PREFIX)
        .then(|| &label[ACE_PREFIX.len()..])
}
