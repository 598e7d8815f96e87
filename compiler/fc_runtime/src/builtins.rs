//! Built-in functions that touch the heap.
//!
//! Each built-in receives its already-evaluated arguments and returns a
//! fresh, unreferenced apartment holding the result.

use rustc_hash::FxHashMap;

use crate::{ApartmentId, GarbageCollector, RuntimeError, RuntimeResult, Value, ValueKind};

pub type BuiltinFn = fn(&[Value], &mut GarbageCollector) -> RuntimeResult<ApartmentId>;

/// Name to function registry.
#[derive(Clone, Debug, Default)]
pub struct Builtins {
    functions: FxHashMap<&'static str, BuiltinFn>,
}

impl Builtins {
    pub fn new() -> Self {
        Builtins::default()
    }

    /// `get_type`, `to_string` and `to_numerical`.
    pub fn standard() -> Self {
        let mut builtins = Builtins::new();
        builtins.register("get_type", function_get_type);
        builtins.register("to_string", function_to_string);
        builtins.register("to_numerical", function_to_numerical);
        builtins
    }

    pub fn register(&mut self, name: &'static str, function: BuiltinFn) {
        self.functions.insert(name, function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn call(
        &self,
        name: &str,
        args: &[Value],
        gc: &mut GarbageCollector,
    ) -> RuntimeResult<ApartmentId> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownBuiltin {
                name: name.to_string(),
            })?;
        tracing::trace!(name, argc = args.len(), "calling built-in");
        function(args, gc)
    }
}

fn single<'a>(name: &'static str, args: &'a [Value]) -> RuntimeResult<&'a Value> {
    match args {
        [arg] => Ok(arg),
        _ => Err(RuntimeError::ArityMismatch {
            name,
            expected: 1,
            got: args.len(),
        }),
    }
}

/// Character whose code point is the argument's kind tag.
fn function_get_type(args: &[Value], gc: &mut GarbageCollector) -> RuntimeResult<ApartmentId> {
    let arg = single("get_type", args)?;
    let tag = char::from(arg.kind().tag());
    Ok(gc.new_apartment(Value::Character(tag)))
}

/// Six fractional digits, as a character collection.
fn function_to_string(args: &[Value], gc: &mut GarbageCollector) -> RuntimeResult<ApartmentId> {
    let arg = single("to_string", args)?;
    let Value::Numerical(n) = arg else {
        return Err(RuntimeError::TypeMismatch {
            name: "to_string",
            expected: ValueKind::Numerical,
            got: arg.kind(),
        });
    };
    Ok(gc.collection_from_str(&format!("{n:.6}")))
}

/// Longest numeric prefix of a character collection, 0 if none.
fn function_to_numerical(args: &[Value], gc: &mut GarbageCollector) -> RuntimeResult<ApartmentId> {
    let arg = single("to_numerical", args)?;
    let Value::Collection(collection) = arg else {
        return Err(RuntimeError::TypeMismatch {
            name: "to_numerical",
            expected: ValueKind::Collection,
            got: arg.kind(),
        });
    };
    let mut text = String::new();
    for element in gc.chain(collection.first)? {
        match gc.value(element)? {
            Value::Character(c) => text.push(*c),
            _ => break,
        }
    }
    Ok(gc.new_apartment(Value::Numerical(parse_prefix(&text))))
}

/// Parse the longest numeric prefix of `text`, the way C's `strtold` does.
///
/// Accepts leading whitespace and a sign, then `inf`/`infinity`/`nan` in any
/// case, a hexadecimal float (`0x1.8p3`), or a decimal float (`1.5e3`).
/// Text with no numeric prefix reads as `0`.
fn parse_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = parse_special(unsigned)
        .or_else(|| parse_hex(unsigned))
        .or_else(|| parse_decimal(unsigned));
    match magnitude {
        Some(magnitude) if negative => -magnitude,
        Some(magnitude) => magnitude,
        None => 0.0,
    }
}

fn starts_with_ignore_case(text: &str, word: &str) -> bool {
    text.get(..word.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(word))
}

fn parse_special(text: &str) -> Option<f64> {
    if starts_with_ignore_case(text, "inf") {
        Some(f64::INFINITY)
    } else if starts_with_ignore_case(text, "nan") {
        Some(f64::NAN)
    } else {
        None
    }
}

/// `0x` hex digits, an optional `.` fraction, and an optional binary
/// exponent `p[sign]digits`. A bare `0x` reads as the `0` before it.
fn parse_hex(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'0') || !matches!(bytes.get(1), Some(b'x' | b'X')) {
        return None;
    }
    let hex_digit = |i: usize| bytes.get(i).and_then(|b| char::from(*b).to_digit(16));

    let mut i = 2;
    let mut mantissa = 0.0_f64;
    let mut digits = 0_usize;
    let mut scale = 0_i32;
    while let Some(d) = hex_digit(i) {
        mantissa = mantissa * 16.0 + f64::from(d);
        digits += 1;
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while let Some(d) = hex_digit(i) {
            mantissa = mantissa * 16.0 + f64::from(d);
            scale = scale.saturating_sub(4);
            digits += 1;
            i += 1;
        }
    }
    if digits == 0 {
        return Some(0.0);
    }

    if matches!(bytes.get(i), Some(b'p' | b'P')) {
        let mut j = i + 1;
        let negative = match bytes.get(j) {
            Some(b'-') => {
                j += 1;
                true
            }
            Some(b'+') => {
                j += 1;
                false
            }
            _ => false,
        };
        let exp_start = j;
        let mut exponent = 0_i32;
        while let Some(d) = bytes.get(j).filter(|b| b.is_ascii_digit()) {
            exponent = exponent.saturating_mul(10).saturating_add(i32::from(d - b'0'));
            j += 1;
        }
        if j > exp_start {
            scale = scale.saturating_add(if negative { -exponent } else { exponent });
        }
    }
    Some(mantissa * 2.0_f64.powi(scale))
}

/// `digits[.digits][e[sign]digits]`, stopping at the first byte that does
/// not fit.
fn parse_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = digits_from(0);
    let mut mantissa_digits = end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests can panic")]

    use super::*;
    use pretty_assertions::assert_eq;

    fn text_of(gc: &GarbageCollector, id: ApartmentId) -> String {
        gc.collection_to_string(id).unwrap()
    }

    #[test]
    fn test_get_type_codes() {
        let mut gc = GarbageCollector::new();
        let builtins = Builtins::standard();
        let id = builtins
            .call("get_type", &[Value::Numerical(1.0)], &mut gc)
            .unwrap();
        assert_eq!(gc.value(id).unwrap(), &Value::Character('\u{1}'));

        let list = gc.collection_from_str("x");
        let value = gc.value(list).unwrap().clone();
        let id = builtins.call("get_type", &[value], &mut gc).unwrap();
        assert_eq!(gc.value(id).unwrap().as_character(), Some('\u{3}'));
    }

    #[test]
    fn test_to_string_six_digits() {
        let mut gc = GarbageCollector::new();
        let builtins = Builtins::standard();
        let id = builtins
            .call("to_string", &[Value::Numerical(3.0)], &mut gc)
            .unwrap();
        assert_eq!(text_of(&gc, id), "3.000000");

        let id = builtins
            .call("to_string", &[Value::Numerical(-0.25)], &mut gc)
            .unwrap();
        assert_eq!(text_of(&gc, id), "-0.250000");
    }

    #[test]
    fn test_to_numerical_prefix() {
        let mut gc = GarbageCollector::new();
        let builtins = Builtins::standard();
        let mut parse = |text: &str| {
            let list = gc.collection_from_str(text);
            let value = gc.value(list).unwrap().clone();
            let id = builtins.call("to_numerical", &[value], &mut gc).unwrap();
            gc.value(id).unwrap().as_numerical().unwrap()
        };
        assert_eq!(parse("42"), 42.0);
        assert_eq!(parse("  -1.5abc"), -1.5);
        assert_eq!(parse("2e3x"), 2000.0);
        assert_eq!(parse("7e"), 7.0);
        assert_eq!(parse(".5"), 0.5);
        assert_eq!(parse("abc"), 0.0);
        assert_eq!(parse(""), 0.0);
        assert_eq!(parse("-"), 0.0);
    }

    #[test]
    fn test_to_numerical_special_and_hex() {
        let mut gc = GarbageCollector::new();
        let builtins = Builtins::standard();
        let mut parse = |text: &str| {
            let list = gc.collection_from_str(text);
            let value = gc.value(list).unwrap().clone();
            let id = builtins.call("to_numerical", &[value], &mut gc).unwrap();
            gc.value(id).unwrap().as_numerical().unwrap()
        };
        assert_eq!(parse("inf"), f64::INFINITY);
        assert_eq!(parse(" -Infinity!"), f64::NEG_INFINITY);
        assert!(parse("NaN").is_nan());
        assert!(parse("-nan(0)").is_nan());
        assert_eq!(parse("in"), 0.0);

        assert_eq!(parse("0x1A"), 26.0);
        assert_eq!(parse("-0xffz"), -255.0);
        assert_eq!(parse("0x1.8p3"), 12.0);
        assert_eq!(parse("0x10p-2"), 4.0);
        assert_eq!(parse("0x1p"), 1.0);
        assert_eq!(parse("0xg"), 0.0);
        assert_eq!(parse("1e999"), f64::INFINITY);
    }

    #[test]
    fn test_argument_checks() {
        let mut gc = GarbageCollector::new();
        let builtins = Builtins::standard();
        assert_eq!(
            builtins.call("to_string", &[], &mut gc).unwrap_err(),
            RuntimeError::ArityMismatch {
                name: "to_string",
                expected: 1,
                got: 0
            }
        );
        assert_eq!(
            builtins
                .call("to_numerical", &[Value::Numerical(1.0)], &mut gc)
                .unwrap_err(),
            RuntimeError::TypeMismatch {
                name: "to_numerical",
                expected: ValueKind::Collection,
                got: ValueKind::Numerical
            }
        );
        assert_eq!(
            builtins.call("print", &[], &mut gc).unwrap_err(),
            RuntimeError::UnknownBuiltin {
                name: "print".to_string()
            }
        );
        assert!(builtins.contains("get_type"));
    }
}
