//! Parsing generator entries from decimal or simple-fraction strings.
//!
//! Accepted entry forms (whitespace ignored): `0.5`, `-3`, `1/3`, `i`, `-2i`, `1/2i`,
//! `1+2i`, `-1/2-0.25i`, `1e-3+i`. A generator is four entries `a,b,c,d`
//! (`;` also separates), read row-major.

use crate::algebra::{Cx, Mat2c};
use crate::error::DirichletError;

/// Parse one complex entry.
pub fn parse_complex(input: &str) -> Result<Cx, DirichletError> {
    let s: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Err(DirichletError::parse(input, "empty entry"));
    }
    let Some(body) = s.strip_suffix('i') else {
        return Ok(Cx::new(parse_real(&s, input)?, 0.0));
    };
    match split_sign(body) {
        Some(pos) => {
            let re = parse_real(&body[..pos], input)?;
            let im = parse_unit_or_real(&body[pos..], input)?;
            Ok(Cx::new(re, im))
        }
        None => Ok(Cx::new(0.0, parse_unit_or_real(body, input)?)),
    }
}

/// Parse `a,b,c,d` into a matrix `(a b; c d)`.
pub fn parse_generator(input: &str) -> Result<Mat2c, DirichletError> {
    let entries = input
        .split([',', ';'])
        .map(parse_complex)
        .collect::<Result<Vec<_>, _>>()?;
    match entries.as_slice() {
        [a, b, c, d] => Ok(Mat2c::new(*a, *b, *c, *d)),
        _ => Err(DirichletError::parse(
            input,
            format!("expected 4 entries, found {}", entries.len()),
        )),
    }
}

/// Position of the sign separating real and imaginary parts (not a leading sign,
/// not an exponent sign).
fn split_sign(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&k| matches!(bytes[k], b'+' | b'-') && !matches!(bytes[k - 1], b'e' | b'E'))
}

/// Imaginary coefficient: empty or a bare sign means ±1.
fn parse_unit_or_real(s: &str, input: &str) -> Result<f64, DirichletError> {
    match s {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => parse_real(s, input),
    }
}

fn parse_real(s: &str, input: &str) -> Result<f64, DirichletError> {
    let value = match s.split_once('/') {
        Some((num, den)) => {
            let n = parse_decimal(num, input)?;
            let d = parse_decimal(den, input)?;
            if d == 0.0 {
                return Err(DirichletError::parse(input, "zero denominator"));
            }
            n / d
        }
        None => parse_decimal(s, input)?,
    };
    Ok(value)
}

fn parse_decimal(s: &str, input: &str) -> Result<f64, DirichletError> {
    let v: f64 = s
        .parse()
        .map_err(|_| DirichletError::parse(input, format!("bad number {s:?}")))?;
    if !v.is_finite() {
        return Err(DirichletError::parse(input, "non-finite value"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Cx, re: f64, im: f64) -> bool {
        (a - Cx::new(re, im)).norm() < 1e-12
    }

    #[test]
    fn real_and_fraction_forms() {
        assert!(close(parse_complex("0.5").unwrap(), 0.5, 0.0));
        assert!(close(parse_complex(" -3 ").unwrap(), -3.0, 0.0));
        assert!(close(parse_complex("1/3").unwrap(), 1.0 / 3.0, 0.0));
        assert!(close(parse_complex("-5/1.2").unwrap(), -5.0 / 1.2, 0.0));
    }

    #[test]
    fn imaginary_forms() {
        assert!(close(parse_complex("i").unwrap(), 0.0, 1.0));
        assert!(close(parse_complex("-i").unwrap(), 0.0, -1.0));
        assert!(close(parse_complex("-2i").unwrap(), 0.0, -2.0));
        assert!(close(parse_complex("1/2i").unwrap(), 0.0, 0.5));
        assert!(close(parse_complex("1+2i").unwrap(), 1.0, 2.0));
        assert!(close(parse_complex("-1/2 - 0.25i").unwrap(), -0.5, -0.25));
        assert!(close(parse_complex("1e-3+i").unwrap(), 1e-3, 1.0));
        assert!(close(parse_complex("2-i").unwrap(), 2.0, -1.0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_complex("").is_err());
        assert!(parse_complex("abc").is_err());
        assert!(parse_complex("1/0").is_err());
        assert!(parse_complex("inf").is_err());
    }

    #[test]
    fn generator_from_four_entries() {
        let m = parse_generator("1, 1; 0, 1").unwrap();
        assert!(close(m[(0, 1)], 1.0, 0.0));
        assert!(close(m[(1, 0)], 0.0, 0.0));
        let m = parse_generator("1.2,0,0,1/1.2").unwrap();
        assert!(close(m[(1, 1)], 1.0 / 1.2, 0.0));
        assert!(matches!(
            parse_generator("1,2,3"),
            Err(DirichletError::Parse { .. })
        ));
    }
}
