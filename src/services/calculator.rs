//! Calculator operations behind `/api/calc`.

use serde::Serialize;
use thiserror::Error;

use crate::constants::limits::MAX_FACTORIAL;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("No numbers provided")]
    NoValues,

    #[error("Cannot calculate square root of negative number")]
    NegativeSqrt,

    #[error("Whole cannot be zero")]
    ZeroWhole,

    #[error("Number too large for factorial calculation")]
    FactorialTooLarge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub result: f64,
    pub expression: String,
    pub steps: Vec<String>,
}

/// Evaluates `a <op> b` or a single number.
///
/// Operators are tried in the order `+ - * /`; the first one present must
/// split the expression into exactly two operands.
pub fn evaluate(expression: &str) -> Result<Evaluation, CalcError> {
    let expression = expression.trim();

    let (result, step) = if let Some((a, b)) = split_binary(expression, '+')? {
        (a + b, format!("Add {a} + {b} = {}", a + b))
    } else if let Some((a, b)) = split_binary(expression, '-')? {
        (a - b, format!("Subtract {a} - {b} = {}", a - b))
    } else if let Some((a, b)) = split_binary(expression, '*')? {
        (a * b, format!("Multiply {a} × {b} = {}", a * b))
    } else if let Some((a, b)) = split_binary(expression, '/')? {
        if b == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        (a / b, format!("Divide {a} ÷ {b} = {}", a / b))
    } else {
        let value = parse_number(expression)?;
        (value, format!("Direct value: {value}"))
    };

    Ok(Evaluation {
        result,
        expression: expression.to_string(),
        steps: vec![step],
    })
}

fn split_binary(expression: &str, op: char) -> Result<Option<(f64, f64)>, CalcError> {
    if !expression.contains(op) {
        return Ok(None);
    }

    let parts: Vec<&str> = expression.split(op).collect();
    let [a, b] = parts.as_slice() else {
        return Err(CalcError::InvalidExpression(expression.to_string()));
    };

    Ok(Some((parse_number(a)?, parse_number(b)?)))
}

fn parse_number(s: &str) -> Result<f64, CalcError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidExpression(s.trim().to_string()))
}

pub fn sum(values: &[f64]) -> Result<f64, CalcError> {
    if values.is_empty() {
        return Err(CalcError::NoValues);
    }
    Ok(values.iter().sum())
}

pub fn product(values: &[f64]) -> Result<f64, CalcError> {
    if values.is_empty() {
        return Err(CalcError::NoValues);
    }
    Ok(values.iter().product())
}

pub fn sqrt(value: f64) -> Result<f64, CalcError> {
    if value < 0.0 {
        return Err(CalcError::NegativeSqrt);
    }
    Ok(value.sqrt())
}

#[must_use]
pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

pub fn percentage(part: f64, whole: f64) -> Result<f64, CalcError> {
    if whole == 0.0 {
        return Err(CalcError::ZeroWhole);
    }
    Ok(part / whole * 100.0)
}

/// `n!` as a decimal string; 50! does not fit in any primitive integer.
pub fn factorial(n: u32) -> Result<String, CalcError> {
    if n > MAX_FACTORIAL {
        return Err(CalcError::FactorialTooLarge);
    }

    // Little-endian base-10^9 limbs.
    const BASE: u64 = 1_000_000_000;
    let mut limbs: Vec<u64> = vec![1];

    for k in 2..=u64::from(n) {
        let mut carry = 0;
        for limb in &mut limbs {
            let v = *limb * k + carry;
            *limb = v % BASE;
            carry = v / BASE;
        }
        while carry > 0 {
            limbs.push(carry % BASE);
            carry /= BASE;
        }
    }

    let mut out = String::new();
    for (i, limb) in limbs.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&limb.to_string());
        } else {
            out.push_str(&format!("{limb:09}"));
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundInterest {
    pub principal: f64,
    pub rate: f64,
    pub time: f64,
    pub final_amount: f64,
    pub interest_earned: f64,
}

#[must_use]
pub fn compound_interest(principal: f64, rate: f64, time: f64) -> CompoundInterest {
    let amount = principal * (1.0 + rate / 100.0).powf(time);

    CompoundInterest {
        principal,
        rate,
        time,
        final_amount: round2(amount),
        interest_earned: round2(amount - principal),
    }
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_binary() {
        assert_eq!(evaluate(" 2 + 3 ").unwrap().result, 5.0);
        assert_eq!(evaluate("10-4").unwrap().result, 6.0);
        assert_eq!(evaluate("6 * 7").unwrap().result, 42.0);
        assert_eq!(evaluate("9/2").unwrap().result, 4.5);
        assert_eq!(evaluate("12.5").unwrap().steps, vec!["Direct value: 12.5"]);
        assert_eq!(evaluate(" 2 + 3 ").unwrap().expression, "2 + 3");
    }

    #[test]
    fn test_evaluate_errors() {
        assert_eq!(evaluate("1/0"), Err(CalcError::DivisionByZero));
        assert!(matches!(
            evaluate("1+2+3"),
            Err(CalcError::InvalidExpression(_))
        ));
        assert!(matches!(
            evaluate("two+2"),
            Err(CalcError::InvalidExpression(_))
        ));
        assert!(matches!(evaluate(""), Err(CalcError::InvalidExpression(_))));
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(sum(&[1.0, 2.0, 3.5]).unwrap(), 6.5);
        assert_eq!(product(&[2.0, 3.0, 4.0]).unwrap(), 24.0);
        assert_eq!(sum(&[]), Err(CalcError::NoValues));
        assert_eq!(product(&[]), Err(CalcError::NoValues));
    }

    #[test]
    fn test_advanced() {
        assert_eq!(sqrt(16.0).unwrap(), 4.0);
        assert_eq!(sqrt(-1.0), Err(CalcError::NegativeSqrt));
        assert_eq!(power(2.0, 10.0), 1024.0);
        assert_eq!(percentage(25.0, 200.0).unwrap(), 12.5);
        assert_eq!(percentage(1.0, 0.0), Err(CalcError::ZeroWhole));
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), "1");
        assert_eq!(factorial(5).unwrap(), "120");
        assert_eq!(factorial(20).unwrap(), "2432902008176640000");
        assert_eq!(
            factorial(50).unwrap(),
            "30414093201713378043612608166064768844377641568960512000000000000"
        );
        assert_eq!(factorial(51), Err(CalcError::FactorialTooLarge));
    }

    #[test]
    fn test_compound_interest() {
        let ci = compound_interest(1000.0, 5.0, 2.0);
        assert_eq!(ci.final_amount, 1102.5);
        assert_eq!(ci.interest_earned, 102.5);
    }
}
