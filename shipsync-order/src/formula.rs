//! Commission formula evaluation.
//!
//! Formulas are template strings with `{{variable}}` placeholders resolved
//! from order fields, then parsed as plain arithmetic: decimal literals,
//! `+ - * / ( )` and unary minus. Nothing else is accepted, so a formula
//! configured on a sales partner can never execute arbitrary operations.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("Unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("Unclosed `{{{{` placeholder")]
    UnclosedPlaceholder,
    #[error("Invalid number `{0}`")]
    InvalidNumber(String),
    #[error("Unexpected character `{0}` at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("Unexpected end of formula")]
    UnexpectedEnd,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Arithmetic overflow")]
    Overflow,
}

/// Substitute placeholders and evaluate the resulting expression.
pub fn evaluate(template: &str, vars: &HashMap<String, Decimal>) -> Result<Decimal, FormulaError> {
    let expression = substitute(template, vars)?;
    let mut parser = Parser::new(&expression);
    let value = parser.expression()?;
    parser.expect_end()?;
    Ok(value)
}

fn substitute(template: &str, vars: &HashMap<String, Decimal>) -> Result<String, FormulaError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or(FormulaError::UnclosedPlaceholder)?;
        let name = after[..end].trim();
        let value = vars
            .get(name)
            .ok_or_else(|| FormulaError::UnknownVariable(name.to_string()))?;
        out.push_str(&value.to_string());
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Recursive-descent parser over the fixed arithmetic grammar.
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn expression(&mut self) -> Result<Decimal, FormulaError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = value.checked_add(rhs).ok_or(FormulaError::Overflow)?;
                }
                Some('-') => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = value.checked_sub(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Decimal, FormulaError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    value = value.checked_mul(rhs).ok_or(FormulaError::Overflow)?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor.is_zero() {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value = value.checked_div(divisor).ok_or(FormulaError::Overflow)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<Decimal, FormulaError> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                match self.peek() {
                    Some(')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(c) => Err(FormulaError::UnexpectedChar(c, self.pos)),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(FormulaError::UnexpectedChar(c, self.pos)),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<Decimal, FormulaError> {
        let start = self.pos;
        while matches!(self.chars.get(self.pos), Some(c) if c.is_ascii_digit() || *c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        Decimal::from_str(&literal).map_err(|_| FormulaError::InvalidNumber(literal))
    }

    /// Next non-whitespace character, advancing past whitespace.
    fn peek(&mut self) -> Option<char> {
        while matches!(self.chars.get(self.pos), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.chars.get(self.pos).copied()
    }

    fn expect_end(&mut self) -> Result<(), FormulaError> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(FormulaError::UnexpectedChar(c, self.pos)),
        }
    }
}
