//! Restricted formula evaluation for `formula`-typed fields.
//!
//! Formulas are parsed into a closed expression union — number literals,
//! field references, `+ - * /`, parentheses — and interpreted over the
//! already-resolved fields of the record. Addition and subtraction are
//! date-aware: `datetime + n` offsets by whole days, `datetime - datetime`
//! yields a day count. Any parse or evaluation failure resolves the field to
//! null; generation continues.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::warn;

use demoforge_core::FormulaField;

use crate::catalog::{aws, saas};
use crate::record::{FieldValue, Record, round_dp};

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum FormulaError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("operator '{0}' does not apply to these operands")]
    TypeMismatch(&'static str),
}

/// Whitelisted expression node union.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Field(String),
    Negate(Box<Expr>),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Runtime value inside a formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Number(f64),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos] as char;
        match ch {
            ' ' | '\t' | '\n' | '\r' => pos += 1,
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            '0'..='9' | '.' => {
                let start = pos;
                while pos < bytes.len() && matches!(bytes[pos] as char, '0'..='9' | '.') {
                    pos += 1;
                }
                let literal = &text[start..pos];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber(literal.to_string()))?;
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = pos;
                while pos < bytes.len()
                    && matches!(bytes[pos] as char, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
                {
                    pos += 1;
                }
                tokens.push(Token::Ident(text[start..pos].to_string()));
            }
            other => return Err(FormulaError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, FormulaError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let right = self.factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        match self.next()? {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::Ident(name) => Ok(Expr::Field(name)),
            Token::Minus => Ok(Expr::Negate(Box::new(self.factor()?))),
            Token::LParen => {
                let inner = self.expr()?;
                match self.next()? {
                    Token::RParen => Ok(inner),
                    other => Err(FormulaError::UnexpectedToken(format!("{other:?}"))),
                }
            }
            other => Err(FormulaError::UnexpectedToken(format!("{other:?}"))),
        }
    }
}

/// Parse formula text into an expression tree.
pub fn parse(text: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(FormulaError::UnexpectedToken(format!(
            "{:?}",
            parser.tokens[parser.pos]
        )));
    }
    Ok(expr)
}

/// Evaluate an expression tree against named bindings.
pub fn eval(expr: &Expr, bindings: &HashMap<String, Scalar>) -> Result<Scalar, FormulaError> {
    match expr {
        Expr::Number(value) => Ok(Scalar::Number(*value)),
        Expr::Field(name) => bindings
            .get(name)
            .copied()
            .ok_or_else(|| FormulaError::UnknownField(name.clone())),
        Expr::Negate(inner) => match eval(inner, bindings)? {
            Scalar::Number(value) => Ok(Scalar::Number(-value)),
            Scalar::DateTime(_) => Err(FormulaError::TypeMismatch("-")),
        },
        Expr::Binary { op, left, right } => {
            let left = eval(left, bindings)?;
            let right = eval(right, bindings)?;
            apply(*op, left, right)
        }
    }
}

fn apply(op: BinOp, left: Scalar, right: Scalar) -> Result<Scalar, FormulaError> {
    use Scalar::{DateTime, Number};
    match (op, left, right) {
        (BinOp::Add, Number(a), Number(b)) => Ok(Number(a + b)),
        (BinOp::Add, DateTime(dt), Number(days)) | (BinOp::Add, Number(days), DateTime(dt)) => {
            Ok(DateTime(dt + Duration::days(days.trunc() as i64)))
        }
        (BinOp::Add, DateTime(_), DateTime(_)) => Err(FormulaError::TypeMismatch("+")),
        (BinOp::Sub, Number(a), Number(b)) => Ok(Number(a - b)),
        (BinOp::Sub, DateTime(dt), Number(days)) => {
            Ok(DateTime(dt - Duration::days(days.trunc() as i64)))
        }
        (BinOp::Sub, DateTime(a), DateTime(b)) => Ok(Number((a - b).num_days() as f64)),
        (BinOp::Sub, Number(_), DateTime(_)) => Err(FormulaError::TypeMismatch("-")),
        (BinOp::Mul, Number(a), Number(b)) => Ok(Number(a * b)),
        (BinOp::Div, Number(a), Number(b)) => Ok(Number(a / b)),
        (BinOp::Mul, _, _) => Err(FormulaError::TypeMismatch("*")),
        (BinOp::Div, _, _) => Err(FormulaError::TypeMismatch("/")),
    }
}

/// Expose the record's resolved fields as formula bindings. String values
/// that parse as ISO datetimes or plain dates become datetime scalars so
/// date arithmetic works; booleans bind as 0/1. A derived `close_rate`
/// binding is added when the record carries a known `engagement_status`.
pub fn bindings_from_record(record: &Record) -> HashMap<String, Scalar> {
    let mut bindings = HashMap::new();
    for (name, value) in record.iter() {
        match value {
            FieldValue::Int(v) => {
                bindings.insert(name.to_string(), Scalar::Number(*v as f64));
            }
            FieldValue::Float(v) => {
                bindings.insert(name.to_string(), Scalar::Number(*v));
            }
            FieldValue::Bool(v) => {
                bindings.insert(name.to_string(), Scalar::Number(if *v { 1.0 } else { 0.0 }));
            }
            FieldValue::Text(text) => {
                if let Some(dt) = parse_temporal(text) {
                    bindings.insert(name.to_string(), Scalar::DateTime(dt));
                }
            }
            FieldValue::Null => {}
        }
    }

    if !bindings.contains_key("close_rate")
        && let Some(status) = record.get("engagement_status").and_then(FieldValue::as_str)
        && let Some(rate) = saas::close_rate(status)
    {
        bindings.insert("close_rate".to_string(), Scalar::Number(rate));
    }

    bindings
}

fn parse_temporal(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, ISO_DATETIME)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, ISO_DATE)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Evaluate a `formula` field against the partially-built record.
///
/// The cost consistency rule takes precedence: a field named `cost` on a
/// record that already carries `usage_quantity`, `service` and `usage_type`
/// is computed directly as `usage_quantity × rate(service, usage_type)`.
pub fn evaluate_formula(field_name: &str, spec: &FormulaField, record: &Record) -> FieldValue {
    if field_name == "cost"
        && let Some(quantity) = record.get("usage_quantity").and_then(FieldValue::as_f64)
        && let Some(service) = record.get("service").and_then(FieldValue::as_str)
        && let Some(usage_type) = record.get("usage_type").and_then(FieldValue::as_str)
    {
        return FieldValue::Float(round_dp(quantity * aws::rate(service, usage_type), 2));
    }

    let bindings = bindings_from_record(record);
    let result = parse(&spec.formula).and_then(|expr| eval(&expr, &bindings));

    match result {
        Ok(Scalar::Number(value)) => {
            if !value.is_finite() {
                warn!(field = field_name, "formula produced a non-finite number");
                return FieldValue::Null;
            }
            if field_name == "variance_pct" {
                FieldValue::Float(round_dp(value, 4))
            } else {
                FieldValue::Float(round_dp(value, 2))
            }
        }
        Ok(Scalar::DateTime(dt)) => {
            let format = spec
                .output_format
                .as_deref()
                .or(spec.time_format.as_deref())
                .unwrap_or(ISO_DATETIME);
            FieldValue::Text(dt.format(format).to_string())
        }
        Err(err) => {
            warn!(field = field_name, error = %err, "formula evaluation failed");
            FieldValue::Null
        }
    }
}
