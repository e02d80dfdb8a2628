//! Computed columns
//!
//! A computed column evaluates a small expression tree over other columns of
//! the table it is attached to, looked up by name. Because references are by
//! name, the same definition works unchanged on any table that exposes those
//! names, including a union whose columns dispatch per row.

use serde::Deserialize;
use super::error::ColumnError;
use super::types::{DataType, Value};

/// Expression argument - column name shorthand, literal number, or nested node
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormulaArg {
    /// Literal integer value
    LiteralInt(i64),
    /// Literal float value
    LiteralFloat(f64),
    /// Shorthand: just a column name string
    ColumnName(String),
    /// Nested expression node
    Node(Box<FormulaNode>),
}

/// Structured expression node
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaNode {
    /// Column reference
    Column(String),
    /// Literal value of any type (strings here are literals, not names)
    Literal(Value),
    /// Addition: add: [a, b, ...]
    Add(Vec<FormulaArg>),
    /// Subtraction: subtract: [a, b, ...]
    Subtract(Vec<FormulaArg>),
    /// Multiplication: multiply: [a, b, ...]
    Multiply(Vec<FormulaArg>),
    /// Division: divide: [a, b, ...]
    Divide(Vec<FormulaArg>),
    /// String concatenation of display text: concat: [a, b, ...]
    Concat(Vec<FormulaArg>),
    /// First non-null argument: coalesce: [a, b, ...]
    Coalesce(Vec<FormulaArg>),
}

/// A column whose value is computed from other columns
#[derive(Debug, Clone, Deserialize)]
pub struct ComputedColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    pub formula: FormulaArg,
}

#[derive(Clone, Copy)]
enum Arith {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ComputedColumn {
    pub fn new(name: impl Into<String>, data_type: DataType, formula: FormulaArg) -> Self {
        Self {
            name: name.into(),
            data_type,
            formula,
        }
    }

    /// Evaluate the formula, resolving column references through `lookup`.
    pub fn evaluate<F>(&self, lookup: &F) -> Result<Value, ColumnError>
    where
        F: Fn(&str) -> Result<Value, ColumnError>,
    {
        let raw = self.eval_arg(&self.formula, lookup)?;
        self.data_type
            .coerce(raw)
            .map_err(|source| ColumnError::TypeMismatch {
                column: self.name.clone(),
                source,
            })
    }

    fn eval_arg<F>(&self, arg: &FormulaArg, lookup: &F) -> Result<Value, ColumnError>
    where
        F: Fn(&str) -> Result<Value, ColumnError>,
    {
        match arg {
            FormulaArg::LiteralInt(i) => Ok(Value::Int(*i)),
            FormulaArg::LiteralFloat(x) => Ok(Value::Float(*x)),
            FormulaArg::ColumnName(name) => lookup(name),
            FormulaArg::Node(node) => self.eval_node(node, lookup),
        }
    }

    fn eval_node<F>(&self, node: &FormulaNode, lookup: &F) -> Result<Value, ColumnError>
    where
        F: Fn(&str) -> Result<Value, ColumnError>,
    {
        match node {
            FormulaNode::Column(name) => lookup(name),
            FormulaNode::Literal(value) => Ok(value.clone()),
            FormulaNode::Add(args) => self.arithmetic(Arith::Add, args, lookup),
            FormulaNode::Subtract(args) => self.arithmetic(Arith::Subtract, args, lookup),
            FormulaNode::Multiply(args) => self.arithmetic(Arith::Multiply, args, lookup),
            FormulaNode::Divide(args) => self.arithmetic(Arith::Divide, args, lookup),
            FormulaNode::Concat(args) => {
                let mut out = String::new();
                for arg in args {
                    out.push_str(&self.eval_arg(arg, lookup)?.to_string());
                }
                Ok(Value::String(out))
            }
            FormulaNode::Coalesce(args) => {
                for arg in args {
                    let v = self.eval_arg(arg, lookup)?;
                    if !v.is_null() {
                        return Ok(v);
                    }
                }
                Ok(Value::Null)
            }
        }
    }

    fn arithmetic<F>(&self, op: Arith, args: &[FormulaArg], lookup: &F) -> Result<Value, ColumnError>
    where
        F: Fn(&str) -> Result<Value, ColumnError>,
    {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_arg(arg, lookup)?);
        }
        let Some((first, rest)) = values.split_first() else {
            return Err(self.failure("arithmetic needs at least one argument"));
        };
        // Null propagates
        if values.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }

        let mut acc = match op {
            Arith::Divide => Value::Float(self.number(first)?),
            _ => self.numeric(first)?,
        };
        for v in rest {
            acc = match (op, &acc, self.numeric(v)?) {
                (Arith::Add, Value::Int(a), Value::Int(b)) => a
                    .checked_add(b)
                    .map(Value::Int)
                    .ok_or_else(|| self.failure("integer overflow"))?,
                (Arith::Subtract, Value::Int(a), Value::Int(b)) => a
                    .checked_sub(b)
                    .map(Value::Int)
                    .ok_or_else(|| self.failure("integer overflow"))?,
                (Arith::Multiply, Value::Int(a), Value::Int(b)) => a
                    .checked_mul(b)
                    .map(Value::Int)
                    .ok_or_else(|| self.failure("integer overflow"))?,
                (op, a, b) => {
                    let (a, b) = (self.number(a)?, self.number(&b)?);
                    match op {
                        Arith::Add => Value::Float(a + b),
                        Arith::Subtract => Value::Float(a - b),
                        Arith::Multiply => Value::Float(a * b),
                        Arith::Divide => {
                            if b == 0.0 {
                                return Err(self.failure("division by zero"));
                            }
                            Value::Float(a / b)
                        }
                    }
                }
            };
        }
        Ok(acc)
    }

    fn numeric(&self, v: &Value) -> Result<Value, ColumnError> {
        match v {
            Value::Int(_) | Value::Float(_) => Ok(v.clone()),
            other => Err(self.failure(&format!("'{}' is not a number", other))),
        }
    }

    fn number(&self, v: &Value) -> Result<f64, ColumnError> {
        v.as_f64()
            .ok_or_else(|| self.failure(&format!("'{}' is not a number", v)))
    }

    fn failure(&self, message: &str) -> ColumnError {
        ColumnError::Formula {
            column: self.name.clone(),
            message: message.to_string(),
        }
    }
}
