// Per-varspec rendering
//
// Looks up and classifies the variable's value, then appends its expansion
// to the shared output buffer. The caller owns prefix-vs-separator
// bookkeeping through `first_token`; a suppressed value consumes neither.

use crate::error::{ExpandError, Result};
use crate::template::encode::append_encoded;
use crate::template::operator::Operator;
use crate::value::{self, Shape, Substitutions, Value};

/// One comma-separated variable reference inside an expression.
#[derive(Debug)]
pub(crate) struct VarSpec {
    pub name: String,
    pub max_len: Option<usize>,
    pub explode: bool,
}

/// Renders one varspec against the current operator. Returns whether any
/// output was produced, so the scanner can keep `first_token` accurate.
pub(crate) fn expand_varspec(
    op: Operator,
    spec: &VarSpec,
    first_token: bool,
    substitutions: &Substitutions,
    out: &mut String,
    col: usize,
) -> Result<bool> {
    if spec.name.is_empty() {
        return Err(ExpandError::Syntax {
            col,
            reason: "empty variable name".to_string(),
        });
    }

    let Some(raw) = substitutions.get(&spec.name) else {
        return Ok(false);
    };
    let Some(shape) = value::classify(raw, col)? else {
        return Ok(false);
    };

    if first_token {
        out.push_str(op.prefix());
    } else {
        out.push(op.separator());
    }

    match shape {
        Shape::Scalar(s) => add_value(op, &spec.name, &s, spec.max_len, out),
        Shape::List(items) => add_list(op, spec, items, out, col)?,
        Shape::Assoc(pairs) => add_assoc(op, spec, pairs, out, col)?,
    }

    Ok(true)
}

/// Appends one value in full varspec position: named operators get their
/// `key=` wrapper here (Semicolon drops the `=` when the truncated value is
/// empty), reserved-preserving operators skip escaping of reserved
/// characters.
fn add_value(op: Operator, name: &str, value: &str, max_len: Option<usize>, out: &mut String) {
    if op.allow_reserved() {
        append_encoded(value, max_len, true, out);
        return;
    }
    if op.named() {
        out.push_str(name);
        if op == Operator::Semicolon && truncated_is_empty(value, max_len) {
            return;
        }
        out.push('=');
    }
    append_encoded(value, max_len, false, out);
}

/// Appends one bare element (no `key=` wrapper), as used between composite
/// joins.
fn add_value_element(op: Operator, value: &str, max_len: Option<usize>, out: &mut String) {
    append_encoded(value, max_len, op.allow_reserved(), out);
}

fn truncated_is_empty(value: &str, max_len: Option<usize>) -> bool {
    value.is_empty() || max_len == Some(0)
}

fn add_list(
    op: Operator,
    spec: &VarSpec,
    items: &[Value],
    out: &mut String,
    col: usize,
) -> Result<()> {
    let mut first = true;
    for item in items {
        let element = value::scalar_string(item, col)?;
        if first {
            add_value(op, &spec.name, &element, spec.max_len, out);
            first = false;
        } else if spec.explode {
            out.push(op.separator());
            add_value(op, &spec.name, &element, spec.max_len, out);
        } else {
            out.push(',');
            add_value_element(op, &element, spec.max_len, out);
        }
    }
    Ok(())
}

fn add_assoc(
    op: Operator,
    spec: &VarSpec,
    pairs: &[(String, Value)],
    out: &mut String,
    col: usize,
) -> Result<()> {
    if spec.max_len.is_some() {
        return Err(ExpandError::Config {
            col,
            reason: "length limit cannot apply to an associative value".to_string(),
        });
    }

    let mut first = true;
    for (key, raw) in pairs {
        let element = value::scalar_string(raw, col)?;
        if spec.explode {
            if !first {
                out.push(op.separator());
            }
            add_value_element(op, key, None, out);
            out.push('=');
        } else if first {
            add_value(op, &spec.name, key, None, out);
            out.push(',');
        } else {
            out.push(',');
            add_value_element(op, key, None, out);
            out.push(',');
        }
        add_value_element(op, &element, None, out);
        first = false;
    }
    Ok(())
}
