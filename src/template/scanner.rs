// Single-pass template scanner
//
// One loop over the input characters with explicit expression state. Each
// varspec is rendered the moment `,` or `}` completes it; no intermediate
// tree is built. The `first_token` flag decides prefix-vs-separator for the
// expression and only flips once a varspec actually produces output.

use std::mem;

use crate::error::{ExpandError, Result};
use crate::template::operator::Operator;
use crate::template::render::{self, VarSpec};
use crate::value::Substitutions;

/// Expands an RFC 6570 URI template against a substitution map.
///
/// Undefined variables and empty composites expand to nothing; malformed
/// templates, unsupported value shapes, and length limits on associative
/// values fail with an [`ExpandError`](crate::ExpandError) carrying the
/// offending column.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use uristencil::{expand, Value};
///
/// let mut subs = HashMap::new();
/// subs.insert("who".to_string(), Value::from("fred"));
/// subs.insert("q".to_string(), Value::from("rust templates"));
///
/// assert_eq!(expand("/hello/{who}{?q}", &subs).unwrap(), "/hello/fred?q=rust%20templates");
/// ```
pub fn expand(template: &str, substitutions: &Substitutions) -> Result<String> {
    // Sizing hint only; expansion output is usually close to the template.
    let mut out = String::with_capacity(template.len() * 2);

    let mut in_expr = false;
    let mut name = String::new();
    let mut operator: Option<Operator> = None;
    let mut explode = false;
    let mut max_buf: Option<String> = None;
    let mut first_token = true;

    for (col, ch) in template.chars().enumerate() {
        match ch {
            '{' => {
                in_expr = true;
                name.clear();
                first_token = true;
            }
            '}' => {
                if !in_expr {
                    return Err(ExpandError::Syntax {
                        col,
                        reason: "unexpected closing brace".to_string(),
                    });
                }
                let spec = VarSpec {
                    name: mem::take(&mut name),
                    max_len: parse_max_len(&max_buf, col)?,
                    explode,
                };
                let rendered = render::expand_varspec(
                    operator.unwrap_or(Operator::None),
                    &spec,
                    first_token,
                    substitutions,
                    &mut out,
                    col,
                )?;
                if rendered && first_token {
                    first_token = false;
                }
                in_expr = false;
                operator = None;
                explode = false;
                max_buf = None;
            }
            ',' if in_expr => {
                // Completes the current varspec; operator and first_token
                // persist for the rest of the expression.
                let spec = VarSpec {
                    name: mem::take(&mut name),
                    max_len: parse_max_len(&max_buf, col)?,
                    explode,
                };
                let rendered = render::expand_varspec(
                    operator.unwrap_or(Operator::None),
                    &spec,
                    first_token,
                    substitutions,
                    &mut out,
                    col,
                )?;
                if rendered && first_token {
                    first_token = false;
                }
                explode = false;
                max_buf = None;
            }
            _ if !in_expr => out.push(ch),
            _ => {
                if operator.is_none() {
                    // First character of the expression selects the
                    // operator; anything else starts the variable name.
                    match Operator::from_lead(ch) {
                        Some(op) => operator = Some(op),
                        None => {
                            validate_name_char(ch, col)?;
                            name.push(ch);
                            operator = Some(Operator::None);
                        }
                    }
                } else if let Some(digits) = max_buf.as_mut() {
                    if ch.is_ascii_digit() {
                        digits.push(ch);
                    } else {
                        return Err(ExpandError::Syntax {
                            col,
                            reason: format!("expected a digit in the length limit, found '{ch}'"),
                        });
                    }
                } else if ch == ':' {
                    max_buf = Some(String::new());
                } else if ch == '*' {
                    explode = true;
                } else {
                    validate_name_char(ch, col)?;
                    name.push(ch);
                }
            }
        }
    }

    if in_expr {
        return Err(ExpandError::Syntax {
            col: template.chars().count(),
            reason: "unterminated expression".to_string(),
        });
    }
    Ok(out)
}

/// Parses the accumulated length-limit digits. An absent or empty buffer
/// means no limit; digits that overflow `usize` are rejected.
fn parse_max_len(max_buf: &Option<String>, col: usize) -> Result<Option<usize>> {
    match max_buf {
        None => Ok(None),
        Some(digits) if digits.is_empty() => Ok(None),
        Some(digits) => digits.parse::<usize>().map(Some).map_err(|_| {
            ExpandError::Syntax {
                col,
                reason: format!("cannot parse length limit '{digits}'"),
            }
        }),
    }
}

/// Characters that may not appear in a variable name.
fn validate_name_char(ch: char, col: usize) -> Result<()> {
    match ch {
        '+' | '#' | '/' | ';' | '?' | '&' | ' ' | '!' | '=' | '$' | '|' | '*' | ':' | '~'
        | '-' => Err(ExpandError::Syntax {
            col,
            reason: format!("illegal character '{ch}' in variable name"),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::collections::HashMap;

    fn subs(pairs: &[(&str, &str)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_literal_only_template_passes_through() {
        let input = "http://example.com/a,b;c?d=e";
        assert_eq!(expand(input, &HashMap::new()).unwrap(), input);
    }

    #[test]
    fn test_comma_outside_expression_is_literal() {
        assert_eq!(expand("a,{x},b", &subs(&[("x", "1")])).unwrap(), "a,1,b");
    }

    #[test]
    fn test_operator_persists_across_commas() {
        let values = subs(&[("a", "1"), ("b", "2")]);
        assert_eq!(expand("{/a,b}", &values).unwrap(), "/1/2");
        assert_eq!(expand("{?a,b}", &values).unwrap(), "?a=1&b=2");
    }

    #[test]
    fn test_undefined_does_not_consume_prefix_or_separator() {
        let values = subs(&[("b", "2")]);
        assert_eq!(expand("{/undef,b}", &values).unwrap(), "/2");
        assert_eq!(expand("{?undef,b}", &values).unwrap(), "?b=2");
    }

    #[test]
    fn test_unterminated_expression() {
        let err = expand("{unterminated", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { .. }));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_stray_closing_brace() {
        let err = expand("ab}cd", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { col: 2, .. }));
    }

    #[test]
    fn test_empty_expression_is_an_error() {
        let err = expand("{}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { .. }));
    }

    #[test]
    fn test_illegal_character_in_name_reports_column() {
        let err = expand("{va=lue}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { col: 3, .. }));
    }

    #[test]
    fn test_non_digit_in_length_limit() {
        let err = expand("{var:1a}", &subs(&[("var", "value")])).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { col: 6, .. }));
    }

    #[test]
    fn test_length_limit_overflow_is_rejected() {
        let err = expand("{var:99999999999999999999}", &subs(&[("var", "value")])).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { .. }));
    }

    #[test]
    fn test_empty_length_limit_means_no_limit() {
        assert_eq!(expand("{var:}", &subs(&[("var", "value")])).unwrap(), "value");
    }

    #[test]
    fn test_error_columns_count_characters_not_bytes() {
        // Two multi-byte literal characters precede the bad brace.
        let err = expand("äö}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExpandError::Syntax { col: 2, .. }));
    }
}
