//! Cross-field comparison expressions.
//!
//! A cross-field rule asserts exactly one binary comparison between two
//! operands, each a column reference or a literal. The parser produces an
//! explicit [`Comparison`] AST; the evaluator resolves operands per row.
//!
//! Multi-clause input (clauses joined with `" AND "`) is deliberately
//! rejected with a parse error rather than evaluated: whether conjunctions
//! belong here is an open question in the rule format, and guessing a
//! strategy would change results silently.

use chrono::NaiveDateTime;
use tce_presets::parse_flexible;

use crate::error::ValidationError;
use crate::table::{Table, Value};

/// Comparison operators, longest spellings first so `<=` wins over `<`.
pub const COMPARISON_OPERATORS: &[&str] = &["<=", ">=", "==", "!=", "<", ">"];

/// A binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            _ => None,
        }
    }

    fn apply_ordering(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Lt => ordering == Less,
            Self::Le => ordering != Greater,
            Self::Gt => ordering == Greater,
            Self::Ge => ordering != Less,
            Self::Eq => ordering == Equal,
            Self::Ne => ordering != Equal,
        }
    }
}

/// A typed literal operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Str(String),
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Literal(Literal),
}

/// A parsed cross-field rule: exactly one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

/// Parses an expression like `"start_date <= end_date"` into a
/// [`Comparison`].
///
/// Operands are resolved as column references when they name a column of
/// the table being tested, otherwise as literals typed in this order:
/// number, boolean, date-parseable string, quoted string, bare string.
pub fn parse_comparison(
    expression: &str,
    column_names: &[String],
) -> Result<Comparison, ValidationError> {
    let expression = expression.trim();

    if expression.is_empty() {
        return Err(parse_error(expression, "expression is empty"));
    }

    // Single-comparison engine: conjunctions are not evaluated.
    if expression.contains(" AND ") {
        return Err(parse_error(
            expression,
            "multiple clauses are not supported; the rule engine evaluates exactly one comparison",
        ));
    }

    let (left_text, op, right_text) = split_on_operator(expression)?;

    for side in [left_text, right_text] {
        if COMPARISON_OPERATORS.iter().any(|op| side.contains(op)) {
            return Err(parse_error(
                expression,
                "only one comparison per rule is supported",
            ));
        }
    }

    Ok(Comparison {
        left: parse_operand(left_text, column_names),
        op,
        right: parse_operand(right_text, column_names),
    })
}

fn parse_error(expression: &str, reason: &str) -> ValidationError {
    ValidationError::ExpressionParse {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}

fn split_on_operator(expression: &str) -> Result<(&str, CompareOp, &str), ValidationError> {
    for token in COMPARISON_OPERATORS {
        if let Some(pos) = expression.find(token) {
            let left = expression[..pos].trim();
            let right = expression[pos + token.len()..].trim();
            if left.is_empty() || right.is_empty() {
                return Err(parse_error(expression, "comparison is missing an operand"));
            }
            let op = CompareOp::from_token(token)
                .ok_or_else(|| parse_error(expression, "unknown operator"))?;
            return Ok((left, op, right));
        }
    }
    Err(parse_error(
        expression,
        "no comparison operator found (expected one of <, <=, >, >=, ==, !=)",
    ))
}

fn parse_operand(text: &str, column_names: &[String]) -> Operand {
    if column_names.iter().any(|c| c == text) {
        return Operand::Column(text.to_string());
    }
    Operand::Literal(parse_literal(text))
}

fn parse_literal(text: &str) -> Literal {
    if let Ok(number) = text.parse::<f64>() {
        return Literal::Number(number);
    }
    match text.to_lowercase().as_str() {
        "true" => return Literal::Bool(true),
        "false" => return Literal::Bool(false),
        _ => {}
    }
    if (text.starts_with('"') && text.ends_with('"') && text.len() >= 2)
        || (text.starts_with('\'') && text.ends_with('\'') && text.len() >= 2)
    {
        return Literal::Str(text[1..text.len() - 1].to_string());
    }
    if let Some(date) = parse_flexible(text) {
        return Literal::Date(date);
    }
    Literal::Str(text.to_string())
}

/// An operand resolved against one row.
#[derive(Debug, Clone)]
enum Resolved {
    Null,
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Text(String),
}

fn resolve(operand: &Operand, table: &Table, row: usize) -> Resolved {
    match operand {
        Operand::Column(name) => match table.value(name, row) {
            None | Some(Value::Null) => Resolved::Null,
            Some(Value::Int(i)) => Resolved::Number(*i as f64),
            Some(Value::Float(f)) => Resolved::Number(*f),
            Some(Value::Bool(b)) => Resolved::Bool(*b),
            Some(Value::Str(s)) => Resolved::Text(s.clone()),
        },
        Operand::Literal(Literal::Number(n)) => Resolved::Number(*n),
        Operand::Literal(Literal::Bool(b)) => Resolved::Bool(*b),
        Operand::Literal(Literal::Date(d)) => Resolved::Date(*d),
        Operand::Literal(Literal::Str(s)) => Resolved::Text(s.clone()),
    }
}

/// Evaluates a comparison against one row.
///
/// Null operands satisfy only `!=`. Otherwise both sides are coerced to the
/// strongest common type: numbers when either side is numeric and the other
/// parses as one, dates when either side is a date, else strings compared
/// lexicographically. A side that cannot be coerced to the required type
/// fails the comparison for that row.
pub fn evaluate_comparison(comparison: &Comparison, table: &Table, row: usize) -> bool {
    let left = resolve(&comparison.left, table, row);
    let right = resolve(&comparison.right, table, row);

    if matches!(left, Resolved::Null) || matches!(right, Resolved::Null) {
        return comparison.op == CompareOp::Ne;
    }

    // Numeric comparison when either side is already a number
    if matches!(left, Resolved::Number(_)) || matches!(right, Resolved::Number(_)) {
        return match (as_number(&left), as_number(&right)) {
            (Some(l), Some(r)) => comparison
                .op
                .apply_ordering(l.partial_cmp(&r).unwrap_or(std::cmp::Ordering::Equal)),
            _ => false,
        };
    }

    // Date comparison when either side is a date
    if matches!(left, Resolved::Date(_)) || matches!(right, Resolved::Date(_)) {
        return match (as_date(&left), as_date(&right)) {
            (Some(l), Some(r)) => comparison.op.apply_ordering(l.cmp(&r)),
            _ => false,
        };
    }

    if let (Resolved::Bool(l), Resolved::Bool(r)) = (&left, &right) {
        return comparison.op.apply_ordering(l.cmp(r));
    }

    // Two text operands: compare numerically or as dates when both sides
    // parse that way, so "9" orders below "10" and mixed-format date
    // columns order by date. Lexicographic comparison is the last resort.
    if let (Resolved::Text(l), Resolved::Text(r)) = (&left, &right) {
        if let (Ok(ln), Ok(rn)) = (l.trim().parse::<f64>(), r.trim().parse::<f64>()) {
            return comparison
                .op
                .apply_ordering(ln.partial_cmp(&rn).unwrap_or(std::cmp::Ordering::Equal));
        }
        if let (Some(ld), Some(rd)) = (parse_flexible(l), parse_flexible(r)) {
            return comparison.op.apply_ordering(ld.cmp(&rd));
        }
        return comparison.op.apply_ordering(l.cmp(r));
    }

    let l = as_text(&left);
    let r = as_text(&right);
    comparison.op.apply_ordering(l.cmp(&r))
}

fn as_number(resolved: &Resolved) -> Option<f64> {
    match resolved {
        Resolved::Number(n) => Some(*n),
        Resolved::Text(s) => s.trim().parse::<f64>().ok(),
        Resolved::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_date(resolved: &Resolved) -> Option<NaiveDateTime> {
    match resolved {
        Resolved::Date(d) => Some(*d),
        Resolved::Text(s) => parse_flexible(s),
        _ => None,
    }
}

fn as_text(resolved: &Resolved) -> String {
    match resolved {
        Resolved::Text(s) => s.clone(),
        Resolved::Bool(b) => b.to_string(),
        Resolved::Number(n) => n.to_string(),
        Resolved::Date(d) => d.to_string(),
        Resolved::Null => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> Table {
        Table::from_columns([
            (
                "start_date",
                vec![
                    Value::from("2024-01-01"),
                    Value::from("2024-06-01"),
                    Value::Null,
                ],
            ),
            (
                "end_date",
                vec![
                    Value::from("2024-02-01"),
                    Value::from("2024-01-01"),
                    Value::from("2024-12-31"),
                ],
            ),
            ("qty", vec![Value::Int(5), Value::Int(0), Value::Int(9)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_column_vs_column() {
        let cmp = parse_comparison(
            "start_date <= end_date",
            &columns(&["start_date", "end_date"]),
        )
        .unwrap();
        assert_eq!(cmp.left, Operand::Column("start_date".to_string()));
        assert_eq!(cmp.op, CompareOp::Le);
        assert_eq!(cmp.right, Operand::Column("end_date".to_string()));
    }

    #[test]
    fn test_parse_operator_precedence() {
        // "<=" must not parse as "<" followed by "=..."
        let cmp = parse_comparison("a <= 5", &columns(&["a"])).unwrap();
        assert_eq!(cmp.op, CompareOp::Le);
    }

    #[test]
    fn test_parse_literal_typing() {
        assert_eq!(parse_literal("42"), Literal::Number(42.0));
        assert_eq!(parse_literal("4.5"), Literal::Number(4.5));
        assert_eq!(parse_literal("true"), Literal::Bool(true));
        assert_eq!(parse_literal("False"), Literal::Bool(false));
        assert!(matches!(parse_literal("2024-01-15"), Literal::Date(_)));
        assert_eq!(
            parse_literal("\"quoted\""),
            Literal::Str("quoted".to_string())
        );
        assert_eq!(parse_literal("'single'"), Literal::Str("single".to_string()));
        assert_eq!(parse_literal("bare"), Literal::Str("bare".to_string()));
    }

    #[test]
    fn test_parse_rejects_and_clauses() {
        let err = parse_comparison("a <= b AND b <= c", &columns(&["a", "b", "c"])).unwrap_err();
        assert!(err.to_string().contains("exactly one comparison"));
    }

    #[test]
    fn test_parse_rejects_double_comparison() {
        let err = parse_comparison("a < b < c", &columns(&["a", "b", "c"])).unwrap_err();
        assert!(err.to_string().contains("one comparison"));
    }

    #[test]
    fn test_parse_rejects_missing_operator() {
        let err = parse_comparison("just a value", &columns(&[])).unwrap_err();
        assert!(err.to_string().contains("no comparison operator"));
    }

    #[test]
    fn test_parse_rejects_missing_operand() {
        assert!(parse_comparison("a <=", &columns(&["a"])).is_err());
        assert!(parse_comparison("<= b", &columns(&["b"])).is_err());
    }

    #[test]
    fn test_evaluate_date_columns() {
        let table = table();
        let names = columns(&["start_date", "end_date", "qty"]);
        let cmp = parse_comparison("start_date <= end_date", &names).unwrap();
        assert!(evaluate_comparison(&cmp, &table, 0));
        assert!(!evaluate_comparison(&cmp, &table, 1));
    }

    #[test]
    fn test_text_columns_compare_by_date_across_formats() {
        let table = Table::from_columns([
            ("a", vec![Value::from("2024-01-02")]),
            ("b", vec![Value::from("01/06/2024")]),
        ])
        .unwrap();
        // Lexicographically "2024-01-02" > "01/06/2024"; as dates it is earlier
        let cmp = parse_comparison("a <= b", &columns(&["a", "b"])).unwrap();
        assert!(evaluate_comparison(&cmp, &table, 0));
    }

    #[test]
    fn test_text_columns_compare_numerically() {
        let table = Table::from_columns([
            ("a", vec![Value::from("9")]),
            ("b", vec![Value::from("10")]),
        ])
        .unwrap();
        let cmp = parse_comparison("a < b", &columns(&["a", "b"])).unwrap();
        assert!(evaluate_comparison(&cmp, &table, 0));
    }

    #[test]
    fn test_evaluate_null_operand() {
        let table = table();
        let names = columns(&["start_date", "end_date", "qty"]);
        let cmp = parse_comparison("start_date <= end_date", &names).unwrap();
        // Null start_date fails every operator except !=
        assert!(!evaluate_comparison(&cmp, &table, 2));

        let ne = parse_comparison("start_date != end_date", &names).unwrap();
        assert!(evaluate_comparison(&ne, &table, 2));
    }

    #[test]
    fn test_evaluate_numeric_literal() {
        let table = table();
        let names = columns(&["start_date", "end_date", "qty"]);
        let cmp = parse_comparison("qty > 1", &names).unwrap();
        assert!(evaluate_comparison(&cmp, &table, 0));
        assert!(!evaluate_comparison(&cmp, &table, 1));
    }

    #[test]
    fn test_evaluate_date_literal_against_string_column() {
        let table = table();
        let names = columns(&["start_date", "end_date", "qty"]);
        let cmp = parse_comparison("start_date >= 2024-01-01", &names).unwrap();
        assert!(evaluate_comparison(&cmp, &table, 0));
        assert!(evaluate_comparison(&cmp, &table, 1));
    }

    #[test]
    fn test_evaluate_string_equality() {
        let table = Table::from_columns([(
            "status",
            vec![Value::from("active"), Value::from("closed")],
        )])
        .unwrap();
        let cmp = parse_comparison("status == \"active\"", &columns(&["status"])).unwrap();
        assert!(evaluate_comparison(&cmp, &table, 0));
        assert!(!evaluate_comparison(&cmp, &table, 1));
    }

    #[test]
    fn test_numeric_side_with_unparsable_text_fails_row() {
        let table = Table::from_columns([("v", vec![Value::from("abc")])]).unwrap();
        let cmp = parse_comparison("v < 10", &columns(&["v"])).unwrap();
        assert!(!evaluate_comparison(&cmp, &table, 0));
    }
}
