//! Classify default-value expressions.
//!
//! The Customizer only renders literal defaults. Any expression the OpenSCAD
//! interpreter evaluates at load time still computes correctly, but the
//! parameter silently never appears in the UI, so the classifier's job is to
//! distinguish "literal the UI can show" from "computed at load time".

use crate::expr::{Expr, UnaryOp};
use serde::{Deserialize, Serialize};

/// Broad category of a default value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    List,
    Expression,
    Reference,
    Unknown,
}

/// Classification of a default value: its kind, whether it is computed at
/// load time, and a human-readable reason when it is.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueClass {
    pub kind: ValueKind,
    pub is_computed: bool,
    pub reason: Option<String>,
}

impl ValueClass {
    fn literal(kind: ValueKind) -> Self {
        Self {
            kind,
            is_computed: false,
            reason: None,
        }
    }

    fn computed(kind: ValueKind, reason: &str) -> Self {
        Self {
            kind,
            is_computed: true,
            reason: Some(reason.to_string()),
        }
    }
}

/// Classify a parsed default value.
///
/// Unrecognized syntax ([`Expr::Opaque`]) is deliberately permissive: the
/// grammar subset is partial, so the linter under-reports rather than flag
/// constructs it cannot see into.
pub fn classify_value(expr: &Expr) -> ValueClass {
    match expr {
        Expr::Number(_) => ValueClass::literal(ValueKind::Number),
        Expr::Str(_) => ValueClass::literal(ValueKind::String),
        Expr::Bool(_) => ValueClass::literal(ValueKind::Boolean),
        Expr::List(items) => classify_list(items),
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } if matches!(**operand, Expr::Number(_)) => ValueClass::literal(ValueKind::Number),
        Expr::Unary { .. } | Expr::Binary { .. } => ValueClass::computed(
            ValueKind::Expression,
            "contains computed expression (won't appear in Customizer UI)",
        ),
        Expr::Ternary { .. } => ValueClass::computed(
            ValueKind::Expression,
            "has a conditional default (won't appear in Customizer UI)",
        ),
        Expr::Call { .. } => ValueClass::computed(
            ValueKind::Expression,
            "calls a function (won't appear in Customizer UI)",
        ),
        Expr::Ident(_) => ValueClass::computed(
            ValueKind::Reference,
            "references another variable (won't appear in Customizer UI)",
        ),
        // Indexing sits outside the classified subset, like ranges; the
        // linter under-reports rather than guess.
        Expr::Index { .. } | Expr::Opaque => ValueClass::literal(ValueKind::Unknown),
    }
}

fn classify_list(items: &[Expr]) -> ValueClass {
    if items.iter().any(contains_reference) {
        return ValueClass::computed(ValueKind::List, "list contains variable reference");
    }

    if items.iter().any(contains_computation) {
        return ValueClass::computed(ValueKind::List, "list contains computed expression");
    }

    ValueClass::literal(ValueKind::List)
}

fn contains_reference(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) => true,
        Expr::List(items) => items.iter().any(contains_reference),
        _ => false,
    }
}

fn contains_computation(expr: &Expr) -> bool {
    match expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => !matches!(**operand, Expr::Number(_)),
        Expr::Unary { .. }
        | Expr::Binary { .. }
        | Expr::Ternary { .. }
        | Expr::Call { .. } => true,
        Expr::List(items) => items.iter().any(contains_computation),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expr;

    fn classify(src: &str) -> ValueClass {
        classify_value(&parse_expr(src))
    }

    #[test]
    fn test_literals_are_not_computed() {
        assert_eq!(classify("10"), ValueClass::literal(ValueKind::Number));
        assert_eq!(classify("2.5"), ValueClass::literal(ValueKind::Number));
        assert_eq!(classify("\"text\""), ValueClass::literal(ValueKind::String));
        assert_eq!(classify("true"), ValueClass::literal(ValueKind::Boolean));
    }

    #[test]
    fn test_negative_literal_is_not_computed() {
        assert_eq!(classify("-3.5"), ValueClass::literal(ValueKind::Number));
    }

    #[test]
    fn test_literal_list() {
        let class = classify("[1, 2.5, \"a\", -4]");
        assert_eq!(class.kind, ValueKind::List);
        assert!(!class.is_computed);
    }

    #[test]
    fn test_nested_literal_list() {
        let class = classify("[[0, 0], [10, 0], [10, 10]]");
        assert_eq!(class.kind, ValueKind::List);
        assert!(!class.is_computed);
    }

    #[test]
    fn test_list_with_reference() {
        let class = classify("[1, width, 3]");
        assert!(class.is_computed);
        assert_eq!(
            class.reason.as_deref(),
            Some("list contains variable reference")
        );
    }

    #[test]
    fn test_list_with_expression() {
        let class = classify("[1, 2 + 3]");
        assert!(class.is_computed);
        assert_eq!(
            class.reason.as_deref(),
            Some("list contains computed expression")
        );
    }

    #[test]
    fn test_reference_takes_priority_in_list() {
        let class = classify("[2 + 3, width]");
        assert_eq!(
            class.reason.as_deref(),
            Some("list contains variable reference")
        );
    }

    #[test]
    fn test_arithmetic_is_computed() {
        let class = classify("10 * scale");
        assert_eq!(class.kind, ValueKind::Expression);
        assert!(class.is_computed);
        assert!(class.reason.as_deref().unwrap().ends_with("won't appear in Customizer UI)"));
    }

    #[test]
    fn test_call_is_computed() {
        let class = classify("max(10, height)");
        assert!(class.is_computed);
        assert_eq!(
            class.reason.as_deref(),
            Some("calls a function (won't appear in Customizer UI)")
        );
    }

    #[test]
    fn test_ternary_is_computed() {
        assert!(classify("big ? 100 : 10").is_computed);
    }

    #[test]
    fn test_reference_is_computed() {
        let class = classify("other_var");
        assert_eq!(class.kind, ValueKind::Reference);
        assert!(class.is_computed);
    }

    #[test]
    fn test_unrecognized_is_permissive() {
        let class = classify("[0:10]");
        assert_eq!(class.kind, ValueKind::Unknown);
        assert!(!class.is_computed);
    }

    #[test]
    fn test_indexing_is_permissive() {
        let class = classify("sizes[0]");
        assert_eq!(class.kind, ValueKind::Unknown);
        assert!(!class.is_computed);
    }
}
