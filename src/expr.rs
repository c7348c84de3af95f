//! Minimal OpenSCAD expression grammar for default values.
//!
//! Covers exactly what the value classifier needs to see: literals, lists,
//! identifiers, arithmetic/logical operators, the ternary, calls and
//! indexing. Anything outside the subset (ranges, `let`, unknown syntax)
//! parses to [`Expr::Opaque`], which the classifier treats permissively.

/// Binary operators in the grammar subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Unary operators in the grammar subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// A parsed default-value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    List(Vec<Expr>),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// Syntax outside the grammar subset.
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Punct(char),
    Op(BinaryOp),
    Bang,
}

/// Parse a default-value expression. Never fails: unrecognized or trailing
/// syntax yields [`Expr::Opaque`].
pub fn parse_expr(src: &str) -> Expr {
    let src = src.trim();
    if src.is_empty() {
        return Expr::Opaque;
    }

    let Some(tokens) = lex(src) else {
        return Expr::Opaque;
    };

    let mut parser = Parser { tokens, pos: 0 };
    match parser.expr() {
        Some(expr) if parser.at_end() => expr,
        _ => Expr::Opaque,
    }
}

fn lex(src: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = src.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '[' | ']' | '(' | ')' | ',' | ':' | '?' => {
                tokens.push(Token::Punct(c));
                i += 1;
            }
            '"' => {
                let (s, next) = lex_string(src, i)?;
                tokens.push(Token::Str(s));
                i = next;
            }
            '0'..='9' => {
                let (n, next) = lex_number(src, i)?;
                tokens.push(Token::Number(n));
                i = next;
            }
            '.' if i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() => {
                let (n, next) = lex_number(src, i)?;
                tokens.push(Token::Number(n));
                i = next;
            }
            'a'..='z' | 'A'..='Z' | '_' | '$' => {
                let start = i;
                i += 1;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Token::Ident(src[start..i].to_string()));
            }
            '+' => {
                tokens.push(Token::Op(BinaryOp::Add));
                i += 1;
            }
            '-' => {
                tokens.push(Token::Op(BinaryOp::Sub));
                i += 1;
            }
            '*' => {
                tokens.push(Token::Op(BinaryOp::Mul));
                i += 1;
            }
            '/' => {
                tokens.push(Token::Op(BinaryOp::Div));
                i += 1;
            }
            '%' => {
                tokens.push(Token::Op(BinaryOp::Mod));
                i += 1;
            }
            '^' => {
                tokens.push(Token::Op(BinaryOp::Pow));
                i += 1;
            }
            '=' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::Op(BinaryOp::Eq));
                i += 2;
            }
            '!' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::Op(BinaryOp::Ne));
                i += 2;
            }
            '!' => {
                tokens.push(Token::Bang);
                i += 1;
            }
            '<' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::Op(BinaryOp::Le));
                i += 2;
            }
            '<' => {
                tokens.push(Token::Op(BinaryOp::Lt));
                i += 1;
            }
            '>' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::Op(BinaryOp::Ge));
                i += 2;
            }
            '>' => {
                tokens.push(Token::Op(BinaryOp::Gt));
                i += 1;
            }
            '&' if bytes.get(i + 1) == Some(&b'&') => {
                tokens.push(Token::Op(BinaryOp::And));
                i += 2;
            }
            '|' if bytes.get(i + 1) == Some(&b'|') => {
                tokens.push(Token::Op(BinaryOp::Or));
                i += 2;
            }
            _ => return None,
        }
    }

    Some(tokens)
}

fn lex_string(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut out = String::new();
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some((out, i + 1)),
            b'\\' if i + 1 < bytes.len() && bytes[i + 1].is_ascii() => {
                out.push(bytes[i + 1] as char);
                i += 2;
            }
            _ => {
                // Default values are ASCII in practice; keep multi-byte
                // chars intact by slicing on char boundaries.
                let ch = src[i..].chars().next()?;
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    None
}

fn lex_number(src: &str, start: usize) -> Option<(f64, usize)> {
    let bytes = src.as_bytes();
    let mut i = start;

    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            i = j;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    src[start..i].parse::<f64>().ok().map(|n| (n, i))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_op(&mut self, ops: &[BinaryOp]) -> Option<BinaryOp> {
        if let Some(Token::Op(op)) = self.peek() {
            if ops.contains(op) {
                let op = *op;
                self.pos += 1;
                return Some(op);
            }
        }
        None
    }

    fn expr(&mut self) -> Option<Expr> {
        let cond = self.or_expr()?;

        if self.eat_punct('?') {
            let then = self.expr()?;
            if !self.eat_punct(':') {
                return None;
            }
            let otherwise = self.expr()?;
            return Some(Expr::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }

        Some(cond)
    }

    fn or_expr(&mut self) -> Option<Expr> {
        self.binary_level(&[BinaryOp::Or], Self::and_expr)
    }

    fn and_expr(&mut self) -> Option<Expr> {
        self.binary_level(&[BinaryOp::And], Self::cmp_expr)
    }

    fn cmp_expr(&mut self) -> Option<Expr> {
        self.binary_level(
            &[
                BinaryOp::Eq,
                BinaryOp::Ne,
                BinaryOp::Lt,
                BinaryOp::Le,
                BinaryOp::Gt,
                BinaryOp::Ge,
            ],
            Self::add_expr,
        )
    }

    fn add_expr(&mut self) -> Option<Expr> {
        self.binary_level(&[BinaryOp::Add, BinaryOp::Sub], Self::mul_expr)
    }

    fn mul_expr(&mut self) -> Option<Expr> {
        self.binary_level(
            &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod, BinaryOp::Pow],
            Self::unary_expr,
        )
    }

    fn binary_level(
        &mut self,
        ops: &[BinaryOp],
        next: fn(&mut Self) -> Option<Expr>,
    ) -> Option<Expr> {
        let mut lhs = next(self)?;

        while let Some(op) = self.eat_op(ops) {
            let rhs = next(self)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Some(lhs)
    }

    fn unary_expr(&mut self) -> Option<Expr> {
        if self.eat_op(&[BinaryOp::Sub]).is_some() {
            let operand = self.unary_expr()?;
            return Some(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }

        if self.peek() == Some(&Token::Bang) {
            self.pos += 1;
            let operand = self.unary_expr()?;
            return Some(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }

        self.postfix_expr()
    }

    fn postfix_expr(&mut self) -> Option<Expr> {
        let mut expr = self.primary()?;

        while self.eat_punct('[') {
            let index = self.expr()?;
            if !self.eat_punct(']') {
                return None;
            }
            expr = Expr::Index {
                base: Box::new(expr),
                index: Box::new(index),
            };
        }

        Some(expr)
    }

    fn primary(&mut self) -> Option<Expr> {
        match self.bump()? {
            Token::Number(n) => Some(Expr::Number(n)),
            Token::Str(s) => Some(Expr::Str(s)),
            Token::Ident(name) => {
                if name == "true" {
                    return Some(Expr::Bool(true));
                }
                if name == "false" {
                    return Some(Expr::Bool(false));
                }

                if self.eat_punct('(') {
                    let args = self.comma_separated(')')?;
                    return Some(Expr::Call { name, args });
                }

                Some(Expr::Ident(name))
            }
            Token::Punct('(') => {
                let inner = self.expr()?;
                if !self.eat_punct(')') {
                    return None;
                }
                Some(inner)
            }
            Token::Punct('[') => self.list_or_range(),
            _ => None,
        }
    }

    /// `[a, b, c]` is a list; `[start:end]` and `[start:step:end]` are range
    /// expressions, which sit outside the subset and come back opaque.
    fn list_or_range(&mut self) -> Option<Expr> {
        if self.eat_punct(']') {
            return Some(Expr::List(Vec::new()));
        }

        let first = self.expr()?;

        if self.eat_punct(':') {
            let _second = self.expr()?;
            if self.eat_punct(':') {
                let _third = self.expr()?;
            }
            if !self.eat_punct(']') {
                return None;
            }
            return Some(Expr::Opaque);
        }

        let mut items = vec![first];
        while self.eat_punct(',') {
            items.push(self.expr()?);
        }
        if !self.eat_punct(']') {
            return None;
        }

        Some(Expr::List(items))
    }

    fn comma_separated(&mut self, close: char) -> Option<Vec<Expr>> {
        if self.eat_punct(close) {
            return Some(Vec::new());
        }

        let mut items = vec![self.expr()?];
        while self.eat_punct(',') {
            items.push(self.expr()?);
        }
        if !self.eat_punct(close) {
            return None;
        }

        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(parse_expr("42"), Expr::Number(42.0));
        assert_eq!(parse_expr("3.5"), Expr::Number(3.5));
        assert_eq!(parse_expr("\"hello\""), Expr::Str("hello".to_string()));
        assert_eq!(parse_expr("true"), Expr::Bool(true));
        assert_eq!(parse_expr("false"), Expr::Bool(false));
    }

    #[test]
    fn test_negative_literal() {
        assert_eq!(
            parse_expr("-5"),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::Number(5.0)),
            }
        );
    }

    #[test]
    fn test_list() {
        assert_eq!(
            parse_expr("[1, 2, 3]"),
            Expr::List(vec![
                Expr::Number(1.0),
                Expr::Number(2.0),
                Expr::Number(3.0)
            ])
        );
        assert_eq!(parse_expr("[]"), Expr::List(Vec::new()));
    }

    #[test]
    fn test_multiplication() {
        assert_eq!(
            parse_expr("10 * scale"),
            Expr::Binary {
                op: BinaryOp::Mul,
                lhs: Box::new(Expr::Number(10.0)),
                rhs: Box::new(Expr::Ident("scale".to_string())),
            }
        );
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        let Expr::Binary { op: BinaryOp::Add, rhs, .. } = expr else {
            panic!("expected addition at the top");
        };
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_ternary() {
        assert!(matches!(
            parse_expr("big ? 100 : 10"),
            Expr::Ternary { .. }
        ));
    }

    #[test]
    fn test_call() {
        let expr = parse_expr("max(10, height)");
        let Expr::Call { name, args } = expr else {
            panic!("expected call");
        };
        assert_eq!(name, "max");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_index() {
        assert!(matches!(parse_expr("sizes[0]"), Expr::Index { .. }));
    }

    #[test]
    fn test_range_is_opaque() {
        assert_eq!(parse_expr("[0:10]"), Expr::Opaque);
        assert_eq!(parse_expr("[0:2:10]"), Expr::Opaque);
    }

    #[test]
    fn test_garbage_is_opaque() {
        assert_eq!(parse_expr(""), Expr::Opaque);
        assert_eq!(parse_expr("let (x = 1) x @"), Expr::Opaque);
        assert_eq!(parse_expr("1 2"), Expr::Opaque);
    }
}
