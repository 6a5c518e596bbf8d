//! Constant evaluation of bound and width expressions.
//!
//! IP-XACT expressions are SystemVerilog-flavoured: integers, based literals
//! (`8'hFF`), parameter references (by value id or name), the arithmetic and
//! shift operators, parentheses and `$clog2`. [`ConstEvaluator`] reduces such
//! an expression to a number when every reference resolves in the given
//! [`ScopeChain`]. When it cannot, the expression is returned as text with
//! parameter ids replaced by parameter names, which is still valid HDL.

use std::collections::HashMap;

use weave_ipxact::Parameter;

use crate::scope::ScopeChain;

/// Reference chains deeper than this are treated as cyclic.
const MAX_DEPTH: usize = 32;

/// Evaluates expressions within a parameter scope.
pub trait ExpressionEvaluator {
    /// Evaluates `expression` in `scope`.
    ///
    /// Returns the empty string for an empty expression. Never fails: an
    /// expression that cannot be reduced is returned in a readable form.
    fn evaluate(&self, expression: &str, scope: &ScopeChain<'_>) -> String;
}

/// The built-in integer evaluator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstEvaluator;

impl ExpressionEvaluator for ConstEvaluator {
    fn evaluate(&self, expression: &str, scope: &ScopeChain<'_>) -> String {
        let expression = expression.trim();
        if expression.is_empty() {
            return String::new();
        }
        match eval_expr(expression, scope, 0) {
            Some(value) => value.to_string(),
            None => symbolic(expression, scope),
        }
    }
}

/// Evaluates `expression` to an integer, or `None` if any part of it cannot
/// be reduced.
pub fn eval_expr(expression: &str, scope: &ScopeChain<'_>, depth: usize) -> Option<i64> {
    eval_memo(expression, scope, depth, &mut Memo::new())
}

/// Parameter values already reduced during one evaluation.
///
/// Keyed by address: within one evaluation a parameter is always found
/// through the same table, so it always yields the same value.
type Memo = HashMap<*const Parameter, Option<i64>>;

fn eval_memo(
    expression: &str,
    scope: &ScopeChain<'_>,
    depth: usize,
    memo: &mut Memo,
) -> Option<i64> {
    if depth > MAX_DEPTH {
        return None;
    }
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        scope,
        depth,
        memo,
    };
    let value = parser.expr(0)?;
    if parser.pos != tokens.len() {
        return None;
    }
    Some(value)
}

/// Rewrites `expression` with every resolvable parameter reference replaced
/// by the parameter's name.
fn symbolic(expression: &str, scope: &ScopeChain<'_>) -> String {
    let Some(tokens) = tokenize(expression) else {
        return expression.to_string();
    };
    let mut out = String::with_capacity(expression.len());
    let mut last = 0;
    for token in &tokens {
        if let Tok::Ident(name) = token.kind {
            if let Some((param, _)) = scope.lookup(name) {
                out.push_str(&expression[last..token.start]);
                out.push_str(&param.name);
                last = token.end;
            }
        }
    }
    out.push_str(&expression[last..]);
    out
}

/// Parses a Verilog-style integer literal (e.g. `42`, `8'hFF`, `'b1010`).
///
/// Returns `None` for invalid or unsupported formats.
pub(crate) fn parse_verilog_literal(text: &str) -> Option<i64> {
    let text = text.replace('_', "");

    if let Some(tick_pos) = text.find('\'') {
        let after_tick = &text[tick_pos + 1..];
        let after_sign = after_tick
            .strip_prefix(['s', 'S'])
            .unwrap_or(after_tick);
        let base_char = *after_sign.as_bytes().first()?;
        let radix = match base_char {
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            b'd' | b'D' => 10,
            b'h' | b'H' => 16,
            _ => return None,
        };
        let digits = &after_sign[1..];

        // x/z/? digits count as 0 for constant evaluation
        let clean: String = digits
            .chars()
            .map(|c| match c {
                'x' | 'X' | 'z' | 'Z' | '?' => '0',
                other => other,
            })
            .collect();

        return i64::from_str_radix(&clean, radix).ok();
    }

    text.parse::<i64>().ok()
}

/// Computes the ceiling of log-base-2 with `$clog2` semantics
/// (`clog2(0) = clog2(1) = 0`).
fn clog2(n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    let mut result = 0i64;
    let mut val = n - 1;
    while val > 0 {
        result += 1;
        val >>= 1;
    }
    result
}

/// Applies a binary operator to two `i64` operands.
///
/// Returns `None` for division or modulo by zero and out-of-range shifts.
fn apply_binop_i64(op: BinOp, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        BinOp::Add => Some(lhs.wrapping_add(rhs)),
        BinOp::Sub => Some(lhs.wrapping_sub(rhs)),
        BinOp::Mul => Some(lhs.wrapping_mul(rhs)),
        BinOp::Div => lhs.checked_div(rhs),
        BinOp::Mod => lhs.checked_rem(rhs),
        BinOp::Pow => {
            if rhs < 0 {
                Some(0)
            } else {
                Some(lhs.wrapping_pow(u32::try_from(rhs).ok()?))
            }
        }
        BinOp::Shl => lhs.checked_shl(u32::try_from(rhs).ok()?),
        BinOp::Shr => lhs.checked_shr(u32::try_from(rhs).ok()?),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
}

impl BinOp {
    /// Binding power; higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            BinOp::Shl | BinOp::Shr => 1,
            BinOp::Add | BinOp::Sub => 2,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 3,
            BinOp::Pow => 4,
        }
    }

    fn right_assoc(self) -> bool {
        self == BinOp::Pow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok<'e> {
    Number(i64),
    Ident(&'e str),
    Op(BinOp),
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy)]
struct Token<'e> {
    kind: Tok<'e>,
    start: usize,
    end: usize,
}

fn tokenize(text: &str) -> Option<Vec<Token<'_>>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let kind = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' | b'\'' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'\'' | b'?'))
                {
                    i += 1;
                }
                Tok::Number(parse_verilog_literal(&text[start..i])?)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => {
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                Tok::Ident(&text[start..i])
            }
            b'(' => {
                i += 1;
                Tok::LParen
            }
            b')' => {
                i += 1;
                Tok::RParen
            }
            b'+' | b'-' | b'/' | b'%' => {
                i += 1;
                Tok::Op(match c {
                    b'+' => BinOp::Add,
                    b'-' => BinOp::Sub,
                    b'/' => BinOp::Div,
                    _ => BinOp::Mod,
                })
            }
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    i += 2;
                    Tok::Op(BinOp::Pow)
                } else {
                    i += 1;
                    Tok::Op(BinOp::Mul)
                }
            }
            b'<' | b'>' => {
                if bytes.get(i + 1) != Some(&c) {
                    return None;
                }
                i += 2;
                Tok::Op(if c == b'<' { BinOp::Shl } else { BinOp::Shr })
            }
            _ => return None,
        };
        tokens.push(Token {
            kind,
            start,
            end: i,
        });
    }
    Some(tokens)
}

/// Precedence-climbing evaluator over a token slice.
struct Parser<'t, 'e, 's> {
    tokens: &'t [Token<'e>],
    pos: usize,
    scope: &'t ScopeChain<'s>,
    depth: usize,
    memo: &'t mut Memo,
}

impl<'e> Parser<'_, 'e, '_> {
    fn peek(&self) -> Option<Tok<'e>> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn expr(&mut self, min_prec: u8) -> Option<i64> {
        let mut lhs = self.unary()?;
        while let Some(Tok::Op(op)) = self.peek() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.pos += 1;
            let next_min = if op.right_assoc() { prec } else { prec + 1 };
            let rhs = self.expr(next_min)?;
            lhs = apply_binop_i64(op, lhs, rhs)?;
        }
        Some(lhs)
    }

    fn unary(&mut self) -> Option<i64> {
        match self.peek()? {
            Tok::Op(BinOp::Sub) => {
                self.pos += 1;
                Some(self.unary()?.wrapping_neg())
            }
            Tok::Op(BinOp::Add) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Option<i64> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        match token.kind {
            Tok::Number(n) => Some(n),
            Tok::LParen => {
                let value = self.expr(0)?;
                self.expect(Tok::RParen)?;
                Some(value)
            }
            Tok::Ident("$clog2") => {
                self.expect(Tok::LParen)?;
                let value = self.expr(0)?;
                self.expect(Tok::RParen)?;
                Some(clog2(value))
            }
            Tok::Ident(name) => {
                let (param, scope) = self.scope.lookup(name)?;
                let key: *const Parameter = param;
                if let Some(&value) = self.memo.get(&key) {
                    return value;
                }
                let value = eval_memo(&param.value, &scope, self.depth + 1, self.memo);
                self.memo.insert(key, value);
                value
            }
            Tok::Op(_) | Tok::RParen => None,
        }
    }

    fn expect(&mut self, kind: Tok<'e>) -> Option<()> {
        if self.peek()? == kind {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ParameterTable;

    fn eval(expr: &str, params: Vec<Parameter>) -> String {
        let table = ParameterTable::new("test", params);
        ConstEvaluator.evaluate(expr, &ScopeChain::new(&table))
    }

    #[test]
    fn empty_expression_is_empty() {
        assert_eq!(eval("", vec![]), "");
        assert_eq!(eval("   ", vec![]), "");
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("8-1", vec![]), "7");
        assert_eq!(eval("2+3*4", vec![]), "14");
        assert_eq!(eval("(2+3)*4", vec![]), "20");
        assert_eq!(eval("2**3**2", vec![]), "512");
        assert_eq!(eval("1<<4-1", vec![]), "8");
        assert_eq!(eval("-3+10", vec![]), "7");
        assert_eq!(eval("17 % 5", vec![]), "2");
    }

    #[test]
    fn verilog_literals() {
        assert_eq!(eval("8'hFF", vec![]), "255");
        assert_eq!(eval("'b1010", vec![]), "10");
        assert_eq!(eval("32'd1_000", vec![]), "1000");
        assert_eq!(parse_verilog_literal("4'bxx01"), Some(1));
        assert_eq!(parse_verilog_literal("8'q12"), None);
    }

    #[test]
    fn clog2_builtin() {
        assert_eq!(eval("$clog2(1)", vec![]), "0");
        assert_eq!(eval("$clog2(16)", vec![]), "4");
        assert_eq!(eval("$clog2(17)", vec![]), "5");
    }

    #[test]
    fn references_by_id_and_name() {
        let params = vec![
            Parameter::new("WIDTH", "16").with_id("uuid_w"),
            Parameter::new("HALF", "uuid_w/2"),
        ];
        assert_eq!(eval("uuid_w-1", params.clone()), "15");
        assert_eq!(eval("WIDTH-1", params.clone()), "15");
        assert_eq!(eval("HALF", params), "8");
    }

    #[test]
    fn unresolved_reference_keeps_text_with_names() {
        let params = vec![Parameter::new("WIDTH", "16").with_id("uuid_w")];
        assert_eq!(eval("uuid_w - DEPTH", params), "WIDTH - DEPTH");
        assert_eq!(eval("UNKNOWN-1", vec![]), "UNKNOWN-1");
    }

    #[test]
    fn division_by_zero_is_symbolic() {
        assert_eq!(eval("4/0", vec![]), "4/0");
    }

    #[test]
    fn cyclic_reference_terminates() {
        let params = vec![Parameter::new("A", "B+1"), Parameter::new("B", "A+1")];
        assert_eq!(eval("A", params), "A");
    }

    #[test]
    fn shared_references_evaluate_once() {
        // Each level references the one below twice.
        let mut params = vec![Parameter::new("P0", "1")];
        for i in 1..30 {
            params.push(Parameter::new(format!("P{i}"), format!("P{0}+P{0}", i - 1)));
        }
        assert_eq!(eval("P29", params.clone()), (1i64 << 29).to_string());
        assert_eq!(eval("P29 - P28", params), (1i64 << 28).to_string());
    }

    #[test]
    fn malformed_input_returned_verbatim() {
        assert_eq!(eval("a == b", vec![]), "a == b");
        assert_eq!(eval("(1+2", vec![]), "(1+2");
        assert_eq!(eval("1 2", vec![]), "1 2");
    }
}
