//! Recursive-descent parser with an embedded Pratt expression parser.
//!
//! Top level dispatches on the leading keyword of each form. A parse error
//! anywhere inside a form aborts that form; the top-level loop then records
//! an error node, discards exactly one token, and resumes scanning for the
//! next form. There is no attempt to resynchronize on a higher-level
//! sentinel token (matching balance braces, etc.) — a single token of
//! slippage keeps the recovery logic this small.

use crate::arena::{Arena, ArenaArray};
use crate::ast::{
    BinOpData, BinOpKind, CallData, ErrorData, FunctionData, LiteralValue, NodeArena, NodeId,
    NodeKind, Param, VariableDeclData,
};
use crate::config::TranspilerConfig;
use crate::diagnostics::Diagnostics;
use crate::lexer::{Keyword, Lexer, Operator, Token, TokenKind};
use crate::types::{Base, Datatype};

/// Names recognized as datatypes, independent of the `void` keyword (which
/// the lexer tokenizes separately from identifiers).
const DATATYPE_TABLE: &[(&str, Base)] = &[
    ("int8", Base::Int8),
    ("int16", Base::Int16),
    ("int32", Base::Int32),
    ("int64", Base::Int64),
    ("int", Base::Int32),
    ("uint8", Base::Uint8),
    ("uint16", Base::Uint16),
    ("uint32", Base::Uint32),
    ("uint64", Base::Uint64),
    ("uint", Base::Uint32),
    ("float32", Base::Float32),
    ("float64", Base::Float64),
    ("float", Base::Float32),
    ("bool", Base::Bool),
    ("char", Base::Char),
    ("string", Base::String),
];

type Prec = u8;
const PREC_LOWEST: Prec = 0;
const PREC_SUM: Prec = 1;
const PREC_PRODUCT: Prec = 2;

fn infix_binding(op: Operator) -> Option<(Prec, BinOpKind)> {
    match op {
        Operator::Plus => Some((PREC_SUM, BinOpKind::Add)),
        Operator::Minus => Some((PREC_SUM, BinOpKind::Sub)),
        Operator::Star => Some((PREC_PRODUCT, BinOpKind::Mul)),
        Operator::Slash => Some((PREC_PRODUCT, BinOpKind::Div)),
        Operator::Percent => Some((PREC_PRODUCT, BinOpKind::Mod)),
        _ => None,
    }
}

/// A parse failure, carrying the token where it was detected. Never
/// constructed for lexical errors (those surface as `TokenKind::Invalid`
/// and are handled directly by the top-level loop).
struct ParseErr<'src> {
    message: &'static str,
    token: Token<'src>,
}

fn err<'src>(message: &'static str, token: Token<'src>) -> ParseErr<'src> {
    ParseErr { message, token }
}

pub struct ParseResult<'src> {
    pub nodes: NodeArena<'src>,
    pub top_level: Option<NodeId>,
    pub diagnostics: Diagnostics,
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    arena: Arena,
    nodes: NodeArena<'src>,
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str, config: &TranspilerConfig) -> Self {
        Parser {
            lexer: Lexer::new(src),
            arena: Arena::with_block_size(config.arena_block_size),
            nodes: NodeArena::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parse the whole source buffer into a sibling list of top-level
    /// forms, recovering from errors one token at a time.
    pub fn parse(mut self) -> ParseResult<'src> {
        let mut head: Option<NodeId> = None;
        let mut tail: Option<NodeId> = None;

        loop {
            let tok = self.lexer.peek(0);
            if matches!(tok.kind, TokenKind::Eof) {
                break;
            }
            if let TokenKind::Invalid(msg) = tok.kind {
                self.diagnostics.error(format!("lexical error: {msg}"), tok.line, tok.col);
                self.lexer.consume(1);
                continue;
            }

            let node = match self.parse_top_level() {
                Ok(id) => id,
                Err(e) => {
                    self.diagnostics.error(e.message, e.token.line, e.token.col);
                    self.lexer.consume(1);
                    self.nodes.alloc(NodeKind::Error(ErrorData { message: e.message, token: e.token }))
                }
            };

            match tail {
                Some(t) => self.nodes.set_next(t, node),
                None => head = Some(node),
            }
            tail = Some(node);
        }

        ParseResult { nodes: self.nodes, top_level: head, diagnostics: self.diagnostics }
    }

    fn parse_top_level(&mut self) -> Result<NodeId, ParseErr<'src>> {
        let tok = self.lexer.peek(0);
        match tok.kind {
            TokenKind::Keyword(Keyword::Fn) => self.parse_function(),
            TokenKind::Keyword(Keyword::Struct) => {
                Err(err("'struct' declarations are reserved and not yet implemented", tok))
            }
            TokenKind::Keyword(Keyword::Union) => {
                Err(err("'union' declarations are reserved and not yet implemented", tok))
            }
            TokenKind::Keyword(Keyword::Let) | TokenKind::Keyword(Keyword::Const) => {
                Err(err("global variable declarations are reserved and not yet implemented", tok))
            }
            _ => Err(err("expected a top-level declaration ('fn', 'struct', 'union', 'let' or 'const')", tok)),
        }
    }

    fn lookup_datatype_name(name: &str) -> Option<Base> {
        DATATYPE_TABLE.iter().find(|(n, _)| *n == name).map(|(_, b)| b.clone())
    }

    /// Parse a single datatype name plus its optional `?` (nullable) or `*`
    /// (pointer) suffix. Returns an error without consuming anything when
    /// the current token is not a recognized datatype name, so callers can
    /// use this to probe for an optional datatype.
    fn parse_datatype(&mut self) -> Result<Datatype, ParseErr<'src>> {
        let tok = self.lexer.peek(0);
        let base = match tok.kind {
            TokenKind::Keyword(Keyword::Void) => Base::Void,
            TokenKind::Identifier(name) => match Self::lookup_datatype_name(name) {
                Some(b) => b,
                None => return Err(err("unrecognized datatype name", tok)),
            },
            _ => return Err(err("expected a datatype name", tok)),
        };
        self.lexer.consume(1);

        let mut dt = Datatype::simple(base);
        let suffix = self.lexer.peek(0);
        if suffix.kind.is_operator(Operator::Question) {
            dt.nullable = true;
            self.lexer.consume(1);
        } else if suffix.kind.is_operator(Operator::Star) {
            dt.is_ptr = true;
            self.lexer.consume(1);
        }
        Ok(dt)
    }

    fn expect_identifier(&mut self, what: &'static str) -> Result<&'src str, ParseErr<'src>> {
        let tok = self.lexer.peek(0);
        match tok.kind {
            TokenKind::Identifier(s) => {
                self.lexer.consume(1);
                Ok(s)
            }
            _ => Err(err(what, tok)),
        }
    }

    fn expect_operator(&mut self, op: Operator, what: &'static str) -> Result<(), ParseErr<'src>> {
        let tok = self.lexer.peek(0);
        if !tok.kind.is_operator(op) {
            return Err(err(what, tok));
        }
        self.lexer.consume(1);
        Ok(())
    }

    /// `fn [datatype] NAME ( [params] ) { ... }`. The return type is
    /// optional (absent means infer); unlike the body, a missing return
    /// type is not a parse error, just a probe that is allowed to fail.
    fn parse_function(&mut self) -> Result<NodeId, ParseErr<'src>> {
        self.lexer.consume(1); // 'fn'

        let return_ty = self.parse_datatype().unwrap_or_else(|_| Datatype::infer());

        let name = self.expect_identifier("expected function name")?;
        self.expect_operator(Operator::ParenL, "expected '(' after function name")?;

        let mut params: ArenaArray<Param<'src>> = ArenaArray::with_capacity(&mut self.arena, 16);
        let mut first = true;
        loop {
            let tok = self.lexer.peek(0);
            if tok.kind.is_operator(Operator::ParenR) {
                self.lexer.consume(1);
                break;
            }
            if !first {
                self.expect_operator(Operator::Comma, "expected ',' between parameters")?;
            }

            let mut is_const = false;
            if self.lexer.peek(0).kind.is_keyword(Keyword::Const) {
                self.lexer.consume(1);
                is_const = true;
            }
            let mut ty = self.parse_datatype()?;
            ty.is_const = is_const;
            let pname = self.expect_identifier("expected parameter name")?;

            params.push(&mut self.arena, Param { name: pname, ty });
            first = false;
        }
        let params = params.finish(&mut self.arena);

        let body = self.parse_block()?;

        Ok(self.nodes.alloc(NodeKind::Function(FunctionData { name, return_ty, params, body })))
    }

    /// `{ stmt* }`, returning the head of the body's sibling list.
    fn parse_block(&mut self) -> Result<Option<NodeId>, ParseErr<'src>> {
        self.expect_operator(Operator::BraceL, "expected '{' to start block")?;

        let mut head: Option<NodeId> = None;
        let mut tail: Option<NodeId> = None;
        loop {
            let tok = self.lexer.peek(0);
            if tok.kind.is_operator(Operator::BraceR) {
                self.lexer.consume(1);
                break;
            }
            if matches!(tok.kind, TokenKind::Eof) {
                return Err(err("expected '}' to close block", tok));
            }

            let stmt = self.parse_statement()?;
            match tail {
                Some(t) => self.nodes.set_next(t, stmt),
                None => head = Some(stmt),
            }
            tail = Some(stmt);
        }
        Ok(head)
    }

    fn parse_statement(&mut self) -> Result<NodeId, ParseErr<'src>> {
        let tok = self.lexer.peek(0);
        if tok.kind.is_keyword(Keyword::Let) || tok.kind.is_keyword(Keyword::Const) {
            let decl = self.parse_decl()?;
            return Ok(self.nodes.alloc(NodeKind::Stmt(decl)));
        }
        if tok.kind.is_keyword(Keyword::Return) {
            return Err(err("'return' statements are reserved and not yet implemented", tok));
        }

        let expr = self.parse_expr_stmt()?;
        Ok(self.nodes.alloc(NodeKind::Stmt(expr)))
    }

    /// `let|const [datatype] NAME [= expr] ;`. A `const` without an
    /// initializer is a parse error; a `let` without one is accepted and
    /// marked nullable (there is nothing to read from).
    fn parse_decl(&mut self) -> Result<NodeId, ParseErr<'src>> {
        let is_const = self.lexer.peek(0).kind.is_keyword(Keyword::Const);
        self.lexer.consume(1); // 'let' or 'const'

        let mut ty = self.parse_datatype().unwrap_or_else(|_| Datatype::infer());
        let name = self.expect_identifier("expected variable name")?;

        let eq_tok = self.lexer.peek(0);
        let value = if eq_tok.kind.is_operator(Operator::Assign) {
            self.lexer.consume(1);
            let expr = self.parse_expr(PREC_LOWEST)?;
            Some(expr.ok_or_else(|| err("expected initializer expression", self.lexer.peek(0)))?)
        } else if is_const {
            return Err(err("Const declarations must be immediately assigned", eq_tok));
        } else {
            ty.nullable = true;
            None
        };

        self.expect_operator(Operator::Semicolon, "expected ';' after declaration")?;

        Ok(self.nodes.alloc(NodeKind::VariableDecl(VariableDeclData { name, ty, value, is_const })))
    }

    fn parse_expr_stmt(&mut self) -> Result<NodeId, ParseErr<'src>> {
        let expr = self.parse_expr(PREC_LOWEST)?;
        let expr = expr.ok_or_else(|| err("expected expression", self.lexer.peek(0)))?;
        self.expect_operator(Operator::Semicolon, "expected ';' after expression statement")?;
        Ok(expr)
    }

    /// Precedence-climbing expression parser. `min_prec` is the minimum
    /// binding power an infix operator must have to be consumed at this
    /// recursion depth; each recursive call for a right-hand operand uses
    /// `min_prec + 1`, which makes same-precedence chains left-associative.
    fn parse_expr(&mut self, min_prec: Prec) -> Result<Option<NodeId>, ParseErr<'src>> {
        let lookahead = self.lexer.peek(0);
        if lookahead.kind.is_operator(Operator::Semicolon) || lookahead.kind.is_operator(Operator::Comma) {
            return Ok(None);
        }

        let mut left = self.parse_prefix_atom()?;

        loop {
            let tok = self.lexer.peek(0);
            let op = match tok.kind {
                TokenKind::Operator(op) => op,
                _ => break,
            };
            let (prec, kind) = match infix_binding(op) {
                Some(pk) => pk,
                None => break,
            };
            if prec < min_prec {
                break;
            }
            self.lexer.consume(1);

            let right = self.parse_expr(prec + 1)?;
            let right = right.ok_or_else(|| err("expected right-hand side of binary expression", self.lexer.peek(0)))?;

            left = self.nodes.alloc(NodeKind::BinOp(BinOpData { op: kind, left, right }));
        }

        Ok(Some(left))
    }

    /// Literal / identifier-or-call / parenthesized sub-expression. Call
    /// parsing is folded in here rather than handled as a later infix step:
    /// `NAME (` is unambiguous the moment it is seen, so there is no
    /// precedence decision left to make by the time the loop in
    /// `parse_expr` would otherwise see it.
    fn parse_prefix_atom(&mut self) -> Result<NodeId, ParseErr<'src>> {
        let tok = self.lexer.peek(0);
        match tok.kind {
            TokenKind::Int64(v) => {
                self.lexer.consume(1);
                let base = if v.unsigned_abs() <= i32::MAX as u64 { Base::Int32 } else { Base::Int64 };
                Ok(self.nodes.alloc(NodeKind::Literal { ty: Datatype::simple(base), value: LiteralValue::Int64(v) }))
            }
            TokenKind::Uint64(v) => {
                self.lexer.consume(1);
                let base = if v <= i32::MAX as u64 { Base::Uint32 } else { Base::Uint64 };
                Ok(self.nodes.alloc(NodeKind::Literal { ty: Datatype::simple(base), value: LiteralValue::Uint64(v) }))
            }
            TokenKind::Float64(v) => {
                self.lexer.consume(1);
                Ok(self.nodes.alloc(NodeKind::Literal { ty: Datatype::simple(Base::Float64), value: LiteralValue::Float64(v) }))
            }
            TokenKind::Char(c) => {
                self.lexer.consume(1);
                Ok(self.nodes.alloc(NodeKind::Literal { ty: Datatype::simple(Base::Char), value: LiteralValue::Char(c) }))
            }
            TokenKind::String(s) => {
                self.lexer.consume(1);
                Ok(self.nodes.alloc(NodeKind::Literal { ty: Datatype::simple(Base::String), value: LiteralValue::Str(s) }))
            }
            TokenKind::Identifier(name) => {
                self.lexer.consume(1);
                if self.lexer.peek(0).kind.is_operator(Operator::ParenL) {
                    self.parse_call(name)
                } else {
                    Ok(self.nodes.alloc(NodeKind::Variable { name, ty: Datatype::infer() }))
                }
            }
            TokenKind::Operator(Operator::ParenL) => {
                self.lexer.consume(1);
                let inner = self.parse_expr(PREC_LOWEST)?;
                let inner = inner.ok_or_else(|| err("expected expression inside parentheses", self.lexer.peek(0)))?;
                self.expect_operator(Operator::ParenR, "expected ')' to close parenthesized expression")?;
                Ok(inner)
            }
            _ => Err(err("expected an expression", tok)),
        }
    }

    /// `NAME ( [expr (, expr)*] )`, called with the opening `(` as the
    /// current token.
    fn parse_call(&mut self, callee: &'src str) -> Result<NodeId, ParseErr<'src>> {
        self.lexer.consume(1); // '('

        let mut args: ArenaArray<NodeId> = ArenaArray::with_capacity(&mut self.arena, 8);
        let mut first = true;
        loop {
            let tok = self.lexer.peek(0);
            if tok.kind.is_operator(Operator::ParenR) {
                self.lexer.consume(1);
                break;
            }
            if !first {
                self.expect_operator(Operator::Comma, "expected ',' between call arguments")?;
            }
            let arg = self.parse_expr(PREC_LOWEST)?;
            let arg = arg.ok_or_else(|| err("expected call argument expression", self.lexer.peek(0)))?;
            args.push(&mut self.arena, arg);
            first = false;
        }
        let args = args.finish(&mut self.arena);

        Ok(self.nodes.alloc(NodeKind::Call(CallData { callee, args })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    fn parse(src: &str) -> ParseResult<'_> {
        Parser::new(src, &TranspilerConfig::default()).parse()
    }

    #[test]
    fn parses_function_with_params_and_body() {
        let result = parse("fn int32 add(int32 a, int32 b) { let int32 c = a + b; }");
        assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics.iter().collect::<Vec<_>>());
        let head = result.top_level.expect("one top-level form");
        match &result.nodes.get(head).kind {
            NodeKind::Function(f) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.params[0].name, "a");
                assert!(f.body.is_some());
            }
            other => panic!("expected function node, got {other:?}"),
        }
    }

    #[test]
    fn infers_missing_return_type() {
        let result = parse("fn main() { }");
        let head = result.top_level.expect("one top-level form");
        match &result.nodes.get(head).kind {
            NodeKind::Function(f) => assert!(f.return_ty.is_infer()),
            other => panic!("expected function node, got {other:?}"),
        }
    }

    #[test]
    fn const_without_initializer_is_an_error() {
        let result = parse("fn main() { const int32 x; }");
        assert!(result.diagnostics.has_errors());
        let msg = result.diagnostics.iter().next().unwrap().message.clone();
        assert!(msg.contains("Const declarations must be immediately assigned"));
    }

    #[test]
    fn let_without_initializer_is_nullable() {
        let result = parse("fn main() { let int32 x; }");
        assert!(!result.diagnostics.has_errors());
        let func_head = result.top_level.unwrap();
        let body_head = match &result.nodes.get(func_head).kind {
            NodeKind::Function(f) => f.body.unwrap(),
            other => panic!("expected function node, got {other:?}"),
        };
        let stmt = result.nodes.get(body_head);
        let decl_id = match &stmt.kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("expected stmt node, got {other:?}"),
        };
        match &result.nodes.get(decl_id).kind {
            NodeKind::VariableDecl(d) => {
                assert!(d.ty.nullable);
                assert!(d.value.is_none());
            }
            other => panic!("expected variable decl, got {other:?}"),
        }
    }

    #[test]
    fn left_associative_same_precedence() {
        // a - b - c must parse as (a - b) - c, not a - (b - c).
        let result = parse("fn main() { let float64 r = a - b - c; }");
        let func_head = result.top_level.unwrap();
        let body_head = match &result.nodes.get(func_head).kind {
            NodeKind::Function(f) => f.body.unwrap(),
            other => panic!("expected function node, got {other:?}"),
        };
        let decl_id = match &result.nodes.get(body_head).kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("expected stmt node, got {other:?}"),
        };
        let value = match &result.nodes.get(decl_id).kind {
            NodeKind::VariableDecl(d) => d.value.unwrap(),
            other => panic!("expected variable decl, got {other:?}"),
        };
        let outer = match &result.nodes.get(value).kind {
            NodeKind::BinOp(b) => b,
            other => panic!("expected binop, got {other:?}"),
        };
        assert_eq!(outer.op, BinOpKind::Sub);
        match &result.nodes.get(outer.left).kind {
            NodeKind::BinOp(inner) => assert_eq!(inner.op, BinOpKind::Sub),
            other => panic!("expected nested binop on the left, got {other:?}"),
        }
        match &result.nodes.get(outer.right).kind {
            NodeKind::Variable { name, .. } => assert_eq!(*name, "c"),
            other => panic!("expected bare variable on the right, got {other:?}"),
        }
    }

    #[test]
    fn product_binds_tighter_than_sum() {
        let result = parse("fn main() { let float64 r = a + b * c; }");
        let func_head = result.top_level.unwrap();
        let body_head = match &result.nodes.get(func_head).kind {
            NodeKind::Function(f) => f.body.unwrap(),
            other => panic!("expected function node, got {other:?}"),
        };
        let decl_id = match &result.nodes.get(body_head).kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("expected stmt node, got {other:?}"),
        };
        let value = match &result.nodes.get(decl_id).kind {
            NodeKind::VariableDecl(d) => d.value.unwrap(),
            other => panic!("expected variable decl, got {other:?}"),
        };
        let outer = match &result.nodes.get(value).kind {
            NodeKind::BinOp(b) => b,
            other => panic!("expected binop, got {other:?}"),
        };
        assert_eq!(outer.op, BinOpKind::Add);
        match &result.nodes.get(outer.right).kind {
            NodeKind::BinOp(inner) => assert_eq!(inner.op, BinOpKind::Mul),
            other => panic!("expected nested product on the right, got {other:?}"),
        }
    }

    #[test]
    fn call_with_mixed_argument_types() {
        let result = parse(r#"fn main() { print("hi", 42); }"#);
        let func_head = result.top_level.unwrap();
        let body_head = match &result.nodes.get(func_head).kind {
            NodeKind::Function(f) => f.body.unwrap(),
            other => panic!("expected function node, got {other:?}"),
        };
        let expr_id = match &result.nodes.get(body_head).kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("expected stmt node, got {other:?}"),
        };
        match &result.nodes.get(expr_id).kind {
            NodeKind::Call(c) => {
                assert_eq!(c.callee, "print");
                assert_eq!(c.args.len(), 2);
            }
            other => panic!("expected call node, got {other:?}"),
        }
    }

    #[test]
    fn integer_literal_retyping_boundary() {
        let result = parse("fn main() { let int64 small = 100; let int64 big = 5000000000; }");
        let func_head = result.top_level.unwrap();
        let body_head = match &result.nodes.get(func_head).kind {
            NodeKind::Function(f) => f.body.unwrap(),
            other => panic!("expected function node, got {other:?}"),
        };
        let mut it = result.nodes.siblings(Some(body_head));
        let small_stmt = it.next().unwrap();
        let big_stmt = it.next().unwrap();

        let small_decl = match &result.nodes.get(small_stmt).kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("{other:?}"),
        };
        let small_value = match &result.nodes.get(small_decl).kind {
            NodeKind::VariableDecl(d) => d.value.unwrap(),
            other => panic!("{other:?}"),
        };
        match &result.nodes.get(small_value).kind {
            NodeKind::Literal { ty, .. } => assert_eq!(ty.base, Base::Int32),
            other => panic!("{other:?}"),
        }

        let big_decl = match &result.nodes.get(big_stmt).kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("{other:?}"),
        };
        let big_value = match &result.nodes.get(big_decl).kind {
            NodeKind::VariableDecl(d) => d.value.unwrap(),
            other => panic!("{other:?}"),
        };
        match &result.nodes.get(big_value).kind {
            NodeKind::Literal { ty, .. } => assert_eq!(ty.base, Base::Int64),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn struct_union_and_globals_are_reserved_errors() {
        let result = parse("struct Foo { }");
        assert!(result.diagnostics.has_errors());
        let result = parse("union Bar { }");
        assert!(result.diagnostics.has_errors());
        let result = parse("let int32 x = 1;");
        assert!(result.diagnostics.has_errors());
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let result = parse("fn main() { let int32 x = 1;");
        assert!(result.diagnostics.has_errors());
    }

    #[test]
    fn parenthesized_expression_overrides_precedence() {
        let result = parse("fn main() { let float64 r = (a + b) * c; }");
        let func_head = result.top_level.unwrap();
        let body_head = match &result.nodes.get(func_head).kind {
            NodeKind::Function(f) => f.body.unwrap(),
            other => panic!("{other:?}"),
        };
        let decl_id = match &result.nodes.get(body_head).kind {
            NodeKind::Stmt(id) => *id,
            other => panic!("{other:?}"),
        };
        let value = match &result.nodes.get(decl_id).kind {
            NodeKind::VariableDecl(d) => d.value.unwrap(),
            other => panic!("{other:?}"),
        };
        let outer = match &result.nodes.get(value).kind {
            NodeKind::BinOp(b) => b,
            other => panic!("{other:?}"),
        };
        assert_eq!(outer.op, BinOpKind::Mul);
        match &result.nodes.get(outer.left).kind {
            NodeKind::BinOp(inner) => assert_eq!(inner.op, BinOpKind::Add),
            other => panic!("expected parenthesized add nested on the left, got {other:?}"),
        }
    }
}
