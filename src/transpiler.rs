//! AST-to-C emission.
//!
//! Walks the top-level sibling list the parser produced and writes C source
//! text into a chain of fixed-size chunks, concatenated once at the end.
//! Anything the transpiler cannot confidently emit (an unresolved type, an
//! un-inferable declaration) is skipped with a recorded diagnostic rather
//! than aborting the whole run — one bad function shouldn't cost the rest
//! of the translation unit its output.

use crate::ast::{BinOpData, CallData, FunctionData, LiteralValue, NodeArena, NodeId, NodeKind, VariableDeclData};
use crate::config::TranspilerConfig;
use crate::diagnostics::Diagnostics;
use crate::types::{Base, Datatype};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

const HEADER: &str =
    "#include <stdint.h>\n#include <stdbool.h>\n#include <stdio.h>\n#include <string.h>\n#include <inttypes.h>\n\n";

/// A binop operand that is itself a binop is always parenthesized on
/// re-emission; leaf operands (literals, variables, calls) never are.

fn escape_char(c: u8) -> String {
    match c {
        b'\\' => "\\\\".to_string(),
        b'\'' => "\\'".to_string(),
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        0x07 => "\\a".to_string(),
        0x20..=0x7e => (c as char).to_string(),
        _ => format!("\\x{c:02x}"),
    }
}

/// The lexer hands string literals back as a raw, undecoded view into
/// source (see `TokenKind::String`) — backslash escapes in `raw` are still
/// literal backslash-letter pairs. Decode them to real bytes first so a
/// source `\"` becomes one `"` byte, not three backslashes once re-escaped.
fn decode_string_escapes(raw: &str) -> Vec<u8> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        i += 1;
        match bytes[i] {
            b'\\' => {
                out.push(b'\\');
                i += 1;
            }
            b'n' => {
                out.push(b'\n');
                i += 1;
            }
            b'r' => {
                out.push(b'\r');
                i += 1;
            }
            b't' => {
                out.push(b'\t');
                i += 1;
            }
            b'a' => {
                out.push(0x07);
                i += 1;
            }
            b'\'' => {
                out.push(b'\'');
                i += 1;
            }
            b'"' => {
                out.push(b'"');
                i += 1;
            }
            b'0' => {
                out.push(0);
                i += 1;
            }
            b'1'..=b'7' => {
                let start = i;
                let mut j = i;
                while j < bytes.len() && j < start + 3 && (b'0'..=b'7').contains(&bytes[j]) {
                    j += 1;
                }
                let text = std::str::from_utf8(&bytes[start..j]).unwrap_or("0");
                out.push(u32::from_str_radix(text, 8).unwrap_or(0).min(0xFF) as u8);
                i = j;
            }
            b'x' => {
                i += 1;
                let start = i;
                let mut j = i;
                while j < bytes.len() && bytes[j].is_ascii_hexdigit() {
                    j += 1;
                }
                let text = std::str::from_utf8(&bytes[start..j]).unwrap_or("0");
                out.push(u32::from_str_radix(text, 16).unwrap_or(0).min(0xFF) as u8);
                i = j;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    out
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}

struct Transpiler<'a, 'src> {
    nodes: &'a NodeArena<'src>,
    diagnostics: &'a mut Diagnostics,
    chunks: Vec<String>,
    chunk_size: usize,
}

pub fn transpile<'src>(
    nodes: &NodeArena<'src>,
    top_level: Option<NodeId>,
    diagnostics: &mut Diagnostics,
    config: &TranspilerConfig,
) -> String {
    let mut t = Transpiler {
        nodes,
        diagnostics,
        chunks: Vec::new(),
        chunk_size: config.output_chunk_size,
    };
    t.write(HEADER);
    if let Some(head) = top_level {
        for node in nodes.siblings(Some(head)).collect::<Vec<_>>() {
            t.emit_top_level(node);
        }
    }
    t.finish()
}

impl<'a, 'src> Transpiler<'a, 'src> {
    fn write(&mut self, s: &str) {
        if self.chunks.is_empty() {
            self.chunks.push(String::new());
        }
        let last = self.chunks.last().expect("just ensured non-empty");
        if !last.is_empty() && last.len() + s.len() > self.chunk_size {
            self.chunks.push(String::new());
        }
        self.chunks.last_mut().expect("just ensured non-empty").push_str(s);
    }

    fn finish(self) -> String {
        self.chunks.concat()
    }

    fn emit_top_level(&mut self, id: NodeId) {
        match &self.nodes.get(id).kind {
            NodeKind::Function(f) => self.emit_function(f),
            // The parser already recorded a diagnostic for this form.
            NodeKind::Error(_) => {}
            other => {
                self.diagnostics.warn(format!("cannot transpile top-level node {other:?}"), 0, 0);
            }
        }
    }

    fn emit_function(&mut self, f: &FunctionData<'src>) {
        let return_c = if f.return_ty.is_infer() {
            self.diagnostics
                .warn(format!("function '{}' has no declared return type, emitting 'void'", f.name), 0, 0);
            "void".to_string()
        } else {
            match f.return_ty.c_type() {
                Some(t) => t,
                None => {
                    self.diagnostics
                        .warn(format!("function '{}' has an unsupported return type, skipping", f.name), 0, 0);
                    return;
                }
            }
        };

        let mut params_c = Vec::with_capacity(f.params.len());
        for p in &f.params {
            match p.ty.c_type() {
                Some(t) => params_c.push(format!("{t} {}", p.name)),
                None => {
                    self.diagnostics.warn(
                        format!("function '{}' has a parameter '{}' with an unsupported type, skipping", f.name, p.name),
                        0,
                        0,
                    );
                    return;
                }
            }
        }
        let params_str = if params_c.is_empty() { "void".to_string() } else { params_c.join(", ") };

        self.write(&format!("{return_c} {}({params_str})", f.name));
        match f.body {
            Some(body) => {
                self.write(" {\n");
                for stmt in self.nodes.siblings(Some(body)).collect::<Vec<_>>() {
                    self.emit_stmt(stmt);
                }
                self.write("}\n\n");
            }
            None => self.write(";\n\n"),
        }
    }

    fn emit_stmt(&mut self, id: NodeId) {
        let inner = match &self.nodes.get(id).kind {
            NodeKind::Stmt(inner) => *inner,
            other => {
                self.diagnostics.warn(format!("unexpected statement node {other:?}"), 0, 0);
                return;
            }
        };
        let is_decl = matches!(&self.nodes.get(inner).kind, NodeKind::VariableDecl(_));
        if is_decl {
            let decl = match &self.nodes.get(inner).kind {
                NodeKind::VariableDecl(d) => d.clone(),
                _ => unreachable!(),
            };
            self.emit_var_decl(&decl);
        } else {
            let expr = self.emit_expr(inner);
            self.write(&format!("  {expr};\n"));
        }
    }

    /// Declarations whose datatype is `infer` are accepted only when their
    /// initializer is itself a literal; anything else (no initializer, or
    /// an initializer whose type would require evaluating an expression) is
    /// skipped with a warning, since nothing downstream does type checking.
    fn emit_var_decl(&mut self, d: &VariableDeclData<'src>) {
        let effective_ty: Datatype = if d.ty.is_infer() {
            match d.value {
                Some(v) => match &self.nodes.get(v).kind {
                    NodeKind::Literal { ty, .. } => ty.clone(),
                    _ => {
                        self.diagnostics.warn(
                            format!("cannot infer the type of '{}': initializer is not a literal", d.name),
                            0,
                            0,
                        );
                        return;
                    }
                },
                None => {
                    self.diagnostics
                        .warn(format!("cannot infer the type of '{}': no initializer to infer from", d.name), 0, 0);
                    return;
                }
            }
        } else {
            d.ty.clone()
        };

        let mut ty = effective_ty;
        ty.is_const = ty.is_const || d.is_const;

        let c_ty = match ty.c_type() {
            Some(t) => t,
            None => {
                self.diagnostics.warn(format!("variable '{}' has an unsupported type, skipping", d.name), 0, 0);
                return;
            }
        };

        match d.value {
            Some(v) => {
                let expr = self.emit_expr(v);
                self.write(&format!("  {c_ty} {} = {expr};\n", d.name));
            }
            None => self.write(&format!("  {c_ty} {};\n", d.name)),
        }
    }

    fn emit_expr(&mut self, id: NodeId) -> String {
        match &self.nodes.get(id).kind {
            NodeKind::Literal { value, .. } => Self::emit_literal(value),
            NodeKind::Variable { name, .. } => name.to_string(),
            NodeKind::Call(c) => self.emit_call(&c.clone()),
            NodeKind::BinOp(b) => self.emit_binop(*b),
            other => {
                self.diagnostics.warn(format!("cannot transpile expression node {other:?}"), 0, 0);
                "0".to_string()
            }
        }
    }

    fn emit_literal(value: &LiteralValue<'src>) -> String {
        match value {
            LiteralValue::Int64(v) => v.to_string(),
            LiteralValue::Uint64(v) => format!("{v}u"),
            LiteralValue::Float64(v) => {
                let s = format!("{v}");
                if s.contains('.') || s.contains('e') || s.contains('E') {
                    s
                } else {
                    format!("{s}.0")
                }
            }
            LiteralValue::Char(c) => format!("'{}'", escape_char(*c)),
            LiteralValue::Str(s) => format!("\"{}\"", escape_bytes(&decode_string_escapes(s))),
            LiteralValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        }
    }

    fn is_binop(&self, id: NodeId) -> bool {
        matches!(&self.nodes.get(id).kind, NodeKind::BinOp(_))
    }

    fn emit_binop(&mut self, b: BinOpData) -> String {
        let left_is_binop = self.is_binop(b.left);
        let right_is_binop = self.is_binop(b.right);

        let mut left = self.emit_expr(b.left);
        if left_is_binop {
            left = format!("({left})");
        }

        let mut right = self.emit_expr(b.right);
        if right_is_binop {
            right = format!("({right})");
        }

        format!("{left} {} {right}", b.op.as_c_str())
    }

    fn emit_call(&mut self, c: &CallData<'src>) -> String {
        if c.callee == "print" {
            self.emit_print(c)
        } else {
            let args: Vec<String> = c.args.iter().map(|a| self.emit_expr(*a)).collect();
            format!("{}({})", c.callee, args.join(", "))
        }
    }

    /// Synthesizes a printf call: one format specifier per argument,
    /// separated by spaces, picked from the argument's statically-known
    /// type. Fixed-width integer types use the `<inttypes.h>` `PRI*` macros
    /// (`"%" PRId32`, broken out of the surrounding string literal and
    /// relying on C's adjacent-string-literal concatenation) rather than a
    /// libc type like `%d`/`%lld`, since the width of `int`/`long long` is
    /// not guaranteed across platforms the way `int32_t`/`int64_t` are.
    /// Every numeric argument is cast to its C type at the call site.
    /// Arguments whose type cannot be determined without a symbol table
    /// (anything but a literal or an already-typed variable) fall back to
    /// a plain `%d` with a warning.
    fn emit_print(&mut self, c: &CallData<'src>) -> String {
        let mut literal = String::new();
        let mut parts: Vec<String> = Vec::new();
        let mut rendered_args = Vec::with_capacity(c.args.len());

        for (i, &arg) in c.args.iter().enumerate() {
            let base = self.infer_expr_base(arg);
            if i > 0 {
                literal.push(' ');
            }
            match Self::printf_macro(&base) {
                Some(macro_name) => {
                    literal.push('%');
                    parts.push(format!("\"{literal}\""));
                    parts.push(macro_name.to_string());
                    literal.clear();
                }
                None => literal.push_str(Self::printf_direct_spec(&base, &mut self.diagnostics)),
            }

            let mut rendered = self.emit_expr(arg);
            if let Some(c_ty) = Self::printf_cast_type(&base) {
                rendered = format!("({c_ty}){rendered}");
            }
            rendered_args.push(rendered);
        }
        if !literal.is_empty() || parts.is_empty() {
            parts.push(format!("\"{literal}\""));
        }

        let mut call = format!("printf({}", parts.join(" "));
        for a in rendered_args {
            call.push_str(", ");
            call.push_str(&a);
        }
        call.push(')');
        call
    }

    /// The bare `PRI*` macro name for a fixed-width integer base, or `None`
    /// for bases that use a direct (non-macro) conversion specifier.
    fn printf_macro(base: &Base) -> Option<&'static str> {
        match base {
            Base::Int8 => Some("PRId8"),
            Base::Int16 => Some("PRId16"),
            Base::Int32 => Some("PRId32"),
            Base::Int64 => Some("PRId64"),
            Base::Uint8 => Some("PRIu8"),
            Base::Uint16 => Some("PRIu16"),
            Base::Uint32 => Some("PRIu32"),
            Base::Uint64 => Some("PRIu64"),
            _ => None,
        }
    }

    fn printf_direct_spec(base: &Base, diagnostics: &mut Diagnostics) -> &'static str {
        match base {
            Base::Float32 | Base::Float64 => "%g",
            Base::Bool => "%d",
            Base::Char => "%c",
            Base::String => "%s",
            other => {
                diagnostics.warn(format!("print argument type {other:?} is not statically known, defaulting to %d"), 0, 0);
                "%d"
            }
        }
    }

    /// The C type a print argument should be cast to at the call site, for
    /// every base with a `PRI*`-macro or `%g` specifier. `None` for
    /// string/char/bool (and anything unresolved), which need no cast.
    fn printf_cast_type(base: &Base) -> Option<String> {
        match base {
            Base::Int8 | Base::Int16 | Base::Int32 | Base::Int64 | Base::Uint8 | Base::Uint16 | Base::Uint32 | Base::Uint64 | Base::Float32
            | Base::Float64 => Datatype::simple(base.clone()).c_type(),
            _ => None,
        }
    }

    fn infer_expr_base(&self, id: NodeId) -> Base {
        match &self.nodes.get(id).kind {
            NodeKind::Literal { ty, .. } => ty.base.clone(),
            NodeKind::Variable { ty, .. } => ty.base.clone(),
            _ => Base::Infer,
        }
    }
}
