//! Streaming tokenizer with a fixed-size look-ahead ring buffer.
//!
//! Owns all lexing state for a single parsing session (no process-wide
//! globals, per the design notes). Tokens borrow identifier/string payloads
//! directly from the source buffer; the lexer never copies source text.
//! Lexical errors never abort: they surface as `TokenKind::Invalid` tokens
//! carrying a static message, and the scan advances past the offending
//! character so the caller can recover.

use std::fmt;

const RING_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    Const,
    Type,
    Struct,
    Union,
    Void,
    Fn,
    Return,
}

impl Keyword {
    const TABLE: &'static [(&'static str, Keyword)] = &[
        ("return", Keyword::Return),
        ("struct", Keyword::Struct),
        ("const", Keyword::Const),
        ("union", Keyword::Union),
        ("type", Keyword::Type),
        ("let", Keyword::Let),
        ("fn", Keyword::Fn),
        ("void", Keyword::Void),
    ];

    fn lookup(text: &str) -> Option<Keyword> {
        Self::TABLE
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|(_, k)| *k)
    }
}

/// Operators, longest-match order as specified in the grammar (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    ShlEq,
    ShrEq,
    PlusEq,
    MinusEq,
    DivEq,
    TimesEq,
    ModEq,
    Increment,
    Decrement,
    EqEq,
    NotEq,
    AndEq,
    OrEq,
    XorEq,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    Semicolon,
    Comma,
    ParenL,
    ParenR,
    BraceL,
    BraceR,
    BracketL,
    BracketR,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Not,
    Lt,
    Gt,
    And,
    Or,
    Xor,
    BitNot,
    Question,
    Dot,
}

impl Operator {
    /// Longest-match table: order matters, longer spellings first.
    const TABLE: &'static [(&'static str, Operator)] = &[
        ("<<=", Operator::ShlEq),
        (">>=", Operator::ShrEq),
        ("+=", Operator::PlusEq),
        ("-=", Operator::MinusEq),
        ("/=", Operator::DivEq),
        ("*=", Operator::TimesEq),
        ("%=", Operator::ModEq),
        ("++", Operator::Increment),
        ("--", Operator::Decrement),
        ("==", Operator::EqEq),
        ("!=", Operator::NotEq),
        ("&=", Operator::AndEq),
        ("|=", Operator::OrEq),
        ("^=", Operator::XorEq),
        ("&&", Operator::AndAnd),
        ("||", Operator::OrOr),
        ("<<", Operator::Shl),
        (">>", Operator::Shr),
        (";", Operator::Semicolon),
        (",", Operator::Comma),
        ("(", Operator::ParenL),
        (")", Operator::ParenR),
        ("{", Operator::BraceL),
        ("}", Operator::BraceR),
        ("[", Operator::BracketL),
        ("]", Operator::BracketR),
        ("+", Operator::Plus),
        ("-", Operator::Minus),
        ("*", Operator::Star),
        ("/", Operator::Slash),
        ("%", Operator::Percent),
        ("=", Operator::Assign),
        ("!", Operator::Not),
        ("<", Operator::Lt),
        (">", Operator::Gt),
        ("&", Operator::And),
        ("|", Operator::Or),
        ("^", Operator::Xor),
        ("~", Operator::BitNot),
        ("?", Operator::Question),
        (".", Operator::Dot),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'src> {
    Dummy,
    Eof,
    Invalid(&'static str),
    Keyword(Keyword),
    Identifier(&'src str),
    Operator(Operator),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Char(u8),
    /// Raw view into source; backslash escapes are not decoded here (the
    /// transpiler re-escapes on emit, see `transpiler.rs`).
    String(&'src str),
}

impl<'src> TokenKind<'src> {
    pub fn is_operator(&self, op: Operator) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == op)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub line: u32,
    pub col: u32,
    /// Byte offset into the source buffer where this token starts.
    pub offset: usize,
}

impl<'src> Token<'src> {
    fn new(kind: TokenKind<'src>, line: u32, col: u32, offset: usize) -> Self {
        Token { kind, line, col, offset }
    }

    fn dummy(line: u32, col: u32, offset: usize) -> Self {
        Token::new(TokenKind::Dummy, line, col, offset)
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}:{}", self.kind, self.line, self.col)
    }
}

/// Fixed-capacity circular window of buffered tokens.
struct RingBuffer<'src> {
    buf: [Token<'src>; RING_CAPACITY],
    head: usize,
    tail: usize,
    count: usize,
}

impl<'src> RingBuffer<'src> {
    fn new(filler: Token<'src>) -> Self {
        RingBuffer {
            buf: [filler; RING_CAPACITY],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    fn push(&mut self, tok: Token<'src>) {
        self.buf[self.head] = tok;
        self.head = (self.head + 1) % RING_CAPACITY;
        if self.count < RING_CAPACITY {
            self.count += 1;
        } else {
            self.tail = (self.tail + 1) % RING_CAPACITY;
        }
    }

    fn peek(&self, pos: usize) -> Option<Token<'src>> {
        if pos >= self.count {
            return None;
        }
        Some(self.buf[(self.tail + pos) % RING_CAPACITY])
    }

    fn peek_reverse(&self, n: usize) -> Option<Token<'src>> {
        if n >= self.count {
            return None;
        }
        let idx = (self.head + RING_CAPACITY - 1 - n) % RING_CAPACITY;
        Some(self.buf[idx])
    }

    fn consume(&mut self, k: usize) {
        debug_assert!(k <= self.count, "consume() exceeds buffered token count");
        let k = k.min(self.count);
        for _ in 0..k {
            self.tail = (self.tail + 1) % RING_CAPACITY;
            self.count -= 1;
        }
    }

    fn consume_all(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }
}

pub struct Lexer<'src> {
    src: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
    ring: RingBuffer<'src>,
    last_was_operator: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        let dummy = Token::dummy(1, 1, 0);
        let mut lexer = Lexer {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            ring: RingBuffer::new(dummy),
            last_was_operator: false,
        };
        lexer.ring.push(dummy);
        lexer
    }

    /// Reset all state to the beginning of `src`.
    pub fn start(&mut self, src: &'src str) {
        self.src = src.as_bytes();
        self.pos = 0;
        self.line = 1;
        self.col = 1;
        self.last_was_operator = false;
        self.ring.consume_all();
        let dummy = Token::dummy(1, 1, 0);
        self.ring.push(dummy);
    }

    /// Token at relative offset `n` from the current read head (`n < 16`),
    /// lexing and buffering fresh tokens as needed.
    pub fn peek(&mut self, n: usize) -> Token<'src> {
        debug_assert!(n < RING_CAPACITY, "peek() offset must be < ring capacity");
        while self.ring.peek(n).is_none() {
            let tok = self.scan_one();
            self.ring.push(tok);
        }
        self.ring.peek(n).expect("just ensured buffered")
    }

    pub fn peek_reverse(&self, n: usize) -> Token<'src> {
        self.ring
            .peek_reverse(n)
            .unwrap_or_else(|| Token::dummy(self.line, self.col, self.pos))
    }

    /// Advance the read head by `k` tokens; `k` must not exceed buffered
    /// count.
    pub fn consume(&mut self, k: usize) {
        self.ring.consume(k);
    }

    pub fn consume_all(&mut self) {
        self.ring.consume_all();
    }

    fn bump_pos(&mut self, from: usize, to: usize) {
        let mut i = from;
        while i < to {
            match self.src[i] {
                b'\n' => {
                    self.line += 1;
                    self.col = 1;
                }
                b'\r' => {}
                _ => self.col += 1,
            }
            i += 1;
        }
        self.pos = to;
    }

    fn skip_ws(&mut self) {
        loop {
            match self.src.get(self.pos) {
                Some(b'\r') => self.pos += 1,
                Some(b'\n') => {
                    self.pos += 1;
                    self.line += 1;
                    self.col = 1;
                }
                Some(&c) if (c as char).is_whitespace() => {
                    self.pos += 1;
                    self.col += 1;
                }
                _ => break,
            }
        }
    }

    fn at(&self, i: usize) -> u8 {
        self.src.get(i).copied().unwrap_or(0)
    }

    fn rest(&self, i: usize) -> &'src str {
        // SAFETY-free: source is valid UTF-8 (guaranteed by &str input);
        // slicing at a token-start boundary we computed ourselves always
        // lands on a char boundary for the ASCII-only lexical grammar.
        std::str::from_utf8(&self.src[i..]).unwrap_or("")
    }

    /// Scan exactly one token, per the algorithm in §4.2.
    fn scan_one(&mut self) -> Token<'src> {
        self.skip_ws();

        let start = self.pos;
        let line = self.line;
        let col = self.col;

        if self.pos >= self.src.len() {
            self.last_was_operator = false;
            return Token::new(TokenKind::Eof, line, col, start);
        }

        let c = self.at(self.pos);
        let c1 = self.at(self.pos + 1);

        // Comments
        if c == b'/' && c1 == b'/' {
            let mut p = self.pos + 2;
            while p < self.src.len() && self.src[p] != b'\n' {
                p += 1;
            }
            self.bump_pos(self.pos, p);
            return self.scan_one();
        }
        if c == b'/' && c1 == b'*' {
            let mut p = self.pos + 2;
            while p + 1 < self.src.len() && !(self.src[p] == b'*' && self.src[p + 1] == b'/') {
                p += 1;
            }
            if p + 1 < self.src.len() {
                p += 2;
            } else {
                p = self.src.len();
            }
            self.bump_pos(self.pos, p);
            return self.scan_one();
        }

        let is_digit = |b: u8| b.is_ascii_digit();
        let is_num = is_digit(c)
            || (c == b'.' && is_digit(c1))
            || ((c == b'-' || c == b'+') && is_digit(c1) && self.last_was_operator);

        let tok = if is_num {
            self.last_was_operator = false;
            self.scan_number(start, line, col)
        } else if c.is_ascii_alphabetic() || c == b'_' {
            self.last_was_operator = false;
            self.scan_identifier_or_kw(start, line, col)
        } else if c == b'\'' && c1 != b'\'' {
            self.last_was_operator = false;
            self.scan_char(start, line, col)
        } else if c == b'"' {
            self.last_was_operator = false;
            self.scan_string(start, line, col)
        } else {
            let tok = self.scan_operator(start, line, col);
            self.last_was_operator = matches!(tok.kind, TokenKind::Operator(_));
            tok
        };

        tok
    }

    fn scan_number(&mut self, start: usize, line: u32, col: u32) -> Token<'src> {
        let mut p = start;
        let base: u32;
        if self.rest(p).starts_with("0b") {
            base = 2;
            p += 2;
        } else if self.rest(p).starts_with("0x") {
            base = 16;
            p += 2;
        } else {
            base = 10;
        }

        let mut negative = false;
        let sign_byte = self.at(p);
        if sign_byte == b'-' || sign_byte == b'+' {
            if base != 10 {
                self.bump_pos(start, p);
                return Token::new(
                    TokenKind::Invalid(
                        "invalid leading '+' or '-' for non-decimal number literal",
                    ),
                    line,
                    col,
                    start,
                );
            }
            negative = sign_byte == b'-';
            p += 1;
        }

        let digits_start = p;
        let mut is_float = false;
        loop {
            let b = self.at(p);
            if b == 0 {
                break;
            }
            if base == 2 && b != b'0' && b != b'1' {
                break;
            }
            if base == 10 && !b.is_ascii_digit() && b != b'.' {
                break;
            }
            if base == 16 && !b.is_ascii_hexdigit() {
                break;
            }
            if b == b'.' {
                if is_float {
                    self.bump_pos(start, p);
                    return Token::new(
                        TokenKind::Invalid("invalid number literal with multiple decimal points"),
                        line,
                        col,
                        start,
                    );
                }
                if base != 10 {
                    self.bump_pos(start, p);
                    return Token::new(
                        TokenKind::Invalid("invalid float literal with non-decimal base"),
                        line,
                        col,
                        start,
                    );
                }
                if !self.at(p + 1).is_ascii_digit() {
                    self.bump_pos(start, p);
                    return Token::new(
                        TokenKind::Invalid(
                            "invalid float literal with no digits after decimal point",
                        ),
                        line,
                        col,
                        start,
                    );
                }
                is_float = true;
            }
            p += 1;
        }

        let text = self.rest(digits_start).get(..p - digits_start).unwrap_or("");

        let kind = if is_float {
            match text.parse::<f64>() {
                Ok(mut v) => {
                    if negative {
                        v = -v;
                    }
                    TokenKind::Float64(v)
                }
                Err(_) => {
                    self.bump_pos(start, p);
                    return Token::new(TokenKind::Invalid("invalid float literal"), line, col, start);
                }
            }
        } else if base == 10 {
            match u64::from_str_radix(text, 10) {
                Ok(v) => {
                    if negative {
                        const BOUNDARY: u64 = i64::MAX as u64 + 1;
                        if v > BOUNDARY {
                            self.bump_pos(start, p);
                            return Token::new(
                                TokenKind::Invalid(
                                    "invalid integer literal, value too small to fit in int64",
                                ),
                                line,
                                col,
                                start,
                            );
                        }
                        let signed = if v == BOUNDARY {
                            i64::MIN
                        } else {
                            -(v as i64)
                        };
                        TokenKind::Int64(signed)
                    } else {
                        TokenKind::Uint64(v)
                    }
                }
                Err(_) => {
                    self.bump_pos(start, p);
                    return Token::new(TokenKind::Invalid("invalid integer literal"), line, col, start);
                }
            }
        } else {
            match u64::from_str_radix(text, base) {
                Ok(v) => TokenKind::Uint64(v),
                Err(_) => {
                    self.bump_pos(start, p);
                    return Token::new(TokenKind::Invalid("invalid integer literal"), line, col, start);
                }
            }
        };

        self.bump_pos(start, p);
        Token::new(kind, line, col, start)
    }

    fn scan_identifier_or_kw(&mut self, start: usize, line: u32, col: u32) -> Token<'src> {
        let mut p = start;
        while p < self.src.len() && (self.src[p].is_ascii_alphanumeric() || self.src[p] == b'_') {
            p += 1;
        }
        let text = &self.rest(start)[..p - start];
        let kind = match Keyword::lookup(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier(text),
        };
        self.bump_pos(start, p);
        Token::new(kind, line, col, start)
    }

    fn scan_char(&mut self, start: usize, line: u32, col: u32) -> Token<'src> {
        let mut p = start + 1; // skip opening '
        let c = self.at(p);

        if c == b'\'' {
            self.bump_pos(start, p);
            return Token::new(TokenKind::Invalid("empty char literal"), line, col, start);
        }

        let c1 = self.at(p + 1);
        if c != b'\\' && c1 == b'\'' {
            let value = c;
            p += 2;
            self.bump_pos(start, p);
            return Token::new(TokenKind::Char(value), line, col, start);
        }

        p += 1; // skip backslash
        let esc = self.at(p);
        let value: u8;
        match esc {
            b'\\' => {
                value = b'\\';
                p += 1;
            }
            b'n' => {
                value = b'\n';
                p += 1;
            }
            b'r' => {
                value = b'\r';
                p += 1;
            }
            b't' => {
                value = b'\t';
                p += 1;
            }
            b'a' => {
                value = 0x07;
                p += 1;
            }
            b'\'' => {
                value = b'\'';
                p += 1;
            }
            b'"' => {
                value = b'"';
                p += 1;
            }
            b'0' => {
                value = 0;
                p += 1;
            }
            b'0'..=b'7' => {
                let digits_start = p;
                let mut q = p;
                while q < self.src.len() && (b'0'..=b'7').contains(&self.src[q]) {
                    q += 1;
                }
                let text = &self.rest(digits_start)[..q - digits_start];
                match u32::from_str_radix(text, 8) {
                    Ok(v) if v <= 0xFF => {
                        value = v as u8;
                        p = q;
                    }
                    _ => {
                        self.bump_pos(start, p);
                        return Token::new(
                            TokenKind::Invalid("invalid escape character in char literal"),
                            line,
                            col,
                            start,
                        );
                    }
                }
            }
            b'x' => {
                p += 1;
                let digits_start = p;
                let mut q = p;
                while q < self.src.len() && self.src[q].is_ascii_hexdigit() {
                    q += 1;
                }
                let text = &self.rest(digits_start)[..q - digits_start];
                match u32::from_str_radix(text, 16) {
                    Ok(v) if v <= 0xFF && q > digits_start => {
                        value = v as u8;
                        p = q;
                    }
                    _ => {
                        self.bump_pos(start, p);
                        return Token::new(
                            TokenKind::Invalid("invalid escape character in char literal"),
                            line,
                            col,
                            start,
                        );
                    }
                }
            }
            _ => {
                self.bump_pos(start, p);
                return Token::new(
                    TokenKind::Invalid("invalid escape character in char literal"),
                    line,
                    col,
                    start,
                );
            }
        }

        if self.at(p) != b'\'' {
            self.bump_pos(start, p);
            return Token::new(TokenKind::Invalid("unterminated char literal"), line, col, start);
        }
        p += 1; // skip closing '
        self.bump_pos(start, p);
        Token::new(TokenKind::Char(value), line, col, start)
    }

    fn scan_string(&mut self, start: usize, line: u32, col: u32) -> Token<'src> {
        let mut p = start + 1; // skip opening "
        let str_start = p;

        loop {
            let b = self.at(p);
            if b == 0 || b == b'\n' {
                self.bump_pos(start, p);
                return Token::new(
                    TokenKind::Invalid("unterminated string literal"),
                    line,
                    col,
                    start,
                );
            }
            if b == b'"' {
                break;
            }
            if b == b'\\' {
                p += 1;
                if self.at(p) == 0 {
                    self.bump_pos(start, p);
                    return Token::new(
                        TokenKind::Invalid("unterminated string literal"),
                        line,
                        col,
                        start,
                    );
                }
            }
            p += 1;
        }

        let text = &self.rest(str_start)[..p - str_start];
        p += 1; // skip closing "
        self.bump_pos(start, p);
        Token::new(TokenKind::String(text), line, col, start)
    }

    fn scan_operator(&mut self, start: usize, line: u32, col: u32) -> Token<'src> {
        let rest = self.rest(start);
        for (spelling, op) in Operator::TABLE {
            if rest.starts_with(spelling) {
                let p = start + spelling.len();
                self.bump_pos(start, p);
                return Token::new(TokenKind::Operator(*op), line, col, start);
            }
        }
        self.bump_pos(start, start + 1);
        Token::new(
            TokenKind::Invalid("unrecognized operator"),
            line,
            col,
            start,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind<'_>> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.peek(0);
            if matches!(tok.kind, TokenKind::Eof) {
                break;
            }
            out.push(tok.kind);
            lexer.consume(1);
        }
        out
    }

    #[test]
    fn position_monotonicity() {
        let src = "fn int add(int a, int b) {\n  let int c = a + b;\n}";
        let mut lexer = Lexer::new(src);
        let mut prev: Option<Token> = None;
        loop {
            let tok = lexer.peek(0);
            if matches!(tok.kind, TokenKind::Eof) {
                break;
            }
            if let Some(p) = prev {
                assert!(tok.line > p.line || (tok.line == p.line && tok.col >= p.col));
            }
            prev = Some(tok);
            lexer.consume(1);
        }
    }

    #[test]
    fn peek_consume_consistency() {
        let src = "a + b";
        let mut lexer = Lexer::new(src);
        let t1 = lexer.peek(1);
        lexer.consume(1);
        let t0 = lexer.peek(0);
        assert_eq!(format!("{:?}", t0.kind), format!("{:?}", t1.kind));
    }

    #[test]
    fn identifier_view_matches_source() {
        let src = "let foo_bar = 1;";
        let mut lexer = Lexer::new(src);
        lexer.consume(1); // `let`
        let tok = lexer.peek(0);
        match tok.kind {
            TokenKind::Identifier(s) => assert_eq!(s, "foo_bar"),
            other => panic!("expected identifier, got {:?}", other),
        }
        assert_eq!(&src[tok.offset..tok.offset + "foo_bar".len()], "foo_bar");
    }

    #[test]
    fn decimal_classification() {
        assert_eq!(kinds("42"), vec![TokenKind::Uint64(42)]);
        assert_eq!(kinds("3.14"), vec![TokenKind::Float64(3.14)]);
        assert_eq!(kinds("0x1F"), vec![TokenKind::Uint64(0x1F)]);
        assert_eq!(kinds("0b101"), vec![TokenKind::Uint64(0b101)]);
    }

    #[test]
    fn negative_int64_boundary_accepted() {
        let v = kinds("-9223372036854775808");
        assert_eq!(v, vec![TokenKind::Int64(i64::MIN)]);
    }

    #[test]
    fn negative_int64_overflow_is_invalid() {
        let v = kinds("-9223372036854775809");
        assert!(matches!(v[0], TokenKind::Invalid(_)));
    }

    #[test]
    fn unary_minus_disambiguation() {
        // `x - 5`: minus is a binary operator since `x` (identifier) precedes it.
        let v = kinds("x - 5");
        assert!(matches!(v[1], TokenKind::Operator(Operator::Minus)));

        // `= -5`: minus attaches to the number since `=` (operator) precedes it.
        let v = kinds("= -5");
        assert!(matches!(v[1], TokenKind::Int64(-5)));
    }

    #[test]
    fn unterminated_string_is_invalid() {
        let v = kinds("\"unterminated");
        assert!(matches!(v[0], TokenKind::Invalid(msg) if msg.starts_with("unterminated string literal")));
    }

    #[test]
    fn char_escapes() {
        assert_eq!(kinds("'a'"), vec![TokenKind::Char(b'a')]);
        assert_eq!(kinds("'\\n'"), vec![TokenKind::Char(b'\n')]);
        assert_eq!(kinds("'\\x41'"), vec![TokenKind::Char(0x41)]);
        assert!(matches!(kinds("''")[0], TokenKind::Invalid(_)));
    }

    #[test]
    fn longest_match_operators() {
        assert_eq!(kinds("<<="), vec![TokenKind::Operator(Operator::ShlEq)]);
        assert_eq!(kinds("<<"), vec![TokenKind::Operator(Operator::Shl)]);
        assert_eq!(kinds("<"), vec![TokenKind::Operator(Operator::Lt)]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("1 // comment\n2"), vec![TokenKind::Uint64(1), TokenKind::Uint64(2)]);
        assert_eq!(kinds("1 /* c */ 2"), vec![TokenKind::Uint64(1), TokenKind::Uint64(2)]);
    }

    #[test]
    fn ring_buffer_overflow_drops_oldest() {
        let src = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let mut lexer = Lexer::new(&src);
        // Peek past the ring capacity is disallowed by contract (n < 16);
        // exercise buffering by repeatedly consuming instead.
        for expected in 0..20 {
            let tok = lexer.peek(0);
            assert_eq!(tok.kind, TokenKind::Uint64(expected));
            lexer.consume(1);
        }
    }
}
