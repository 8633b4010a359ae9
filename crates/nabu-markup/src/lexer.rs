use crate::error::ParseError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Tag punctuation
    /// `<`
    Lt,
    /// `</`
    LtSlash,
    /// `>`
    Gt,
    /// `/>`
    SlashGt,
    /// `=`
    Eq,
    // Literals
    Name(String),
    /// Quoted attribute value with entities already decoded.
    Str(String),
    /// Character data between tags. Whitespace-only runs are never emitted.
    Text(String),
    // Sentinel
    Eof,
}

/// A token together with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

/// Contextual lexer: inside `<...>` it produces names, `=`, and quoted
/// strings; outside it produces character data and skips comments, the
/// `<?xml ...?>` prolog and `<!DOCTYPE ...>` declarations.
pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
    in_tag: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1, in_tag: false }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let eof = tok.token == Token::Eof;
            tokens.push(tok);
            if eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.rest().chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn err_here(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.line, self.col)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Skip forward until just past `terminator`. `what` names the construct
    /// for the error raised on EOF, reported at its opening position.
    fn skip_past(&mut self, terminator: &str, what: &str, line: usize, col: usize) -> Result<(), ParseError> {
        loop {
            if self.rest().starts_with(terminator) {
                self.advance_n(terminator.chars().count());
                return Ok(());
            }
            if self.advance().is_none() {
                return Err(ParseError::new(format!("unterminated {what}"), line, col));
            }
        }
    }

    fn next_token(&mut self) -> Result<TokenWithPos, ParseError> {
        if self.in_tag {
            self.next_in_tag()
        } else {
            self.next_in_content()
        }
    }

    // ── Content ───────────────────────────────────────────────────────────

    fn next_in_content(&mut self) -> Result<TokenWithPos, ParseError> {
        loop {
            let (line, col) = (self.line, self.col);
            let rest = self.rest();

            if rest.is_empty() {
                return Ok(TokenWithPos { token: Token::Eof, line, col });
            }
            if rest.starts_with("<!--") {
                self.advance_n(4);
                self.skip_past("-->", "comment", line, col)?;
                continue;
            }
            if rest.starts_with("<?") {
                self.advance_n(2);
                self.skip_past("?>", "processing instruction", line, col)?;
                continue;
            }
            if rest.starts_with("<!") {
                self.advance_n(2);
                self.skip_past(">", "declaration", line, col)?;
                continue;
            }
            if rest.starts_with("</") {
                self.advance_n(2);
                self.in_tag = true;
                return Ok(TokenWithPos { token: Token::LtSlash, line, col });
            }
            if rest.starts_with('<') {
                self.advance();
                self.in_tag = true;
                return Ok(TokenWithPos { token: Token::Lt, line, col });
            }

            let text = self.lex_text()?;
            if !text.trim().is_empty() {
                return Ok(TokenWithPos { token: Token::Text(text), line, col });
            }
        }
    }

    fn lex_text(&mut self) -> Result<String, ParseError> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            match c {
                '<' => break,
                '&' => s.push(self.lex_entity()?),
                _ => {
                    self.advance();
                    s.push(c);
                }
            }
        }
        Ok(s)
    }

    // ── Tag interior ──────────────────────────────────────────────────────

    fn next_in_tag(&mut self) -> Result<TokenWithPos, ParseError> {
        self.skip_whitespace();
        let (line, col) = (self.line, self.col);

        let ch = match self.peek() {
            None => return Err(ParseError::new("unexpected end of input inside tag", line, col)),
            Some(c) => c,
        };

        let token = match ch {
            '>' => {
                self.advance();
                self.in_tag = false;
                Token::Gt
            }
            '/' if self.rest().starts_with("/>") => {
                self.advance_n(2);
                self.in_tag = false;
                Token::SlashGt
            }
            '=' => { self.advance(); Token::Eq }
            '"' | '\'' => self.lex_quoted(ch, line, col)?,
            c if is_name_start(c) => self.lex_name(),
            other => return Err(self.err_here(format!("unexpected character {:?} inside tag", other))),
        };
        Ok(TokenWithPos { token, line, col })
    }

    fn lex_quoted(&mut self, quote: char, line: usize, col: usize) -> Result<Token, ParseError> {
        self.advance(); // consume opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::new("unterminated attribute value", line, col)),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('<') => return Err(self.err_here("'<' is not allowed in an attribute value")),
                Some('&') => s.push(self.lex_entity()?),
                Some(c) => {
                    self.advance();
                    s.push(c);
                }
            }
        }
        Ok(Token::Str(s))
    }

    fn lex_name(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.advance();
        }
        Token::Name(self.src[start..self.pos].to_string())
    }

    /// Decode one `&...;` reference at the cursor.
    fn lex_entity(&mut self) -> Result<char, ParseError> {
        let (line, col) = (self.line, self.col);
        let body_start = self.pos + 1;
        let end = match self.rest().find(';') {
            // Real entity names are short; anything longer is a stray `&`.
            Some(i) if i <= 12 => self.pos + i,
            _ => return Err(ParseError::new("unterminated entity reference", line, col)),
        };
        let body = &self.src[body_start..end];

        let decoded = match body {
            "amp"  => Some('&'),
            "lt"   => Some('<'),
            "gt"   => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = body.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
        };

        match decoded {
            Some(c) => {
                self.advance_n(body.chars().count() + 2); // `&` + body + `;`
                Ok(c)
            }
            None => Err(ParseError::new(format!("unknown entity '&{body};'"), line, col)),
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}
