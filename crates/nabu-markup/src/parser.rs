use crate::ast::{Attr, MarkupDocument, MarkupNode};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .map(|t| (t.line, t.col))
            .or_else(|| self.tokens.last().map(|t| (t.line, t.col)))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos)
            .map(|t| t.token.clone())
            .unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        let err = self.err("expected a name");
        match self.advance() {
            Token::Name(s) => Ok(s),
            tok => Err(ParseError { message: format!("expected a name, got {:?}", tok), ..err }),
        }
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), ParseError> {
        let err = self.err("");
        let got = self.advance();
        if &got == expected {
            Ok(())
        } else {
            Err(ParseError { message: format!("expected {:?}, got {:?}", expected, got), ..err })
        }
    }

    // ── Document ──────────────────────────────────────────────────────────

    /// Exactly one root element, optionally surrounded by comments and the
    /// prolog (which the lexer already discarded).
    pub fn parse_document(&mut self) -> Result<MarkupDocument, ParseError> {
        let root = match self.peek() {
            Token::Lt  => self.parse_element()?,
            Token::Eof => return Err(self.err("document has no root element")),
            Token::Text(_) => return Err(self.err("text is not allowed outside the root element")),
            tok => return Err(self.err(format!("expected '<', got {:?}", tok))),
        };

        match self.peek() {
            Token::Eof => Ok(MarkupDocument { root }),
            Token::Text(_) => Err(self.err("text is not allowed outside the root element")),
            _ => Err(self.err("only one root element is allowed")),
        }
    }

    // ── Element ───────────────────────────────────────────────────────────

    fn parse_element(&mut self) -> Result<MarkupNode, ParseError> {
        let (line, col) = self.current_pos();
        self.advance(); // consume `<`
        let tag = self.expect_name()?;
        let mut node = MarkupNode { tag, attrs: Vec::new(), children: Vec::new(), line, col };

        loop {
            match self.peek() {
                Token::SlashGt => {
                    self.advance();
                    return Ok(node);
                }
                Token::Gt => {
                    self.advance();
                    break;
                }
                Token::Name(_) => {
                    let attr = self.parse_attr()?;
                    if node.attr(&attr.key).is_some() {
                        return Err(self.err(format!(
                            "duplicate attribute '{}' on <{}>",
                            attr.key, node.tag
                        )));
                    }
                    node.attrs.push(attr);
                }
                tok => return Err(self.err(format!("unexpected {:?} in start tag <{}>", tok, node.tag))),
            }
        }

        self.parse_content(&mut node)?;
        Ok(node)
    }

    /// Children and character data up to and including the matching close tag.
    /// Character data is accepted and discarded.
    fn parse_content(&mut self, node: &mut MarkupNode) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Token::Lt => {
                    let child = self.parse_element()?;
                    node.children.push(child);
                }
                Token::Text(_) => {
                    self.advance();
                }
                Token::LtSlash => {
                    let (line, col) = self.current_pos();
                    self.advance();
                    let close = self.expect_name()?;
                    if close != node.tag {
                        return Err(ParseError::new(
                            format!(
                                "mismatched close tag </{}>, expected </{}> (opened at {}:{})",
                                close, node.tag, node.line, node.col
                            ),
                            line,
                            col,
                        ));
                    }
                    self.expect_token(&Token::Gt)?;
                    return Ok(());
                }
                Token::Eof => {
                    return Err(ParseError::new(
                        format!("unclosed element <{}>", node.tag),
                        node.line,
                        node.col,
                    ));
                }
                tok => return Err(self.err(format!("unexpected {:?} in element content", tok))),
            }
        }
    }

    // ── Attr ──────────────────────────────────────────────────────────────

    fn parse_attr(&mut self) -> Result<Attr, ParseError> {
        let key = self.expect_name()?;
        self.expect_token(&Token::Eq)?;
        let err = self.err("");
        match self.advance() {
            Token::Str(value) => Ok(Attr { key, value }),
            tok => Err(ParseError {
                message: format!("expected a quoted value for '{}', got {:?}", key, tok),
                ..err
            }),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse a `.uiml` source string into a [`MarkupDocument`].
pub fn parse_str(src: &str) -> Result<MarkupDocument, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
