//! Cursor over the materialized token buffer.
//!
//! Lookahead and backtracking work by snapshotting and restoring the
//! integer position; tokens are never mutated, so a rollback is O(1) and
//! side-effect free. The buffer is guaranteed by the lexer to end in an
//! Eof token, which the cursor never walks past.

use crate::tokens::{Token, TokenKind};

pub(crate) struct Cursor<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
}

impl<'t, 'src> Cursor<'t, 'src> {
    pub(crate) fn new(tokens: &'t [Token<'src>]) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof));
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> &'t Token<'src> {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Kind of the token `n` positions ahead; Eof once past the end.
    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    /// Consumes and returns the current token. At Eof the cursor stays
    /// put, so loops must check [`Cursor::at_eof`] to terminate.
    pub(crate) fn advance(&mut self) -> &'t Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn bump_if(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(crate) fn snapshot(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, snapshot: usize) {
        self.pos = snapshot;
    }

    /// Statement-boundary recovery: discards tokens until a newline or
    /// `;` was just consumed, the upcoming token is one of the grammar's
    /// statement keywords, or the end of input is reached. Every step
    /// consumes a token, so recovery always terminates.
    pub(crate) fn synchronize(&mut self, keywords: &[TokenKind]) {
        while !self.at_eof() {
            if keywords.contains(&self.peek_kind()) {
                return;
            }
            let token = self.advance();
            if matches!(token.kind, TokenKind::Newline | TokenKind::Semicolon) {
                return;
            }
        }
    }
}
