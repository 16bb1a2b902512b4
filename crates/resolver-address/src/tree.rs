use crate::token::{Special, Token, TokenKind};

/// An ordered sequence of address tokens.
///
/// The spec's design notes call out an arena-of-nodes representation
/// to make "detach a sub-range, optionally reattach it later" safe
/// without cyclic ownership. A plain `Vec<Token>` gets the same
/// contract more simply: addresses are a handful of tokens at most,
/// so `Vec::split_off`/`Vec::extend` already give us detach/reattach
/// at the complexity this problem actually needs, without hand-rolled
/// prev/next indices to get wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTree {
    tokens: Vec<Token>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind));
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Detach the sub-range starting at `at` (inclusive) and return it
    /// as a free-standing tree. `self` retains everything strictly
    /// before `at`.
    pub fn sub_keep_before(&mut self, at: usize) -> TokenTree {
        TokenTree {
            tokens: self.tokens.split_off(at),
        }
    }

    /// Re-attach a previously detached tree at the end of this one.
    pub fn append(&mut self, mut other: TokenTree) {
        self.tokens.append(&mut other.tokens);
    }

    /// Index of the rightmost token matching `want`, if any.
    pub fn find_rightmost_special(&self, want: Special) -> Option<usize> {
        self.tokens.iter().rposition(|t| t.is_special(want))
    }

    /// Whether the tree has collapsed to a single empty localpart: the
    /// `EmptyLocal` sentinel, or a lone `""` quoted string.
    pub fn is_empty_local(&self) -> bool {
        match self.tokens.as_slice() {
            [t] => match &t.kind {
                TokenKind::Special(Special::EmptyLocal) => true,
                TokenKind::QuotedString(s) => s.is_empty(),
                _ => false,
            },
            _ => false,
        }
    }

    /// Re-emit the tree in internalized (unquoted-where-unambiguous)
    /// form. Comments carry no addressing semantics and are dropped.
    pub fn to_internal(&self) -> String {
        tokens_to_internal(&self.tokens)
    }

    /// Re-emit the tokens from `start` onward in internalized form,
    /// without detaching them. Used by the peeling loop to read the
    /// text of a candidate domain before deciding whether to strip it.
    pub fn to_internal_from(&self, start: usize) -> String {
        tokens_to_internal(&self.tokens[start..])
    }

    /// Re-emit the tree in externalized (RFC 822 quoted) form: local
    /// parts that need quoting to round-trip safely are quoted.
    pub fn to_external(&self) -> String {
        let mut out = String::new();
        for tok in &self.tokens {
            match &tok.kind {
                TokenKind::Atom(s) => out.push_str(s),
                TokenKind::QuotedString(s) => push_quoted(&mut out, s),
                TokenKind::DomainLiteral(s) => out.push_str(s),
                TokenKind::Comment(s) => {
                    out.push('(');
                    out.push_str(s);
                    out.push(')');
                }
                TokenKind::Special(special) => {
                    if let Some(c) = special.as_char() {
                        out.push(c);
                    }
                }
            }
        }
        out
    }
}

fn tokens_to_internal(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        match &tok.kind {
            TokenKind::Atom(s) => out.push_str(s),
            TokenKind::QuotedString(s) => {
                if needs_quoting(s) {
                    push_quoted(&mut out, s);
                } else {
                    out.push_str(s);
                }
            }
            TokenKind::DomainLiteral(s) => out.push_str(s),
            TokenKind::Comment(_) => {}
            TokenKind::Special(special) => {
                if let Some(c) = special.as_char() {
                    out.push(c);
                }
            }
        }
    }
    out
}

fn needs_quoting(s: &str) -> bool {
    !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::{parse, ParseMode};

    #[test]
    fn round_trip_internal() {
        for addr in ["user@example.com", "a.b.c@example.com", "user@[10.0.0.1]"] {
            let tree = parse(addr, ParseMode::Dequoted).unwrap();
            assert_eq!(tree.to_internal(), addr);
        }
    }

    #[test]
    fn sub_keep_before_splits_and_reattaches() {
        let mut tree = parse("user@hop@remote", ParseMode::Dequoted).unwrap();
        let at = tree.find_rightmost_special(Special::At).unwrap();
        let detached = tree.sub_keep_before(at);
        assert_eq!(tree.to_internal(), "user@hop");
        assert_eq!(detached.to_internal(), "@remote");
        tree.append(detached);
        assert_eq!(tree.to_internal(), "user@hop@remote");
    }

    #[test]
    fn externalize_then_internalize_round_trips() {
        for addr in [
            "user@example.com",
            "a.b.c@example.com",
            "user@[10.0.0.1]",
            r#""quoted user"@example.com"#,
        ] {
            let tree = parse(addr, ParseMode::Dequoted).unwrap();
            let external = tree.to_external();
            let reparsed = parse(&external, ParseMode::Dequoted).unwrap();
            assert_eq!(reparsed.to_internal(), tree.to_internal());
        }
    }

    #[test]
    fn empty_quoted_localpart_is_detected() {
        let tree = parse(r#"""@example.com"#, ParseMode::Dequoted).unwrap();
        let at = tree.find_rightmost_special(Special::At).unwrap();
        let mut local = tree.clone();
        local.tokens.truncate(at);
        assert!(local.is_empty_local());
    }
}
