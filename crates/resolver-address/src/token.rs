/// One of the specials recognized by the address lexer.
///
/// This set is wider than plain RFC 822 `specials`: `!` and `%` are
/// included because this lexer doubles as the routing-operator
/// detector the resolver needs (bangpath and percent-hack rewriting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    At,
    Dot,
    Comma,
    Semi,
    Colon,
    Bang,
    Percent,
    Lt,
    Gt,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// Sentinel for a localpart that parsed to nothing at all, e.g. the
    /// address `<>` or an empty input string. Distinct from a literal
    /// empty quoted string `""`, though the resolver treats both the
    /// same way (substitute `postmaster`).
    EmptyLocal,
}

impl Special {
    pub fn as_char(self) -> Option<char> {
        Some(match self {
            Special::At => '@',
            Special::Dot => '.',
            Special::Comma => ',',
            Special::Semi => ';',
            Special::Colon => ':',
            Special::Bang => '!',
            Special::Percent => '%',
            Special::Lt => '<',
            Special::Gt => '>',
            Special::LParen => '(',
            Special::RParen => ')',
            Special::LBracket => '[',
            Special::RBracket => ']',
            Special::EmptyLocal => return None,
        })
    }

    /// Whether this is one of the three routing operators that can
    /// carry a source route into a remote localpart: `@`, `!`, `%`.
    pub fn is_routing_operator(self) -> bool {
        matches!(self, Special::At | Special::Bang | Special::Percent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Atom(String),
    QuotedString(String),
    Comment(String),
    DomainLiteral(String),
    Special(Special),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind }
    }

    pub fn is_special(&self, want: Special) -> bool {
        matches!(&self.kind, TokenKind::Special(s) if *s == want)
    }

    pub fn is_routing_special(&self) -> bool {
        matches!(&self.kind, TokenKind::Special(s) if s.is_routing_operator())
    }
}
