use crate::error::AddressError;
use crate::token::{Special, Token, TokenKind};
use crate::tree::TokenTree;

/// Which variant of the lexer to run.
///
/// See crates/resolver-core's peeling loop and SPEC_FULL.md §B for the
/// policy that picks between these; this module only supplies the two
/// primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Parse the raw internalized address directly. A quoted local
    /// part such as `"a@b"` stays opaque: the `@` inside it is not a
    /// routing operator.
    Dequoted,
    /// Dissolve quoting first so that routing operators embedded in a
    /// quoted local part become visible to the resolver as ordinary
    /// specials. This is how a relay peer's `"user@hop"@remote` is
    /// turned into something the anti-relay route detector can see.
    Requoted,
}

fn is_atext(c: char) -> bool {
    match c {
        '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '/' | '=' | '?' | '^' | '_'
        | '`' | '{' | '|' | '}' | '~' => true,
        c => c.is_ascii_alphanumeric() || (c as u32) >= 0x80,
    }
}

fn is_special_char(c: char) -> Option<Special> {
    Some(match c {
        '@' => Special::At,
        '.' => Special::Dot,
        ',' => Special::Comma,
        ';' => Special::Semi,
        ':' => Special::Colon,
        '!' => Special::Bang,
        '%' => Special::Percent,
        '<' => Special::Lt,
        '>' => Special::Gt,
        _ => return None,
    })
}

/// Remove RFC 822 quoting from `input`, unescaping `\"` and `\\`
/// inside quoted spans and dropping the quote characters themselves.
/// Used to implement [`ParseMode::Requoted`]: once quoting is
/// dissolved, the plain lexer below sees every character that was
/// hidden inside the quotes as live input.
fn dissolve_quotes(input: &str) -> Result<String, AddressError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            loop {
                match chars.next() {
                    None => return Err(AddressError::UnterminatedQuotedString),
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        None => return Err(AddressError::DanglingEscape),
                        Some(escaped) => out.push(escaped),
                    },
                    Some(other) => out.push(other),
                }
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Tokenize a flat (no outstanding quoting semantics to preserve)
/// address string. This is the common lexer core shared by both
/// parse modes; [`ParseMode::Requoted`] simply runs it over the
/// output of [`dissolve_quotes`] so it never actually sees a `"`.
fn lex(input: &str) -> Result<Vec<Token>, AddressError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut content = String::new();
            loop {
                match chars.next() {
                    None => return Err(AddressError::UnterminatedQuotedString),
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        None => return Err(AddressError::DanglingEscape),
                        Some(escaped) => content.push(escaped),
                    },
                    Some(other) => content.push(other),
                }
            }
            tokens.push(Token::new(TokenKind::QuotedString(content)));
            continue;
        }

        if c == '(' {
            chars.next();
            let mut content = String::new();
            let mut depth = 1usize;
            loop {
                match chars.next() {
                    None => return Err(AddressError::UnterminatedComment),
                    Some('\\') => match chars.next() {
                        None => return Err(AddressError::DanglingEscape),
                        Some(escaped) => content.push(escaped),
                    },
                    Some('(') => {
                        depth += 1;
                        content.push('(');
                    }
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        content.push(')');
                    }
                    Some(other) => content.push(other),
                }
            }
            tokens.push(Token::new(TokenKind::Comment(content)));
            continue;
        }

        if c == '[' {
            chars.next();
            let mut literal = String::from("[");
            loop {
                match chars.next() {
                    None => return Err(AddressError::UnterminatedDomainLiteral),
                    Some(']') => {
                        literal.push(']');
                        break;
                    }
                    Some(other) => literal.push(other),
                }
            }
            tokens.push(Token::new(TokenKind::DomainLiteral(literal)));
            continue;
        }

        if let Some(special) = is_special_char(c) {
            chars.next();
            tokens.push(Token::new(TokenKind::Special(special)));
            continue;
        }

        if is_atext(c) {
            let mut atom = String::new();
            while let Some(&c) = chars.peek() {
                if is_atext(c) {
                    atom.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::new(TokenKind::Atom(atom)));
            continue;
        }

        // Any other byte (stray `)`, `]`, control character, etc) is
        // tolerated as a single-character atom rather than rejected;
        // the resolver is deliberately permissive about malformed
        // input and lets downstream hostname validation catch it via
        // FLAG_ERROR rather than refusing to parse at all.
        chars.next();
        tokens.push(Token::new(TokenKind::Atom(c.to_string())));
    }

    Ok(tokens)
}

pub fn parse(input: &str, mode: ParseMode) -> Result<TokenTree, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        let mut tree = TokenTree::new();
        tree.push(TokenKind::Special(Special::EmptyLocal));
        return Ok(tree);
    }

    let tokens = match mode {
        ParseMode::Dequoted => lex(trimmed)?,
        ParseMode::Requoted => lex(&dissolve_quotes(trimmed)?)?,
    };
    Ok(TokenTree::from_tokens(tokens))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::TokenKind::*;

    #[test]
    fn dequoted_hides_embedded_at() {
        let tree = parse(r#""user@hop"@remote"#, ParseMode::Dequoted).unwrap();
        let kinds: Vec<_> = tree.tokens().iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                QuotedString("user@hop".into()),
                Special(Special::At),
                Atom("remote".into()),
            ]
        );
    }

    #[test]
    fn requoted_reveals_embedded_at() {
        let tree = parse(r#""user@hop"@remote"#, ParseMode::Requoted).unwrap();
        let ats = tree
            .tokens()
            .iter()
            .filter(|t| t.is_special(Special::At))
            .count();
        assert_eq!(ats, 2);
    }

    #[test]
    fn bang_and_percent_are_specials() {
        let tree = parse("user%site!host", ParseMode::Dequoted).unwrap();
        assert!(tree.tokens().iter().any(|t| t.is_special(Special::Percent)));
        assert!(tree.tokens().iter().any(|t| t.is_special(Special::Bang)));
    }

    #[test]
    fn domain_literal_is_one_token() {
        let tree = parse("user@[10.0.0.1]", ParseMode::Dequoted).unwrap();
        let kinds: Vec<_> = tree.tokens().iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Atom("user".into()),
                Special(Special::At),
                DomainLiteral("[10.0.0.1]".into()),
            ]
        );
    }

    #[test]
    fn empty_input_is_empty_local_sentinel() {
        let tree = parse("", ParseMode::Dequoted).unwrap();
        assert!(tree.is_empty_local());
    }
}
