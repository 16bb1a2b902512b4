use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("unterminated quoted string in address")]
    UnterminatedQuotedString,
    #[error("unterminated comment in address")]
    UnterminatedComment,
    #[error("unterminated domain literal in address")]
    UnterminatedDomainLiteral,
    #[error("dangling backslash escape in address")]
    DanglingEscape,
}
