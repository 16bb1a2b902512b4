//! The address lexer and token tree (component C1 of the resolver):
//! parses an internalized or externalized recipient address into a
//! mutable, splittable token sequence, and re-emits it in either form.

mod error;
mod parser;
mod token;
mod tree;

pub use error::AddressError;
pub use parser::{parse, ParseMode};
pub use token::{Special, Token, TokenKind};
pub use tree::TokenTree;

pub type Result<T> = std::result::Result<T, AddressError>;
