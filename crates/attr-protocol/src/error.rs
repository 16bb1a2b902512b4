use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("i/o error on resolver connection")]
    Io(#[source] std::io::Error),
    #[error("connection closed mid-request (after attribute data had started)")]
    UnexpectedEof,
    #[error("malformed attribute line: {0:?}")]
    Malformed(String),
    #[error("unknown attribute {0:?} in strict mode")]
    UnknownAttribute(String),
    #[error("request missing required attribute {0:?}")]
    MissingAttribute(&'static str),
}
