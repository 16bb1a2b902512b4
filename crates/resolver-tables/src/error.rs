use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("reading table file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("table file {path} line {line}: expected `key = value`, got {text:?}")]
    MalformedLine {
        path: String,
        line: usize,
        text: String,
    },
}
