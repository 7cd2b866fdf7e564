use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame is not valid UTF-8: {0}")]
    FrameEncoding(#[from] std::string::FromUtf8Error),
    #[error("failed to parse frame `{fragment}`: {source}")]
    FrameJson {
        fragment: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown frame type {tag} in `{fragment}`")]
    UnknownFrameType { tag: i64, fragment: String },
    #[error("invalid unicode escape in `{0}`")]
    UnicodeEscape(String),
    #[error("literal tag {tag} expects a {expected} payload")]
    LiteralPayload { tag: u8, expected: &'static str },
    #[error("input stream is empty")]
    EmptyInput,
    #[error("reading from the compiler pipe is not supported on this platform")]
    PipeUnsupported,
    #[error("failed to serialize program: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("emitter failed: {0}")]
    Emit(String),
}

pub type Result<T> = std::result::Result<T, BuildError>;
