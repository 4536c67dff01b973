use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn unknown_type(name: impl Into<String>) -> Error {
        Error(ErrorKind::UnknownType { name: name.into() }.into())
    }

    /// Wraps a failure reported by the underlying wide-column store client.
    ///
    /// The source error is kept as is, callers can downcast it to recover the
    /// client-specific error type.
    pub fn store<E>(context: impl Into<String>, source: E) -> Error
    where
        E: Into<StdErrorBoxed>,
    {
        Error(
            ErrorKind::Store {
                context: context.into(),
                source: source.into(),
            }
            .into(),
        )
    }

    pub fn sink<E>(context: impl Into<String>, source: E) -> Error
    where
        E: Into<StdErrorBoxed>,
    {
        Error(
            ErrorKind::Sink {
                context: context.into(),
                source: source.into(),
            }
            .into(),
        )
    }

    pub fn is_store(&self) -> bool {
        matches!(self.kind(), ErrorKind::Store { .. })
    }

    pub fn is_unknown_type(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnknownType { .. })
    }

    pub fn is_invalid_arg(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument { .. })
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidFormat { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("store request failed for '{context}': {source}")]
    Store {
        context: String,
        source: StdErrorBoxed,
    },

    #[error("no decoder registered for sample type '{name}'")]
    UnknownType { name: String },

    #[error("invalid stored format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("sample sink failed for '{context}': {source}")]
    Sink {
        context: String,
        source: StdErrorBoxed,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
