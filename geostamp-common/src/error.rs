/// Broad classification shared by the error types of all codec crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The MIME type or the format's capabilities do not allow the operation
    UnsupportedFormat,
    /// Bad signature, truncated chunk or an offset past the end of the data
    CorruptContainer,
    /// A recognized chunk or tag exists but its content can't be parsed
    MalformedField,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat => f.write_str("unsupported format"),
            Self::CorruptContainer => f.write_str("corrupt container"),
            Self::MalformedField => f.write_str("malformed field"),
        }
    }
}

/// Type that allows to return data with the error
///
/// This is useful since commands like `write_metadata()` take ownership of the
/// data. Using this as error type allows to continue using the untouched data
/// afterward.
pub struct ErrorWithData<E: std::error::Error> {
    err: E,
    data: Vec<u8>,
}

impl<E: std::error::Error> ErrorWithData<E> {
    pub fn new(err: E, data: Vec<u8>) -> Self {
        Self { err, data }
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl<E: std::error::Error> std::fmt::Debug for ErrorWithData<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorWithData")
            .field("err", &self.err)
            .field("data", &format!("{} bytes", self.data.len()))
            .finish()
    }
}

impl<E: std::error::Error> std::fmt::Display for ErrorWithData<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ErrorWithData<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
