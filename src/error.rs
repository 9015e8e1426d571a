//! Error type and error handling utilities.


/// Error produced by enumeration lookup and by the codec.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Text did not match any member of a `StringEnum`.
    #[error("unknown value {value:?}, needs to be one of {allowed}")]
    UnknownMember {
        value: String,
        allowed: String,
    },
    /// A tagged JSON object was present but its payload was malformed.
    #[error("malformed tagged value: {0}")]
    Decode(String),
    /// The value has no JSON representation.
    #[error("cannot encode value: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}


/// Construct an `Error::Decode` with a formatted message.
macro_rules! error {
    ($($e:tt)*)=>{
        $crate::error::Error::Decode(format!($($e)*))
    };
}

macro_rules! bail {
    ($($e:tt)*)=>{ return Err($crate::error::error!($($e)*)) };
}

macro_rules! ensure {
    ($c:expr, $($e:tt)*)=>{
        if !$c {
            $crate::error::bail!($($e)*);
        }
    };
}

pub(crate) use error;
pub(crate) use bail;
pub(crate) use ensure;
