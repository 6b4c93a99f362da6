/// Problems configuring pins or loading the pin database.
#[derive(Debug)]
pub enum Error {
    /// Attempt to assign an alternate function number not in the range 0..=15.
    ///
    /// Each GPIO line has a 4-bit field in AFRL/AFRH, so this indicates a bug in
    /// the caller rather than an unavailable function.
    InvalidAltFunction(u8),
    /// The pin database could not be read.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidAltFunction(n) => {
                write!(f, "alternate function {n} out of range (must be 0..=15)")
            }
            Error::Io(e) => write!(f, "cannot read pin database: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::InvalidAltFunction(_) => None,
        }
    }
}

#[doc(hidden)]
impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
