use {crate::PacketError, std::fmt};

#[derive(Debug)]
pub enum ComError {
    Io(std::io::Error),
    Decode(PacketError),
    ConnectionClosed,
    MessageTooLarge(u32),
    Protocol(String),
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::Io(err) => write!(f, "io error: {err}"),
            ComError::Decode(err) => write!(f, "decode error: {err}"),
            ComError::ConnectionClosed => write!(f, "connection closed"),
            ComError::MessageTooLarge(len) => write!(f, "message too large: {len} bytes"),
            ComError::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for ComError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComError::Io(err) => Some(err),
            ComError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ComError {
    fn from(err: std::io::Error) -> Self {
        ComError::Io(err)
    }
}

impl From<PacketError> for ComError {
    fn from(err: PacketError) -> Self {
        ComError::Decode(err)
    }
}
