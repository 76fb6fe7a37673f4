use std::fmt;

const TAG_CONNECT: u8 = 1;
const TAG_SUBSCRIBE: u8 = 2;
const TAG_UNSUBSCRIBE: u8 = 3;
const TAG_PUBLISH: u8 = 4;
const TAG_PINGREQ: u8 = 5;
const TAG_PINGRESP: u8 = 6;
const TAG_DISCONNECT: u8 = 7;

/// A control packet. On the wire: one tag byte, then the fields in order.
/// Strings and payloads carry a 4-byte little-endian length prefix,
/// integers are little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Connect { client_id: String, keepalive_secs: u32 },
    Subscribe { filter: String },
    Unsubscribe { filter: String },
    Publish { topic: String, payload: Vec<u8> },
    PingReq,
    PingResp,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    UnexpectedEof,
    InvalidUtf8,
    UnknownTag(u8),
    TrailingBytes(usize),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::UnexpectedEof => write!(f, "unexpected end of packet"),
            PacketError::InvalidUtf8 => write!(f, "invalid UTF-8 in string field"),
            PacketError::UnknownTag(tag) => write!(f, "unknown packet tag {tag}"),
            PacketError::TrailingBytes(n) => write!(f, "{n} trailing bytes after packet"),
        }
    }
}

impl std::error::Error for PacketError {}

fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], PacketError> {
        if self.buf.len() < n {
            return Err(PacketError::UnexpectedEof);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, PacketError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, PacketError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn bytes(&mut self) -> Result<&'a [u8], PacketError> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    fn string(&mut self) -> Result<String, PacketError> {
        let bytes = self.bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| PacketError::InvalidUtf8)
    }
}

impl Packet {
    /// Encode a Publish packet straight from borrowed parts.
    pub fn publish_bytes(topic: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 8 + topic.len() + payload.len());
        buf.push(TAG_PUBLISH);
        put_bytes(&mut buf, topic.as_bytes());
        put_bytes(&mut buf, payload);
        buf
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            Packet::Connect {
                client_id,
                keepalive_secs,
            } => {
                buf.push(TAG_CONNECT);
                put_bytes(&mut buf, client_id.as_bytes());
                buf.extend_from_slice(&keepalive_secs.to_le_bytes());
            }
            Packet::Subscribe { filter } => {
                buf.push(TAG_SUBSCRIBE);
                put_bytes(&mut buf, filter.as_bytes());
            }
            Packet::Unsubscribe { filter } => {
                buf.push(TAG_UNSUBSCRIBE);
                put_bytes(&mut buf, filter.as_bytes());
            }
            Packet::Publish { topic, payload } => return Self::publish_bytes(topic, payload),
            Packet::PingReq => buf.push(TAG_PINGREQ),
            Packet::PingResp => buf.push(TAG_PINGRESP),
            Packet::Disconnect => buf.push(TAG_DISCONNECT),
        }
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, PacketError> {
        let mut reader = Reader { buf };
        let packet = match reader.u8()? {
            TAG_CONNECT => Packet::Connect {
                client_id: reader.string()?,
                keepalive_secs: reader.u32()?,
            },
            TAG_SUBSCRIBE => Packet::Subscribe {
                filter: reader.string()?,
            },
            TAG_UNSUBSCRIBE => Packet::Unsubscribe {
                filter: reader.string()?,
            },
            TAG_PUBLISH => Packet::Publish {
                topic: reader.string()?,
                payload: reader.bytes()?.to_vec(),
            },
            TAG_PINGREQ => Packet::PingReq,
            TAG_PINGRESP => Packet::PingResp,
            TAG_DISCONNECT => Packet::Disconnect,
            tag => return Err(PacketError::UnknownTag(tag)),
        };
        if !reader.buf.is_empty() {
            return Err(PacketError::TrailingBytes(reader.buf.len()));
        }
        Ok(packet)
    }
}
