use std::fmt;

/// Per-frame hand pose classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Open => "OPEN",
            Verdict::Closed => "CLOSED",
            Verdict::Unknown => "UNKNOWN",
        }
    }

    /// OPEN and CLOSED are decisive; only those are ever transmitted.
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Verdict::Unknown)
    }

    /// Wire form for the status topic, or `None` for UNKNOWN.
    pub fn payload(&self) -> Option<&'static [u8]> {
        self.is_decisive().then(|| self.as_str().as_bytes())
    }

    /// Parse a status-topic payload. Surrounding whitespace is ignored;
    /// anything other than `OPEN` or `CLOSED` yields `None`.
    pub fn from_payload(payload: &[u8]) -> Option<Verdict> {
        match payload.trim_ascii() {
            b"OPEN" => Some(Verdict::Open),
            b"CLOSED" => Some(Verdict::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
