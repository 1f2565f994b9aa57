use crate::{connections::AddressDecoder, error::FormatError};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

const TCPV4_FILE_PATH: &str = "/proc/net/tcp";
const TCPV6_FILE_PATH: &str = "/proc/net/tcp6";

/// IP protocol family of a kernel TCP table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolFamily {
    Ipv4,
    Ipv6,
}

impl ProtocolFamily {
    pub const ALL: [ProtocolFamily; 2] = [ProtocolFamily::Ipv4, ProtocolFamily::Ipv6];

    pub fn address_decoder(&self) -> AddressDecoder {
        match self {
            ProtocolFamily::Ipv4 => AddressDecoder::V4,
            ProtocolFamily::Ipv6 => AddressDecoder::V6,
        }
    }

    pub fn default_location(&self) -> &'static str {
        match self {
            ProtocolFamily::Ipv4 => TCPV4_FILE_PATH,
            ProtocolFamily::Ipv6 => TCPV6_FILE_PATH,
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            ProtocolFamily::Ipv4 => "tcp",
            ProtocolFamily::Ipv6 => "tcp6",
        }
    }
}

/// Default table location and address decoder of `family`.
pub fn resolve(family: ProtocolFamily) -> (&'static str, AddressDecoder) {
    (family.default_location(), family.address_decoder())
}

/// Table of `family` as seen from the network namespace of process `pid`.
pub fn process_location(family: ProtocolFamily, pid: u32) -> PathBuf {
    PathBuf::from(format!("/proc/{pid}/net/{}", family.file_name()))
}

/// IP version number: 4 or 6.
impl TryFrom<u8> for ProtocolFamily {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(ProtocolFamily::Ipv4),
            6 => Ok(ProtocolFamily::Ipv6),

            _ => Err(FormatError::new(format!(
                "illegal protocol version: {value}"
            ))),
        }
    }
}

impl FromStr for ProtocolFamily {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" | "ipv4" | "4" => Ok(ProtocolFamily::Ipv4),
            "tcp6" | "ipv6" | "6" => Ok(ProtocolFamily::Ipv6),

            _ => Err(FormatError::new(format!("illegal protocol family: {s:?}"))),
        }
    }
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolFamily::Ipv4 => f.write_str("IPv4"),
            ProtocolFamily::Ipv6 => f.write_str("IPv6"),
        }
    }
}
