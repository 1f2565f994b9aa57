use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// TCP connection state, as named by RFC 793.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Established,
    SynSent,
    SynReceived,
    FinWait1,
    FinWait2,
    TimeWait,
    Closed,
    CloseWait,
    LastAck,
    Listen,
    Closing,
}

const ALL_STATES: [ConnectionState; 11] = [
    ConnectionState::Established,
    ConnectionState::SynSent,
    ConnectionState::SynReceived,
    ConnectionState::FinWait1,
    ConnectionState::FinWait2,
    ConnectionState::TimeWait,
    ConnectionState::Closed,
    ConnectionState::CloseWait,
    ConnectionState::LastAck,
    ConnectionState::Listen,
    ConnectionState::Closing,
];

impl ConnectionState {
    /// Kernel code of the state (see `include/net/tcp_states.h`).
    ///
    /// `TCP_NEW_SYN_RECV` ("0C") also decodes to `SynReceived`, but the
    /// canonical code returned here is always "03".
    pub fn kernel_code(&self) -> &'static str {
        match self {
            ConnectionState::Established => "01",
            ConnectionState::SynSent => "02",
            ConnectionState::SynReceived => "03",
            ConnectionState::FinWait1 => "04",
            ConnectionState::FinWait2 => "05",
            ConnectionState::TimeWait => "06",
            ConnectionState::Closed => "07",
            ConnectionState::CloseWait => "08",
            ConnectionState::LastAck => "09",
            ConnectionState::Listen => "0A",
            ConnectionState::Closing => "0B",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionState::Established => "ESTABLISHED",
            ConnectionState::SynSent => "SYN-SENT",
            ConnectionState::SynReceived => "SYN-RECEIVED",
            ConnectionState::FinWait1 => "FIN-WAIT-1",
            ConnectionState::FinWait2 => "FIN-WAIT-2",
            ConnectionState::TimeWait => "TIME-WAIT",
            ConnectionState::Closed => "CLOSED",
            ConnectionState::CloseWait => "CLOSE-WAIT",
            ConnectionState::LastAck => "LAST-ACK",
            ConnectionState::Listen => "LISTEN",
            ConnectionState::Closing => "CLOSING",
        }
    }

    pub fn is_listening(&self) -> bool {
        *self == ConnectionState::Listen
    }
}

impl TryFrom<&str> for ConnectionState {
    type Error = FormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "01" => Ok(ConnectionState::Established),
            "02" => Ok(ConnectionState::SynSent),
            "03" => Ok(ConnectionState::SynReceived),
            "04" => Ok(ConnectionState::FinWait1),
            "05" => Ok(ConnectionState::FinWait2),
            "06" => Ok(ConnectionState::TimeWait),
            "07" => Ok(ConnectionState::Closed),
            "08" => Ok(ConnectionState::CloseWait),
            "09" => Ok(ConnectionState::LastAck),
            "0A" => Ok(ConnectionState::Listen),
            "0B" => Ok(ConnectionState::Closing),
            "0C" => Ok(ConnectionState::SynReceived),

            _ => Err(FormatError::new(format!(
                "illegal kernel TCP state: {value:?}"
            ))),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Parses the symbolic name, ignoring case (`listen`, `SYN-SENT`, ...).
impl FromStr for ConnectionState {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATES
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormatError::new(format!("unknown TCP state name: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kernel_code() {
        let table = [
            ("01", ConnectionState::Established),
            ("02", ConnectionState::SynSent),
            ("03", ConnectionState::SynReceived),
            ("04", ConnectionState::FinWait1),
            ("05", ConnectionState::FinWait2),
            ("06", ConnectionState::TimeWait),
            ("07", ConnectionState::Closed),
            ("08", ConnectionState::CloseWait),
            ("09", ConnectionState::LastAck),
            ("0A", ConnectionState::Listen),
            ("0B", ConnectionState::Closing),
            ("0C", ConnectionState::SynReceived),
        ];

        for (code, expected) in table {
            assert_eq!(ConnectionState::try_from(code).unwrap(), expected, "{code}");
        }
    }

    #[test]
    fn test_new_syn_recv_aliases_syn_recv() {
        assert_eq!(
            ConnectionState::try_from("0C").unwrap(),
            ConnectionState::try_from("03").unwrap()
        );
    }

    #[test]
    fn test_unknown_codes_fail() {
        for code in ["00", "0D", "FF", "1", "001", "", "0a", " 01", "XY"] {
            assert!(ConnectionState::try_from(code).is_err(), "{code:?}");
        }
    }

    #[test]
    fn test_only_the_closed_table_decodes() {
        let decoded = (0u16..=0xFF)
            .map(|code| format!("{code:02X}"))
            .filter(|code| ConnectionState::try_from(code.as_str()).is_ok())
            .count();

        assert_eq!(decoded, 12);
    }

    #[test]
    fn test_kernel_code_round_trip() {
        for state in ALL_STATES {
            assert_eq!(ConnectionState::try_from(state.kernel_code()).unwrap(), state);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(ConnectionState::Listen.to_string(), "LISTEN");
        assert_eq!(ConnectionState::FinWait1.to_string(), "FIN-WAIT-1");
        assert_eq!(
            "syn-received".parse::<ConnectionState>().unwrap(),
            ConnectionState::SynReceived
        );
        assert!("LISTENING".parse::<ConnectionState>().is_err());
    }
}
