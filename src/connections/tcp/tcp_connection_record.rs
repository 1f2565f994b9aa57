use super::ConnectionState;
use crate::{
    catalog::ProtocolFamily,
    connections::AddressDecoder,
    error::{FormatError, WrapFormat},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::{IpAddr, SocketAddr},
};

// Columns of a table row (whitespace separated).
const INDEX_LOCAL_ADDRESS: usize = 1;
const INDEX_REMOTE_ADDRESS: usize = 2;
const INDEX_STATE: usize = 3;
const INDEX_QUEUES: usize = 4;
const INDEX_UID: usize = 7;
const INDEX_INODE: usize = 9;
const MIN_FIELDS: usize = 10;

/// One socket of a kernel TCP table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConnectionRecord")]
pub struct ConnectionRecord {
    state: ConnectionState,
    receive_buffer_size: u32,
    send_buffer_size: u32,
    accept_backlog: u32,
    protocol_family: ProtocolFamily,
    local_address: IpAddr,
    local_port: u16,
    remote_address: IpAddr,
    remote_port: u16,
    uid: u32,
    inode: u32,
}

/// Field by field copy of [`ConnectionRecord`], checked before use.
#[derive(Deserialize)]
struct RawConnectionRecord {
    state: ConnectionState,
    receive_buffer_size: u32,
    send_buffer_size: u32,
    accept_backlog: u32,
    protocol_family: ProtocolFamily,
    local_address: IpAddr,
    local_port: u16,
    remote_address: IpAddr,
    remote_port: u16,
    uid: u32,
    inode: u32,
}

impl TryFrom<RawConnectionRecord> for ConnectionRecord {
    type Error = FormatError;

    fn try_from(raw: RawConnectionRecord) -> Result<Self, Self::Error> {
        let decoder = raw.protocol_family.address_decoder();
        for address in [&raw.local_address, &raw.remote_address] {
            if !decoder.accepts(address) {
                return Err(FormatError::new(format!(
                    "address {address} does not belong to a {} connection",
                    raw.protocol_family
                )));
            }
        }

        if raw.state.is_listening() {
            if raw.receive_buffer_size != 0
                || raw.send_buffer_size != 0
                || raw.remote_address != decoder.unspecified()
                || raw.remote_port != 0
            {
                return Err(FormatError::new(
                    "listening connection has buffer sizes or a remote endpoint",
                ));
            }
        } else if raw.accept_backlog != 0 {
            return Err(FormatError::new(format!(
                "{} connection has an accept backlog of {}",
                raw.state, raw.accept_backlog
            )));
        }

        Ok(Self {
            state: raw.state,
            receive_buffer_size: raw.receive_buffer_size,
            send_buffer_size: raw.send_buffer_size,
            accept_backlog: raw.accept_backlog,
            protocol_family: raw.protocol_family,
            local_address: raw.local_address,
            local_port: raw.local_port,
            remote_address: raw.remote_address,
            remote_port: raw.remote_port,
            uid: raw.uid,
            inode: raw.inode,
        })
    }
}

impl ConnectionRecord {
    pub(crate) fn listening(
        protocol_family: ProtocolFamily,
        accept_backlog: u32,
        local: SocketAddr,
        uid: u32,
        inode: u32,
    ) -> Self {
        Self {
            state: ConnectionState::Listen,
            receive_buffer_size: 0,
            send_buffer_size: 0,
            accept_backlog,
            protocol_family,
            local_address: local.ip(),
            local_port: local.port(),
            remote_address: protocol_family.address_decoder().unspecified(),
            remote_port: 0,
            uid,
            inode,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn connected(
        state: ConnectionState,
        protocol_family: ProtocolFamily,
        receive_buffer_size: u32,
        send_buffer_size: u32,
        local: SocketAddr,
        remote: SocketAddr,
        uid: u32,
        inode: u32,
    ) -> Self {
        Self {
            state,
            receive_buffer_size,
            send_buffer_size,
            accept_backlog: 0,
            protocol_family,
            local_address: local.ip(),
            local_port: local.port(),
            remote_address: remote.ip(),
            remote_port: remote.port(),
            uid,
            inode,
        }
    }

    /// Decodes one row of a table of the given family.
    ///
    /// For a listening socket the kernel reports the accept backlog in the
    /// rx-queue column, so it is stored as such and the buffers stay zero.
    pub fn decode_line(line: &str, family: ProtocolFamily) -> Result<Self, FormatError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Err(FormatError::new(format!(
                "invalid format: line contained less than {MIN_FIELDS} fields: {}",
                fields.len()
            )));
        }

        let decoder = family.address_decoder();

        let local = parse_endpoint(fields[INDEX_LOCAL_ADDRESS], decoder)
            .wrap_format(|| "parsing local address".to_string())?;
        let remote = parse_endpoint(fields[INDEX_REMOTE_ADDRESS], decoder)
            .wrap_format(|| "parsing remote address".to_string())?;

        let (tx_queue, rx_queue) = parse_queues(fields[INDEX_QUEUES])
            .wrap_format(|| "parsing queue lengths".to_string())?;

        let state = ConnectionState::try_from(fields[INDEX_STATE])
            .wrap_format(|| format!("parsing connection state {:?}", fields[INDEX_STATE]))?;

        let uid = parse_decimal(fields[INDEX_UID], "UID")?;
        let inode = parse_decimal(fields[INDEX_INODE], "inode")?;

        if state.is_listening() {
            return Ok(Self::listening(family, rx_queue, local, uid, inode));
        }

        Ok(Self::connected(
            state, family, rx_queue, tx_queue, local, remote, uid, inode,
        ))
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn receive_buffer_size(&self) -> u32 {
        self.receive_buffer_size
    }

    pub fn send_buffer_size(&self) -> u32 {
        self.send_buffer_size
    }

    pub fn accept_backlog(&self) -> u32 {
        self.accept_backlog
    }

    pub fn protocol_family(&self) -> ProtocolFamily {
        self.protocol_family
    }

    pub fn local_address(&self) -> &IpAddr {
        &self.local_address
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub fn remote_address(&self) -> &IpAddr {
        &self.remote_address
    }

    pub fn remote_port(&self) -> u16 {
        self.remote_port
    }

    pub fn uid(&self) -> u32 {
        self.uid
    }

    pub fn inode(&self) -> u32 {
        self.inode
    }

    pub fn local(&self) -> SocketAddr {
        SocketAddr::new(self.local_address, self.local_port)
    }

    pub fn remote(&self) -> SocketAddr {
        SocketAddr::new(self.remote_address, self.remote_port)
    }
}

impl fmt::Display for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.is_listening() {
            return write!(
                f,
                "{:<12} {} backlog={} local={} uid={} inode={}",
                self.state,
                self.protocol_family,
                self.accept_backlog,
                self.local(),
                self.uid,
                self.inode
            );
        }

        write!(
            f,
            "{:<12} {} rx={} tx={} local={} remote={} uid={} inode={}",
            self.state,
            self.protocol_family,
            self.receive_buffer_size,
            self.send_buffer_size,
            self.local(),
            self.remote(),
            self.uid,
            self.inode
        )
    }
}

/// `<address-hex>:<port-hex>`. The port is printed in network order.
fn parse_endpoint(text: &str, decoder: AddressDecoder) -> Result<SocketAddr, FormatError> {
    let subfields: Vec<&str> = text.split(':').collect();
    if subfields.len() < 2 {
        return Err(FormatError::new(format!(
            "invalid format: address field {text:?} contained less than 2 subfields: {}",
            subfields.len()
        )));
    }

    let address = decoder
        .decode(subfields[0])
        .wrap_format(|| format!("unable to parse {:?} as IP address", subfields[0]))?;

    check_unsigned(subfields[1], "port")?;
    let port = u16::from_str_radix(subfields[1], 16)
        .wrap_format(|| format!("unable to parse port {:?} as integer", subfields[1]))?;

    Ok(SocketAddr::new(address, port))
}

/// `<tx-hex>:<rx-hex>`, returned as `(tx, rx)`.
fn parse_queues(text: &str) -> Result<(u32, u32), FormatError> {
    let subfields: Vec<&str> = text.split(':').collect();
    if subfields.len() < 2 {
        return Err(FormatError::new(format!(
            "invalid format: queue field {text:?} contained less than 2 subfields: {}",
            subfields.len()
        )));
    }

    check_unsigned(subfields[0], "TX queue length")?;
    let tx = u32::from_str_radix(subfields[0], 16).wrap_format(|| {
        format!("unable to parse TX queue length {:?} as integer", subfields[0])
    })?;

    check_unsigned(subfields[1], "RX queue length")?;
    let rx = u32::from_str_radix(subfields[1], 16).wrap_format(|| {
        format!("unable to parse RX queue length {:?} as integer", subfields[1])
    })?;

    Ok((tx, rx))
}

fn parse_decimal(text: &str, field: &str) -> Result<u32, FormatError> {
    check_unsigned(text, field)?;

    text.parse::<u32>()
        .wrap_format(|| format!("unable to parse {field} {text:?} as integer"))
}

// `from_str_radix` tolerates a leading '+', the table never has one.
fn check_unsigned(text: &str, field: &str) -> Result<(), FormatError> {
    if text.starts_with('+') {
        return Err(FormatError::new(format!(
            "unable to parse {field} {text:?} as integer: unexpected sign"
        )));
    }

    Ok(())
}
