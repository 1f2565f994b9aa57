use crate::{
    catalog::{self, ProtocolFamily},
    connections::tcp::ConnectionRecord,
    table::decode_table,
};
use color_eyre::eyre::{eyre, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Addresses in the tables are printed in host byte order and decoded as
/// little endian words, so decoding on a big endian host would be wrong.
pub fn ensure_supported_host() -> Result<()> {
    if cfg!(target_endian = "big") {
        log::warn!("Refusing to read kernel TCP tables on a big endian host.");

        return Err(eyre!(
            "Kernel TCP tables can only be decoded on little endian hosts."
        ));
    }

    Ok(())
}

/// Location of the `family` table, system wide or seen from process `pid`.
pub fn table_location(family: ProtocolFamily, pid: Option<u32>) -> PathBuf {
    match pid {
        Some(pid) => catalog::process_location(family, pid),
        None => {
            let (location, _) = catalog::resolve(family);
            PathBuf::from(location)
        }
    }
}

/// Decodes a table line by line from an already open reader.
///
/// A read error fails the whole call, even when every line read before it
/// decoded fine.
pub fn read_from<R: BufRead>(
    reader: R,
    family: ProtocolFamily,
) -> Result<Vec<ConnectionRecord>> {
    let mut read_error = None;
    let lines = reader.lines().map_while(|line| match line {
        Ok(line) => Some(line),
        Err(e) => {
            read_error = Some(e);
            None
        }
    });

    let records = decode_table(lines, family);

    if let Some(e) = read_error {
        return Err(e).wrap_err("Fail to read connection line.");
    }

    records.wrap_err("Fail to decode connections.")
}

/// Opens and decodes one table.
pub fn read_table(path: &Path, family: ProtocolFamily) -> Result<Vec<ConnectionRecord>> {
    log::debug!("Reading {family} connections from {}.", path.display());

    let file = File::open(path).wrap_err_with(|| format!("Fail to open {}.", path.display()))?;

    read_from(BufReader::new(file), family)
        .wrap_err_with(|| format!("Fail to read connections from {}.", path.display()))
}

/// Union of the connections of every family, in the order requested.
pub fn read_connections(
    families: &[ProtocolFamily],
    pid: Option<u32>,
) -> Result<Vec<ConnectionRecord>> {
    ensure_supported_host()?;

    let mut connections = Vec::new();
    for &family in families {
        let path = table_location(family, pid);
        connections.extend(read_table(&path, family)?);
    }

    Ok(connections)
}
