use crate::{catalog::ProtocolFamily, connections::tcp::ConnectionRecord};
use color_eyre::eyre::{eyre, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

const SNAPSHOT_VERSION: u32 = 1;

/// Decoded connections saved for later inspection.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    version: u32,
    families: Vec<ProtocolFamily>,
    connections: Vec<ConnectionRecord>,
}

impl Snapshot {
    pub fn new(families: Vec<ProtocolFamily>, connections: Vec<ConnectionRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            families,
            connections,
        }
    }

    pub fn families(&self) -> &[ProtocolFamily] {
        &self.families
    }

    pub fn connections(&self) -> &[ConnectionRecord] {
        &self.connections
    }

    pub fn into_connections(self) -> Vec<ConnectionRecord> {
        self.connections
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .wrap_err_with(|| format!("Fail to create snapshot file {}.", path.display()))?;
        let mut writer = BufWriter::new(file);

        serialize_to(self, &mut writer)?;
        writer.flush().wrap_err("Fail to flush snapshot file.")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .wrap_err_with(|| format!("Fail to open snapshot file {}.", path.display()))?;

        Self::read_from(BufReader::new(file))
    }

    /// Reads a snapshot and checks it was written by this version.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let snapshot: Snapshot = deserialize_from(reader)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(eyre!(
                "Unsupported snapshot version {} (expected {}).",
                snapshot.version,
                SNAPSHOT_VERSION
            ));
        }

        Ok(snapshot)
    }
}

pub fn serialize_to<T, W>(value: &T, writer: W) -> Result<()>
where
    T: serde::Serialize,
    W: std::io::Write,
{
    bincode::serialize_into(writer, value).wrap_err("Fail to serialize snapshot.")
}

pub fn deserialize_from<T, R>(reader: R) -> Result<T>
where
    T: serde::de::DeserializeOwned,
    R: std::io::Read,
{
    bincode::deserialize_from::<_, T>(reader).wrap_err("Fail to deserialize snapshot.")
}
