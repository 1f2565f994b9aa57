//! Decoder for the Linux kernel TCP connection tables (`/proc/net/tcp` and
//! `/proc/net/tcp6`).
//!
//! ```no_run
//! use proc_tcp_table::{catalog::ProtocolFamily, procfs};
//!
//! let connections = procfs::read_connections(&ProtocolFamily::ALL, None)?;
//! for connection in &connections {
//!     println!("{connection}");
//! }
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

pub mod catalog;
pub mod connections;
pub mod error;
pub mod procfs;
pub mod snapshot;
pub mod table;

pub use catalog::ProtocolFamily;
pub use connections::tcp::{ConnectionRecord, ConnectionState};
pub use error::FormatError;
pub use table::decode_table;
