use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use log::LevelFilter;
use proc_tcp_table::{
    procfs::read_connections, snapshot::Snapshot, ConnectionRecord, ConnectionState,
    ProtocolFamily,
};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true, help = "Print debug messages.")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Decode the kernel TCP tables and print their connections")]
    List {
        #[arg(
            short,
            long = "family",
            help = "Table to read: tcp (IPv4) or tcp6 (IPv6). Can be repeated, defaults to both."
        )]
        families: Vec<ProtocolFamily>,

        #[arg(
            short,
            long,
            help = "Read the tables seen from the network namespace of this PID."
        )]
        pid: Option<u32>,

        #[arg(short, long, help = "Only print connections in this state, e.g. LISTEN.")]
        state: Option<ConnectionState>,

        #[arg(short, long, help = "Also save the decoded connections to this snapshot file.")]
        output: Option<PathBuf>,
    },

    #[command(about = "Print the connections stored in a snapshot file")]
    Show {
        #[arg(required = true, help = "Snapshot file written by `list --output`.")]
        path: PathBuf,

        #[arg(short, long, help = "Only print connections in this state, e.g. LISTEN.")]
        state: Option<ConnectionState>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .env()
        .init()
        .wrap_err("Fail to initialize logger.")?;

    match cli.command {
        Commands::List {
            families,
            pid,
            state,
            output,
        } => {
            let families = if families.is_empty() {
                ProtocolFamily::ALL.to_vec()
            } else {
                families
            };

            let connections = read_connections(&families, pid)?;
            print_connections(&connections, state);

            if let Some(path) = output {
                Snapshot::new(families, connections).save(&path)?;
                log::info!("Snapshot saved to {}.", path.display());
            }
        }
        Commands::Show { path, state } => {
            let snapshot = Snapshot::load(&path)?;
            log::debug!(
                "Snapshot {} holds {:?} connections.",
                path.display(),
                snapshot.families()
            );

            print_connections(snapshot.connections(), state);
        }
    }

    Ok(())
}

fn print_connections(connections: &[ConnectionRecord], state: Option<ConnectionState>) {
    let mut printed = 0;

    for connection in connections
        .iter()
        .filter(|connection| state.map_or(true, |state| connection.state() == state))
    {
        println!("{connection}");
        printed += 1;
    }

    log::debug!("{printed} of {} connections printed.", connections.len());
}
