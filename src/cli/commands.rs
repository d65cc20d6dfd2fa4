use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chain-testkit")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "buildspec",
        about = "Generate a raw chain spec, optionally patching in authorities"
    )]
    BuildSpec {
        #[arg(long, help = "Path to the node binary (defaults to $NODE_BINARY)")]
        binary: Option<PathBuf>,
        #[arg(long, help = "Where to write the raw chain spec")]
        output: PathBuf,
        #[arg(
            long = "authority",
            help = "Authority seed to patch into the genesis (repeatable)"
        )]
        authorities: Vec<String>,
        #[arg(long, help = "Genesis endowment for each patched authority")]
        endowment: Option<u64>,
    },
    #[command(name = "derivekeys", about = "Derive the key triple for a seed")]
    DeriveKeys {
        #[arg(help = "Authority seed, e.g. Alice")]
        seed: String,
    },
    #[command(
        name = "insertkeys",
        about = "Seed a node keystore with aura and grandpa keys"
    )]
    InsertKeys {
        #[arg(long, help = "Path to the node binary (defaults to $NODE_BINARY)")]
        binary: Option<PathBuf>,
        #[arg(long = "base-path", help = "Node base path holding the keystore")]
        base_path: PathBuf,
        #[arg(long = "chain", help = "Chain spec the keystore belongs to")]
        chain_spec: PathBuf,
        #[arg(help = "Authority seed, e.g. Alice")]
        seed: String,
    },
    #[command(
        name = "spawn",
        about = "Launch a local validator network and wait for finality"
    )]
    Spawn {
        #[arg(long, help = "Path to the node binary (defaults to $NODE_BINARY)")]
        binary: Option<PathBuf>,
        #[arg(
            long = "base-dir",
            help = "Data directory (defaults to $TESTNET_BASE_PATH)"
        )]
        base_dir: Option<PathBuf>,
        #[arg(
            long = "authority",
            help = "Authority seed, one validator per seed (repeatable)"
        )]
        authorities: Vec<String>,
        #[arg(long = "base-port", help = "First p2p port")]
        base_port: Option<u16>,
        #[arg(long = "base-rpc-port", help = "First RPC port")]
        base_rpc_port: Option<u16>,
        #[arg(
            long,
            help = "Finalized height to wait for before shutting down",
            default_value_t = 1
        )]
        finalized: u64,
    },
}
