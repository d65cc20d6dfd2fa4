// This is my main entry point for the testnet harness CLI
// I'm importing the building blocks the library exposes for orchestration
use chain_testkit::keys::{derive_authority_keys, insert_node_keys};
use chain_testkit::spec::{self, SpecPatch, DEFAULT_ENDOWMENT};
use chain_testkit::testnet::{LocalNetwork, NetworkOptions};
use chain_testkit::{Command, Opt, GLOBAL_CONFIG};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use std::process;

fn main() {
    // I initialize logging so I can watch the nodes come up
    // Info level gives me enough detail without drowning in node output
    env_logger::builder().filter_level(LevelFilter::Info).init();

    // I parse the command line arguments using clap
    let opt = Opt::parse();

    // I run the actual command and handle any errors that might occur
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

// Resolve the node binary from the flag or the NODE_BINARY environment default
fn resolve_binary(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(binary) = flag {
        return Ok(binary);
    }
    match GLOBAL_CONFIG.get_node_binary() {
        Some(binary) => Ok(PathBuf::from(binary)),
        None => Err("No node binary: pass --binary or set NODE_BINARY".into()),
    }
}

// This is where I handle all the different CLI commands
fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // When I want a deployable raw chain spec, optionally with extra authorities
        Command::BuildSpec {
            binary,
            output,
            authorities,
            endowment,
        } => {
            let binary = resolve_binary(binary)?;
            if authorities.is_empty() {
                // No patching needed, the binary's own local spec is enough
                spec::generate(&binary, &output, None)?;
            } else {
                let endowment = endowment.unwrap_or(DEFAULT_ENDOWMENT);
                let patch_authorities = move |patch: &mut SpecPatch| {
                    for seed in &authorities {
                        patch.add_authority(seed, endowment);
                    }
                };
                spec::generate(&binary, &output, Some(&patch_authorities))?;
            }
            println!("Wrote {}", output.display());
        }
        // When I want to see the addresses a seed resolves to
        Command::DeriveKeys { seed } => {
            let keys = derive_authority_keys(&seed);
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        // When I want a node's keystore to match the spec authorities
        Command::InsertKeys {
            binary,
            base_path,
            chain_spec,
            seed,
        } => {
            let binary = resolve_binary(binary)?;
            insert_node_keys(&binary, &base_path, &chain_spec, &seed)?;
            println!("Done!");
        }
        // When I want a full local network as a smoke test: launch, gate on
        // readiness, watch finality happen, then tear everything down
        Command::Spawn {
            binary,
            base_dir,
            authorities,
            base_port,
            base_rpc_port,
            finalized,
        } => {
            let binary = resolve_binary(binary)?;
            let base_dir =
                base_dir.unwrap_or_else(|| PathBuf::from(GLOBAL_CONFIG.get_base_path()));

            let mut options = NetworkOptions::new(binary, base_dir).with_authorities(authorities);
            if let Some(port) = base_port {
                options.base_port = port;
            }
            if let Some(rpc_port) = base_rpc_port {
                options.base_rpc_port = rpc_port;
            }

            let mut network = LocalNetwork::launch(&options)?;
            network.wait_until_live()?;
            info!("Network live, waiting for finalized #{finalized}");
            network.wait_for_finality(finalized)?;

            for node in network.nodes() {
                println!(
                    "{}: p2p={} rpc={} (finalized #{finalized})",
                    node.name(),
                    node.port(),
                    node.rpc_port()
                );
            }
            network.stop()?;
            println!("Success!");
        }
    }
    Ok(())
}
