use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HarnessError, Result};
use crate::keys::insert_node_keys;
use crate::node::{
    ensure_finalized_blocks, ensure_peer_count, ensure_started, Node, NodeOptions,
    FINALIZED_TIMEOUT, PEERS_TIMEOUT, START_TIMEOUT,
};
use crate::spec::{self, SpecPatch, DEFAULT_ENDOWMENT};

/// Launch configuration for a local network
#[derive(Debug, Clone)]
pub struct NetworkOptions {
    /// Path to the node binary shared by every validator
    pub binary: PathBuf,
    /// Directory receiving the chain spec and per-node base paths
    pub base_dir: PathBuf,
    /// Authority seeds; one validator is spawned per seed
    pub authorities: Vec<String>,
    /// First p2p port; validator i listens on `base_port + i`
    pub base_port: u16,
    /// First RPC port; validator i listens on `base_rpc_port + i`
    pub base_rpc_port: u16,
}

impl NetworkOptions {
    pub fn new(binary: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            base_dir: base_dir.into(),
            authorities: Vec::new(),
            base_port: 30333,
            base_rpc_port: 9944,
        }
    }

    pub fn with_authorities<S: Into<String>>(
        mut self,
        seeds: impl IntoIterator<Item = S>,
    ) -> Self {
        self.authorities = seeds.into_iter().map(Into::into).collect();
        self
    }
}

/// A running local network of validator processes.
///
/// The chain-spec file is written once before any node starts and is
/// read-only afterwards; the nodes share no other state.
#[derive(Debug)]
pub struct LocalNetwork {
    nodes: Vec<Node>,
    spec_path: PathBuf,
}

impl LocalNetwork {
    /// Generate the chain spec, seed every keystore, and spawn one
    /// validator per authority seed.
    ///
    /// Nodes are live processes when this returns, but not yet ready;
    /// call [`LocalNetwork::wait_until_live`] to gate on readiness.
    pub fn launch(options: &NetworkOptions) -> Result<LocalNetwork> {
        if options.authorities.is_empty() {
            return Err(HarnessError::Config(
                "A network needs at least one authority seed".to_string(),
            ));
        }

        fs::create_dir_all(&options.base_dir)?;
        let spec_path = options.base_dir.join("chain-spec.json");

        let seeds = options.authorities.clone();
        let patch_authorities = move |patch: &mut SpecPatch| {
            for seed in &seeds {
                patch.add_authority(seed, DEFAULT_ENDOWMENT);
            }
        };
        spec::generate(&options.binary, &spec_path, Some(&patch_authorities))?;

        let mut nodes = Vec::with_capacity(options.authorities.len());
        for (index, seed) in options.authorities.iter().enumerate() {
            let name = seed.to_lowercase();
            let base_path = options.base_dir.join(&name);
            fs::create_dir_all(&base_path)?;

            insert_node_keys(&options.binary, &base_path, &spec_path, seed)?;

            let node_options = NodeOptions {
                binary: options.binary.clone(),
                base_path,
                name,
                port: options.base_port + index as u16,
                rpc_port: options.base_rpc_port + index as u16,
                validator: true,
                chain_spec: spec_path.clone(),
            };
            nodes.push(Node::start(&node_options)?);
        }

        info!("Launched {} validators", nodes.len());
        Ok(LocalNetwork { nodes, spec_path })
    }

    /// Gate until every node has started and sees all of its peers.
    pub fn wait_until_live(&self) -> Result<()> {
        for node in &self.nodes {
            ensure_started(node, START_TIMEOUT)?;
        }
        let expected_peers = (self.nodes.len() - 1) as u64;
        if expected_peers > 0 {
            for node in &self.nodes {
                ensure_peer_count(node, expected_peers, PEERS_TIMEOUT)?;
            }
        }
        info!("Network is live: {} nodes interconnected", self.nodes.len());
        Ok(())
    }

    /// Gate until every node reports a finalized height of at least
    /// `height`.
    pub fn wait_for_finality(&self, height: u64) -> Result<()> {
        for node in &self.nodes {
            ensure_finalized_blocks(node, height, FINALIZED_TIMEOUT)?;
        }
        Ok(())
    }

    /// Variant of [`LocalNetwork::wait_for_finality`] with a caller-chosen
    /// timeout, for tests that run against fast fake networks.
    pub fn wait_for_finality_within(&self, height: u64, timeout: Duration) -> Result<()> {
        for node in &self.nodes {
            ensure_finalized_blocks(node, height, timeout)?;
        }
        Ok(())
    }

    /// Stop every node, reporting the first failure after trying them all.
    pub fn stop(&mut self) -> Result<()> {
        let mut first_error = None;
        for node in &mut self.nodes {
            if let Err(e) = node.stop() {
                warn!("Failed to stop node {}: {e}", node.name());
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    pub fn spec_path(&self) -> &PathBuf {
        &self.spec_path
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
