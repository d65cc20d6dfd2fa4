use std::path::PathBuf;

/// Well-known development identities the node binary accepts as a shortcut
/// flag (`--alice`) instead of `--name`.
pub const RESERVED_IDENTITIES: &[&str] = &["alice", "bob", "charlie", "dave", "eve", "ferdie"];

/// Launch configuration for a single validator process
#[derive(Debug, Clone)]
pub struct NodeOptions {
    /// Path to the node binary
    pub binary: PathBuf,
    /// Per-node data directory
    pub base_path: PathBuf,
    /// Display name; reserved identities select the shortcut flag
    pub name: String,
    /// P2P listen port
    pub port: u16,
    /// RPC listen port
    pub rpc_port: u16,
    /// Whether to pass `--validator`
    pub validator: bool,
    /// Path to the raw chain spec the node boots from
    pub chain_spec: PathBuf,
}

impl NodeOptions {
    /// Build the argument vector for spawning the node process.
    ///
    /// The trailing flags open up CORS, local discovery, and node-key
    /// generation; they are only appropriate for throwaway local networks.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        let lowered = self.name.to_lowercase();
        if RESERVED_IDENTITIES.contains(&lowered.as_str()) {
            args.push(format!("--{lowered}"));
        } else {
            args.push("--name".to_string());
            args.push(self.name.clone());
        }

        args.push("--chain".to_string());
        args.push(self.chain_spec.display().to_string());
        args.push("--base-path".to_string());
        args.push(self.base_path.display().to_string());
        args.push("--port".to_string());
        args.push(self.port.to_string());
        args.push("--rpc-port".to_string());
        args.push(self.rpc_port.to_string());

        if self.validator {
            args.push("--validator".to_string());
        }

        args.push("--rpc-cors=all".to_string());
        args.push("--allow-private-ipv4".to_string());
        args.push("--discover-local".to_string());
        args.push("--unsafe-force-node-key-generation".to_string());

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn options(name: &str, validator: bool) -> NodeOptions {
        NodeOptions {
            binary: Path::new("/usr/local/bin/node-binary").to_path_buf(),
            base_path: Path::new("/tmp/net/alice").to_path_buf(),
            name: name.to_string(),
            port: 30333,
            rpc_port: 9944,
            validator,
            chain_spec: Path::new("/tmp/net/spec.json").to_path_buf(),
        }
    }

    #[test]
    fn test_reserved_identity_uses_shortcut_flag() {
        let args = options("Alice", true).args();
        assert_eq!(args[0], "--alice");
        assert!(!args.contains(&"--name".to_string()));
    }

    #[test]
    fn test_custom_name_uses_name_flag() {
        let args = options("validator-7", true).args();
        assert_eq!(args[0], "--name");
        assert_eq!(args[1], "validator-7");
    }

    #[test]
    fn test_validator_flag_is_conditional() {
        assert!(options("Bob", true).args().contains(&"--validator".to_string()));
        assert!(!options("Bob", false).args().contains(&"--validator".to_string()));
    }

    #[test]
    fn test_permissive_local_flags_are_always_present() {
        let args = options("observer", false).args();
        for flag in [
            "--rpc-cors=all",
            "--allow-private-ipv4",
            "--discover-local",
            "--unsafe-force-node-key-generation",
        ] {
            assert!(args.contains(&flag.to_string()), "missing {flag}");
        }
    }

    #[test]
    fn test_ports_are_rendered() {
        let args = options("Charlie", true).args();
        let port_idx = args.iter().position(|a| a == "--port").unwrap();
        assert_eq!(args[port_idx + 1], "30333");
        let rpc_idx = args.iter().position(|a| a == "--rpc-port").unwrap();
        assert_eq!(args[rpc_idx + 1], "9944");
    }
}
