use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::{HarnessError, Result};
use crate::node::options::NodeOptions;

/// A running validator node and the live view of its log output.
///
/// Exactly one OS process per `Node`; the handle does not outlive the
/// process. Creation does not imply readiness; see [`crate::node::readiness`].
#[derive(Debug)]
pub struct Node {
    name: String,
    binary: PathBuf,
    port: u16,
    rpc_port: u16,
    child: Child,
    subscribers: Arc<Mutex<Vec<Sender<String>>>>,
    last_output: Arc<Mutex<String>>,
}

impl Node {
    /// Spawn one validator process and attach its output stream.
    ///
    /// The node binary logs to stderr; a reader thread buffers the most
    /// recent line for diagnostics and fans every line out to subscribers.
    /// Process exit shows up as stream EOF and is logged, never raised.
    pub fn start(options: &NodeOptions) -> Result<Node> {
        let args = options.args();
        info!("Starting node {} with args: {args:?}", options.name);

        let mut child = Command::new(&options.binary)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                HarnessError::Process(format!(
                    "Failed to spawn {} for node {}: {e}",
                    options.binary.display(),
                    options.name
                ))
            })?;

        let stderr = child.stderr.take().ok_or_else(|| {
            HarnessError::Process(format!("No stderr pipe for node {}", options.name))
        })?;

        let subscribers: Arc<Mutex<Vec<Sender<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let last_output = Arc::new(Mutex::new(String::new()));

        let reader_subscribers = Arc::clone(&subscribers);
        let reader_last_output = Arc::clone(&last_output);
        let reader_name = options.name.clone();

        thread::spawn(move || {
            let reader = BufReader::new(stderr);
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Error reading output of node {reader_name}: {e}");
                        break;
                    }
                };

                if let Ok(mut last) = reader_last_output.lock() {
                    *last = line.clone();
                }

                // Drop subscribers whose receiving end has gone away.
                if let Ok(mut subs) = reader_subscribers.lock() {
                    subs.retain(|tx| tx.send(line.clone()).is_ok());
                }
            }
            // EOF: the process closed its stderr, i.e. it exited or crashed.
            info!("Output stream of node {reader_name} closed");
        });

        Ok(Node {
            name: options.name.clone(),
            binary: options.binary.clone(),
            port: options.port,
            rpc_port: options.rpc_port,
            child,
            subscribers,
            last_output,
        })
    }

    /// Subscribe to the node's log lines from this point on.
    ///
    /// Dropping the receiver detaches the subscription; the reader thread
    /// prunes it on the next line.
    pub fn subscribe_output(&self) -> Receiver<String> {
        let (tx, rx) = channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Most recent log line, for diagnostics only.
    pub fn last_output(&self) -> String {
        self.last_output
            .lock()
            .map(|last| last.clone())
            .unwrap_or_default()
    }

    /// Terminate the process and wait for it to be reaped.
    ///
    /// Fails if the termination signal could not be delivered.
    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping node {}", self.name);
        self.child.kill().map_err(|e| {
            HarnessError::Process(format!("Failed to signal node {}: {e}", self.name))
        })?;
        let status = self.child.wait().map_err(|e| {
            HarnessError::Process(format!("Failed to reap node {}: {e}", self.name))
        })?;
        debug!("Node {} exited with {status}", self.name);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn rpc_port(&self) -> u16 {
        self.rpc_port
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Best effort: never leak a validator process past the handle.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
