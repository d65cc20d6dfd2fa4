use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_BASE_PATH: &str = "./testnet-data";

const NODE_BINARY_KEY: &str = "NODE_BINARY";
const BASE_PATH_KEY: &str = "TESTNET_BASE_PATH";

pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();

        if let Ok(binary) = env::var(NODE_BINARY_KEY) {
            map.insert(String::from(NODE_BINARY_KEY), binary);
        }

        let mut base_path = String::from(DEFAULT_BASE_PATH);
        if let Ok(path) = env::var(BASE_PATH_KEY) {
            base_path = path;
        }
        map.insert(String::from(BASE_PATH_KEY), base_path);

        Config {
            inner: RwLock::new(map),
        }
    }

    pub fn get_node_binary(&self) -> Option<String> {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner.get(NODE_BINARY_KEY).cloned()
    }

    pub fn set_node_binary(&self, binary: String) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(NODE_BINARY_KEY), binary);
    }

    pub fn get_base_path(&self) -> String {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(BASE_PATH_KEY)
            .expect("Base path should always be present in config")
            .clone()
    }

    pub fn set_base_path(&self, path: String) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(BASE_PATH_KEY), path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_has_default() {
        let config = Config::new();
        assert!(!config.get_base_path().is_empty());
    }

    #[test]
    fn test_setters_override() {
        let config = Config::new();
        config.set_node_binary("/opt/node".to_string());
        assert_eq!(config.get_node_binary().as_deref(), Some("/opt/node"));
        config.set_base_path("/tmp/other".to_string());
        assert_eq!(config.get_base_path(), "/tmp/other");
    }
}
