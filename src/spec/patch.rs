use serde_json::{json, Value};

use crate::keys::derive_authority_keys;

/// In-memory view of a parsed (non-raw) chain-spec document.
///
/// All mutators append to an ordered genesis sequence if and only if that
/// sequence already exists in the document. A missing sequence means the
/// runtime does not carry that feature, so the patch is silently skipped.
pub struct SpecPatch {
    doc: Value,
}

impl SpecPatch {
    pub fn new(doc: Value) -> Self {
        Self { doc }
    }

    /// Consume the patch and return the full document for serialization.
    pub fn into_document(self) -> Value {
        self.doc
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// Append a block-production authority address.
    pub fn add_aura_authority(&mut self, address: &str) {
        if let Some(authorities) = self.genesis_sequence(&["aura", "authorities"]) {
            authorities.push(Value::String(address.to_string()));
        }
    }

    /// Append a finality authority as an `[address, weight]` pair.
    pub fn add_grandpa_authority(&mut self, address: &str, weight: u64) {
        if let Some(authorities) = self.genesis_sequence(&["grandpa", "authorities"]) {
            authorities.push(json!([address, weight]));
        }
    }

    /// Append an endowed account as an `[address, amount]` pair.
    pub fn add_balance(&mut self, address: &str, amount: u64) {
        if let Some(balances) = self.genesis_sequence(&["balances", "balances"]) {
            balances.push(json!([address, amount]));
        }
    }

    /// Register a full authority for a seed: derives the key triple and
    /// pushes the aura authority, grandpa authority (weight 1), and an
    /// endowed balance in one step.
    pub fn add_authority(&mut self, seed: &str, endowment: u64) {
        let keys = derive_authority_keys(seed);
        self.add_aura_authority(&keys.aura);
        self.add_grandpa_authority(&keys.grandpa, 1);
        self.add_balance(&keys.account, endowment);
    }

    /// Navigate to an ordered sequence under `genesis.runtime`.
    fn genesis_sequence(&mut self, path: &[&str]) -> Option<&mut Vec<Value>> {
        let mut current = self.doc.get_mut("genesis")?.get_mut("runtime")?;
        for key in path {
            current = current.get_mut(key)?;
        }
        current.as_array_mut()
    }
}
