//! `manifest.json` (§6.4): `{version:1, machines: {<machine_id>: {name}}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MachineEntry {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub version: u32,
    pub machines: BTreeMap<String, MachineEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            version: 1,
            machines: BTreeMap::new(),
        }
    }
}

impl Manifest {
    pub fn with_self_registered(machine_id: &str, machine_name: &str) -> Self {
        let mut manifest = Manifest::default();
        manifest.register(machine_id, machine_name);
        manifest
    }

    pub fn register(&mut self, machine_id: &str, machine_name: &str) {
        self.machines.insert(
            machine_id.to_string(),
            MachineEntry {
                name: machine_name.to_string(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_roundtrips_through_json() {
        let manifest = Manifest::with_self_registered("m1", "laptop");
        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest, back);
    }
}
