//! Reusable fixtures for Kindling tests.

use kindling::domain::value_objects::MachinePool;
use kindling::{InstallConfig, SessionContext};

use super::SpyCatalog;

pub const TEST_SSH_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIK test@example.com";

/// Cluster parameters for a cluster named `demo` with `replicas` primaries
pub fn cluster(replicas: Option<u32>) -> InstallConfig {
    let mut config = InstallConfig::new("demo", "example.com");
    config.admin.ssh_key = Some(TEST_SSH_KEY.to_string());
    if let Some(replicas) = replicas {
        config.machines = vec![
            MachinePool::new("worker", Some(2)),
            MachinePool::new("primary", Some(replicas)),
        ];
    }
    config
}

pub fn cluster_context(replicas: Option<u32>) -> SessionContext {
    SessionContext::new().with_cluster(cluster(replicas))
}

/// root 4 depends on 2 and 3, which both depend on 1
pub fn diamond() -> SpyCatalog {
    SpyCatalog::from_edges(&[(4, &[2, 3]), (2, &[1]), (3, &[1]), (1, &[])])
}

/// root 1 -> 2 -> 3, plus a sibling branch 1 -> 4
pub fn chain_with_sibling() -> SpyCatalog {
    SpyCatalog::from_edges(&[(1, &[2, 4]), (2, &[3]), (3, &[]), (4, &[])])
}
