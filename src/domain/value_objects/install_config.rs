//! Install configuration - the cluster parameters every other asset derives from

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

/// Name of the machine pool whose replica count sizes the control plane
pub const PRIMARY_POOL: &str = "primary";

/// Host offset of the cluster DNS service inside the service network
const CLUSTER_DNS_HOST: u128 = 10;

/// Configuration for one cluster install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    /// Cluster name, used in every generated endpoint
    pub name: String,
    #[serde(default)]
    pub cluster_id: String,
    pub base_domain: String,
    #[serde(default)]
    pub admin: Admin,
    #[serde(default)]
    pub networking: Networking,
    #[serde(default)]
    pub machines: Vec<MachinePool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub pull_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(default = "default_network_type")]
    pub network_type: String,
    /// CIDR the service IPs are assigned from
    #[serde(default = "default_service_cidr")]
    pub service_cidr: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_networks: Vec<String>,
}

fn default_network_type() -> String {
    "OpenShiftSDN".to_string()
}

fn default_service_cidr() -> String {
    "172.30.0.0/16".to_string()
}

impl Default for Networking {
    fn default() -> Self {
        Self {
            network_type: default_network_type(),
            service_cidr: default_service_cidr(),
            cluster_networks: Vec::new(),
        }
    }
}

/// A named group of identically configured machines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
}

impl MachinePool {
    pub fn new(name: impl Into<String>, replicas: Option<u32>) -> Self {
        Self {
            name: name.into(),
            replicas,
        }
    }
}

/// Platform the cluster is installed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Platform {
    Aws { region: String },
    Libvirt { uri: String },
    OpenStack { cloud: String },
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Aws { .. } => "aws",
            Platform::Libvirt { .. } => "libvirt",
            Platform::OpenStack { .. } => "openstack",
        }
    }
}

/// Invalid networking parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("invalid CIDR '{0}'")]
    InvalidCidr(String),

    #[error("CIDR '{0}' is too small to hold the cluster DNS address")]
    TooSmall(String),
}

impl InstallConfig {
    /// Minimal configuration with the defaults for everything optional
    pub fn new(name: impl Into<String>, base_domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster_id: String::new(),
            base_domain: base_domain.into(),
            admin: Admin::default(),
            networking: Networking::default(),
            machines: Vec::new(),
            platform: None,
            pull_secret: String::new(),
        }
    }

    /// Replica count of the primary pool, defaulting to one
    pub fn primary_replicas(&self) -> u32 {
        self.machines
            .iter()
            .find(|pool| pool.name == PRIMARY_POOL)
            .and_then(|pool| pool.replicas)
            .unwrap_or(1)
    }

    /// Platform name, or an empty string if none is configured
    pub fn platform_name(&self) -> &'static str {
        self.platform.as_ref().map(Platform::name).unwrap_or("")
    }

    /// Address of the cluster DNS service (tenth host of the service CIDR)
    pub fn cluster_dns_ip(&self) -> Result<IpAddr, NetworkError> {
        nth_host(&self.networking.service_cidr, CLUSTER_DNS_HOST)
    }

    /// Check the fields every derived asset relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("cluster name must not be empty".to_string());
        }
        if self.base_domain.trim().is_empty() {
            return Err("base domain must not be empty".to_string());
        }
        if self.machines.iter().any(|pool| pool.replicas == Some(0) && pool.name == PRIMARY_POOL) {
            return Err(format!("pool '{PRIMARY_POOL}' needs at least one replica"));
        }
        self.cluster_dns_ip().map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// The `n`th address of a CIDR block
fn nth_host(cidr: &str, n: u128) -> Result<IpAddr, NetworkError> {
    let invalid = || NetworkError::InvalidCidr(cidr.to_string());
    let (addr, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
    let prefix: u32 = prefix.parse().map_err(|_| invalid())?;

    let width = match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };
    if prefix > width {
        return Err(invalid());
    }
    let host_bits = width - prefix;
    if host_bits < 128 && (1u128 << host_bits) <= n {
        return Err(NetworkError::TooSmall(cidr.to_string()));
    }

    Ok(match addr {
        IpAddr::V4(v4) => {
            let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
            let base = u32::from(v4) & mask;
            IpAddr::V4(Ipv4Addr::from(base + n as u32))
        }
        IpAddr::V6(v6) => {
            let mask = if prefix == 0 { 0 } else { u128::MAX << (128 - prefix) };
            let base = u128::from(v6) & mask;
            IpAddr::V6(Ipv6Addr::from(base + n))
        }
    })
}
