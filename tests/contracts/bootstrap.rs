//! Cluster bootstrap contracts
//!
//! End-to-end behaviour of the cluster asset set: what the bootstrap payload
//! contains, that generation is deterministic, and that a written asset
//! directory is reused by the next session.

use crate::common::*;
use kindling::assets::bootstrap::etcd_endpoints;
use kindling::assets::ignition::IgnitionConfig;
use kindling::assets::{BOOTSTRAP_IGN_FILENAME, DEFAULT_RELEASE_IMAGE, INSTALL_CONFIG_FILENAME};
use kindling::domain::ports::MissingFetcher;
use kindling::infrastructure::{DirectoryFetcher, DirectoryMaterializer};
use kindling::{AssetKind, ClusterAsset, ClusterCatalog, Session, SessionOptions};
use tempfile::tempdir;

fn payload(bytes: &[u8]) -> IgnitionConfig {
    serde_json::from_slice(bytes).unwrap()
}

fn decoded(config: &IgnitionConfig, path: &str) -> String {
    let file = config
        .file(path)
        .unwrap_or_else(|| panic!("payload has no {path}"));
    String::from_utf8(file.decoded_contents().unwrap()).unwrap()
}

/// CONTRACT: The primary pool sizes the etcd cluster
mod primary_pool {
    use super::*;

    #[test]
    fn contract_missing_primary_pool_means_one_replica() {
        let mut install = cluster(None);
        install.machines = vec![kindling::domain::value_objects::MachinePool::new(
            "worker",
            Some(4),
        )];

        assert_eq!(install.primary_replicas(), 1);
        assert_eq!(etcd_endpoints(&install).len(), 1);
    }

    #[test]
    fn contract_primary_pool_without_count_means_one_replica() {
        let mut install = cluster(None);
        install.machines = vec![kindling::domain::value_objects::MachinePool::new(
            "primary", None,
        )];

        assert_eq!(install.primary_replicas(), 1);
    }

    #[test]
    fn contract_three_primaries_give_three_etcd_members() {
        let context = cluster_context(Some(3));
        let output = Session::new(ClusterCatalog, &context, &MissingFetcher)
            .run::<ClusterAsset>(AssetKind::BootstrapIgnition)
            .unwrap();

        let config = payload(output.files[0].content());
        let script = decoded(&config, "/usr/local/bin/bootkube.sh");

        assert!(script.contains(
            "--etcd-servers=https://demo-etcd-0.example.com:2379,https://demo-etcd-1.example.com:2379,https://demo-etcd-2.example.com:2379"
        ));
    }
}

/// CONTRACT: Release image comes from the session context only
mod release_image {
    use super::*;

    #[test]
    fn contract_default_and_override() {
        let default_context = cluster_context(None);
        let override_context =
            cluster_context(None).with_release_image_override("registry.example.com/release:test");

        let default = Session::new(ClusterCatalog, &default_context, &MissingFetcher)
            .run::<ClusterAsset>(AssetKind::BootstrapIgnition)
            .unwrap();
        let overridden = Session::new(ClusterCatalog, &override_context, &MissingFetcher)
            .run::<ClusterAsset>(AssetKind::BootstrapIgnition)
            .unwrap();

        let default_script = decoded(
            &payload(default.files[0].content()),
            "/usr/local/bin/bootkube.sh",
        );
        let override_script = decoded(
            &payload(overridden.files[0].content()),
            "/usr/local/bin/bootkube.sh",
        );
        assert!(default_script.contains(&format!("RELEASE_IMAGE={DEFAULT_RELEASE_IMAGE}")));
        assert!(override_script.contains("RELEASE_IMAGE=registry.example.com/release:test"));
    }
}

/// CONTRACT: Generate-only sessions are deterministic
mod determinism {
    use super::*;

    #[test]
    fn contract_two_sessions_produce_identical_bytes() {
        let context = cluster_context(Some(3));
        let options = SessionOptions::new().with_subtree(true);

        let first = Session::new(ClusterCatalog, &context, &MissingFetcher)
            .with_options(options.clone())
            .run::<ClusterAsset>(AssetKind::BootstrapIgnition)
            .unwrap();
        let second = Session::new(ClusterCatalog, &context, &MissingFetcher)
            .with_options(options.with_parallel(true))
            .run::<ClusterAsset>(AssetKind::BootstrapIgnition)
            .unwrap();

        let digests = |files: &[kindling::File]| -> Vec<(String, String)> {
            files
                .iter()
                .map(|f| (f.path().to_string(), f.digest()))
                .collect()
        };
        assert_eq!(digests(&first.files), digests(&second.files));
    }
}

/// CONTRACT: A written asset directory is reused
mod reuse {
    use super::*;

    #[test]
    fn contract_second_session_loads_instead_of_generating() {
        let dir = tempdir().unwrap();
        let context = cluster_context(Some(3));
        let materializer = DirectoryMaterializer::new(dir.path());

        Session::new(ClusterCatalog, &context, &MissingFetcher)
            .with_options(SessionOptions::new().with_subtree(true))
            .create::<ClusterAsset>(AssetKind::BootstrapIgnition, &materializer)
            .unwrap();
        let written = std::fs::read(dir.path().join(BOOTSTRAP_IGN_FILENAME)).unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        let other_cluster = cluster_context(Some(5));
        let output = Session::new(ClusterCatalog, &other_cluster, &fetcher)
            .run::<ClusterAsset>(AssetKind::BootstrapIgnition)
            .unwrap();

        assert_eq!(output.files[0].content(), written.as_slice());
        assert!(output.loaded().any(|kind| kind == AssetKind::InstallConfig));
    }

    #[test]
    fn contract_unknown_install_config_version_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(INSTALL_CONFIG_FILENAME),
            "version = 9\n\n[cluster]\nname = \"demo\"\nbaseDomain = \"example.com\"\n",
        )
        .unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        let context = cluster_context(None);

        let err = Session::new(ClusterCatalog, &context, &fetcher)
            .run::<ClusterAsset>(AssetKind::Manifests)
            .unwrap_err();

        assert_eq!(err.asset_chain(), vec!["Common Manifests", "Install Config"]);
        assert!(err.report().contains("version"));
    }
}
