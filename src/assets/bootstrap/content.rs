//! Static file and unit content embedded in the bootstrap payload

use super::TemplateData;

pub const REPORT_PROGRESS_SH: &str = r#"#!/usr/bin/env bash
set -euo pipefail

KUBECONFIG="${1}"
NAME="${2}"
MESSAGE="${3}"

echo "Reporting install progress: ${NAME}: ${MESSAGE}"
oc --config="$KUBECONFIG" create -f - <<EOF || true
apiVersion: v1
kind: ConfigMap
metadata:
  name: ${NAME}
  namespace: kube-system
data:
  status: "${MESSAGE}"
EOF
"#;

pub const BOOTKUBE_UNIT: &str = r#"[Unit]
Description=Bootstrap a Kubernetes cluster
Wants=kubelet.service
After=kubelet.service

[Service]
WorkingDirectory=/opt/kindling
ExecStart=/usr/local/bin/bootkube.sh
Restart=on-failure
RestartSec=5s
"#;

pub const PROGRESS_UNIT: &str = r#"[Unit]
Description=Report the completion of the cluster bootstrap process
Wants=bootkube.service
After=bootkube.service

[Service]
ExecStart=/usr/local/bin/report-progress.sh /opt/kindling/auth/kubeconfig bootstrap-complete "cluster bootstrapping has completed"
Restart=on-failure
RestartSec=5s

[Install]
WantedBy=multi-user.target
"#;

pub const KUBELET_UNIT: &str = r#"[Unit]
Description=Kubernetes Kubelet
Wants=rpc-statd.service

[Service]
ExecStartPre=/bin/mkdir --parents /etc/kubernetes/manifests
ExecStart=/usr/bin/hyperkube kubelet \
    --kubeconfig=/etc/kubernetes/kubeconfig \
    --pod-manifest-path=/etc/kubernetes/manifests \
    --allow-privileged \
    --minimum-container-ttl-duration=6m0s \
    --cluster-domain=cluster.local
Restart=always
RestartSec=10

[Install]
WantedBy=multi-user.target
"#;

/// The script the bootkube unit runs
pub fn bootkube_script(data: &TemplateData) -> String {
    format!(
        r#"#!/usr/bin/env bash
set -e

mkdir --parents /etc/kubernetes/manifests

RELEASE_IMAGE={release_image}

echo "Rendering cluster manifests..."
podman run \
    --volume "$PWD:/assets:z" \
    "{bootkube_image}" \
    render \
    --asset-dir=/assets \
    --etcd-servers={etcd_cluster}

cp --recursive /opt/kindling/manifests/. /etc/kubernetes/manifests/
cp --recursive /opt/kindling/kube-dns-operator-bootstrap/. /etc/kubernetes/manifests/

echo "Starting etcd certificate signer..."
podman run \
    --detach \
    --name etcd-signer \
    --network host \
    "{etcd_cert_signer_image}"

until podman run --rm --network host "{etcdctl_image}" \
    --endpoints={etcd_cluster} endpoint health; do
    echo "etcd not yet available..."
    sleep 5
done

podman stop etcd-signer
podman run \
    --volume "$PWD:/assets:z" \
    --network host \
    "{bootkube_image}" \
    start --asset-dir=/assets
"#,
        release_image = data.release_image,
        bootkube_image = data.bootkube_image,
        etcd_cluster = data.etcd_cluster,
        etcd_cert_signer_image = data.etcd_cert_signer_image,
        etcdctl_image = data.etcdctl_image,
    )
}

/// Override that pins the cluster DNS service address
pub fn kube_dns_service(data: &TemplateData) -> String {
    format!(
        r#"apiVersion: v1
kind: Service
metadata:
  name: kube-dns
  namespace: kube-system
spec:
  clusterIP: {cluster_dns_ip}
"#,
        cluster_dns_ip = data.cluster_dns_ip,
    )
}
