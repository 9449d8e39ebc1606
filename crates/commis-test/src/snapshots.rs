//! Snapshots shaped like real collector output.

use commis_core::{Measurement, MeasurementType, Snapshot, Subtype};

/// An Ubuntu EKS training cluster with NVIDIA accelerators.
///
/// Carries every signal the built-in detection rules look for, including
/// both the explicit provider field and the vendor-suffixed server version.
pub fn eks_training_snapshot() -> Snapshot {
    Snapshot::new()
        .with_measurement(
            Measurement::new(MeasurementType::Os).with_subtype(
                Subtype::new("release")
                    .with_entry("ID", "ubuntu")
                    .with_entry("VERSION_ID", "22.04")
                    .with_entry("PRETTY_NAME", "Ubuntu 22.04.4 LTS"),
            ),
        )
        .with_measurement(
            Measurement::new(MeasurementType::Kernel)
                .with_subtype(Subtype::new("release").with_entry("version", "6.8.0-1021-aws")),
        )
        .with_measurement(
            Measurement::new(MeasurementType::Sysctl).with_subtype(
                Subtype::new("defaults")
                    .with_entry("fs.inotify.max_user_watches", 524288)
                    .with_entry("net.core.rmem_max", 268435456)
                    .with_entry("net.core.somaxconn", 4096)
                    .with_entry("net.core.wmem_max", 268435456)
                    .with_entry("net.ipv4.ip_forward", 1),
            ),
        )
        .with_measurement(
            Measurement::new(MeasurementType::SystemD).with_subtype(
                Subtype::new("units")
                    .with_entry("containerd", "enabled")
                    .with_entry("kubelet", "enabled")
                    .with_entry("nvidia-persistenced", "enabled"),
            ),
        )
        .with_measurement(
            Measurement::new(MeasurementType::Kmod).with_subtype(
                Subtype::new("modules")
                    .with_entry("br_netfilter", true)
                    .with_entry("nvidia_peermem", true)
                    .with_entry("overlay", true),
            ),
        )
        .with_measurement(
            Measurement::new(MeasurementType::Gpu)
                .with_subtype(
                    Subtype::new("device")
                        .with_entry("vendor", "NVIDIA Corporation")
                        .with_entry("model", "H100 80GB HBM3")
                        .with_entry("count", 8),
                )
                .with_subtype(Subtype::new("driver").with_entry("version", "550.54.15")),
        )
        .with_measurement(
            Measurement::new(MeasurementType::K8s)
                .with_subtype(
                    Subtype::new("cluster")
                        .with_entry("provider", "eks")
                        .with_entry("workload", "training"),
                )
                .with_subtype(
                    Subtype::new("server").with_entry("version", "v1.33.5-eks-3025e55"),
                ),
        )
}

/// A RHEL inference box with AMD accelerators and a vanilla Kubernetes.
///
/// Has no provider signal at all, so service detection comes up empty.
pub fn rhel_inference_snapshot() -> Snapshot {
    Snapshot::new()
        .with_measurement(
            Measurement::new(MeasurementType::Os).with_subtype(
                Subtype::new("release")
                    .with_entry("ID", "rhel")
                    .with_entry("VERSION_ID", "9.4"),
            ),
        )
        .with_measurement(
            Measurement::new(MeasurementType::Gpu).with_subtype(
                Subtype::new("device")
                    .with_entry("vendor", "Advanced Micro Devices, Inc. [AMD/ATI]")
                    .with_entry("model", "Instinct MI300X"),
            ),
        )
        .with_measurement(
            Measurement::new(MeasurementType::K8s)
                .with_subtype(Subtype::new("cluster").with_entry("workload", "inference"))
                .with_subtype(Subtype::new("server").with_entry("version", "v1.29.7")),
        )
}
