///! Benchmarks for attribute mapping and config diffing
///!
///! Run with: cargo bench --package proxbridge-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use proxbridge_common::{ComputeAttributes, ComputeType, NetworkInterface, NicAttributes, VmConfig};
use proxbridge_core::{diff, map_interfaces};

fn interfaces(count: usize) -> Vec<NetworkInterface> {
    (0..count)
        .map(|i| {
            NetworkInterface::new(format!("net{}", i))
                .with_ip(format!("10.0.{}.{}", i / 250, i % 250 + 1))
                .with_ip6(format!("fd00::{:x}", i + 1))
        })
        .collect()
}

fn bench_map_interfaces(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_interfaces");

    for count in [1, 4, 32].iter() {
        let nics = interfaces(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &nics, |b, nics| {
            b.iter(|| map_interfaces(black_box(nics)))
        });
    }

    group.finish();
}

fn bench_config_diff(c: &mut Criterion) {
    let existing: VmConfig = [
        ("cores", "2"),
        ("memory", "2048"),
        ("ostype", "l26"),
        ("net0", "virtio,bridge=vmbr0"),
        ("scsi0", "local-lvm:vm-100-disk-0,size=32G"),
    ]
    .into_iter()
    .collect();

    let mut requested = ComputeAttributes::new(ComputeType::Qemu, "pve")
        .with_config("cores", "4")
        .with_config("memory", "2048")
        .with_config("cpu_type", "host")
        .with_config("spectre", "1")
        .with_interface(
            "0",
            NicAttributes {
                id: "net0".to_string(),
                bridge: Some("vmbr1".to_string()),
                ..Default::default()
            },
        );
    requested.vmid = Some("100".to_string());

    c.bench_function("config_diff_qemu", |b| {
        b.iter(|| diff::diff(black_box(&existing), ComputeType::Qemu, black_box(&requested)))
    });
}

criterion_group!(benches, bench_map_interfaces, bench_config_diff);
criterion_main!(benches);
