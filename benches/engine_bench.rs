use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use symbio::{
    process_requests, Coordinates, EngineConfig, Logistics, MaterialRequirement, ReceiverRecord,
    Requirement, SupplierRecord, WasteOutput,
};

/// Synthetic facility cluster: suppliers and receivers of a handful of
/// material streams scattered over a ~100 km grid.
fn synthetic_corpus(count: usize) -> (Vec<SupplierRecord>, Vec<ReceiverRecord>) {
    let materials = ["Fly Ash", "Slag", "Sawdust", "Spent Solvent"];
    let mut suppliers = Vec::with_capacity(count);
    let mut receivers = Vec::with_capacity(count);
    for i in 0..count {
        let material = materials[i % materials.len()].to_string();
        let lat = 12.5 + 0.01 * (i % 50) as f64;
        let lon = 79.5 + 0.01 * (i / 50) as f64;
        suppliers.push(SupplierRecord {
            id: format!("SUP_{i}"),
            name: format!("Supplier {i}"),
            industry: "Manufacturing".to_string(),
            location: Some(Coordinates::new(lat, lon)),
            waste_output: WasteOutput {
                material_type: material.clone(),
                quantity_tons: 40.0 + (i % 10) as f64 * 12.0,
                frequency: "weekly".to_string(),
                chemical_composition: [("SiO2".to_string(), "55%".to_string())].into(),
                physical_properties: Default::default(),
                current_disposal_landfill_km: 60.0,
            },
            certifications: Default::default(),
        });
        receivers.push(ReceiverRecord {
            id: format!("REC_{i}"),
            name: format!("Receiver {i}"),
            industry: "Manufacturing".to_string(),
            location: Some(Coordinates::new(lat + 0.05, lon - 0.03)),
            material_requirement: MaterialRequirement {
                material_type: material,
                quantity_tons: 35.0 + (i % 7) as f64 * 15.0,
                frequency: "weekly".to_string(),
                required_composition: [("SiO2".to_string(), Requirement::Gt(40.0))].into(),
                required_properties: Default::default(),
                processing_cost_per_ton: 100.0,
                budget_per_ton: None,
            },
            logistics: Logistics {
                max_distance_km: 120.0,
            },
            certifications_required: Default::default(),
        });
    }
    (suppliers, receivers)
}

fn bench_process_requests(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_requests");
    let cfg = EngineConfig::default();

    for count in [10usize, 50, 200] {
        let (suppliers, receivers) = synthetic_corpus(count);
        group.throughput(Throughput::Elements((count * count) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &(suppliers, receivers),
            |b, (suppliers, receivers)| {
                b.iter(|| {
                    let outcome = process_requests(
                        black_box(suppliers),
                        black_box(receivers),
                        black_box(&cfg),
                    )
                    .expect("valid config");
                    black_box(outcome)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_process_requests);
criterion_main!(benches);
