use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use venn_layout::config::Config;
use venn_layout::diagram::compute_diagram;
use venn_layout::geometry::{Circle, intersection_area};
use venn_layout::ir::Region;
use venn_layout::layout::{compute_layout, compute_text_centres};
use venn_layout::render::render_svg;

/// `sets` sets on a ring, each overlapping its neighbours, plus one region
/// covering every consecutive triple.
fn ring_regions(sets: usize) -> Vec<Region> {
    let ids: Vec<String> = (0..sets).map(|i| format!("S{i}")).collect();
    let mut regions: Vec<Region> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| Region::new([id.as_str()], 10.0 + i as f64))
        .collect();
    for i in 0..sets {
        // two sets form a single pair, not a ring
        if sets == 2 && i == 1 {
            break;
        }
        let (a, b) = (&ids[i], &ids[(i + 1) % sets]);
        regions.push(Region::new([a.as_str(), b.as_str()], 2.0));
    }
    if sets >= 3 {
        for i in 0..sets {
            let triple = [&ids[i], &ids[(i + 1) % sets], &ids[(i + 2) % sets]];
            regions.push(Region::new(triple.map(String::as_str), 0.5));
        }
    }
    regions
}

fn bench_intersection_area(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersection_area");
    for n in [2usize, 3, 5, 8] {
        let circles: Vec<Circle> = (0..n)
            .map(|i| {
                let angle = i as f64 / n as f64 * std::f64::consts::TAU;
                Circle::new(angle.cos(), angle.sin(), 1.5)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &circles, |b, circles| {
            b.iter(|| black_box(intersection_area(black_box(circles)).area));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for sets in [2usize, 3, 5, 8] {
        let regions = ring_regions(sets);
        group.bench_with_input(BenchmarkId::from_parameter(sets), &regions, |b, regions| {
            b.iter(|| black_box(compute_layout(black_box(regions)).len()));
        });
    }
    group.finish();
}

fn bench_text_centres(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_centres");
    for sets in [3usize, 5, 8] {
        let regions = ring_regions(sets);
        let solution = compute_layout(&regions);
        group.bench_with_input(BenchmarkId::from_parameter(sets), &regions, |b, regions| {
            b.iter(|| black_box(compute_text_centres(&solution, black_box(regions)).len()));
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = Config::default();
    for sets in [2usize, 3, 5] {
        let regions = ring_regions(sets);
        group.bench_with_input(BenchmarkId::from_parameter(sets), &regions, |b, regions| {
            b.iter(|| {
                let diagram = compute_diagram(black_box(regions), &config);
                let svg = render_svg(&diagram, &config.theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_intersection_area, bench_layout, bench_text_centres, bench_end_to_end
);
criterion_main!(benches);
