//! Benchmarks for the tab strip layout pass.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use veldt_core::geometry::Rect;
use veldt_ui::Group;
use veldt_ui::measure::FixedMetrics;
use veldt_ui::style::StyleRegistry;
use veldt_ui::widgets::Tabs;

fn setup(count: usize, width: i32) -> Tabs {
    let styles = StyleRegistry::default();
    let mut tabs = Tabs::new(&styles, Rect::new(0, 0, width, 300));
    for i in 0..count {
        let mut card = Group::new(&styles, Rect::new(0, 25, width, 275));
        card.base_mut().set_label(format!("Tab {i}"));
        tabs.add(card);
    }
    tabs
}

fn bench_tab_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("tab_positions");
    let metrics = FixedMetrics;

    for count in [4, 16, 64] {
        group.throughput(Throughput::Elements(count as u64));

        // Wide enough: no compression.
        group.bench_with_input(BenchmarkId::new("uncompressed", count), &count, |b, &count| {
            let tabs = setup(count, 8000);
            b.iter(|| black_box(tabs.tab_positions(&metrics)));
        });

        // Narrow strip: both compression passes run.
        group.bench_with_input(BenchmarkId::new("compressed", count), &count, |b, &count| {
            let tabs = setup(count, 200);
            b.iter(|| black_box(tabs.tab_positions(&metrics)));
        });
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let metrics = FixedMetrics;
    let tabs = setup(32, 300);
    c.bench_function("which_32_compressed", |b| {
        b.iter(|| black_box(tabs.which(150, 12, &metrics)))
    });
}

criterion_group!(benches, bench_tab_positions, bench_hit_test);
criterion_main!(benches);
