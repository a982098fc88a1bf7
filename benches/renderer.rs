use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hostmap_renderer::config::{Config, LayoutConfig};
use hostmap_renderer::interaction::hit_test;
use hostmap_renderer::ir::group_by;
use hostmap_renderer::layout::{Point, compute_layout};
use hostmap_renderer::panel::HostmapPanel;
use hostmap_renderer::parser::parse_input;
use hostmap_renderer::render::render_svg;
use std::hint::black_box;

fn exposition_source(hosts: usize, groups: usize) -> String {
    let mut out = String::from("# TYPE node_load1 gauge\n");
    for i in 0..hosts {
        out.push_str(&format!(
            "node_load1{{instance=\"host-{i}:9100\",dc=\"dc-{}\"}} {}\n",
            i % groups.max(1),
            (i * 37 % 100) as f64
        ));
    }
    out
}

fn grouped_config() -> Config {
    let mut config = Config::default();
    config.layout.group_by_label = "dc".to_string();
    config.layout.node_id_label = "instance".to_string();
    config
}

const SIZES: [(usize, usize); 4] = [(10, 1), (200, 4), (2_000, 8), (20_000, 16)];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (hosts, groups) in SIZES {
        let input = exposition_source(hosts, groups);
        group.bench_with_input(BenchmarkId::from_parameter(hosts), &input, |b, data| {
            b.iter(|| {
                let series = parse_input(black_box(data)).expect("parse failed");
                black_box(series.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = grouped_config();
    for (hosts, groups) in SIZES {
        let series = parse_input(&exposition_source(hosts, groups)).expect("parse failed");
        let host_groups = group_by(&series, "dc", "instance");
        group.bench_with_input(BenchmarkId::from_parameter(hosts), &host_groups, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &config.layout).expect("layout failed");
                black_box(layout.bounds);
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = grouped_config();
    for (hosts, groups) in SIZES {
        let series = parse_input(&exposition_source(hosts, groups)).expect("parse failed");
        let host_groups = group_by(&series, "dc", "instance");
        let panel = HostmapPanel::new(&host_groups, &config).expect("layout failed");
        group.bench_with_input(BenchmarkId::from_parameter(hosts), &panel, |b, panel| {
            b.iter(|| {
                let svg = render_svg(black_box(panel), &config.render);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    let layout_cfg = LayoutConfig {
        hosts_per_row: 20,
        ..LayoutConfig::default()
    };
    for (hosts, groups) in SIZES {
        let series = parse_input(&exposition_source(hosts, groups)).expect("parse failed");
        let host_groups = group_by(&series, "dc", "instance");
        let layout = compute_layout(&host_groups, &layout_cfg).expect("layout failed");
        let target = layout
            .cells()
            .last()
            .map(|cell| cell.center)
            .unwrap_or(Point::default());
        group.bench_with_input(BenchmarkId::from_parameter(hosts), &layout, |b, layout| {
            b.iter(|| black_box(hit_test(layout, black_box(target)).is_some()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_render, bench_hit_test);
criterion_main!(benches);
