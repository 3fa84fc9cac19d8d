//! Benchmarks for output name rendering
//!
//! Tests performance of template rendering and batch planning.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reelforge::plan::build_plan;
use reelforge_av::{TemplateContext, TranscodeSettings};
use std::path::{Path, PathBuf};

/// Template with no variables (baseline)
const TEMPLATE_NO_VARS: &str = "/media/converted/output.mkv";

/// Typical template
const TEMPLATE_SIMPLE: &str = "{dir}/{rawname}.mkv";

/// Format-literal wrapper with short aliases
const TEMPLATE_LITERAL: &str = "f'{d}/{r}.mp4'";

/// Every variable, twice
const TEMPLATE_ALL_VARS: &str =
    "{dir}/{rawname}/{filename}/{d}/{r}/{f}/{dir}/{rawname}/{filename}.mkv";

const SOURCE: &str = "/media/movies/My Movie (2024)/My.Movie.2024.2160p.UHD.BluRay.x265-GROUP.avi";

fn bench_render_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_single");

    let ctx = TemplateContext::for_source(Path::new(SOURCE));

    for (name, template) in [
        ("no_vars", TEMPLATE_NO_VARS),
        ("simple", TEMPLATE_SIMPLE),
        ("literal", TEMPLATE_LITERAL),
        ("all_vars", TEMPLATE_ALL_VARS),
    ] {
        group.throughput(Throughput::Bytes(template.len() as u64));
        group.bench_with_input(BenchmarkId::new("template", name), &template, |b, template| {
            b.iter(|| ctx.render(black_box(template)));
        });
    }

    group.finish();
}

fn bench_context_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_creation");

    let source = Path::new(SOURCE);

    group.bench_function("for_source", |b| {
        b.iter(|| TemplateContext::for_source(black_box(source)));
    });

    group.bench_function("for_source_and_vars", |b| {
        b.iter(|| {
            TemplateContext::for_source(black_box(source))
                .with_var("ext", "mkv")
                .with_var("quality", "high")
        });
    });

    group.finish();
}

fn bench_build_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_plan");

    let settings = TranscodeSettings::default();

    for count in [10usize, 100, 1000] {
        let inputs: Vec<PathBuf> = (0..count)
            .map(|i| PathBuf::from(format!("/media/library/show/episode_{:04}.avi", i)))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("inputs", count), &inputs, |b, inputs| {
            b.iter(|| build_plan(black_box(inputs), TEMPLATE_SIMPLE, &settings));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_single,
    bench_context_creation,
    bench_build_plan
);
criterion_main!(benches);
