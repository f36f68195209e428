use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use vboard::cli::{Cli, CommandId, Tokens};
use vboard::sink::MemorySink;

const LINES: [&str; 4] = [
    "vboard -i 10,200,0",
    "vboard diag_spn 22,2838,200,-e",
    "vboard -s(520198, -735.28, -lf);",
    "vboard -fwa",
];

fn setup_cli() -> Cli<MemorySink<4096>> {
    let mut cli = Cli::new(MemorySink::new());
    for id in CommandId::ALL {
        if id != CommandId::Help {
            cli.bind(id, |argc, argv: &[&str]| {
                black_box((argc, argv));
            });
        }
    }
    cli
}

pub fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let line = LINES[2];
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("tokens", |b| {
        b.iter(|| Tokens::new(black_box(line)).count());
    });
    group.finish();
}

pub fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(LINES.len() as u64));
    group.bench_function("bound_handlers", |b| {
        let mut cli = setup_cli();
        b.iter(|| {
            for line in LINES {
                let _ = cli.dispatch(black_box(line));
            }
        });
    });
    group.bench_function("not_found", |b| {
        let mut cli = setup_cli();
        b.iter(|| cli.dispatch(black_box("vboard --unknown 1,2,3")));
    });
    group.finish();
}

pub fn bench_help(c: &mut Criterion) {
    let mut group = c.benchmark_group("help");
    group.bench_function("publish_memory", |b| {
        b.iter_batched_ref(
            || Cli::new(MemorySink::<4096>::new()),
            |cli| cli.dispatch("vboard -h").expect("help publication"),
            criterion::BatchSize::SmallInput,
        );
    });
    group.bench_function("render", |b| {
        let cli = setup_cli();
        b.iter(|| cli.render_help());
    });
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_dispatch, bench_help);
criterion_main!(benches);
