#![forbid(unsafe_code)]

//! Benchmarks for local filtering and rendering.

use combobox::{Combobox, ComboboxConfig, DropdownOption, Mode, Theme, filter_options};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tea_core::{KeyMsg, Message, Model};

fn build_options(count: usize) -> Vec<DropdownOption> {
    (0..count)
        .map(|i| DropdownOption::new(i.to_string(), format!("Product {i} deluxe edition")))
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_options");
    for count in [100, 1_000, 10_000] {
        let options = build_options(count);
        group.throughput(Throughput::Elements(count as u64));
        for mode in [Mode::Select, Mode::Search] {
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), count),
                &options,
                |b, options| b.iter(|| filter_options(black_box(options), black_box("42 de"), mode, 15)),
            );
        }
    }
    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let options = build_options(1_000);
    c.bench_function("combobox_type_and_view", |b| {
        b.iter(|| {
            let config = ComboboxConfig::new(Mode::Select).with_options(options.clone());
            let Ok(field) = Combobox::new(config) else {
                return;
            };
            let mut field = field.with_theme(Theme::plain());
            field.focus();
            for ch in "prod 99".chars() {
                field.update(Message::new(KeyMsg::from_char(ch)));
            }
            black_box(field.view());
        });
    });
}

criterion_group!(benches, bench_filter, bench_typing);
criterion_main!(benches);
