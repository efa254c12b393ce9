use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use memorito_core::*;
use std::hint::black_box;

struct NullHost;

impl RoundHost for NullHost {
    fn on_click(&mut self, _timestamp: Timestamp, _level: Level, _step: usize, _correct: bool) {}

    fn on_finish_round(&mut self, _won: bool) {}
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for level in [0, 9, 63] {
        group.bench_function(format!("level_{level}"), |b| {
            let mut generator = RandomSequenceGenerator::new(0x5eed);
            b.iter(|| black_box(generator.generate(black_box(level))))
        });
    }
    group.finish();
}

fn bench_full_round(c: &mut Criterion) {
    c.bench_function("full_round_level_9", |b| {
        b.iter_batched(
            || RoundController::new(RandomSequenceGenerator::new(7), PreviewTiming::classic()),
            |mut controller| {
                let mut tick = controller.start(9).expect("fresh controller previews");
                while let Ok(PreviewAdvance::Continue(next)) = controller.advance_preview(tick.token)
                {
                    tick = next;
                }
                let targets: Vec<_> = controller
                    .sequence()
                    .expect("round was set up")
                    .indices()
                    .collect();
                let mut host = NullHost;
                for target in targets {
                    black_box(controller.select(target, 0.0, &mut host).ok());
                }
                controller
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_generate, bench_full_round);
criterion_main!(benches);
