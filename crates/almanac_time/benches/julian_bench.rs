use criterion::{Criterion, black_box, criterion_group, criterion_main};
use almanac_time::{GregorianCutover, jd_to_gregorian, millis_to_julian_day};

fn julian_day_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("julian_day");
    group.bench_function("millis_to_julian_day", |b| {
        b.iter(|| millis_to_julian_day(black_box(1_700_000_000_000)))
    });
    group.bench_function("jd_to_gregorian", |b| {
        b.iter(|| jd_to_gregorian(black_box(2_460_000)))
    });
    let cutover = GregorianCutover::default();
    group.bench_function("hybrid_jd_from_fields", |b| {
        b.iter(|| cutover.jd_from_fields(black_box(1582), black_box(9), black_box(10)))
    });
    group.finish();
}

criterion_group!(benches, julian_day_bench);
criterion_main!(benches);
