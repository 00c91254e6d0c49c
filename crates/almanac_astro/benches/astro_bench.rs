use criterion::{Criterion, black_box, criterion_group, criterion_main};
use almanac_astro::{
    GeoLocation, RiseSetEvent, WINTER_SOLSTICE, moon_age, nearest_new_moon,
    nearest_solar_longitude_crossing, sun_longitude, sun_rise_set,
};

const JAN_1_2024: i64 = 1_704_067_200_000;

fn position_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("astro_position");
    group.bench_function("sun_longitude", |b| b.iter(|| sun_longitude(black_box(JAN_1_2024))));
    group.bench_function("moon_age", |b| b.iter(|| moon_age(black_box(JAN_1_2024))));
    group.finish();
}

fn search_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("astro_search");
    group.sample_size(20);
    group.bench_function("next_new_moon", |b| {
        b.iter(|| nearest_new_moon(black_box(JAN_1_2024), true).expect("new moon should exist"))
    });
    group.bench_function("winter_solstice", |b| {
        b.iter(|| {
            nearest_solar_longitude_crossing(black_box(JAN_1_2024), WINTER_SOLSTICE, true)
                .expect("solstice should exist")
        })
    });
    let loc = GeoLocation::new(28.6139, 77.209);
    group.bench_function("sunrise", |b| {
        b.iter(|| sun_rise_set(black_box(JAN_1_2024), RiseSetEvent::Rise, &loc))
    });
    group.finish();
}

criterion_group!(benches, position_bench, search_bench);
criterion_main!(benches);
