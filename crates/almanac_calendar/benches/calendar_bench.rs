use std::sync::Arc;

use almanac_calendar::{Calendar, CalendarConfig, CalendarKind, Field, FixedZone};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const JAN_1_2024: i64 = 1_704_067_200_000;

fn calendar(kind: CalendarKind) -> Calendar {
    Calendar::at(CalendarConfig::new(kind), Arc::new(FixedZone::utc()), JAN_1_2024)
        .expect("calendar should build")
}

fn compute_fields_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar_compute_fields");
    for kind in [CalendarKind::Gregorian, CalendarKind::Hebrew, CalendarKind::Chinese] {
        let mut cal = calendar(kind);
        group.bench_function(kind.identifier(), |b| {
            b.iter(|| {
                cal.set_time_in_millis(black_box(JAN_1_2024)).expect("in range");
                cal.get(Field::DayOfMonth).expect("fields computed")
            })
        });
    }
    group.finish();
}

fn add_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar_add_month");
    group.sample_size(20);
    for kind in [CalendarKind::Gregorian, CalendarKind::Hebrew, CalendarKind::Chinese] {
        let base = calendar(kind);
        group.bench_function(kind.identifier(), |b| {
            b.iter(|| {
                let mut cal = base.clone();
                cal.add(Field::Month, black_box(7)).expect("add month");
                cal.time_in_millis().expect("resolved")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, compute_fields_bench, add_bench);
criterion_main!(benches);
