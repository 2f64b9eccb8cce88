use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fuel_eng::store::MemoryLedger;
use fuel_eng::{Amount, Command, DispenseRequest, Engine, RefillRequest, TankConfig};

/// Generates valid command sequences for benchmarking.
///
/// Pattern per tank (repeating):
/// 1. Refill 700
/// 2. Dispense 300
/// 3. Dispense 400
///
/// Each cycle is volume-neutral, so a tank seeded with one cycle's worth of
/// fuel never overdraws and never exceeds capacity.
pub struct CommandGenerator {
    base: DateTime<Utc>,
    num_tanks: u32,
    commands_per_tank: u32,
    current_tank: u32,
    current_step: u32,
}

impl CommandGenerator {
    pub fn new(num_tanks: u32, commands_per_tank: u32) -> Self {
        Self {
            base: Utc.with_ymd_and_hms(2026, 8, 7, 6, 0, 0).unwrap(),
            num_tanks,
            commands_per_tank,
            current_tank: 1,
            current_step: 0,
        }
    }

    pub fn tank_ids(num_tanks: u32) -> impl Iterator<Item = String> {
        (1..=num_tanks).map(|i| format!("tank-{i}"))
    }

    pub fn seeded_config() -> TankConfig {
        let mut config = TankConfig::new(Amount::from_float(100_000.0));
        config.initial_level = Amount::from_float(1_000.0);
        config
    }

    pub fn total_commands(&self) -> u64 {
        self.num_tanks as u64 * self.commands_per_tank as u64
    }
}

impl Iterator for CommandGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tank > self.num_tanks {
            return None;
        }

        let tank = format!("tank-{}", self.current_tank);
        let occurred_at = self.base + Duration::seconds(self.current_step as i64);

        let command = match self.current_step % 3 {
            0 => Command::Refill(RefillRequest {
                tank,
                volume: Amount::from_float(700.0),
                total_cost: Amount::from_float(115_500.0),
                occurred_at,
                receipt: None,
            }),
            1 => Command::Dispense(DispenseRequest {
                tank,
                vehicle: "KBX-101".to_string(),
                volume: Amount::from_float(300.0),
                total_cost: Amount::from_float(49_500.0),
                occurred_at,
                odometer: None,
                receipt: None,
            }),
            _ => Command::Dispense(DispenseRequest {
                tank,
                vehicle: "KBX-102".to_string(),
                volume: Amount::from_float(400.0),
                total_cost: Amount::from_float(66_000.0),
                occurred_at,
                odometer: None,
                receipt: None,
            }),
        };

        self.current_step += 1;

        if self.current_step >= self.commands_per_tank {
            self.current_step = 0;
            self.current_tank += 1;
        }

        Some(command)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.total_commands() as usize;
        let done = (self.current_tank.saturating_sub(1) as u64 * self.commands_per_tank as u64
            + self.current_step as u64) as usize;
        let remaining = total.saturating_sub(done);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CommandGenerator {}

fn engine_with_tanks(num_tanks: u32) -> Engine<MemoryLedger> {
    let store = MemoryLedger::new();
    for tank in CommandGenerator::tank_ids(num_tanks) {
        store.register_tank(&tank, CommandGenerator::seeded_config());
    }
    Engine::new(store)
}

fn bench_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let engine = engine_with_tanks(1);
                let generator = CommandGenerator::new(1, count);
                for command in generator {
                    let _ = black_box(engine.apply(command));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_multi_tank(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_tank");

    for (tanks, commands_per) in [(100u32, 1_000u32), (1_000, 100)] {
        let label = format!("{}t_{}cmd", tanks, commands_per);
        group.bench_with_input(
            BenchmarkId::from_parameter(&label),
            &(tanks, commands_per),
            |b, &(tanks, commands_per)| {
                b.iter(|| {
                    let engine = engine_with_tanks(tanks);
                    let generator = CommandGenerator::new(tanks, commands_per);
                    for command in generator {
                        let _ = black_box(engine.apply(command));
                    }
                    engine
                });
            },
        );
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for count in [1_000u32, 10_000, 100_000] {
        let engine = engine_with_tanks(1);
        for command in CommandGenerator::new(1, count) {
            let _ = engine.apply(command);
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(engine.tank_state("tank-1").unwrap()));
        });
    }

    group.finish();
}

fn bench_today_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("today_summary");

    let engine = engine_with_tanks(1);
    for command in CommandGenerator::new(1, 10_000) {
        let _ = engine.apply(command);
    }
    let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();

    group.bench_function("10k_same_day", |b| {
        b.iter(|| black_box(engine.today_summary("tank-1", now).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_admission,
    bench_multi_tank,
    bench_projection,
    bench_today_summary,
);

criterion_main!(benches);
