use criterion::{criterion_group, criterion_main, Criterion};
use dexcore::keys::{key_from_link, to_key};

fn bench_keys(c: &mut Criterion) {
    let names = ["Thunder Punch", "King's Shield", "Flabébé", "Landorus-Therian", "U-turn", "10,000,000 Volt Thunderbolt"];
    c.bench_function("to_key_names", |b| b.iter(|| names.iter().map(|n| to_key(n)).collect::<Vec<_>>()));
    c.bench_function("key_from_link", |b| b.iter(|| key_from_link("/dex/sm/moves/thunder_punch/")));
}

criterion_group!(benches, bench_keys);
criterion_main!(benches);
