use criterion::{criterion_group, criterion_main, Criterion};

use wherefrom::cache::{UrlLookup, UrlPair, ZoneCache};
use wherefrom::decode::{props, quarantine, zone};
use wherefrom::model::Attributes;

struct NoLookup;

impl UrlLookup for NoLookup {
    fn lookup(&mut self, _key: &str) -> UrlPair {
        UrlPair::default()
    }
}

fn bench_quarantine_parse(c: &mut Criterion) {
    let raw = r"0083;5f1a2b3c;Google\x20Chrome;D38FCB9A-69D2-4A4B-81AF-2D2E1B7A4F0C";

    c.bench_function("quarantine_parse", |b| {
        b.iter(|| {
            let mut attrs = Attributes::new();
            quarantine::parse(&mut attrs, raw, &mut NoLookup);
            attrs
        })
    });
}

fn bench_zone_parse(c: &mut Criterion) {
    let text = "[ZoneTransfer]\r\nZoneId=3\r\nReferrerUrl=http://referrer.example/page\r\nHostUrl=http://host.example/download/file.zip\r\n";

    c.bench_function("zone_identifier_parse", |b| {
        let mut zones = ZoneCache::new();
        b.iter(|| {
            let mut attrs = Attributes::new();
            zone::parse(&mut attrs, text, &mut zones);
            attrs
        })
    });
}

fn bench_where_froms_decode(c: &mut Criterion) {
    let value = plist::Value::Array(vec![
        plist::Value::String("http://host.example/download/file.zip".to_string()),
        plist::Value::String("http://referrer.example/page".to_string()),
    ]);
    let mut payload = Vec::new();
    value.to_writer_binary(&mut payload).expect("serialize plist");

    c.bench_function("where_froms_decode", |b| {
        b.iter(|| props::decode_string_list(&payload).unwrap())
    });
}

criterion_group!(
    benches,
    bench_quarantine_parse,
    bench_zone_parse,
    bench_where_froms_decode
);
criterion_main!(benches);
