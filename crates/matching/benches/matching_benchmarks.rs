use criterion::{Criterion, black_box, criterion_group, criterion_main};
use shelfline_core::{CatalogEntry, ProductId};
use shelfline_matching::{MatcherConfig, match_product};

fn synthetic_catalog(size: usize) -> Vec<CatalogEntry> {
    let families = [
        "Süt Tam Yağlı",
        "Yoğurt Süzme",
        "Beyaz Peynir",
        "Kaşar Peynir",
        "Tereyağı",
        "Ayran",
        "Krema",
        "Labne",
    ];
    (0..size)
        .map(|i| {
            let name = format!("{} {}g", families[i % families.len()], 100 + (i % 9) * 50);
            CatalogEntry::new(ProductId::new(), format!("SKU-{i:05}"), name, "Süt Ürünleri")
        })
        .collect()
}

fn bench_match_product(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000);
    let config = MatcherConfig::default();

    c.bench_function("match_product/catalog_1k", |b| {
        b.iter(|| {
            match_product(
                black_box("SUT TAM YAGLI 1/1"),
                black_box(&catalog),
                None,
                &config,
            )
        })
    });

    c.bench_function("match_product/no_match", |b| {
        b.iter(|| match_product(black_box("XYZZY"), black_box(&catalog), None, &config))
    });
}

criterion_group!(benches, bench_match_product);
criterion_main!(benches);
