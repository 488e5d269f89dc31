use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gameetl::config::CleaningConfig;
use gameetl::prelude::*;
use gameetl::transform::split::{split_ranked, DEVELOPER_SLOTS, GENRE_SLOTS};
use std::io::Write;
use tempfile::NamedTempFile;

const PLATFORMS: [&str; 4] = ["Switch", "PC", "PlayStation 4", "Xbox One"];
const MONTHS: [&str; 4] = ["January", "April", "August", "November"];

fn raw_rows(count: usize) -> Vec<DataRow> {
    (0..count)
        .map(|i| {
            let date = if i % 25 == 0 {
                "TBA".to_string()
            } else {
                format!("{} {}, {}", MONTHS[i % 4], 1 + i % 28, 1995 + i % 25)
            };
            let meta = if i % 7 == 0 { String::new() } else { (50 + i % 50).to_string() };

            [
                ("title", format!("Game {}", i)),
                ("platform", PLATFORMS[i % 4].to_string()),
                ("date", date),
                ("meta_score", meta),
                ("user_score", format!("{}.{}", i % 10, i % 9)),
                ("esrb_rating", "T".to_string()),
                ("developers", "['Nintendo', 'Game Freak', 'Creatures Inc.']".to_string()),
                ("genres", "['Role-Playing', 'Trainer', 'Action']".to_string()),
                ("link", format!("/game/{}", i)),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), DataValue::from(v)))
            .collect()
        })
        .collect()
}

fn benchmark_splitter(c: &mut Criterion) {
    c.bench_function("split_ranked_developers", |b| {
        b.iter(|| split_ranked(black_box("['Nintendo', 'Game Freak', 'Creatures Inc.', 'HAL']"), DEVELOPER_SLOTS))
    });

    c.bench_function("split_ranked_single_genre", |b| {
        b.iter(|| split_ranked(black_box("['Action']"), GENRE_SLOTS))
    });
}

fn benchmark_cleaning_chain(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let chain = cleaning_chain(&CleaningConfig::default()).unwrap();
    let rows = raw_rows(1000);

    c.bench_function("cleaning_chain_1000_rows", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let cleaned = chain.transform(rows.clone()).await.unwrap();
                black_box(cleaned);
            })
        })
    });
}

fn benchmark_reports(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let chain = cleaning_chain(&CleaningConfig::default()).unwrap();
    let cleaned = runtime.block_on(chain.transform(raw_rows(1000))).unwrap();
    let table = ReleaseTable::from_rows(&cleaned).unwrap();
    let reports = ReportSet::default();

    c.bench_function("report_set_1000_releases", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(reports.run(&table).await.unwrap());
            })
        })
    });
}

fn benchmark_csv_extract(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "title,platform,date,meta_score,user_score,esrb_rating,developers,genres,link").unwrap();
    for i in 0..1000 {
        writeln!(
            temp_file,
            "Game {},PC,\"March {}, 2010\",80,7.5,E,\"['Valve', 'Hidden Path']\",['Shooter'],/game/pc/{}",
            i,
            1 + i % 28,
            i
        )
        .unwrap();
    }

    let extractor = CsvExtractor::reviews(temp_file.path());
    c.bench_function("csv_extract_1000_rows", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(extractor.extract().await.unwrap());
            })
        })
    });
}

criterion_group!(
    benches,
    benchmark_splitter,
    benchmark_cleaning_chain,
    benchmark_reports,
    benchmark_csv_extract
);
criterion_main!(benches);
