use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fftc::{CompressionAlgorithm, CompressorClassifier, DictionarySize};
use std::vec::Vec;

const TOPICS: [(&str, &str); 4] = [
    ("sports", "the team scored a late goal to win the league final at the stadium"),
    ("finance", "the bank raised interest rates as markets slid on weak earnings"),
    ("science", "researchers measured the protein structure with a new microscope"),
    ("weather", "heavy rain and strong winds are expected along the coast tonight"),
];

fn corpus(size: usize) -> Vec<(String, String)> {
    (0..size)
        .map(|i| {
            let (label, text) = TOPICS[i % TOPICS.len()];
            (label.to_string(), format!("{text} report {i} day {}", i % 31))
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let training = corpus(4000);
    let queries = corpus(200);

    for (name, algorithm) in [
        ("zstd 9 corpus", CompressionAlgorithm::zstd(9)),
        (
            "zstd 9 bounded",
            CompressionAlgorithm::Zstd {
                level: 9,
                size: DictionarySize::bounded(16 * 1024).unwrap(),
            },
        ),
        ("zlib 6", CompressionAlgorithm::Zlib { level: 6 }),
    ] {
        c.bench_function(&format!("fit {name}"), |b| {
            b.iter(|| {
                let mut classifier = CompressorClassifier::new(algorithm)
                    .with_compressors_per_class(3)
                    .unwrap();
                classifier.fit(black_box(training.clone())).unwrap();
                classifier
            })
        });

        let mut classifier = CompressorClassifier::new(algorithm)
            .with_compressors_per_class(3)
            .unwrap();
        classifier.fit(training.clone()).unwrap();
        c.bench_function(&format!("predict {name}"), |b| {
            b.iter(|| {
                queries
                    .iter()
                    .map(|(_, query)| classifier.classify(black_box(query)).unwrap())
                    .collect::<Vec<String>>()
            })
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
}
criterion_main!(benches);
