use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use exfilms::extraction::{
    apply_range_filter, apply_target_filter, ArrayFilter, ExtractionConfig, Extractor, MzRange,
    Polarity, Spectrum, TargetFilter,
};
use exfilms::mzml::MzMLDocument;
use exfilms::targets::{TargetEntry, TargetList};
use exfilms::vocabulary::Precision;

fn generate_spectrum(peaks: usize) -> Spectrum {
    let mut spectrum = Spectrum::new(0, "scan=1");
    spectrum.ms_level = Some(1);
    spectrum.polarity = Some("positive".to_string());
    spectrum.array = (0..peaks)
        .map(|j| (100.0 + j as f64 * 0.37, 1000.0 + (j as f64 * 0.321).sin().abs() * 1e5))
        .collect();
    spectrum
}

fn generate_targets(count: usize) -> TargetList {
    TargetList::new(
        (0..count)
            .map(|i| TargetEntry::new(120.0 + i as f64 * 7.13, 1, Polarity::Positive))
            .collect(),
    )
}

fn generate_test_mzml(num_spectra: usize, peaks_per_spectrum: usize) -> String {
    let mut mzml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mzML xmlns="http://psi.hupo.org/ms/mzml" id="bench" version="1.1.0">
  <run id="bench_run">
    <spectrumList>"#,
    );

    for i in 0..num_spectra {
        let mz_bytes: Vec<u8> = (0..peaks_per_spectrum)
            .flat_map(|j| (100.0 + j as f64 * 0.37).to_le_bytes())
            .collect();
        let intensity_bytes: Vec<u8> = (0..peaks_per_spectrum)
            .flat_map(|j| (1000.0f32 + j as f32 * 50.0).to_le_bytes())
            .collect();
        let mz_base64 =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &mz_bytes);
        let intensity_base64 =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &intensity_bytes);

        mzml.push_str(&format!(
            r#"
      <spectrum index="{i}" id="scan={}" defaultArrayLength="{peaks_per_spectrum}">
        <cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="1"/>
        <cvParam cvRef="MS" accession="MS:1000130" name="positive scan"/>
        <cvParam cvRef="MS" accession="MS:1000127" name="centroid spectrum"/>
        <scanList count="1">
          <scan>
            <cvParam cvRef="MS" accession="MS:1000016" name="scan start time" value="{}" unitName="second"/>
          </scan>
        </scanList>
        <binaryDataArrayList count="2">
          <binaryDataArray>
            <cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="MS:1000514" name="m/z array"/>
            <binary>{mz_base64}</binary>
          </binaryDataArray>
          <binaryDataArray>
            <cvParam cvRef="MS" accession="MS:1000521" name="32-bit float"/>
            <cvParam cvRef="MS" accession="MS:1000576" name="no compression"/>
            <cvParam cvRef="MS" accession="MS:1000515" name="intensity array"/>
            <binary>{intensity_base64}</binary>
          </binaryDataArray>
        </binaryDataArrayList>
      </spectrum>"#,
            i + 1,
            i as f64 * 0.5,
        ));
    }

    mzml.push_str(
        r#"
    </spectrumList>
  </run>
</mzML>"#,
    );
    mzml
}

/// Benchmark nearest-match target filtering
fn bench_target_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_filter");
    let spectrum = generate_spectrum(2000);

    for num_targets in [10, 100, 1000] {
        let filter = TargetFilter::new(generate_targets(num_targets));
        group.throughput(Throughput::Elements(num_targets as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}targets", num_targets)),
            &filter,
            |b, filter| {
                b.iter_batched(
                    || spectrum.clone(),
                    |mut spectrum| {
                        let hits = apply_target_filter(&mut spectrum, black_box(filter));
                        black_box(hits.len());
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark m/z range filtering
fn bench_range_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_filter");

    for peaks in [1000, 10_000, 100_000] {
        let spectrum = generate_spectrum(peaks);
        let range = MzRange::new(200.0, Some(400.0)).unwrap();
        group.throughput(Throughput::Elements(peaks as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}peaks", peaks)),
            &spectrum,
            |b, spectrum| {
                b.iter_batched(
                    || spectrum.clone(),
                    |mut spectrum| {
                        apply_range_filter(&mut spectrum, black_box(&range));
                        black_box(spectrum.array.len());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark whole-document extraction with and without filtering
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let num_spectra = 200;
    let document = MzMLDocument::parse_str(&generate_test_mzml(num_spectra, 500)).unwrap();
    group.throughput(Throughput::Elements(num_spectra as u64));

    let configs = [
        ("unfiltered", ExtractionConfig::default()),
        (
            "rounded",
            ExtractionConfig {
                precision: Precision::Decimals(4),
                ..Default::default()
            },
        ),
        (
            "targets",
            ExtractionConfig {
                array_filter: ArrayFilter::Target(TargetFilter::new(generate_targets(50))),
                ..Default::default()
            },
        ),
    ];

    for (name, config) in configs {
        let extractor = Extractor::new(config);
        group.bench_function(name, |b| {
            b.iter(|| {
                let extracted = extractor.extract(black_box(&document)).unwrap();
                black_box(extracted.spectrum_count());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_target_filter, bench_range_filter, bench_extraction);
criterion_main!(benches);
