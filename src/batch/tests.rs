use super::*;

const DOCUMENT: &str = r#"<mzML id="{id}"><run><spectrumList><spectrum index="0" id="scan=1" defaultArrayLength="0"><cvParam name="ms level" value="1"/></spectrum></spectrumList></run></mzML>"#;

fn mzml(id: &str) -> String {
    DOCUMENT.replace("{id}", id)
}

struct Fixture {
    input: tempfile::TempDir,
    output: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            input: tempfile::tempdir().unwrap(),
            output: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.input.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn runner(&self) -> BatchRunner {
        BatchRunner::new(
            Extractor::default(),
            MsDocumentWriter::new(self.output.path()).unwrap(),
        )
    }
}

/// Writes the given documents into the work directory
struct FakeConverter {
    ids: Vec<&'static str>,
}

impl FormatConverter for FakeConverter {
    fn convert(&self, _input: &Path, work_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
        for id in &self.ids {
            fs::write(work_dir.join(format!("{id}.mzML")), mzml(id))?;
        }
        Ok(mzml_files(work_dir)?)
    }
}

fn converter(ids: &[&'static str]) -> Box<dyn FormatConverter> {
    Box::new(FakeConverter {
        ids: ids.to_vec(),
    })
}

#[test]
fn test_failures_do_not_stop_the_batch() {
    let fixture = Fixture::new();
    let files = vec![
        fixture.file("a.mzML", &mzml("a")),
        fixture.file("broken.mzML", "<mzML id=\"broken\"/>"),
        fixture.file("c.raw", ""),
        fixture.file("d.MZML", &mzml("d")),
    ];
    let log = fixture.input.path().join("extraction.log");

    let report = fixture.runner().with_log_file(&log).run(files).unwrap();

    assert_eq!(
        report.written,
        vec![fixture.output.path().join("a.json"), fixture.output.path().join("d.json")]
    );
    assert_eq!(report.failed_files(), vec!["broken.mzML", "c.raw"]);
    assert!(matches!(report.failures[1].error, BatchError::NoConverter(_)));
    assert!(!report.is_success());

    let log = fs::read_to_string(&log).unwrap();
    assert!(log.contains("\ta.mzML\n"));
    assert!(log.contains("\tbroken.mzML\nmzML error: "));
    assert!(log.ends_with("\nFailed extraction: [broken.mzML,c.raw]\n"));

    // Nothing is left behind for the failed document
    assert!(!fixture.output.path().join("broken.json").exists());
}

#[test]
fn test_progress_callback() {
    let fixture = Fixture::new();
    let files = vec![fixture.file("a.mzML", &mzml("a")), fixture.file("b.mzML", "<mzML id=\"b\"/>")];

    let mut seen = Vec::new();
    fixture
        .runner()
        .run_with(files, |report| {
            seen.push((report.number, matches!(report.outcome, FileOutcome::Written { .. })));
        })
        .unwrap();
    assert_eq!(seen, vec![(1, true), (2, false)]);
}

#[test]
fn test_single_conversion_is_extracted_directly() {
    let fixture = Fixture::new();
    let files = vec![fixture.file("sample.raw", "")];

    let report = fixture
        .runner()
        .with_converter(converter(&["sample"]))
        .run(files)
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.written, vec![fixture.output.path().join("sample.json")]);
}

#[test]
fn test_multiple_conversions_are_queued() {
    let fixture = Fixture::new();
    let files = vec![fixture.file("plate.wiff", ""), fixture.file("z.mzML", &mzml("z"))];

    let mut outcomes = Vec::new();
    let report = fixture
        .runner()
        .with_converter(converter(&["s1", "s2"]))
        .run_with(files, |report| {
            outcomes.push(match report.outcome {
                FileOutcome::Written { output, .. } => display_name(output),
                FileOutcome::Queued(count) => format!("queued {count}"),
                FileOutcome::Failed(e) => e.to_string(),
            })
        })
        .unwrap();

    assert_eq!(outcomes, vec!["queued 2", "z.json", "s1.json", "s2.json"]);
    assert_eq!(report.written.len(), 3);
}

#[test]
fn test_empty_conversion_fails() {
    let fixture = Fixture::new();
    let report = fixture
        .runner()
        .with_converter(converter(&[]))
        .run(vec![fixture.file("x.d", "")])
        .unwrap();
    assert!(matches!(report.failures[0].error, BatchError::NoConvertedFiles));
}

#[test]
fn test_list_data_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.RAW", "a.mzML", "._a.mzML", "notes.txt", "c.wiff", "c.wiff.scan"] {
        fs::write(dir.path().join(name), "").unwrap();
    }
    fs::create_dir(dir.path().join("run.d")).unwrap();

    let names: Vec<String> = list_data_files(dir.path())
        .unwrap()
        .iter()
        .map(|p| display_name(p))
        .collect();
    assert_eq!(names, vec!["a.mzML", "b.RAW", "c.wiff", "run.d"]);
}

#[test]
fn test_command_converter_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let converter = CommandConverter::new("false").with_args(Vec::<String>::new());
    let result = converter.convert(Path::new("sample.raw"), dir.path());
    assert!(matches!(
        result,
        Err(BatchError::ConversionFailed { .. }) | Err(BatchError::IoError(_))
    ));
}
