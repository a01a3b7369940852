use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use exfilms::batch::{list_data_files, BatchRunner, CommandConverter, FileOutcome, FileReport};
use exfilms::extraction::{
    ArrayFilter, ExtractionConfig, Extractor, MsLevelSelection, MzRange, Polarity,
    SpectrumFilter, SpectrumType, TargetFilter, DEFAULT_MZ_TOLERANCE, DEFAULT_PPM_TOLERANCE,
};
use exfilms::targets::{read_target_file, TargetQuery};
use exfilms::vocabulary::{Precision, MAX_DECIMAL_PLACES};
use exfilms::writer::MsDocumentWriter;

use super::config::Config;

/// Name of the log file written into the output directory by default
const DEFAULT_LOG_FILE: &str = "exfilms.log";

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Directory containing the data files
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input_directory: PathBuf,

    /// Files to extract, relative to the input directory (default: every data file)
    #[arg(short = 'f', long, value_name = "FILE", num_args = 1..)]
    pub file_list: Vec<PathBuf>,

    /// Directory for the JSON files (default: <input directory>/exfilms)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Decimal places kept in measurements and arrays, at most 15 (default: full precision)
    #[arg(
        short = 'p',
        long,
        value_parser = clap::value_parser!(u32).range(..=MAX_DECIMAL_PLACES as i64)
    )]
    pub precision: Option<u32>,

    /// Drop the m/z and intensity arrays of spectra
    #[arg(short = 'm', long)]
    pub metadata: bool,

    /// Keep only spectra matching --ms-level, --spectrum-type and --spectrum-polarity
    #[arg(short = 's', long)]
    pub filter_spectrum_data: bool,

    /// Accepted MS levels, comma separated (default: any)
    #[arg(long, value_delimiter = ',')]
    pub ms_level: Vec<i64>,

    /// Accepted spectrum types: centroid, profile (default: both)
    #[arg(long, value_delimiter = ',')]
    pub spectrum_type: Vec<SpectrumType>,

    /// Accepted polarities: positive, negative (default: both)
    #[arg(long, value_delimiter = ',')]
    pub spectrum_polarity: Vec<Polarity>,

    /// Reduce spectra to the entries of a target file
    #[arg(short = 't', long)]
    pub spectrum_array_target: bool,

    /// Target file: local .tsv path or URL publishing TSV
    #[arg(long, value_name = "PATH_OR_URL")]
    pub target_file: Option<String>,

    /// Absolute m/z tolerance of target matching
    #[arg(long)]
    pub mz_tolerance: Option<f64>,

    /// Relative tolerance of target matching, in ppm
    #[arg(long)]
    pub ppm_tolerance: Option<f64>,

    /// Reduce spectra to an m/z range
    #[arg(short = 'r', long)]
    pub spectrum_array_range: bool,

    /// Lower m/z bound (default: 0)
    #[arg(long)]
    pub min_mz: Option<f64>,

    /// Upper m/z bound (default: last m/z of each spectrum)
    #[arg(long)]
    pub max_mz: Option<f64>,

    /// Append-only log file (default: <output directory>/exfilms.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// msconvert-compatible program used for vendor formats
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<PathBuf>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Classification filter settings before validation
#[derive(Debug, Default, PartialEq)]
pub struct FilterSettings {
    pub ms_levels: Vec<i64>,
    pub spectrum_types: Vec<SpectrumType>,
    pub polarities: Vec<Polarity>,
}

/// Target filter settings before the target file is read
#[derive(Debug, PartialEq)]
pub struct TargetSettings {
    pub file: String,
    pub mz_tolerance: f64,
    pub ppm_tolerance: f64,
}

/// Options of one extraction run, merged from the command line and config file
#[derive(Debug)]
pub struct Settings {
    pub files: Vec<PathBuf>,
    pub output_directory: PathBuf,
    pub log_file: PathBuf,
    pub converter: Option<PathBuf>,
    pub precision: Precision,
    pub metadata_only: bool,
    pub filter: Option<FilterSettings>,
    pub target: Option<TargetSettings>,
    pub range: Option<MzRange>,
}

impl Settings {
    /// Merge and check the options, rejecting sub-options given without
    /// the flag that enables them
    pub fn resolve(args: ExtractArgs, config: Config) -> Result<Self> {
        let filter_enabled = args.filter_spectrum_data || config.filter.is_some();
        let target_enabled = args.spectrum_array_target || config.target.is_some();
        let range_enabled = args.spectrum_array_range || config.range.is_some();

        if target_enabled && range_enabled {
            bail!(
                "Use one of the following options for spectrum array filtering:\n\
                 -t (or --spectrum-array-target) --target-file <PATH_OR_URL> --mz-tolerance <MZ> --ppm-tolerance <PPM>\n\
                 -r (or --spectrum-array-range) --min-mz <MZ> --max-mz <MZ>"
            );
        }
        if !target_enabled
            && (args.target_file.is_some()
                || args.mz_tolerance.is_some()
                || args.ppm_tolerance.is_some())
        {
            bail!(
                "-t (or --spectrum-array-target) required to specify \
                 --target-file, --mz-tolerance and --ppm-tolerance"
            );
        }
        if !range_enabled && (args.min_mz.is_some() || args.max_mz.is_some()) {
            bail!("-r (or --spectrum-array-range) required to specify --min-mz and --max-mz");
        }
        if !filter_enabled
            && (!args.ms_level.is_empty()
                || !args.spectrum_type.is_empty()
                || !args.spectrum_polarity.is_empty())
        {
            bail!(
                "-s (or --filter-spectrum-data) required to specify \
                 --ms-level, --spectrum-type and --spectrum-polarity"
            );
        }

        let precision = match args.precision.or(config.output.precision) {
            Some(places) if places > MAX_DECIMAL_PLACES => {
                bail!("precision must be at most {MAX_DECIMAL_PLACES} decimal places, got {places}")
            }
            Some(places) => Precision::Decimals(places),
            None => Precision::Full,
        };

        let filter = if filter_enabled {
            let file = config.filter.unwrap_or_default();
            Some(FilterSettings {
                ms_levels: prefer(args.ms_level, file.ms_level),
                spectrum_types: prefer(args.spectrum_type, parse_all(&file.spectrum_type)?),
                polarities: prefer(args.spectrum_polarity, parse_all(&file.polarity)?),
            })
        } else {
            None
        };

        let target = if target_enabled {
            let file = config.target.unwrap_or_default();
            let Some(location) = args.target_file.or(file.file) else {
                bail!("--target-file <PATH_OR_URL> required");
            };
            Some(TargetSettings {
                file: location,
                mz_tolerance: args
                    .mz_tolerance
                    .or(file.mz_tolerance)
                    .unwrap_or(DEFAULT_MZ_TOLERANCE),
                ppm_tolerance: args
                    .ppm_tolerance
                    .or(file.ppm_tolerance)
                    .unwrap_or(DEFAULT_PPM_TOLERANCE),
            })
        } else {
            None
        };

        let range = if range_enabled {
            let file = config.range.unwrap_or_default();
            let min = precision.apply(args.min_mz.or(file.min_mz).unwrap_or(0.0));
            let max = args.max_mz.or(file.max_mz).map(|max| precision.apply(max));
            Some(MzRange::new(min, max)?)
        } else {
            None
        };

        let input = args.input_directory;
        let files = if args.file_list.is_empty() {
            list_data_files(&input)
                .with_context(|| format!("Failed to list data files in {}", input.display()))?
        } else {
            args.file_list.iter().map(|f| input.join(f)).collect()
        };

        let output_directory = args
            .output_directory
            .or(config.output.directory)
            .unwrap_or_else(|| input.join("exfilms"));
        let log_file = args
            .log_file
            .or(config.output.log_file)
            .unwrap_or_else(|| output_directory.join(DEFAULT_LOG_FILE));

        Ok(Self {
            files,
            output_directory,
            log_file,
            converter: args.converter.or(config.output.converter),
            precision,
            metadata_only: args.metadata || config.output.metadata.unwrap_or(false),
            filter,
            target,
            range,
        })
    }

    /// Library configuration; reads the target file when target filtering is on
    pub fn extraction_config(&self) -> Result<ExtractionConfig> {
        let spectrum_filter = self.filter.as_ref().map(|filter| SpectrumFilter {
            ms_levels: level_selection(&filter.ms_levels),
            spectrum_types: set_or_all(
                &filter.spectrum_types,
                &[SpectrumType::Centroid, SpectrumType::Profile],
            ),
            polarities: set_or_all(
                &filter.polarities,
                &[Polarity::Positive, Polarity::Negative],
            ),
        });

        let target = match &self.target {
            Some(settings) => {
                let query = match &spectrum_filter {
                    Some(filter) => TargetQuery {
                        ms_levels: filter.ms_levels.clone(),
                        polarities: filter.polarities.clone(),
                        precision: self.precision,
                    },
                    None => TargetQuery {
                        precision: self.precision,
                        ..Default::default()
                    },
                };
                let targets = read_target_file(&settings.file, &query)
                    .with_context(|| format!("Failed to read target file {}", settings.file))?;
                Some(
                    TargetFilter::new(targets)
                        .with_tolerance(settings.mz_tolerance, settings.ppm_tolerance),
                )
            }
            None => None,
        };

        Ok(ExtractionConfig {
            precision: self.precision,
            metadata_only: self.metadata_only,
            spectrum_filter,
            array_filter: ArrayFilter::resolve(target, self.range)?,
        })
    }
}

fn prefer<T>(cli: Vec<T>, file: Vec<T>) -> Vec<T> {
    if cli.is_empty() {
        file
    } else {
        cli
    }
}

fn parse_all<T>(values: &[String]) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = String>,
{
    values
        .iter()
        .map(|v| v.parse::<T>().map_err(anyhow::Error::msg))
        .collect()
}

fn level_selection(levels: &[i64]) -> MsLevelSelection {
    if levels.is_empty() {
        MsLevelSelection::Any
    } else {
        levels.iter().copied().collect()
    }
}

fn set_or_all<T: Ord + Copy>(values: &[T], all: &[T]) -> BTreeSet<T> {
    if values.is_empty() {
        all.iter().copied().collect()
    } else {
        values.iter().copied().collect()
    }
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let settings = Settings::resolve(args, config)?;
    let extraction = settings.extraction_config()?;

    std::fs::create_dir_all(&settings.output_directory).with_context(|| {
        format!("Failed to create output directory {}", settings.output_directory.display())
    })?;
    if let Some(parent) = settings.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    info!("Output directory: {}", settings.output_directory.display());
    info!("Log file: {}", settings.log_file.display());
    info!("Precision: {:?}", settings.precision);
    if let Some(filter) = &extraction.spectrum_filter {
        info!("Spectrum filter: {:?}", filter);
    }
    match &extraction.array_filter {
        ArrayFilter::Target(filter) => info!(
            "Target filter: {} targets, {} m/z, {} ppm",
            filter.targets.len(),
            filter.mz_tolerance,
            filter.ppm_tolerance
        ),
        ArrayFilter::Range(range) => info!("Range filter: {} - {:?}", range.min(), range.max()),
        ArrayFilter::None => {}
    }

    let writer = MsDocumentWriter::new(&settings.output_directory)?;
    let mut runner =
        BatchRunner::new(Extractor::new(extraction), writer).with_log_file(&settings.log_file);
    if let Some(program) = &settings.converter {
        runner = runner.with_converter(Box::new(CommandConverter::new(program)));
    }

    println!("File count: {}", settings.files.len());
    let report = runner.run_with(settings.files, print_progress)?;
    println!("\nFailed extraction: [{}]", report.failed_files().join(","));
    println!("exfilms process complete");
    Ok(())
}

fn print_progress(report: &FileReport<'_>) {
    let name = display(report.file);
    let line = match report.outcome {
        FileOutcome::Written { stats, .. } => {
            format!("{} File {}: {} ({})", ok_mark(), report.number, name, stats)
        }
        FileOutcome::Queued(count) => format!(
            "{} File {}: {}\n  {} additional data files queued for extraction",
            ok_mark(),
            report.number,
            name,
            count
        ),
        FileOutcome::Failed(error) => {
            format!("{} File {}: {}\n  {}", fail_mark(), report.number, name, error)
        }
    };
    println!("{line}");
}

fn display(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(feature = "colorized_output")]
fn ok_mark() -> String {
    console::style("✓").green().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn ok_mark() -> String {
    "[OK]".to_string()
}

#[cfg(feature = "colorized_output")]
fn fail_mark() -> String {
    console::style("✗").red().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn fail_mark() -> String {
    "[FAIL]".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> ExtractArgs {
        let mut argv = vec!["exfilms", "extract", "-i", "/data/in", "-f", "a.mzML"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Extract(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn resolve(extra: &[&str]) -> Result<Settings> {
        Settings::resolve(args(extra), Config::default())
    }

    #[test]
    fn test_defaults() {
        let settings = resolve(&[]).unwrap();
        assert_eq!(settings.files, vec![PathBuf::from("/data/in/a.mzML")]);
        assert_eq!(settings.output_directory, PathBuf::from("/data/in/exfilms"));
        assert_eq!(settings.log_file, PathBuf::from("/data/in/exfilms/exfilms.log"));
        assert_eq!(settings.precision, Precision::Full);
        assert!(settings.filter.is_none() && settings.target.is_none() && settings.range.is_none());

        let config = settings.extraction_config().unwrap();
        assert!(matches!(config.array_filter, ArrayFilter::None));
        assert!(config.spectrum_filter.is_none());
    }

    #[test]
    fn test_sub_options_need_their_flag() {
        assert!(resolve(&["--ms-level", "1"]).is_err());
        assert!(resolve(&["--spectrum-polarity", "positive"]).is_err());
        assert!(resolve(&["--target-file", "t.tsv"]).is_err());
        assert!(resolve(&["--ppm-tolerance", "10"]).is_err());
        assert!(resolve(&["--max-mz", "500"]).is_err());
        assert!(resolve(&["-t"]).is_err());
    }

    #[test]
    fn test_target_and_range_are_exclusive() {
        let err = resolve(&["-t", "--target-file", "t.tsv", "-r"]).unwrap_err();
        assert!(err.to_string().contains("one of the following"));
    }

    #[test]
    fn test_range_bounds() {
        assert!(resolve(&["-r", "--min-mz", "500", "--max-mz", "100"]).is_err());

        let settings = resolve(&["-r", "-p", "1", "--min-mz", "100.04"]).unwrap();
        let range = settings.range.unwrap();
        assert_eq!(range.min(), 100.0);
        assert_eq!(range.max(), None);
    }

    #[test]
    fn test_spectrum_filter() {
        let settings =
            resolve(&["-s", "--ms-level", "1,2", "--spectrum-type", "centroid"]).unwrap();
        let config = settings.extraction_config().unwrap();
        let filter = config.spectrum_filter.unwrap();
        assert_eq!(filter.ms_levels, MsLevelSelection::Only(BTreeSet::from([1, 2])));
        assert_eq!(filter.spectrum_types, BTreeSet::from([SpectrumType::Centroid]));
        assert_eq!(filter.polarities, BTreeSet::from([Polarity::Positive, Polarity::Negative]));
    }

    #[test]
    fn test_target_settings_use_defaults() {
        let settings = resolve(&["-t", "--target-file", "t.tsv"]).unwrap();
        assert_eq!(
            settings.target,
            Some(TargetSettings {
                file: "t.tsv".to_string(),
                mz_tolerance: DEFAULT_MZ_TOLERANCE,
                ppm_tolerance: DEFAULT_PPM_TOLERANCE,
            })
        );
    }

    #[test]
    fn test_config_file_enables_and_cli_overrides() {
        let config = Config::from_str(
            "[output]\nprecision = 2\ndirectory = \"/out\"\n[filter]\npolarity = [\"negative\"]\n",
        )
        .unwrap();
        let settings =
            Settings::resolve(args(&["-p", "4", "--spectrum-type", "profile"]), config).unwrap();
        assert_eq!(settings.precision, Precision::Decimals(4));
        assert_eq!(settings.output_directory, PathBuf::from("/out"));
        let filter = settings.filter.unwrap();
        assert_eq!(filter.polarities, vec![Polarity::Negative]);
        assert_eq!(filter.spectrum_types, vec![SpectrumType::Profile]);
    }

    #[test]
    fn test_precision_limit() {
        let argv = ["exfilms", "extract", "-i", "/data/in", "-p", "16"];
        assert!(Cli::try_parse_from(argv).is_err());

        let settings = resolve(&["-p", "15"]).unwrap();
        assert_eq!(settings.precision, Precision::Decimals(15));

        let config = Config::from_str("[output]\nprecision = 4294967295\n").unwrap();
        let err = Settings::resolve(args(&[]), config).unwrap_err();
        assert!(err.to_string().contains("at most 15"));
    }

    #[test]
    fn test_config_file_bad_polarity() {
        let config = Config::from_str("[filter]\npolarity = [\"sideways\"]\n").unwrap();
        assert!(Settings::resolve(args(&[]), config).is_err());
    }

    #[test]
    fn test_reads_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.tsv");
        std::fs::write(
            &path,
            "Compound Type\tCompound Name\tPolarity\tMass-to-Charge Ratio (m/z)\tRetention Time (min)\tMS Level\tInternal Standards\tProducts\n\
             a\ta\t+\t100.123\t1\t1\t\t\n\
             a\tb\t-\t200\t1\t1\t\t\n",
        )
        .unwrap();
        let location = path.to_str().unwrap();

        let settings = resolve(&[
            "-t",
            "--target-file",
            location,
            "-s",
            "--spectrum-polarity",
            "positive",
            "-p",
            "1",
        ])
        .unwrap();
        let config = settings.extraction_config().unwrap();
        let ArrayFilter::Target(filter) = config.array_filter else {
            panic!("expected target filter");
        };
        assert_eq!(filter.targets.len(), 1);
        assert_eq!(filter.targets.entries()[0].mz, 100.1);
    }
}
