use anyhow::{Context, Result};
use clap::Args;

use exfilms::extraction::{MsLevelSelection, Polarity};
use exfilms::targets::{read_target_file, TargetQuery};
use exfilms::vocabulary::{Precision, MAX_DECIMAL_PLACES};

#[derive(Args, Debug)]
pub struct TargetsArgs {
    /// Target file: local .tsv path or URL publishing TSV
    #[arg(value_name = "PATH_OR_URL")]
    pub location: String,

    /// Keep only these MS levels, comma separated (default: any)
    #[arg(long, value_delimiter = ',')]
    pub ms_level: Vec<i64>,

    /// Keep only these polarities: positive, negative (default: both)
    #[arg(long, value_delimiter = ',')]
    pub polarity: Vec<Polarity>,

    /// Decimal places kept in target m/z values, at most 15
    #[arg(
        short = 'p',
        long,
        value_parser = clap::value_parser!(u32).range(..=MAX_DECIMAL_PLACES as i64)
    )]
    pub precision: Option<u32>,
}

impl TargetsArgs {
    fn query(&self) -> TargetQuery {
        let mut query = TargetQuery::default();
        if !self.ms_level.is_empty() {
            query.ms_levels = self.ms_level.iter().copied().collect::<MsLevelSelection>();
        }
        if !self.polarity.is_empty() {
            query.polarities = self.polarity.iter().copied().collect();
        }
        if let Some(places) = self.precision {
            query.precision = Precision::Decimals(places);
        }
        query
    }
}

/// Print the parsed target list as `m/z <TAB> MS level <TAB> polarity`
pub fn run(args: TargetsArgs) -> Result<()> {
    let targets = read_target_file(&args.location, &args.query())
        .with_context(|| format!("Failed to read target file {}", args.location))?;

    println!("m/z\tMS level\tpolarity");
    for target in &targets {
        println!("{target}");
    }
    println!("\n{} targets", targets.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_query_from_args() {
        let args = TargetsArgs {
            location: "t.tsv".to_string(),
            ms_level: vec![2],
            polarity: vec![Polarity::Negative],
            precision: Some(3),
        };
        let query = args.query();
        assert_eq!(query.ms_levels, MsLevelSelection::Only(BTreeSet::from([2])));
        assert_eq!(query.polarities, BTreeSet::from([Polarity::Negative]));
        assert_eq!(query.precision, Precision::Decimals(3));
    }

    #[test]
    fn test_default_query() {
        let args = TargetsArgs {
            location: "t.tsv".to_string(),
            ms_level: Vec::new(),
            polarity: Vec::new(),
            precision: None,
        };
        assert_eq!(args.query(), TargetQuery::default());
    }
}
