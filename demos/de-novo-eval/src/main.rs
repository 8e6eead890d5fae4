//! Evaluate a file of de novo predictions against ground truth peptides using mass based matching
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
};

use clap::Parser;
use itertools::Itertools;
use mzeval::prelude::*;
use rayon::prelude::*;

#[derive(Debug, Parser)]
struct Cli {
    /// The de novo predictions, one peptide per line
    #[arg(short, long)]
    predictions: String,
    /// The ground truth annotations, one peptide per line, paired with the predictions by line number
    #[arg(short, long)]
    truth: String,
    /// How to combine the two scan directions: best, forward, or backward
    #[arg(short, long, default_value_t = MatchMode::Best)]
    mode: MatchMode,
    /// Maximal distance between two residue masses to call them the same residue
    #[arg(long, default_value = "0.1 da")]
    residue_tolerance: Tolerance,
    /// Maximal distance between the running cumulative masses to call the alignment converged
    #[arg(long, default_value = "0.5 da")]
    cumulative_tolerance: Tolerance,
    /// Where to store the per peptide breakdown, if wanted
    #[arg(long)]
    out_path: Option<String>,
}

fn main() {
    let args = Cli::parse();
    let predictions = read_peptides(&args.predictions);
    let truth = read_peptides(&args.truth);
    let pairs = predictions.iter().zip_eq(truth.iter()).collect_vec();

    let masses = MassTable::canonical();
    let tolerances = MatchTolerances {
        residue: args.residue_tolerance,
        cumulative: args.cumulative_tolerance,
    };
    let results: Vec<_> = par_match_batch(pairs, &masses, tolerances, args.mode)
        .collect::<Result<_, _>>()
        .unwrap();

    if let Some(out_path) = args.out_path {
        let mut out = BufWriter::new(File::create(out_path).unwrap());
        writeln!(&mut out, "prediction\ttruth\tmatched\tlength\tcomplete").unwrap();
        for ((prediction, truth), result) in predictions.iter().zip(truth.iter()).zip(&results) {
            writeln!(
                &mut out,
                "{prediction}\t{truth}\t{}\t{}\t{}",
                result.matched(),
                result.positions.len(),
                result.is_complete()
            )
            .unwrap();
        }
    }

    let tally: MatchTally = results.iter().collect();
    println!(
        "{} peptides, {} predicted residues, {} true residues, {} residues matched",
        tally.peptides, tally.pred_residues, tally.truth_residues, tally.matched
    );
    println!("{}", tally.metrics());
}

/// Read one peptide per line, skipping empty lines.
fn read_peptides(path: &str) -> Vec<String> {
    BufReader::new(File::open(path).unwrap())
        .lines()
        .map(Result::unwrap)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect_vec()
}
