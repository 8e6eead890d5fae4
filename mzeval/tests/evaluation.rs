#![allow(clippy::missing_panics_doc, clippy::float_cmp)]
//! Integration tests for the full evaluation pipeline, built around the
//! reference corpus of eight predictions for the ground truth peptide SPELK.

use mzeval::prelude::*;

const PREDICTIONS: [&str; 8] = [
    "SPEIK", "SPAEL", "SPAEKL", "ASPEKL", "SPEKL", "SPELQ", "PSEKL", "SPEK",
];

fn reference_results() -> Vec<PeptideMatch> {
    let masses = MassTable::canonical();
    match_batch(
        PREDICTIONS.iter().map(|&prediction| (prediction, "SPELK")),
        &masses,
        MatchTolerances::default(),
        MatchMode::Best,
    )
    .collect::<Result<_, _>>()
    .unwrap()
}

#[test]
fn reference_corpus() {
    let results = reference_results();
    let per_peptide: Vec<usize> = results.iter().map(PeptideMatch::matched).collect();
    assert_eq!(per_peptide, vec![5, 2, 3, 3, 3, 5, 1, 4]);

    let tally: MatchTally = results.iter().collect();
    assert_eq!(tally.matched, 26);
    assert_eq!(tally.pred_residues, 41);
    assert_eq!(tally.truth_residues, 40);
    assert_eq!(tally.complete_peptides, 2);

    let metrics = tally.metrics();
    assert!((metrics.aa_precision - 26.0 / 41.0).abs() < 1e-12);
    assert!((metrics.aa_recall - 26.0 / 40.0).abs() < 1e-12);
    assert!((metrics.peptide_precision - 2.0 / 8.0).abs() < 1e-12);
}

#[test]
fn match_vector_spans_the_longer_sequence() {
    for result in reference_results() {
        assert_eq!(
            result.positions.len(),
            result.pred_residues.max(result.truth_residues)
        );
    }
}

#[test]
fn metrics_stay_in_bounds() {
    let tally: MatchTally = reference_results().iter().collect();
    let metrics = tally.metrics();
    for value in [
        metrics.aa_precision,
        metrics.aa_recall,
        metrics.peptide_precision,
    ] {
        assert!((0.0..=1.0).contains(&value));
    }
}

#[test]
fn deterministic() {
    let first: MatchTally = reference_results().iter().collect();
    let second: MatchTally = reference_results().iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.metrics(), second.metrics());
}

#[test]
fn sharded_aggregation_equals_one_pass() {
    let results = reference_results();
    let whole: MatchTally = results.iter().collect();
    for split in 0..=results.len() {
        let (left, right) = results.split_at(split);
        let combined =
            left.iter().collect::<MatchTally>() + right.iter().collect::<MatchTally>();
        assert_eq!(combined, whole);
    }
}

#[test]
fn identity_is_a_perfect_match() {
    let masses = MassTable::canonical();
    for peptide in ["SPELK", "AM+15.995C+57.02146K", "+42.011AGHW", "Q+0.984N"] {
        for mode in [MatchMode::Best, MatchMode::Forward, MatchMode::Backward] {
            let result =
                match_peptides(peptide, peptide, &masses, MatchTolerances::default(), mode)
                    .unwrap();
            assert!(result.is_complete(), "{peptide} against itself in {mode}");
            let metrics = MatchTally::single(&result).metrics();
            assert_eq!(metrics.aa_precision, 1.0);
            assert_eq!(metrics.aa_recall, 1.0);
            assert_eq!(metrics.peptide_precision, 1.0);
        }
    }
}

#[test]
fn empty_sequences_are_valid() {
    let masses = MassTable::canonical();
    let result = match_peptides(
        "",
        "SPELK",
        &masses,
        MatchTolerances::default(),
        MatchMode::Best,
    )
    .unwrap();
    assert!(result.positions.iter().all(|&position| !position));
    assert_eq!(result.pred_residues, 0);
    assert_eq!(result.truth_residues, 5);

    let metrics = MatchTally::single(&result).metrics();
    assert_eq!(metrics.aa_precision, 0.0);
    assert_eq!(metrics.aa_recall, 0.0);
}

#[test]
fn restricted_modes_keep_their_direction() {
    let masses = MassTable::canonical();
    let tolerances = MatchTolerances::default();
    // An N-terminal insertion ruins the forward scan but leaves the
    // backward scan almost untouched.
    let forward =
        match_peptides("ASPEKL", "SPELK", &masses, tolerances, MatchMode::Forward).unwrap();
    let backward =
        match_peptides("ASPEKL", "SPELK", &masses, tolerances, MatchMode::Backward).unwrap();
    let best = match_peptides("ASPEKL", "SPELK", &masses, tolerances, MatchMode::Best).unwrap();
    assert_eq!(forward.matched(), 0);
    assert_eq!(backward.matched(), 3);
    assert_eq!(best.matched(), 3);
}

#[test]
fn unknown_residue_fails_the_pair() {
    let masses = MassTable::canonical();
    let result = match_peptides(
        "SPEZK",
        "SPELK",
        &masses,
        MatchTolerances::default(),
        MatchMode::Best,
    );
    assert_eq!(result, Err(EvalError::UnknownResidue("Z".to_string())));

    // The caller chooses what an unknown residue means for the batch: here
    // the offending pair is skipped, the rest is tallied.
    let tally: MatchTally = match_batch(
        [("SPEZK", "SPELK"), ("SPELK", "SPELK")],
        &masses,
        MatchTolerances::default(),
        MatchMode::Best,
    )
    .filter_map(Result::ok)
    .collect();
    assert_eq!(tally.peptides, 1);
    assert_eq!(tally.complete_peptides, 1);
}

#[test]
fn mode_parsing() {
    assert_eq!("best".parse::<MatchMode>(), Ok(MatchMode::Best));
    assert_eq!("forward".parse::<MatchMode>(), Ok(MatchMode::Forward));
    assert_eq!("backward".parse::<MatchMode>(), Ok(MatchMode::Backward));
    assert_eq!(
        "sideways".parse::<MatchMode>(),
        Err(EvalError::UnknownMode("sideways".to_string()))
    );
    for mode in [MatchMode::Best, MatchMode::Forward, MatchMode::Backward] {
        assert_eq!(mode.to_string().parse::<MatchMode>(), Ok(mode));
    }
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_batch_matches_serial() {
    let masses = MassTable::canonical();
    let pairs: Vec<(&str, &str)> = PREDICTIONS
        .iter()
        .map(|&prediction| (prediction, "SPELK"))
        .collect();
    let serial: MatchTally = match_batch(
        pairs.clone(),
        &masses,
        MatchTolerances::default(),
        MatchMode::Best,
    )
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
    .iter()
    .collect();
    let parallel: MatchTally = par_match_batch(
        pairs,
        &masses,
        MatchTolerances::default(),
        MatchMode::Best,
    )
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
    .iter()
    .collect();
    assert_eq!(serial, parallel);
}
