//! End-to-end sweep: named runs through to the S/α ranking.

use nf_abundance::AbundanceSnapshot;
use nf_sensitivity::{
    BASELINE_NAME, SweepOptions, SweepRun, collect_ratios, fit_all, isotope_sweep,
    rank_by_magnitude, rank_by_slope, sweep_factor,
};

fn run(name: &str, pairs: &[(&str, f64)]) -> SweepRun {
    SweepRun {
        name: name.to_string(),
        factor: sweep_factor(name).expect("run name carries a factor"),
        abundances: AbundanceSnapshot::from_pairs(pairs.iter().copied()),
    }
}

#[test]
fn worked_sweep() {
    let baseline = AbundanceSnapshot::from_pairs([("F-19", 1.0e-8), ("O-16", 1.0e-2)]);
    let runs = vec![
        run("15O_ag_fact_0.1", &[("F-19", 3.16e-8), ("O-16", 1.0e-2)]),
        run(BASELINE_NAME, &[("F-19", 1.0e-8), ("O-16", 1.0e-2)]),
        run("15O_ag_fact_10", &[("F-19", 0.316e-8), ("O-16", 1.0e-2)]),
    ];

    let ratios = collect_ratios(&baseline, &runs, &SweepOptions::default());
    let ranked = rank_by_magnitude(fit_all(ratios), None);

    assert_eq!(ranked[0].isotope, "F-19");
    assert!((ranked[0].slope() + 0.5).abs() < 1e-3);
    assert!((ranked[0].magnitude() - 0.5).abs() < 1e-3);

    // O-16 does not move at all
    assert_eq!(ranked[1].isotope, "O-16");
    assert!(ranked[1].magnitude().abs() < 1e-12);
    assert!(ranked[1].slope().abs() < 1e-12);

    let slopes = rank_by_slope(&ranked);
    assert_eq!(slopes[0].isotope, "F-19");

    let rows = isotope_sweep("F-19", &runs, true).expect("baseline present");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].ratio, Some(1.0));
}
