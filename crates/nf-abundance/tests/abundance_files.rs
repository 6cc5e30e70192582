//! Integration tests: abundance tables on disk through to a comparison.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use nf_abundance::{
    AbundanceError, DEFAULT_INITIAL_FILE, FINAL_ABUNDANCE_FILE, compare_snapshots, paired_top,
    read_final_abundances, read_initial_abundances,
};
use nf_compare::ClassifyOptions;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

#[test]
fn initial_versus_final() {
    let dir = unique_temp_dir("nf_abundance_synthesis");
    let initial_path = dir.join(DEFAULT_INITIAL_FILE);
    fs::write(
        &initial_path,
        "# Z  el  A  X\n\
         1  H   1   0.70\n\
         8  O   16  0.01\n\
         10 NE  20  0.0\n",
    )
    .expect("failed to write initial file");

    let final_path = dir.join(FINAL_ABUNDANCE_FILE);
    fs::write(&final_path, "isotope,X\nH-1,0.69\nO-16,0.02\nNe-20,0.001\n")
        .expect("failed to write final file");

    let initial = read_initial_abundances(&initial_path).expect("failed to read initial");
    let final_ = read_final_abundances(&final_path).expect("failed to read final");
    assert_eq!(initial.entries()[0].isotope, "H-1");

    let opts = ClassifyOptions {
        floor: 1e-10,
        log_tolerance: Some(0.1),
        top: Some(10),
    };
    let cmp = compare_snapshots(&initial, &final_, &opts);

    let created: Vec<_> = cmp.created.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(created, vec!["Ne-20"]);

    let enhanced: Vec<_> = cmp.enhanced().map(|c| c.key.as_str()).collect();
    assert_eq!(enhanced, vec!["O-16"]);

    // H-1 moved by less than the tolerance
    assert_eq!(cmp.unchanged.len(), 1);
    assert_eq!(cmp.unchanged[0].key, "H-1");

    let rows = paired_top(&initial, &final_, 2);
    assert_eq!(rows[0].isotope, "H-1");
    assert_eq!(rows[1].isotope, "O-16");
    assert!((rows[1].ratio.unwrap() - 2.0).abs() < 1e-12);
}

#[test]
fn missing_final_table_names_path() {
    let dir = unique_temp_dir("nf_abundance_missing");
    let path = dir.join(FINAL_ABUNDANCE_FILE);
    let err = read_final_abundances(&path).unwrap_err();
    assert!(matches!(err, AbundanceError::NotFound { .. }));
    assert!(err.to_string().contains(FINAL_ABUNDANCE_FILE));
}
