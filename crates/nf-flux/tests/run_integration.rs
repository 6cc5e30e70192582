//! Integration tests: flux files on disk through to integrated flux.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use nf_flux::{
    FluxError, FluxTable, ReactionKey, SIGNIFICANT_FLUX, integrate, load_step_tables, time_series,
};

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
fn example_scenario_from_file() {
    let dir = unique_temp_dir("nf_flux_scenario");
    let path = dir.join("flux_00001.DAT");
    fs::write(
        &path,
        "# idx Z1 A1 Z3 A3 Z5 A5 Z7 A7 flux energy timescale\n\
         1 8 15 1 1 9 16 0 0 2.5e-6 1.0 1.0e3\n\
         2 9 16 0 0 8 16 1 1 -1.0e-7 1.0 1.0e3\n",
    )
    .expect("failed to write flux file");

    let table = FluxTable::read(&path, 0.0).expect("failed to read flux file");
    let keys: Vec<_> = table.entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["O-15 + H-1 -> F-16", "F-16 -> O-16 + H-1"]);

    let top = table.top(1);
    assert_eq!(top[0].key.as_str(), "O-15 + H-1 -> F-16");
    assert_eq!(top[0].abs_flux(), 2.5e-6);
    assert_eq!(table.entries()[1].abs_flux(), 1.0e-7);
}

#[test]
fn load_run_in_step_order() {
    let dir = unique_temp_dir("nf_flux_run");
    let files = [
        ("flux_00010.DAT", "1 8 15 1 1 9 16 0 0 1.0e-6\n"),
        ("flux_00002.DAT", "1 8 15 1 1 9 16 0 0 3.0e-6\n2 6 12 1 1 7 13 0 0 1.0e-35\n"),
        ("flux_00005.DAT", "1 6 12 1 1 7 13 0 0 5.0e-6\n"),
    ];
    let mut paths = Vec::new();
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content).expect("failed to write flux file");
        paths.push(path);
    }

    let tables = load_step_tables(&paths, SIGNIFICANT_FLUX).expect("failed to load run");
    let steps: Vec<u64> = tables.iter().map(|t| t.step).collect();
    assert_eq!(steps, vec![2, 5, 10]);

    let integrated = integrate(tables.iter().map(|t| &t.table));
    assert_eq!(integrated[0].key.as_str(), "C-12 + H-1 -> N-13");
    assert!((integrated[0].integrated_flux - 5.0e-6).abs() < 1e-18);
    assert_eq!(integrated[1].key.as_str(), "O-15 + H-1 -> F-16");
    assert!((integrated[1].integrated_flux - 4.0e-6).abs() < 1e-18);

    let series = time_series(&tables, &ReactionKey::from("C-12 + H-1 -> N-13"));
    let values: Vec<f64> = series.iter().map(|p| p.abs_flux).collect();
    // the 1e-35 row at step 2 is below the significance threshold
    assert_eq!(values, vec![0.0, 5.0e-6, 0.0]);
}

#[test]
fn malformed_file_is_fatal() {
    let dir = unique_temp_dir("nf_flux_bad");
    let good = dir.join("flux_00001.DAT");
    let bad = dir.join("flux_00002.DAT");
    fs::write(&good, "1 8 15 1 1 9 16 0 0 1.0e-6\n").unwrap();
    fs::write(&bad, "1 8 15 1 1 9 16 0 0 1.0e-6\n2 8 15 1\n").unwrap();

    let err = load_step_tables(&[good, bad.clone()], 0.0).unwrap_err();
    match err {
        FluxError::Malformed { path, line, .. } => {
            assert_eq!(path, bad);
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_names_path() {
    let dir = unique_temp_dir("nf_flux_missing");
    let path = dir.join("flux_00003.DAT");
    let err = FluxTable::read(&path, 0.0).unwrap_err();
    assert!(matches!(err, FluxError::Read { .. }));
    assert!(err.to_string().contains("flux_00003.DAT"));
}
