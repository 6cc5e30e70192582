use clap::{Parser, Subcommand};
use nf_app::{
    AbundanceComparison, AbundanceRow, AnalysisConfig, AppResult, FluxChangeRow, FluxRow, RunDir,
    analysis, change_rows, load_config, write_csv, write_json,
};
use nf_compare::{ClassifyOptions, Significance};
use nf_core::{Real, ensure_non_negative};
use nf_flux::SIGNIFICANT_FLUX;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nucleoflux")]
#[command(about = "Nucleosynthesis flux and abundance analysis", long_about = None)]
struct Cli {
    /// Analysis config (YAML); explicit flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Top reactions by |flux| in one flux file
    Snapshot {
        /// Path to a flux_XXXXX.DAT file
        file: PathBuf,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        min_flux: Option<Real>,
        /// Write all ranked reactions to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Producers and destroyers of one isotope in a flux file
    IsotopeFlux {
        file: PathBuf,
        /// Isotope label, e.g. O-15
        #[arg(long)]
        iso: String,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        min_flux: Option<Real>,
        /// Directory for producer/destroyer CSV tables
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Per-reaction flux change between two flux files
    CompareFlux {
        file_a: PathBuf,
        file_b: PathBuf,
        /// Also show changes affecting this isotope
        #[arg(long)]
        iso: Option<String>,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Integrated |flux| per reaction over all steps of a run
    Integrate {
        run: PathBuf,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        min_flux: Option<Real>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// |flux| of one reaction at every step of a run
    TimeSeries {
        run: PathBuf,
        /// Reaction key, e.g. "O-15 + H-1 -> F-16"
        #[arg(long)]
        reaction: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Final abundances of run B relative to run A
    CompareRuns {
        run_a: PathBuf,
        run_b: PathBuf,
        #[arg(long)]
        top: Option<usize>,
        /// Ignore changes with |log10(X_B/X_A)| at or below this
        #[arg(long)]
        log_tol: Option<Real>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Final abundances of a run relative to the initial composition
    Synthesis {
        run: PathBuf,
        /// Initial-abundance file
        #[arg(long)]
        initial: Option<PathBuf>,
        #[arg(long)]
        top: Option<usize>,
        /// Ignore isotopes with X at or below this on either side for ratios
        #[arg(long)]
        min_init: Option<Real>,
        #[arg(long)]
        log_tol: Option<Real>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Initial X, final X and their ratio for the most abundant isotopes
    AbundanceRatios {
        run: PathBuf,
        #[arg(long)]
        initial: Option<PathBuf>,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Most abundant isotopes at the end of a run
    FinalTop {
        run: PathBuf,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Most abundant isotopes of the initial composition
    InitialTop {
        #[arg(long)]
        initial: Option<PathBuf>,
        #[arg(long)]
        top: Option<usize>,
        /// Only isotopes with X above this
        #[arg(long)]
        threshold: Option<Real>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Mass fraction of one isotope at every abundance dump of a run
    TimeEvolution {
        run: PathBuf,
        /// Isotope label as written in summary.csv, e.g. HE-4
        #[arg(long = "iso")]
        isotope: String,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Final abundance of one isotope across all factor runs
    IsotopeSweep {
        /// Isotope label, e.g. F-19
        isotope: String,
        #[arg(long)]
        runs_dir: Option<PathBuf>,
        /// Report raw abundances instead of ratios to baseline
        #[arg(long)]
        raw: bool,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Rank isotopes by sensitivity to the runs matching a pattern
    Sensitivity {
        /// Substring of the run folder names, e.g. 15O_ag
        #[arg(long)]
        pattern: String,
        #[arg(long)]
        baseline: Option<PathBuf>,
        #[arg(long)]
        runs_dir: Option<PathBuf>,
        /// Only isotopes with mass number below this
        #[arg(long)]
        a_max: Option<u32>,
        #[arg(long)]
        top_n: Option<usize>,
        #[arg(long)]
        min_s: Option<Real>,
        /// Ignore isotopes with baseline X at or below this
        #[arg(long)]
        min_xb: Option<Real>,
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Logs go to stderr so tables on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };
    let config = merge_flags(config, &cli.command)?;
    tracing::debug!(?config, "analysis config");

    match cli.command {
        Commands::Snapshot { file, csv, .. } => cmd_snapshot(
            &file,
            config.top.unwrap_or(25),
            config.min_flux.unwrap_or(SIGNIFICANT_FLUX),
            csv.as_deref(),
        ),
        Commands::IsotopeFlux {
            file, iso, csv_dir, ..
        } => cmd_isotope_flux(
            &file,
            &iso,
            config.top.unwrap_or(25),
            config.min_flux.unwrap_or(SIGNIFICANT_FLUX),
            csv_dir.as_deref(),
        ),
        Commands::CompareFlux {
            file_a,
            file_b,
            iso,
            ..
        } => cmd_compare_flux(&file_a, &file_b, iso.as_deref(), config.top.unwrap_or(25)),
        Commands::Integrate { run, csv, .. } => cmd_integrate(
            &run,
            config.top.unwrap_or(25),
            config.min_flux.unwrap_or(0.0),
            csv.as_deref(),
        ),
        Commands::TimeSeries { run, reaction, csv } => cmd_time_series(
            &run,
            &reaction,
            config.min_flux.unwrap_or(0.0),
            csv.as_deref(),
        ),
        Commands::CompareRuns {
            run_a, run_b, csv, ..
        } => {
            let options = ClassifyOptions {
                floor: config.ratio_floor.unwrap_or(0.0),
                log_tolerance: Some(config.log_tolerance.unwrap_or(0.1)),
                top: Some(config.top.unwrap_or(20)),
            };
            cmd_compare_runs(&run_a, &run_b, &options, csv.as_deref())
        }
        Commands::Synthesis {
            run, initial, csv, ..
        } => {
            let options = ClassifyOptions {
                floor: config.ratio_floor.unwrap_or(1e-10),
                log_tolerance: Some(config.log_tolerance.unwrap_or(0.1)),
                top: Some(config.top.unwrap_or(15)),
            };
            let initial = initial.unwrap_or(config.initial_abundance);
            cmd_synthesis(&initial, &run, &options, csv.as_deref())
        }
        Commands::AbundanceRatios {
            run, initial, csv, ..
        } => {
            let initial = initial.unwrap_or(config.initial_abundance);
            cmd_abundance_ratios(&initial, &run, config.top.unwrap_or(15), csv.as_deref())
        }
        Commands::FinalTop { run, csv, .. } => {
            cmd_final_top(&run, config.top.unwrap_or(15), csv.as_deref())
        }
        Commands::InitialTop {
            initial,
            threshold,
            csv,
            ..
        } => {
            let initial = initial.unwrap_or(config.initial_abundance);
            cmd_initial_top(
                &initial,
                config.top.unwrap_or(15),
                threshold.unwrap_or(0.0),
                csv.as_deref(),
            )
        }
        Commands::TimeEvolution {
            run, isotope, csv,
        } => cmd_time_evolution(&run, &isotope, csv.as_deref()),
        Commands::IsotopeSweep {
            isotope,
            runs_dir,
            raw,
            csv,
        } => {
            let runs_dir = runs_dir.unwrap_or(config.runs_dir);
            cmd_isotope_sweep(&runs_dir, &isotope, !raw, csv.as_deref())
        }
        Commands::Sensitivity {
            pattern,
            baseline,
            runs_dir,
            json,
            csv,
            ..
        } => {
            let runs_dir = runs_dir.unwrap_or(config.runs_dir);
            let baseline = baseline.unwrap_or(config.baseline);
            cmd_sensitivity(
                &runs_dir,
                &baseline,
                &pattern,
                &config.sensitivity,
                json.as_deref(),
                csv.as_deref(),
            )
        }
    }
}

/// Fold the threshold flags of `command` over `config` and validate the
/// merged values. Flags win over the file.
fn merge_flags(mut config: AnalysisConfig, command: &Commands) -> AppResult<AnalysisConfig> {
    match command {
        Commands::Snapshot { top, min_flux, .. }
        | Commands::IsotopeFlux { top, min_flux, .. }
        | Commands::Integrate { top, min_flux, .. } => {
            config.top = top.or(config.top);
            config.min_flux = min_flux.or(config.min_flux);
        }
        Commands::CompareFlux { top, .. }
        | Commands::AbundanceRatios { top, .. }
        | Commands::FinalTop { top, .. }
        | Commands::InitialTop { top, .. } => {
            config.top = top.or(config.top);
        }
        Commands::CompareRuns { top, log_tol, .. } => {
            config.top = top.or(config.top);
            config.log_tolerance = log_tol.or(config.log_tolerance);
        }
        Commands::Synthesis {
            top,
            min_init,
            log_tol,
            ..
        } => {
            config.top = top.or(config.top);
            config.ratio_floor = min_init.or(config.ratio_floor);
            config.log_tolerance = log_tol.or(config.log_tolerance);
        }
        Commands::Sensitivity {
            a_max,
            top_n,
            min_s,
            min_xb,
            ..
        } => {
            let sens = &mut config.sensitivity;
            if a_max.is_some() {
                sens.mass_number_max = *a_max;
            }
            if let Some(n) = top_n {
                sens.top_n = *n;
            }
            if let Some(s) = min_s {
                sens.min_s = *s;
            }
            if let Some(xb) = min_xb {
                sens.min_baseline = *xb;
            }
        }
        Commands::TimeSeries { .. }
        | Commands::TimeEvolution { .. }
        | Commands::IsotopeSweep { .. } => {}
    }

    config.validate()?;
    if let Commands::InitialTop {
        threshold: Some(t), ..
    } = command
    {
        ensure_non_negative(*t, "threshold")?;
    }
    Ok(config)
}

fn print_flux_rows(rows: &[FluxRow]) {
    println!("{:>15} {:>13}  reaction", "log10_abs_flux", "flux");
    for row in rows {
        println!(
            "{:>15.4} {:>13.4e}  {}",
            row.log10_abs_flux, row.flux, row.reaction
        );
    }
}

fn print_change_rows(rows: &[FluxChangeRow]) {
    println!("{:>12}  reaction", "delta_log10");
    for row in rows {
        println!("{:>12.4}  {}", row.delta_log10, row.reaction);
    }
}

fn cmd_snapshot(file: &Path, top: usize, min_flux: Real, csv: Option<&Path>) -> AppResult<()> {
    let rows = analysis::flux_snapshot(file, min_flux, usize::MAX)?;
    if rows.is_empty() {
        println!("No reactions passed the flux threshold.");
        return Ok(());
    }

    println!("\nTop {} reactions by |flux| from {}\n", top, file.display());
    print_flux_rows(&rows[..top.min(rows.len())]);

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_isotope_flux(
    file: &Path,
    iso: &str,
    top: usize,
    min_flux: Real,
    csv_dir: Option<&Path>,
) -> AppResult<()> {
    let report = analysis::isotope_flux(file, iso, min_flux)?;
    if report.table_empty {
        println!("No reactions passed the flux threshold.");
        return Ok(());
    }

    for (title, rows) in [
        (
            format!("=== Top producers of {} (appears in products) ===", iso),
            &report.producers,
        ),
        (
            format!("=== Top destroyers of {} (appears in reactants) ===", iso),
            &report.destroyers,
        ),
    ] {
        println!("\n{}", title);
        if rows.is_empty() {
            println!("  (none above threshold)");
        } else {
            println!();
            print_flux_rows(&rows[..top.min(rows.len())]);
        }
    }

    if let Some(dir) = csv_dir {
        std::fs::create_dir_all(dir)?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let producers = dir.join(format!("{}_producers_{}.csv", iso, file_name));
        let destroyers = dir.join(format!("{}_destroyers_{}.csv", iso, file_name));
        write_csv(&producers, &report.producers)?;
        write_csv(&destroyers, &report.destroyers)?;
        println!("\n✓ Wrote {}", producers.display());
        println!("✓ Wrote {}", destroyers.display());
    }
    Ok(())
}

fn cmd_compare_flux(file_a: &Path, file_b: &Path, iso: Option<&str>, top: usize) -> AppResult<()> {
    let report = analysis::compare_flux(file_a, file_b, iso, top)?;

    println!("\n=== Reactions with largest flux change ===\n");
    if report.largest.is_empty() {
        println!("  (no reaction present in both files)");
    } else {
        print_change_rows(&report.largest);
    }
    println!(
        "\n  {} reaction(s) only in A, {} only in B",
        report.only_in_a, report.only_in_b
    );

    if let Some(iso) = iso {
        println!("\n=== Flux change affecting production of {} ===\n", iso);
        print_change_rows(&report.production);
        println!("\n=== Flux change affecting destruction of {} ===\n", iso);
        print_change_rows(&report.destruction);
    }
    Ok(())
}

fn cmd_integrate(run: &Path, top: usize, min_flux: Real, csv: Option<&Path>) -> AppResult<()> {
    let run = RunDir::open(run)?;
    let rows = analysis::integrate_run(&run, min_flux)?;

    println!("\n=== Top {} reactions by integrated flow ===\n", top);
    println!("{:>22}  reaction", "log10_integrated_flux");
    for row in rows.iter().take(top) {
        println!("{:>22.4}  {}", row.log10_integrated_flux, row.reaction);
    }

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_time_series(run: &Path, reaction: &str, min_flux: Real, csv: Option<&Path>) -> AppResult<()> {
    let run = RunDir::open(run)?;
    let rows = analysis::reaction_time_series(&run, reaction, min_flux)?;

    println!("\n=== |flux| of {} in {} ===\n", reaction, run.name());
    println!("{:>8} {:>13} {:>15}", "step", "abs_flux", "log10_abs_flux");
    for row in &rows {
        println!(
            "{:>8} {:>13.4e} {:>15.4}",
            row.step, row.abs_flux, row.log10_abs_flux
        );
    }

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn print_abundance_comparison(result: &AbundanceComparison) {
    let cmp = &result.comparison;
    println!(
        "\n=== Comparison: {} relative to {} ===",
        result.subject, result.reference
    );

    println!("\n--- Created (absent in {}) ---", result.reference);
    for e in &cmp.created {
        println!("{:>8} X = {:.3e}", e.key, e.b);
    }
    println!("\n--- Destroyed (absent in {}) ---", result.subject);
    for e in &cmp.destroyed {
        println!("{:>8}", e.key);
    }

    match cmp.significance() {
        Significance::Ranked { .. } => {
            println!("\n--- Enhanced ---");
            for c in cmp.enhanced() {
                println!("{:>8} x{:.2e}", c.key, c.ratio);
            }
            println!("\n--- Depleted ---");
            for c in cmp.depleted() {
                println!("{:>8} /{:.2e}", c.key, 1.0 / c.ratio);
            }
        }
        Significance::NoSignificantChange { tolerance } => {
            println!("\nNo significant change with a tolerance of {}", tolerance);
        }
        Significance::NoOverlap => {
            println!("\n(no isotope above the floor in both)");
        }
    }
}

fn cmd_compare_runs(
    run_a: &Path,
    run_b: &Path,
    options: &ClassifyOptions,
    csv: Option<&Path>,
) -> AppResult<()> {
    let result = analysis::compare_runs(&RunDir::open(run_a)?, &RunDir::open(run_b)?, options)?;
    print_abundance_comparison(&result);

    if let Some(path) = csv {
        write_csv(path, &change_rows(&result.comparison))?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_synthesis(
    initial: &Path,
    run: &Path,
    options: &ClassifyOptions,
    csv: Option<&Path>,
) -> AppResult<()> {
    let result = analysis::synthesis(initial, &RunDir::open(run)?, options)?;
    print_abundance_comparison(&result);

    if let Some(path) = csv {
        write_csv(path, &change_rows(&result.comparison))?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_abundance_ratios(initial: &Path, run: &Path, top: usize, csv: Option<&Path>) -> AppResult<()> {
    let rows = analysis::abundance_ratios(initial, &RunDir::open(run)?, top)?;

    println!("{:>8} {:>12} {:>12} {:>12}", "isotope", "X_i", "X_f", "X_f/X_i");
    for row in &rows {
        let ratio = row
            .ratio
            .map(|r| format!("{:.3e}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8} {:>12.3e} {:>12.3e} {:>12}",
            row.isotope, row.x_initial, row.x_final, ratio
        );
    }

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn print_abundance_rows(rows: &[AbundanceRow]) {
    println!("{:>8} {:>12}", "isotope", "X");
    for row in rows {
        println!("{:>8} {:>12.4e}", row.isotope, row.x);
    }
    if rows.is_empty() {
        println!("  (none above threshold)");
    }
}

fn cmd_final_top(run: &Path, top: usize, csv: Option<&Path>) -> AppResult<()> {
    let run = RunDir::open(run)?;
    let rows = analysis::final_top(&run, top)?;

    println!("\n=== Final abundances (top {}) - {} ===\n", top, run.name());
    print_abundance_rows(&rows);

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_initial_top(initial: &Path, top: usize, threshold: Real, csv: Option<&Path>) -> AppResult<()> {
    let rows = analysis::initial_top(initial, top, threshold)?;

    println!("\n=== Initial abundances (top {}) ===\n", top);
    print_abundance_rows(&rows);

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_time_evolution(run: &Path, isotope: &str, csv: Option<&Path>) -> AppResult<()> {
    let run = RunDir::open(run)?;
    let rows = analysis::time_evolution(&run, isotope)?;

    println!("\n=== Time evolution of {} - {} ===\n", isotope, run.name());
    println!("{:>14} {:>13}  file", "agej (s)", "X");
    for row in &rows {
        println!("{:>14.6e} {:>13.4e}  {}", row.time, row.x, row.file);
    }

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_isotope_sweep(
    runs_dir: &Path,
    isotope: &str,
    ratio_mode: bool,
    csv: Option<&Path>,
) -> AppResult<()> {
    let rows = analysis::factor_sweep(runs_dir, isotope, ratio_mode)?;

    println!("\nSensitivity results for {}", isotope);
    println!("======================================");
    for row in &rows {
        match row.ratio_to_baseline {
            Some(ratio) => println!(
                "Factor = {:>10} | Final = {:.6e} | Ratio = {:.6e}",
                row.factor, row.final_abundance, ratio
            ),
            None => println!(
                "Factor = {:>10} | Final = {:.6e}",
                row.factor, row.final_abundance
            ),
        }
    }

    if let Some(path) = csv {
        write_csv(path, &rows)?;
        println!("\n✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_sensitivity(
    runs_dir: &Path,
    baseline: &Path,
    pattern: &str,
    config: &nf_app::SensitivityConfig,
    json: Option<&Path>,
    csv: Option<&Path>,
) -> AppResult<()> {
    let summary = analysis::sensitivity(runs_dir, baseline, pattern, config)?;

    let cut = config
        .mass_number_max
        .map(|a| format!(" (A < {})", a))
        .unwrap_or_default();
    println!("\n=== Sensitivity ranking for pattern '{}'{} ===", pattern, cut);
    println!(" iso       A   S=max|log10(X/Xb)|   alpha=dlog10(X/Xb)/dlog10(r)");
    println!("-----------------------------------------------------------------");
    for row in summary.ranking.iter().take(config.top_n.max(20)) {
        let a = row.mass_number.map(|a| a.to_string()).unwrap_or_default();
        let alpha = row
            .alpha
            .map(|a| format!("{:8.3}", a))
            .unwrap_or_else(|| "     nan".to_string());
        let flag = if row.clamped { "  (clamped)" } else { "" };
        println!("{:>6}  {:>4}   {:>10.3}            {}{}", row.isotope, a, row.s, alpha, flag);
    }
    if summary.ranking.is_empty() {
        println!("  (none above threshold)");
    }

    if let Some(path) = json {
        write_json(path, &summary)?;
        println!("\n✓ Wrote {}", path.display());
    }
    if let Some(path) = csv {
        write_csv(path, &summary.ranking)?;
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use nf_app::AppError;

    fn merged(args: &[&str]) -> AppResult<AnalysisConfig> {
        let cli = Cli::try_parse_from(args).unwrap();
        merge_flags(AnalysisConfig::default(), &cli.command)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sensitivity_flags() {
        let cli = Cli::try_parse_from([
            "nucleoflux",
            "sensitivity",
            "--pattern",
            "15O_ag",
            "--a-max",
            "30",
            "--min-s",
            "0.05",
            "--config",
            "analysis.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("analysis.yaml")));
        match cli.command {
            Commands::Sensitivity {
                pattern,
                a_max,
                min_s,
                top_n,
                ..
            } => {
                assert_eq!(pattern, "15O_ag");
                assert_eq!(a_max, Some(30));
                assert_eq!(min_s, Some(0.05));
                assert_eq!(top_n, None);
            }
            _ => panic!("expected sensitivity command"),
        }
    }

    #[test]
    fn flags_override_config_values() {
        let mut base = AnalysisConfig::default();
        base.top = Some(7);
        base.log_tolerance = Some(0.3);
        let cli = Cli::try_parse_from([
            "nucleoflux",
            "synthesis",
            "runs/baseline",
            "--min-init",
            "1e-8",
        ])
        .unwrap();
        let cfg = merge_flags(base, &cli.command).unwrap();
        assert_eq!(cfg.ratio_floor, Some(1e-8));
        assert_eq!(cfg.log_tolerance, Some(0.3));
        assert_eq!(cfg.top, Some(7));

        let cfg = merged(&[
            "nucleoflux",
            "sensitivity",
            "--pattern",
            "15O_ag",
            "--min-xb",
            "1e-20",
        ])
        .unwrap();
        assert_eq!(cfg.sensitivity.min_baseline, 1e-20);
        assert_eq!(cfg.sensitivity.mass_number_max, Some(40));
    }

    #[test]
    fn negative_or_nan_threshold_flags_are_rejected() {
        let cases: [&[&str]; 6] = [
            &["nucleoflux", "compare-runs", "a", "b", "--log-tol=-1"],
            &["nucleoflux", "compare-runs", "a", "b", "--log-tol", "NaN"],
            &["nucleoflux", "synthesis", "a", "--min-init=-1e-10"],
            &["nucleoflux", "snapshot", "flux_00001.DAT", "--min-flux=-1e-30"],
            &["nucleoflux", "sensitivity", "--pattern", "15O_ag", "--min-s=-0.5"],
            &["nucleoflux", "initial-top", "--threshold=-1"],
        ];
        for args in cases {
            let err = merged(args).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{args:?}: {err}");
        }
    }

    #[test]
    fn valid_tolerance_flag_is_accepted() {
        let cfg = merged(&["nucleoflux", "compare-runs", "a", "b", "--log-tol=0"]).unwrap();
        assert_eq!(cfg.log_tolerance, Some(0.0));
    }
}
