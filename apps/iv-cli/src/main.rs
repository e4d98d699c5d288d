use clap::{Args, Parser, Subcommand};
use iv_app::{
    AppResult, GenerateRequest, RunConfig, RunProgressEvent, RunStage, curve_name, run_service,
};
use iv_results::CanonicalFormatter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ivp")]
#[command(about = "Precise I-V curve reference generator for the single-diode model", long_about = None)]
struct Cli {
    /// Directory of test-set CSV files
    #[arg(long, global = true, default_value = "test_sets")]
    test_sets_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available test sets
    List,
    /// Generate refined curves for test sets
    Generate {
        /// Test set to generate (repeatable; all test sets when omitted)
        #[arg(long = "test-set")]
        test_sets: Vec<String>,
        /// Case index to generate (repeatable; all cases when omitted)
        #[arg(long = "case")]
        cases: Vec<u32>,
        /// Directory to write {test_set}.json into
        #[arg(long)]
        save_json: Option<PathBuf>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Write one refined curve as voltage,current CSV
    ExportCurve {
        /// Test set name
        test_set: String,
        /// Case index within the test set
        index: u32,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Run configuration YAML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Residual tolerance (e.g. 1e-16)
    #[arg(long)]
    atol: Option<String>,
    /// Points per curve
    #[arg(long)]
    num_pts: Option<usize>,
}

impl RunArgs {
    fn resolve(&self) -> AppResult<RunConfig> {
        let file = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        Ok(file.merged_with(RunConfig {
            atol: self.atol.clone(),
            num_pts: self.num_pts,
            ..RunConfig::default()
        }))
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => cmd_list(&cli.test_sets_dir),
        Commands::Generate {
            test_sets,
            cases,
            save_json,
            run,
        } => cmd_generate(
            &cli.test_sets_dir,
            test_sets,
            cases,
            save_json.as_deref(),
            &run,
        ),
        Commands::ExportCurve {
            test_set,
            index,
            output,
            run,
        } => cmd_export_curve(&cli.test_sets_dir, &test_set, index, output.as_deref(), &run),
    }
}

fn cmd_list(test_sets_dir: &Path) -> AppResult<()> {
    let names = run_service::list_test_sets(test_sets_dir)?;
    if names.is_empty() {
        println!("No test sets found in {}", test_sets_dir.display());
    } else {
        println!("Test sets in {}:", test_sets_dir.display());
        for name in names {
            println!("  {}", name);
        }
    }
    Ok(())
}

fn cmd_generate(
    test_sets_dir: &Path,
    test_sets: Vec<String>,
    cases: Vec<u32>,
    save_json: Option<&Path>,
    run: &RunArgs,
) -> AppResult<()> {
    let request = GenerateRequest {
        test_sets_dir,
        test_sets,
        cases,
        save_json,
        config: run.resolve()?,
    };

    let mut last_emit = Instant::now();
    let response = run_service::generate_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now = event.stage != RunStage::RefiningCase
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    for output in &response.outputs {
        match &output.saved_to {
            Some(path) => println!(
                "✓ {}: {} curves written to {}",
                output.name,
                output.result.len(),
                path.display()
            ),
            None => println!("✓ {}: {} curves refined", output.name, output.result.len()),
        }
    }
    println!("  Total time: {:.2}s", response.total_time_s);
    Ok(())
}

fn cmd_export_curve(
    test_sets_dir: &Path,
    test_set: &str,
    index: u32,
    output: Option<&Path>,
    run: &RunArgs,
) -> AppResult<()> {
    let config = run.resolve()?;
    let constants = config.to_constants()?;
    let case = run_service::refine_case(test_sets_dir, test_set, index, &config)?;
    let csv = run_service::curve_csv(
        &case.curve,
        &CanonicalFormatter::new(constants.output_digits),
    );

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} points of {} to {}",
            case.curve.len(),
            curve_name(test_set, index),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.case) {
        (RunStage::RefiningCase, Some(case)) => {
            let width = 28usize;
            let filled = (case.position * width / case.total.max(1)).min(width);
            print!(
                "\r[{}{}] {}/{}  {}  elapsed={:.1}s",
                "#".repeat(filled),
                "-".repeat(width - filled),
                case.position,
                case.total,
                curve_name(&case.test_set, case.index),
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            if let Some(message) = &event.message {
                clear_progress_line();
                println!("{}", message);
            }
        }
    }
}
