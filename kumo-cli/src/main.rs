//! Kumo CLI - compute Ichimoku series and cloud polygons from bar files.
//!
//! Commands:
//! - `compute` - full five-line series as JSON, including projected slots
//! - `cloud` - cloud segments of a visible window as pixel polygons
//! - `summary` - price vs cloud, last TK cross, cloud color now and ahead
//! - `batch` - summarize many files in parallel
//! - `synth` - write a synthetic bar file (and optionally a starter config)

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kumo_core::cloud::{render_cloud, LinearMapper, PathRecorder, RecordedPolygon};
use kumo_core::config::KumoConfig;
use kumo_core::data::{generate_synthetic_bars, load_csv, symbol_seed, write_csv};
use kumo_core::domain::{Bar, DatasetHash, IndicatorPoint};
use kumo_core::indicators::{ExtremaStrategy, Ichimoku, IchimokuParams};
use kumo_core::signals::{color_label, IchimokuSummary};

#[derive(Parser)]
#[command(name = "kumo", about = "Kumo CLI - Ichimoku Cloud calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Parameter source shared by every computing command.
#[derive(Args, Debug, Clone, Default)]
struct ParamArgs {
    /// TOML config with [ichimoku] and [cloud] sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tenkan (conversion line) period. Overrides the config.
    #[arg(long, allow_negative_numbers = true)]
    tenkan: Option<i64>,

    /// Kijun (base line) period. Overrides the config.
    #[arg(long, allow_negative_numbers = true)]
    kijun: Option<i64>,

    /// Senkou Span B period. Overrides the config.
    #[arg(long, allow_negative_numbers = true)]
    senkou_b: Option<i64>,

    /// Forward/backward displacement. Overrides the config.
    #[arg(long, allow_negative_numbers = true)]
    displacement: Option<i64>,

    /// Use O(n) monotonic-deque extrema instead of re-scanning each window.
    #[arg(long, default_value_t = false)]
    fast: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Ichimoku series and print it as JSON.
    Compute {
        /// Bar CSV (date,open,high,low,close,volume).
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Pretty-print the JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Segment the cloud over a visible window and print its polygons.
    Cloud {
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// First visible output index. Defaults to 0.
        #[arg(long)]
        from: Option<usize>,

        /// One past the last visible output index. Defaults to the output length.
        #[arg(long)]
        to: Option<usize>,

        /// Surface width in pixels.
        #[arg(long, default_value_t = 1000.0)]
        width: f64,

        /// Surface height in pixels.
        #[arg(long, default_value_t = 400.0)]
        height: f64,
    },
    /// Print a human-readable state summary.
    Summary {
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        params: ParamArgs,
    },
    /// Summarize several bar files in parallel.
    Batch {
        /// Bar CSV files.
        #[arg(long, required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },
    /// Write a synthetic random-walk bar file.
    Synth {
        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,

        /// Number of bars.
        #[arg(long, default_value_t = 250)]
        bars: usize,

        /// RNG seed. Defaults to a hash of --symbol.
        #[arg(long)]
        seed: Option<u64>,

        /// Symbol name used to derive the default seed.
        #[arg(long, default_value = "SYNTH")]
        symbol: String,

        /// First date (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-01")]
        start: String,

        /// Also write a default config TOML here.
        #[arg(long)]
        write_config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Compute {
            input,
            params,
            pretty,
        } => run_compute(&input, &params, pretty, &mut out),
        Commands::Cloud {
            input,
            params,
            from,
            to,
            width,
            height,
        } => run_cloud(&input, &params, from, to, (width, height), &mut out),
        Commands::Summary { input, params } => run_summary(&input, &params, &mut out),
        Commands::Batch { inputs, params } => run_batch(&inputs, &params, &mut out),
        Commands::Synth {
            output,
            bars,
            seed,
            symbol,
            start,
            write_config,
        } => run_synth(&output, bars, seed, &symbol, &start, write_config.as_deref(), &mut out),
    }
}

/// Config file (or defaults), then per-flag overrides, validated together.
fn resolve_config(args: &ParamArgs) -> Result<KumoConfig> {
    let mut config = match &args.config {
        Some(path) => KumoConfig::load(path)?,
        None => KumoConfig::default(),
    };
    let base = config.params;
    config.params = IchimokuParams::new(
        args.tenkan.unwrap_or(base.tenkan_period as i64),
        args.kijun.unwrap_or(base.kijun_period as i64),
        args.senkou_b.unwrap_or(base.senkou_b_period as i64),
        args.displacement.unwrap_or(base.displacement as i64),
    )?;
    Ok(config)
}

fn indicator(config: &KumoConfig, args: &ParamArgs) -> Ichimoku {
    let strategy = if args.fast {
        ExtremaStrategy::MonotonicDeque
    } else {
        ExtremaStrategy::Rescan
    };
    Ichimoku::new(config.params).with_strategy(strategy)
}

/// Load bars and compute the series for one file.
fn compute_file(path: &Path, args: &ParamArgs) -> Result<(KumoConfig, Vec<Bar>, Vec<IndicatorPoint>)> {
    let config = resolve_config(args)?;
    let bars = load_csv(path).with_context(|| format!("loading {}", path.display()))?;
    let ichimoku = indicator(&config, args);
    tracing::debug!(
        path = %path.display(),
        indicator = ichimoku.name(),
        strategy = ?ichimoku.strategy(),
        bars = bars.len(),
        "computing series"
    );
    let points = ichimoku.compute(&bars)?;
    Ok((config, bars, points))
}

#[derive(Serialize)]
struct ComputeReport<'a> {
    dataset_hash: String,
    bars: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    params: &'a IchimokuParams,
    points: &'a [IndicatorPoint],
}

fn run_compute(input: &Path, args: &ParamArgs, pretty: bool, out: &mut impl Write) -> Result<()> {
    let (config, bars, points) = compute_file(input, args)?;
    let report = ComputeReport {
        dataset_hash: DatasetHash::of_bars(&bars).to_string(),
        bars: bars.len(),
        first_date: bars.first().map(|b| b.date),
        last_date: bars.last().map(|b| b.date),
        params: &config.params,
        points: &points,
    };
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &report)?;
    } else {
        serde_json::to_writer(&mut *out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct CloudReport {
    from: usize,
    to: usize,
    segments_drawn: usize,
    draw_default_lines: bool,
    polygons: Vec<RecordedPolygon>,
}

fn run_cloud(
    input: &Path,
    args: &ParamArgs,
    from: Option<usize>,
    to: Option<usize>,
    (width, height): (f64, f64),
    out: &mut impl Write,
) -> Result<()> {
    if width <= 0.0 || height <= 0.0 {
        bail!("--width and --height must be positive");
    }
    let (config, _bars, points) = compute_file(input, args)?;
    let from = from.unwrap_or(0);
    let to = to.unwrap_or(points.len());

    let mapper = LinearMapper::fit(&points, from..to, width, height);
    let mut recorder = PathRecorder::new();
    let outcome = render_cloud(&points, from..to, &mapper, &mut recorder, &config.style);

    let report = CloudReport {
        from,
        to,
        segments_drawn: outcome.segments_drawn,
        draw_default_lines: outcome.draw_default_lines,
        polygons: recorder.polygons(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn run_summary(input: &Path, args: &ParamArgs, out: &mut impl Write) -> Result<()> {
    let (config, bars, points) = compute_file(input, args)?;
    let summary = IchimokuSummary::from_series(&bars, &points);
    writeln!(out, "=== {} - {} ===", input.display(), config.params)?;
    writeln!(out, "dataset:       {}", DatasetHash::of_bars(&bars).short())?;
    writeln!(out, "{summary}")?;
    Ok(())
}

fn run_batch(inputs: &[PathBuf], args: &ParamArgs, out: &mut impl Write) -> Result<()> {
    // Each file gets its own bars and output buffer.
    let results: Vec<(PathBuf, Result<IchimokuSummary>)> = inputs
        .par_iter()
        .map(|path| {
            let summary = compute_file(path, args)
                .map(|(_, bars, points)| IchimokuSummary::from_series(&bars, &points));
            (path.clone(), summary)
        })
        .collect();

    let mut failures = 0;
    writeln!(
        out,
        "{:<32} {:>6} {:<14} {:<8} {:<8}",
        "File", "Bars", "Price", "Now", "Ahead"
    )?;
    writeln!(out, "{}", "-".repeat(72))?;
    for (path, result) in results {
        match result {
            Ok(s) => writeln!(
                out,
                "{:<32} {:>6} {:<14} {:<8} {:<8}",
                path.display(),
                s.bars,
                s.bias.map(|b| b.to_string()).unwrap_or_else(|| "n/a".into()),
                color_label(s.cloud_bullish_now),
                color_label(s.cloud_bullish_ahead),
            )?,
            Err(err) => {
                failures += 1;
                tracing::error!(path = %path.display(), "{err:#}");
                writeln!(out, "{:<32} error: {err:#}", path.display())?;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} file(s) failed", inputs.len());
    }
    Ok(())
}

fn run_synth(
    output: &Path,
    count: usize,
    seed: Option<u64>,
    symbol: &str,
    start: &str,
    write_config: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start '{start}' (expected YYYY-MM-DD)"))?;
    let seed = seed.unwrap_or_else(|| symbol_seed(symbol));
    let bars = generate_synthetic_bars(start, count, seed);
    write_csv(output, &bars)?;
    writeln!(out, "Wrote {} bars to {} (seed {seed})", bars.len(), output.display())?;

    if let Some(path) = write_config {
        let text = KumoConfig::default().to_toml_string()?;
        std::fs::write(path, text)
            .with_context(|| format!("writing {}", path.display()))?;
        writeln!(out, "Wrote default config to {}", path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth_file(dir: &Path, name: &str, n: usize, seed: u64) -> PathBuf {
        let path = dir.join(name);
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        write_csv(&path, &generate_synthetic_bars(start, n, seed)).unwrap();
        path
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_config_applies_flag_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("kumo.toml");
        std::fs::write(&cfg, "[ichimoku]\ntenkan = 7\nkijun = 22\n").unwrap();
        let args = ParamArgs {
            config: Some(cfg),
            kijun: Some(30),
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.params.tenkan_period, 7);
        assert_eq!(config.params.kijun_period, 30);
        assert_eq!(config.params.senkou_b_period, 52);
    }

    #[test]
    fn resolve_config_rejects_zero_flag() {
        let args = ParamArgs {
            displacement: Some(0),
            ..Default::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("displacement"));
    }

    #[test]
    fn resolve_config_rejects_oversized_flag() {
        let args = ParamArgs {
            displacement: Some(i64::MAX),
            ..Default::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("displacement"));
        assert!(err.to_string().contains("between 1 and 100000"));
    }

    #[test]
    fn compute_emits_full_length_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = synth_file(dir.path(), "a.csv", 80, 1);
        let mut buf = Vec::new();
        run_compute(&input, &ParamArgs::default(), false, &mut buf).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["bars"], 80);
        assert_eq!(json["points"].as_array().unwrap().len(), 106);
        assert_eq!(json["params"]["displacement"], 26);
        assert_eq!(json["dataset_hash"].as_str().unwrap().len(), 64);
        // First slot has no tenkan yet; projected tail has spans only.
        assert!(json["points"][0].get("tenkan").is_none());
        assert!(json["points"][105].get("span_a").is_some());
    }

    #[test]
    fn cloud_reports_polygons() {
        let dir = tempfile::tempdir().unwrap();
        let input = synth_file(dir.path(), "a.csv", 150, 9);
        let mut buf = Vec::new();
        run_cloud(&input, &ParamArgs::default(), None, None, (800.0, 300.0), &mut buf).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["draw_default_lines"], true);
        assert_eq!(json["to"], 176);
        let drawn = json["segments_drawn"].as_u64().unwrap();
        assert!(drawn >= 1);
        assert_eq!(json["polygons"].as_array().unwrap().len() as u64, drawn);
    }

    #[test]
    fn cloud_rejects_bad_surface() {
        let dir = tempfile::tempdir().unwrap();
        let input = synth_file(dir.path(), "a.csv", 10, 9);
        let mut buf = Vec::new();
        assert!(run_cloud(&input, &ParamArgs::default(), None, None, (0.0, 300.0), &mut buf).is_err());
    }

    #[test]
    fn fast_and_rescan_produce_same_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = synth_file(dir.path(), "a.csv", 200, 5);
        let mut slow = Vec::new();
        let mut fast = Vec::new();
        run_compute(&input, &ParamArgs::default(), false, &mut slow).unwrap();
        let fast_args = ParamArgs {
            fast: true,
            ..Default::default()
        };
        run_compute(&input, &fast_args, false, &mut fast).unwrap();
        assert_eq!(slow, fast);
    }

    #[test]
    fn batch_reports_each_file_and_fails_on_missing() {
        let dir = tempfile::tempdir().unwrap();
        let a = synth_file(dir.path(), "a.csv", 120, 1);
        let b = synth_file(dir.path(), "b.csv", 60, 2);
        let mut buf = Vec::new();
        run_batch(&[a.clone(), b], &ParamArgs::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("a.csv"));
        assert!(text.contains("b.csv"));
        let a_row = text.lines().find(|l| l.contains("a.csv")).unwrap();
        assert!(a_row.contains("bullish") || a_row.contains("bearish"));

        let mut buf = Vec::new();
        let missing = dir.path().join("missing.csv");
        let err = run_batch(&[a, missing], &ParamArgs::default(), &mut buf).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }

    #[test]
    fn synth_writes_bars_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("s.csv");
        let cfg = dir.path().join("kumo.toml");
        let mut buf = Vec::new();
        run_synth(&output, 40, Some(3), "X", "2024-02-01", Some(&cfg), &mut buf).unwrap();
        assert_eq!(load_csv(&output).unwrap().len(), 40);
        assert_eq!(KumoConfig::load(&cfg).unwrap().params, IchimokuParams::default());
        // An empty file would also load as defaults; check it was really written.
        let text = std::fs::read_to_string(&cfg).unwrap();
        assert!(text.contains("[ichimoku]"));
        assert!(text.contains("senkou_b = 52"));
    }

    #[test]
    fn summary_mentions_params() {
        let dir = tempfile::tempdir().unwrap();
        let input = synth_file(dir.path(), "a.csv", 100, 4);
        let mut buf = Vec::new();
        run_summary(&input, &ParamArgs::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("ichimoku(9,26,52,26)"));
        assert!(text.contains("cloud ahead:"));
    }
}
