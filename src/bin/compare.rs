use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use club_compare::clubs::ClubIndex;
use club_compare::config::AppConfig;
use club_compare::dataset::Dataset;
use club_compare::density::DensityPlot;
use club_compare::{export, report};

// Headless run of one comparison:
//   compare [--data DIR] [--today YYYY-MM-DD] [--recent-days N] [--json]
//           [--seed N] [--xlsx [--export PATH]] "Club A" "Club B"
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    club_compare::init_logging();

    let mut config = AppConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let rest = config.apply_args(&args)?;
    let opts = parse_cli(&rest)?;

    let dataset = Dataset::load_dir(&config.data_dir, config.today(), config.recent_days)
        .with_context(|| format!("failed to load dataset from {}", config.data_dir.display()))?;
    let index = ClubIndex::new(&dataset.clubs);

    let comparison = report::compare(
        &dataset,
        &index,
        opts.clubs.first().map(String::as_str),
        opts.clubs.get(1).map(String::as_str),
    )?;

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let plot = DensityPlot::from_head_to_head(&comparison.recent, &mut rng);

    if opts.json {
        let payload = serde_json::json!({
            "comparison": comparison,
            "density": plot,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("serialize comparison")?
        );
    } else {
        print!("{}", report::render_report(&comparison));
        println!("Random draw: {:.2}", plot.marker);
    }

    if opts.xlsx {
        let summary = export::export_comparison(&config.export_path, &comparison, Some(&plot))?;
        eprintln!(
            "Workbook written to {} ({} club rows, {} density rows)",
            config.export_path.display(),
            summary.club_rows,
            summary.density_rows
        );
    }

    Ok(())
}

#[derive(Debug, Default)]
struct CliOptions {
    clubs: Vec<String>,
    json: bool,
    xlsx: bool,
    seed: Option<u64>,
}

fn parse_cli(args: &[String]) -> Result<CliOptions> {
    let mut opts = CliOptions::default();
    let mut idx = 0;
    while idx < args.len() {
        let arg = &args[idx];
        if arg == "--json" {
            opts.json = true;
        } else if arg == "--xlsx" {
            opts.xlsx = true;
        } else if let Some(raw) = arg.strip_prefix("--seed=") {
            opts.seed = Some(parse_seed(raw)?);
        } else if arg == "--seed" {
            idx += 1;
            let raw = args.get(idx).ok_or_else(|| anyhow!("--seed expects a value"))?;
            opts.seed = Some(parse_seed(raw)?);
        } else if arg.starts_with("--") {
            return Err(anyhow!("unknown option {arg}"));
        } else {
            opts.clubs.push(arg.clone());
        }
        idx += 1;
    }
    if opts.clubs.len() != 2 {
        return Err(anyhow!(
            "expected exactly two club names, got {}",
            opts.clubs.len()
        ));
    }
    Ok(opts)
}

fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("invalid --seed '{raw}'"))
}
