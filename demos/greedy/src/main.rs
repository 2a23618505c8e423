//! greedy — drive one yard episode with the greedy carrier policy.
//!
//! ```text
//! cargo run -p greedy -- [arrivals.csv] [config.json]
//! ```
//!
//! Without arguments the embedded six-item feed and the default yard are
//! used.  Step and exit records land in `output/greedy/`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use yard_core::YardConfig;
use yard_feed::{load_arrivals_csv, load_arrivals_reader};
use yard_output::{CsvWriter, RecordObserver};
use yard_sim::{GreedyPolicy, YardEnvBuilder, run_episode};

// ── Constants ─────────────────────────────────────────────────────────────────

const MAX_STEPS:  u64  = 20_000;
const OUTPUT_DIR: &str = "output/greedy";

// Three shipments of 11×8 segments plus a taller batch for the high zone.
const ARRIVALS_CSV: &str = "\
item_id,x,y,length,width,start_time,exit_time,time_remain,processing_time\n\
B001,0,114,11,8,2017/9/1,2017/9/22,0,13\n\
B003,8,114,11,8,2017/9/2,2017/9/22,0,13\n\
B007,16,114,11,8,2017/9/2,2017/9/29,0,13\n\
C010,0,40,18,12,2017/9/3,2017/9/25,2,9\n\
C011,12,40,18,12,2017/9/3,2017/9/26,1,9\n\
D020,0,150,6,10,2017/9/4,2017/9/27,0,4\n\
";

fn load_config(path: Option<&str>) -> Result<YardConfig> {
    let Some(path) = path else {
        return Ok(YardConfig::default());
    };
    let file = std::fs::File::open(path).with_context(|| format!("opening {path}"))?;
    let config = serde_json::from_reader(file).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. Arrival feed.
    let arrivals = match args.first() {
        Some(path) => load_arrivals_csv(Path::new(path))
            .with_context(|| format!("loading arrivals from {path}"))?,
        None => load_arrivals_reader(Cursor::new(ARRIVALS_CSV))?,
    };

    // 2. Yard config.
    let config = load_config(args.get(1).map(String::as_str))?;
    println!("=== greedy — yard_twin storage yard ===");
    println!(
        "Yard: {}×{}  |  Capacity: {}  |  Items: {}  |  Seed: {}",
        config.width,
        config.height,
        config.capacity,
        arrivals.len(),
        config.seed
    );
    println!();

    // 3. Build env.
    let mut env = YardEnvBuilder::new(config).arrivals(arrivals).build()?;

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = RecordObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);

    // 5. Run.
    let t0 = Instant::now();
    let summary = run_episode(&mut env, &mut GreedyPolicy, MAX_STEPS, &mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }
    info!("wrote records to {OUTPUT_DIR}");

    // 6. Summary.
    let (step_rows, exit_rows) = obs.counts();
    println!("Episode {} in {:.3} s", if summary.completed { "complete" } else { "cut off" }, elapsed.as_secs_f64());
    println!("  steps        : {}", summary.steps);
    println!("  total reward : {}", summary.total_reward);
    println!("  conflicts    : {}", summary.conflict_count);
    println!("  simulation_records.csv : {step_rows} rows");
    println!("  out_list_records.csv   : {exit_rows} rows");
    println!();

    // 7. Exit table.
    println!("{:<8} {:<12} {:<12} {:<8} {:<6}", "Item", "Exit due", "Exited", "Step", "Swept");
    println!("{}", "-".repeat(50));
    for record in &env.yard.out_list {
        println!(
            "{:<8} {:<12} {:<12} {:<8} {:<6}",
            record.label,
            record.exit_time.to_string(),
            record.exited_on.to_string(),
            record.step,
            if record.swept { "yes" } else { "no" },
        );
    }

    Ok(())
}
