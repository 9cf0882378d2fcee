// scripts/benchmark.rs
use basket_mc::analytics::bs_analytic;
use basket_mc::linalg::{correlation_factor, CholeskyFactor};
use basket_mc::math_utils::Timer;
use basket_mc::mc::{price_basket, BasketMcConfig, BasketPayoff};
use basket_mc::models::Asset;
use basket_mc::PricingResult;
use std::env;
use std::fs::File;
use std::io::{self, Write};

struct HostInfo {
    os: &'static str,
    cpu_cores: usize,
    rayon_threads: usize,
    rustflags: String,
}

impl HostInfo {
    fn gather() -> Self {
        HostInfo {
            os: env::consts::OS,
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
            rustflags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

struct BenchmarkRow {
    name: String,
    assets: usize,
    paths: usize,
    time_ms: f64,
    paths_per_sec: f64,
    price: f64,
    std_error: f64,
    reference: Option<f64>,
}

/// Uniform correlation `rho` off the diagonal
fn flat_correlation(n: usize, rho: f64) -> Vec<f64> {
    (0..n * n)
        .map(|k| if k / n == k % n { 1.0 } else { rho })
        .collect()
}

fn timed_price(
    name: String,
    cfg: &BasketMcConfig,
    basket: &[Asset],
    factor: &CholeskyFactor,
    reference: Option<f64>,
) -> PricingResult<BenchmarkRow> {
    let mut timer = Timer::new();
    timer.start();
    let estimate = price_basket(cfg, basket, factor)?;
    let time_ms = timer.elapsed_ms();

    Ok(BenchmarkRow {
        name,
        assets: basket.len(),
        paths: cfg.paths,
        time_ms,
        paths_per_sec: cfg.paths as f64 / (time_ms / 1000.0),
        price: estimate.price,
        std_error: estimate.std_error,
        reference,
    })
}

fn run_path_scaling() -> PricingResult<Vec<BenchmarkRow>> {
    let mut rows = Vec::new();
    let basket = [Asset::new(100.0, 0.2, 0.05)];
    let factor = CholeskyFactor::identity(1);
    let reference = bs_analytic::bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0);

    for paths in [10_000, 100_000, 1_000_000] {
        println!("Single-asset call, {} paths...", paths);
        let cfg = BasketMcConfig {
            paths,
            steps: 1,
            ..Default::default()
        };
        rows.push(timed_price(
            format!("Single asset ({}k paths)", paths / 1000),
            &cfg,
            &basket,
            &factor,
            Some(reference),
        )?);
    }
    Ok(rows)
}

fn run_basket_scaling() -> PricingResult<Vec<BenchmarkRow>> {
    let mut rows = Vec::new();
    let paths = 100_000;

    for n in [2, 5, 10, 25] {
        println!("{}-asset basket, {} paths x 252 steps...", n, paths);
        let basket: Vec<Asset> = (0..n)
            .map(|i| Asset::new(90.0 + 2.0 * i as f64, 0.15 + 0.01 * i as f64, 0.05))
            .collect();
        let factor = correlation_factor(&flat_correlation(n, 0.3), n)?;
        let cfg = BasketMcConfig {
            paths,
            payoff: BasketPayoff::Call { k: 100.0 },
            ..Default::default()
        };
        rows.push(timed_price(
            format!("{}-asset basket", n),
            &cfg,
            &basket,
            &factor,
            None,
        )?);
    }
    Ok(rows)
}

fn write_results_to_csv(rows: &[BenchmarkRow], host: &HostInfo, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# OS: {}", host.os)?;
    writeln!(file, "# CPU Cores: {}", host.cpu_cores)?;
    writeln!(file, "# Rayon Threads: {}", host.rayon_threads)?;
    writeln!(file, "# RUSTFLAGS: {}", host.rustflags)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        file,
        "Benchmark,Assets,Paths,Time_ms,Paths_per_sec,Price,Std_Error,Reference"
    )?;

    for row in rows {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{:.6},{}",
            row.name,
            row.assets,
            row.paths,
            row.time_ms,
            row.paths_per_sec,
            row.price,
            row.std_error,
            row.reference
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
    }

    println!("Results written to {}", filename);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("basket-mc Benchmark Suite");
    println!("=========================\n");

    let host = HostInfo::gather();
    println!("  OS: {}", host.os);
    println!("  CPU Cores: {}", host.cpu_cores);
    println!("  Rayon Threads: {}", host.rayon_threads);
    println!("  RUSTFLAGS: {}\n", host.rustflags);

    let mut rows = run_path_scaling()?;
    rows.extend(run_basket_scaling()?);

    println!(
        "\n{:<28} {:>6} {:>9} {:>10} {:>14} {:>10} {:>9}",
        "Benchmark", "Assets", "Paths", "Time (ms)", "Paths/sec", "Price", "Std Err"
    );
    for row in &rows {
        println!(
            "{:<28} {:>6} {:>9} {:>10.1} {:>14.0} {:>10.4} {:>9.4}",
            row.name, row.assets, row.paths, row.time_ms, row.paths_per_sec, row.price, row.std_error
        );
    }

    let filename = format!(
        "benchmark_results_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    write_results_to_csv(&rows, &host, &filename)?;
    Ok(())
}
