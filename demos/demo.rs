// demos/demo.rs
//! Two negatively correlated assets, priced with the `BasketPricer` wrapper
//! and checked against the forward of each asset.

use basket_mc::analytics::bs_analytic;
use basket_mc::linalg::{correlation_factor, CholeskyFactor};
use basket_mc::math_utils::Timer;
use basket_mc::mc::{price_basket, BasketMcConfig, BasketPayoff, BasketPricer};
use basket_mc::models::{Asset, MultiAssetGbm, PathState};
use basket_mc::rng::RngFactory;

fn main() {
    let r = 0.05;
    let t = 1.0;
    let strike = 100.0;
    let steps = 252;
    let paths = 100_000;

    let basket = vec![Asset::new(100.0, 0.20, r), Asset::new(100.0, 0.25, r)];
    let correlation = [1.0, -0.7, -0.7, 1.0];

    let factor = correlation_factor(&correlation, basket.len()).expect("Valid correlation matrix");
    println!("Cholesky factor:");
    for i in 0..factor.dimension() {
        let row: Vec<String> = (0..factor.dimension())
            .map(|j| format!("{:>10.6}", factor.get(i, j)))
            .collect();
        println!("  [{}]", row.join(" "));
    }

    let mut timer = Timer::new();
    timer.start();
    let pricer = BasketPricer::new(&factor, steps).with_seed(42);
    let price = pricer
        .calculate_basket_call_price(paths, strike, t, r, &basket)
        .expect("Valid pricing inputs");
    println!(
        "\nBasket call (K={}, T={}, {} paths): {:.4}  [{:.1} ms]",
        strike,
        t,
        paths,
        price,
        timer.elapsed_ms()
    );

    let put_cfg = BasketMcConfig {
        paths,
        steps,
        t,
        r,
        seed: 42,
        payoff: BasketPayoff::Put { k: strike },
        ..Default::default()
    };
    let put = price_basket(&put_cfg, &basket, &factor).expect("Valid pricing inputs");
    let parity = bs_analytic::basket_forward(&basket, t) * (-r * t).exp() - strike * (-r * t).exp();
    println!(
        "Basket put: {:.4} ± {:.4}   call − put = {:.4} (forward parity {:.4})",
        put.price,
        put.std_error,
        price - put.price,
        parity
    );

    let single = [basket[0]];
    let single_put = price_basket(&put_cfg, &single, &CholeskyFactor::identity(1))
        .expect("Valid pricing inputs");
    println!(
        "Asset 0 alone as a put: {:.4} ± {:.4} (Black-Scholes {:.4})",
        single_put.price,
        single_put.std_error,
        bs_analytic::bs_put_price(single[0].spot, strike, r, single[0].volatility, t)
    );

    println!("\nForward check ({} paths, single stream):", paths);
    let simulator = MultiAssetGbm::new(steps, t, &factor);
    let assets = simulator.precompute(&basket);
    let mut state = PathState::new(basket.len());
    let mut rng = RngFactory::new(42).create_std_rng(0);
    let mut sums = vec![0.0; basket.len()];
    for _ in 0..paths {
        let terminal = simulator.generate_path(&assets, &mut rng, &mut state);
        for (s, p) in sums.iter_mut().zip(terminal) {
            *s += p;
        }
    }
    for (i, (asset, sum)) in basket.iter().zip(&sums).enumerate() {
        let average = sum / paths as f64;
        println!(
            "  asset {}: expected {:.4}  simulated {:.4}  error {:.4}",
            i,
            asset.forward(t),
            average,
            (average - asset.forward(t)).abs()
        );
    }
}
