// src/mc/mc_engine.rs
use crate::error::{validation::*, PricingError, PricingResult};
use crate::linalg::CholeskyFactor;
use crate::mc::payoffs::BasketPayoff;
use crate::models::{Asset, MultiAssetGbm, PathState};
use crate::rng::RngFactory;
use rayon::prelude::*;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct BasketMcConfig {
    pub paths: usize,
    pub steps: usize,
    pub t: f64,
    pub r: f64,
    pub seed: u64,
    /// Parallel contexts the paths are split across, each with its own stream
    pub contexts: usize,
    pub payoff: BasketPayoff,
}

impl BasketMcConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> PricingResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        validate_positive("t", self.t)?;
        validate_finite("t", self.t)?;
        validate_finite("r", self.r)?;
        validate_finite("strike", self.payoff.strike())?;

        if self.contexts == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "contexts".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Contexts actually used: never more than there are paths
    pub fn effective_contexts(&self) -> usize {
        self.contexts.min(self.paths).max(1)
    }
}

impl Default for BasketMcConfig {
    fn default() -> Self {
        BasketMcConfig {
            paths: 100_000,
            steps: 252,
            t: 1.0,
            r: 0.05,
            seed: 12345,
            contexts: num_cpus::get(),
            payoff: BasketPayoff::Call { k: 100.0 },
        }
    }
}

/// Discounted Monte Carlo estimate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McEstimate {
    pub price: f64,
    /// Standard error of `price`
    pub std_error: f64,
    pub paths: usize,
}

impl McEstimate {
    /// `price ± z·std_error`
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        (self.price - z * self.std_error, self.price + z * self.std_error)
    }
}

fn validate_basket(basket: &[Asset], factor: &CholeskyFactor) -> PricingResult<()> {
    if basket.is_empty() {
        return Err(PricingError::InvalidConfiguration {
            field: "basket".to_string(),
            reason: "must contain at least one asset".to_string(),
        });
    }
    if factor.dimension() != basket.len() {
        return Err(PricingError::InvalidConfiguration {
            field: "correlation_factor".to_string(),
            reason: format!(
                "dimension {} does not match basket size {}",
                factor.dimension(),
                basket.len()
            ),
        });
    }
    basket.iter().try_for_each(Asset::validate)
}

/// Paths handled by `context` when `paths` are split over `contexts`
#[inline]
fn paths_for_context(paths: usize, contexts: usize, context: usize) -> usize {
    paths / contexts + usize::from(context < paths % contexts)
}

/// Monte Carlo pricing of a basket option under correlated GBM
///
/// # Algorithm
///
/// 1. Precompute `(r − σ²/2)Δt` and `σ√Δt` per asset once
/// 2. Split the paths over `contexts` parallel contexts; context `c` owns a
///    [`PathState`] and a stream seeded from `(seed, c)`
/// 3. Per path: simulate, average terminal prices, evaluate the payoff,
///    accumulate `Σ payoff` and `Σ payoff²`
/// 4. Reduce the per-context sums and discount:
/// ```text
/// V₀ = e^(−rT) · (1/M) Σ payoff
/// ```
///
/// Results are reproducible for a fixed `(seed, contexts, paths)`. NaN or
/// infinite path values flow into the estimate unchanged.
///
/// # Errors
///
/// Returns `PricingError` for an invalid configuration, an invalid asset, or
/// a factor whose dimension differs from the basket size.
pub fn price_basket(
    cfg: &BasketMcConfig,
    basket: &[Asset],
    factor: &CholeskyFactor,
) -> PricingResult<McEstimate> {
    cfg.validate()?;
    validate_basket(basket, factor)?;

    let n = cfg.paths;
    let contexts = cfg.effective_contexts();
    let discount = (-cfg.r * cfg.t).exp();
    let simulator = MultiAssetGbm::new(cfg.steps, cfg.t, factor);
    let assets = simulator.precompute(basket);
    let factory = RngFactory::new(cfg.seed);

    debug!(
        paths = n,
        steps = cfg.steps,
        assets = basket.len(),
        contexts,
        "pricing basket"
    );

    let (sum_payoff, sum_payoff_sq) = (0..contexts)
        .into_par_iter()
        .map(|context| {
            let mut rng = factory.create_std_rng(context as u64);
            let mut state = PathState::new(assets.len());
            let mut sum = 0.0;
            let mut sum_sq = 0.0;

            for _ in 0..paths_for_context(n, contexts, context) {
                let terminal = simulator.generate_path(&assets, &mut rng, &mut state);
                let payoff = cfg.payoff.calculate(terminal);
                sum += payoff;
                sum_sq += payoff * payoff;
            }

            (sum, sum_sq)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    let mean_payoff = sum_payoff / n as f64;
    let price = discount * mean_payoff;

    let std_error = if n > 1 {
        let mean_sq = sum_payoff_sq / n as f64;
        // rounding can push a zero variance slightly negative
        let variance =
            ((mean_sq - mean_payoff * mean_payoff) * n as f64 / (n as f64 - 1.0)).max(0.0);
        discount * (variance / n as f64).sqrt()
    } else {
        0.0
    };

    debug!(price, std_error, "basket pricing complete");

    Ok(McEstimate {
        price,
        std_error,
        paths: n,
    })
}

/// Basket call pricer over a fixed correlation factor
pub struct BasketPricer<'a> {
    factor: &'a CholeskyFactor,
    steps: usize,
    seed: u64,
    contexts: usize,
}

impl<'a> BasketPricer<'a> {
    pub fn new(factor: &'a CholeskyFactor, steps: usize) -> Self {
        let defaults = BasketMcConfig::default();
        BasketPricer {
            factor,
            steps,
            seed: defaults.seed,
            contexts: defaults.contexts,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_contexts(mut self, contexts: usize) -> Self {
        self.contexts = contexts;
        self
    }

    /// `e^(−rT) · mean(max(basket average − strike, 0))` over `num_paths` paths
    pub fn calculate_basket_call_price(
        &self,
        num_paths: usize,
        strike: f64,
        t: f64,
        r: f64,
        basket: &[Asset],
    ) -> PricingResult<f64> {
        let cfg = BasketMcConfig {
            paths: num_paths,
            steps: self.steps,
            t,
            r,
            seed: self.seed,
            contexts: self.contexts,
            payoff: BasketPayoff::Call { k: strike },
        };
        price_basket(&cfg, basket, self.factor).map(|estimate| estimate.price)
    }
}
