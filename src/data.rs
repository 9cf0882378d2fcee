// src/data.rs
//! Market data ingestion
//!
//! Sources are comma/newline-delimited files of numbers: one for spots, one
//! for volatilities, one for the row-major flattened correlation matrix.
//! Tokens that do not parse as `f64` (blank fields, trailing commas, labels)
//! are skipped without error.

use crate::error::{PricingError, PricingResult};
use crate::models::Asset;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Parsed inputs of one pricing run
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    pub basket: Vec<Asset>,
    /// Flat row-major `N x N` correlation matrix as read
    pub correlation: Vec<f64>,
}

impl MarketData {
    pub fn num_assets(&self) -> usize {
        self.basket.len()
    }
}

/// Every numeric token of `reader`, in reading order.
///
/// `source_name` only labels errors.
pub fn parse_numeric_reader<R: Read>(reader: R, source_name: &str) -> PricingResult<Vec<f64>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut values = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.byte_records() {
        let record = record.map_err(|e| PricingError::MalformedInput {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

        for field in record.iter() {
            match std::str::from_utf8(field)
                .ok()
                .and_then(|token| token.trim().parse::<f64>().ok())
            {
                Some(value) => values.push(value),
                None => skipped += 1,
            }
        }
    }

    debug!(source = source_name, parsed = values.len(), skipped, "parsed numeric csv");
    Ok(values)
}

/// Every numeric token of the file at `path`.
///
/// # Errors
///
/// [`PricingError::MalformedInput`] when the file cannot be opened or read.
pub fn parse_numeric_csv<P: AsRef<Path>>(path: P) -> PricingResult<Vec<f64>> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| PricingError::MalformedInput {
        source_name: source_name.clone(),
        reason: e.to_string(),
    })?;
    parse_numeric_reader(file, &source_name)
}

/// Zip spots and volatilities into assets sharing the rate `r`, in input order
pub fn assemble_basket(spots: &[f64], volatilities: &[f64], r: f64) -> Vec<Asset> {
    if spots.len() != volatilities.len() {
        warn!(
            spots = spots.len(),
            volatilities = volatilities.len(),
            "spot and volatility counts differ, extra entries ignored"
        );
    }
    spots
        .iter()
        .zip(volatilities)
        .map(|(&spot, &volatility)| Asset::new(spot, volatility, r))
        .collect()
}

/// Read the three sources and assemble the basket.
///
/// The correlation length is not checked here; the decomposition rejects a
/// matrix that is not `N x N`.
pub fn load_market_data<P: AsRef<Path>>(
    spots_path: P,
    volatilities_path: P,
    correlation_path: P,
    r: f64,
) -> PricingResult<MarketData> {
    let spots = parse_numeric_csv(spots_path)?;
    let volatilities = parse_numeric_csv(volatilities_path)?;
    let correlation = parse_numeric_csv(correlation_path)?;

    Ok(MarketData {
        basket: assemble_basket(&spots, &volatilities, r),
        correlation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_and_skips_junk() {
        let input = "1.0, -0.7,\n-0.7,1.0,,\nlabel,2.5e-1\n";
        let values = parse_numeric_reader(input.as_bytes(), "inline").unwrap();
        assert_eq!(values, vec![1.0, -0.7, -0.7, 1.0, 0.25]);
    }

    #[test]
    fn test_single_column_file() {
        let values = parse_numeric_reader("100\n100\n\n95.5\n".as_bytes(), "spots").unwrap();
        assert_eq!(values, vec![100.0, 100.0, 95.5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_numeric_reader("".as_bytes(), "empty").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_malformed_input() {
        let err = parse_numeric_csv("/definitely/not/here/spots.csv").unwrap_err();
        match err {
            PricingError::MalformedInput { source_name, .. } => {
                assert!(source_name.ends_with("spots.csv"));
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_assemble_basket_in_order() {
        let basket = assemble_basket(&[100.0, 50.0], &[0.2, 0.25], 0.05);
        assert_eq!(
            basket,
            vec![Asset::new(100.0, 0.2, 0.05), Asset::new(50.0, 0.25, 0.05)]
        );
    }

    #[test]
    fn test_assemble_basket_truncates_to_shorter() {
        let basket = assemble_basket(&[100.0, 50.0, 75.0], &[0.2, 0.25], 0.05);
        assert_eq!(basket.len(), 2);
    }
}
