// demos/repair_demo.rs
//! Correlation repair walkthrough: an invalid matrix is rejected by Cholesky,
//! projected to its nearest correlation matrix, and then decomposed.

use basket_mc::linalg::{
    cholesky, correlation_factor, jacobi_eigen_decomposition, nearest_correlation_matrix,
    FactorFlags,
};
use basket_mc::PricingError;

fn print_matrix(label: &str, matrix: &[f64], n: usize) {
    println!("{}:", label);
    for row in matrix.chunks(n) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>10.6}", v)).collect();
        println!("  [{}]", cells.join(" "));
    }
}

fn main() {
    let n = 3;
    let matrix = [1.0, 0.9, 0.7, 0.9, 1.0, 0.3, 0.7, 0.3, 1.0];
    print_matrix("Input", &matrix, n);

    let eigen = jacobi_eigen_decomposition(&matrix, n);
    println!(
        "Eigenvalues: {:?} ({} rotations)",
        eigen.values, eigen.rotations
    );

    match cholesky(&matrix, n) {
        Ok(_) => println!("Cholesky succeeded on the raw input"),
        Err(PricingError::NotPositiveDefinite { row, radicand }) => {
            println!("Cholesky failed at row {} (radicand {:.6})", row, radicand)
        }
        Err(e) => println!("Cholesky failed: {}", e),
    }

    let repaired = nearest_correlation_matrix(&matrix, n);
    println!(
        "\nNearest correlation: {} iterations, converged = {}, last change = {:.2e}",
        repaired.iterations, repaired.converged, repaired.max_change
    );
    print_matrix("Repaired", &repaired.matrix, n);

    let factor = correlation_factor(&matrix, n).expect("Repair should make the matrix decomposable");
    print_matrix("\nCholesky factor", factor.as_slice(), n);
    println!(
        "Flags: {:?} (repaired = {}, converged = {})",
        factor.flags(),
        factor.was_repaired(),
        factor.flags().contains(FactorFlags::REPAIR_CONVERGED)
    );

    // a 2x2 "correlation" of 5 is far outside [-1, 1]
    let wild = [2.0, 5.0, 5.0, 2.0];
    match correlation_factor(&wild, 2) {
        Ok(f) => print_matrix("\nFactor of [[2,5],[5,2]] after repair", f.as_slice(), 2),
        Err(e) => println!("\n[[2,5],[5,2]] unrecoverable: {}", e),
    }

    match correlation_factor(&[1.0, 0.5, 0.5], 2) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Wrong-length input: {}", e),
    }
}
