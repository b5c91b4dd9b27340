/// Vietnamese đồng. VND has no subunit, so every amount is a whole number.
pub type Vnd = u64;

/// Round a computed amount to the nearest whole đồng.
///
/// Negative and non-finite inputs collapse to zero; every monetary field in
/// the engine is non-negative.
pub fn round_vnd(amount: f64) -> Vnd {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    amount.round() as Vnd
}

/// Scale an amount by a factor and round the product, never the operands.
pub fn scale(amount: Vnd, factor: f64) -> Vnd {
    round_vnd(amount as f64 * factor)
}
