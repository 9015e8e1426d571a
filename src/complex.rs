//! Complex numbers.


/// Complex number with `f64` parts. Encoded as
/// `{"__tag__": "complex", "real": .., "imag": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }
}

impl From<(f64, f64)> for Complex {
    fn from((re, im): (f64, f64)) -> Self {
        Complex { re, im }
    }
}
