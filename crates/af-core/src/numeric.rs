/// Floating point type used throughout the report model
pub type Real = f64;

/// Milligrams in one kilogram.
pub const MG_PER_KG: Real = 1_000_000.0;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// The single mg/day -> kg/day conversion used by every production metric.
#[inline]
pub fn mg_per_day_to_kg_per_day(mg_per_day: Real) -> Real {
    mg_per_day / MG_PER_KG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn mg_to_kg_scales_by_one_million() {
        assert_eq!(mg_per_day_to_kg_per_day(250_000.0), 0.25);
        assert_eq!(mg_per_day_to_kg_per_day(0.0), 0.0);
    }
}
