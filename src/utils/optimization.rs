//! Bounded scalar minimisation.

/// Golden-section search settings.
#[derive(Debug, Clone, Copy)]
pub struct GoldenSectionConfig {
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for GoldenSectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iter: 200,
        }
    }
}

/// Minimise a unimodal `f` on `[lower, upper]` by golden-section search.
///
/// Returns the best point evaluated, including the bounds themselves.
pub fn golden_section<F>(f: F, lower: f64, upper: f64, config: GoldenSectionConfig) -> f64
where
    F: Fn(f64) -> f64,
{
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let (mut a, mut b) = (lower.min(upper), lower.max(upper));
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));

    for _ in 0..config.max_iter {
        if (b - a).abs() <= config.tolerance {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }

    let interior = if fc < fd { (c, fc) } else { (d, fd) };
    [(lower, f(lower)), (upper, f(upper)), interior]
        .into_iter()
        .filter(|(_, v)| !v.is_nan())
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map_or(interior.0, |(x, _)| x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finds_interior_minimum() {
        let x = golden_section(|x| (x - 0.3).powi(2), 0.0, 1.0, GoldenSectionConfig::default());
        assert_relative_eq!(x, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn monotone_function_hits_bound() {
        let x = golden_section(|x| -x, 0.0001, 0.9999, GoldenSectionConfig::default());
        assert_relative_eq!(x, 0.9999);
    }

    #[test]
    fn bounds_may_be_given_in_either_order() {
        let x = golden_section(|x| (x + 2.0).abs(), 0.0, -5.0, GoldenSectionConfig::default());
        assert_relative_eq!(x, -2.0, epsilon = 1e-6);
    }
}
