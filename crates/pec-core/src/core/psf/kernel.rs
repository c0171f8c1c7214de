use std::f64::consts::PI;

#[inline]
pub fn gaussian_term(r: f64, amplitude: f64, sigma: f64) -> f64 {
    let sigma_sq = sigma * sigma;
    amplitude / (2.0 * PI * sigma_sq) * (-r * r / (2.0 * sigma_sq)).exp()
}

#[inline]
pub fn two_gaussian(r: f64, alpha: f64, beta: f64, sigma_f: f64, sigma_b: f64) -> f64 {
    gaussian_term(r, alpha, sigma_f) + gaussian_term(r, beta, sigma_b)
}

#[inline]
pub fn d_amplitude(r: f64, sigma: f64) -> f64 {
    let sigma_sq = sigma * sigma;
    (-r * r / (2.0 * sigma_sq)).exp() / (2.0 * PI * sigma_sq)
}

#[inline]
pub fn d_sigma(r: f64, amplitude: f64, sigma: f64) -> f64 {
    let sigma_sq = sigma * sigma;
    let gauss = (-r * r / (2.0 * sigma_sq)).exp();
    amplitude * gauss / (2.0 * PI * sigma * sigma_sq) * (r * r / sigma_sq - 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn gaussian_term_peaks_at_zero_radius() {
        let peak = gaussian_term(0.0, 1.0, 30.0);
        assert!(f64_approx_equal(peak, 1.0 / (2.0 * PI * 900.0)));
    }

    #[test]
    fn two_gaussian_is_the_sum_of_its_terms() {
        let r = 42.0;
        let sum = gaussian_term(r, 1.0, 30.0) + gaussian_term(r, 3.0, 3000.0);
        assert!(f64_approx_equal(two_gaussian(r, 1.0, 3.0, 30.0, 3000.0), sum));
    }

    #[test]
    fn two_gaussian_is_non_negative_and_non_increasing() {
        let mut previous = f64::INFINITY;
        for i in 0..2000 {
            let r = i as f64 * 10.0;
            let density = two_gaussian(r, 1.0, 3.0, 30.0, 3000.0);
            assert!(density >= 0.0);
            assert!(density <= previous);
            previous = density;
        }
    }

    #[test]
    fn amplitude_derivative_matches_finite_differences() {
        let (r, a, s) = (25.0, 1.3, 30.0);
        let h = 1e-6;
        let expected = (gaussian_term(r, a + h, s) - gaussian_term(r, a - h, s)) / (2.0 * h);
        assert!((d_amplitude(r, s) - expected).abs() < 1e-9);
    }

    #[test]
    fn sigma_derivative_matches_finite_differences() {
        let (r, a, s) = (25.0, 1.3, 30.0);
        let h = 1e-4;
        let expected = (gaussian_term(r, a, s + h) - gaussian_term(r, a, s - h)) / (2.0 * h);
        assert!((d_sigma(r, a, s) - expected).abs() < 1e-9);
    }
}
