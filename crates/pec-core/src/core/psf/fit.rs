use super::kernel;
use super::params::PsfParameters;
use super::sample::RadialDoseSample;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use tracing::debug;

/// Minimum number of valid samples a fit requires.
pub const MIN_VALID_SAMPLES: usize = 10;

const MAX_ITERATIONS: usize = 200;

// Parameter order everywhere: [alpha, beta, sigma_f, sigma_b].
const INITIAL_GUESS: [f64; 4] = [1.0, 3.0, 30.0, 5000.0];
const LOWER_BOUNDS: [f64; 4] = [0.1, 0.1, 5.0, 100.0];
const UPPER_BOUNDS: [f64; 4] = [10.0, 20.0, 200.0, 50_000.0];

const LAMBDA_INITIAL: f64 = 1e-3;
const LAMBDA_SHRINK: f64 = 0.25;
const LAMBDA_GROWTH: f64 = 4.0;
const LAMBDA_FLOOR: f64 = 1e-12;
const LAMBDA_CEILING: f64 = 1e12;
const COST_TOLERANCE: f64 = 1e-12;
const GRADIENT_TOLERANCE: f64 = 1e-14;
const STEP_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("insufficient radial dose data: {found} valid samples, at least {required} required")]
    InsufficientData { found: usize, required: usize },
    #[error("PSF fit did not converge within {iterations} iterations")]
    Divergence { iterations: usize },
}

/// Fits the two-Gaussian PSF to radial dose samples.
///
/// Non-finite and non-positive samples are dropped first; the survivors are
/// normalized to unit peak value so the least-squares residuals are O(1)
/// regardless of the simulator's energy units. The amplitude guesses and box
/// constraints are expressed in original units and transformed into the
/// normalized space alongside the data, so the returned `alpha`/`beta` are in
/// the same units the samples came in.
///
/// The optimizer is a damped Gauss-Newton (Levenberg-Marquardt) iteration with
/// an analytic Jacobian, parameters projected onto the box after every step,
/// and an internal iteration budget: it never relies on wall-clock
/// cancellation.
pub fn fit(samples: &[RadialDoseSample]) -> Result<PsfParameters, FitError> {
    let valid: Vec<&RadialDoseSample> = samples.iter().filter(|s| s.is_valid()).collect();
    if valid.len() < MIN_VALID_SAMPLES {
        return Err(FitError::InsufficientData {
            found: valid.len(),
            required: MIN_VALID_SAMPLES,
        });
    }

    let scale = valid
        .iter()
        .map(|s| s.energy_density)
        .fold(f64::MIN, f64::max);
    let radii = DVector::from_iterator(valid.len(), valid.iter().map(|s| s.radius_nm));
    let targets = DVector::from_iterator(
        valid.len(),
        valid.iter().map(|s| s.energy_density / scale),
    );

    let lower = bounds_in_normalized_space(&LOWER_BOUNDS, scale);
    let upper = bounds_in_normalized_space(&UPPER_BOUNDS, scale);
    let guess = bounds_in_normalized_space(&INITIAL_GUESS, scale);
    let mut params = project_onto_box(&guess, &lower, &upper);

    let mut residuals = residual_vector(&radii, &targets, &params);
    let mut cost = residuals.norm_squared();
    let mut lambda = LAMBDA_INITIAL;

    for iteration in 1..=MAX_ITERATIONS {
        let jacobian = jacobian_matrix(&radii, &params);
        let hessian_approx = jacobian.transpose() * &jacobian;
        let gradient = jacobian.transpose() * &residuals;

        if gradient.amax() < GRADIENT_TOLERANCE {
            debug!(iteration, cost, "PSF fit converged on vanishing gradient");
            return Ok(finish(&params, scale, cost, &targets));
        }

        // Inner damping loop: grow lambda until a step reduces the cost.
        loop {
            let mut damped = hessian_approx.clone();
            for k in 0..4 {
                damped[(k, k)] += lambda * hessian_approx[(k, k)].max(LAMBDA_FLOOR);
            }

            let step = match damped.lu().solve(&(-&gradient)) {
                Some(step) => step,
                None => {
                    lambda *= LAMBDA_GROWTH;
                    if lambda > LAMBDA_CEILING {
                        return Err(FitError::Divergence { iterations: iteration });
                    }
                    continue;
                }
            };

            let candidate = project_onto_box(&(&params + &step), &lower, &upper);
            let displacement = (&candidate - &params).amax();
            if displacement < STEP_TOLERANCE * (1.0 + params.amax()) {
                debug!(iteration, cost, "PSF fit converged at the constraint boundary");
                return Ok(finish(&params, scale, cost, &targets));
            }

            let candidate_residuals = residual_vector(&radii, &targets, &candidate);
            let candidate_cost = candidate_residuals.norm_squared();

            if candidate_cost < cost {
                let improvement = cost - candidate_cost;
                params = candidate;
                residuals = candidate_residuals;
                cost = candidate_cost;
                lambda = (lambda * LAMBDA_SHRINK).max(LAMBDA_FLOOR);
                if improvement <= COST_TOLERANCE * cost.max(1e-30) {
                    debug!(iteration, cost, "PSF fit converged on cost plateau");
                    return Ok(finish(&params, scale, cost, &targets));
                }
                break;
            }

            lambda *= LAMBDA_GROWTH;
            if lambda > LAMBDA_CEILING {
                return Err(FitError::Divergence { iterations: iteration });
            }
        }
    }

    Err(FitError::Divergence {
        iterations: MAX_ITERATIONS,
    })
}

fn bounds_in_normalized_space(values: &[f64; 4], scale: f64) -> DVector<f64> {
    DVector::from_vec(vec![
        values[0] / scale,
        values[1] / scale,
        values[2],
        values[3],
    ])
}

fn project_onto_box(params: &DVector<f64>, lower: &DVector<f64>, upper: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(
        4,
        params
            .iter()
            .zip(lower.iter().zip(upper.iter()))
            .map(|(&p, (&lo, &hi))| p.clamp(lo, hi)),
    )
}

fn residual_vector(radii: &DVector<f64>, targets: &DVector<f64>, params: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(
        radii.len(),
        radii.iter().zip(targets.iter()).map(|(&r, &t)| {
            kernel::two_gaussian(r, params[0], params[1], params[2], params[3]) - t
        }),
    )
}

fn jacobian_matrix(radii: &DVector<f64>, params: &DVector<f64>) -> DMatrix<f64> {
    let mut jacobian = DMatrix::zeros(radii.len(), 4);
    for (row, &r) in radii.iter().enumerate() {
        jacobian[(row, 0)] = kernel::d_amplitude(r, params[2]);
        jacobian[(row, 1)] = kernel::d_amplitude(r, params[3]);
        jacobian[(row, 2)] = kernel::d_sigma(r, params[0], params[2]);
        jacobian[(row, 3)] = kernel::d_sigma(r, params[1], params[3]);
    }
    jacobian
}

fn finish(params: &DVector<f64>, scale: f64, cost: f64, targets: &DVector<f64>) -> PsfParameters {
    let mut alpha = params[0] * scale;
    let mut beta = params[1] * scale;
    let mut sigma_f_nm = params[2];
    let mut sigma_b_nm = params[3];

    // The sigma boxes overlap in the 100..=200 nm band; keep the short-range
    // term as the forward one.
    if sigma_f_nm >= sigma_b_nm {
        std::mem::swap(&mut alpha, &mut beta);
        std::mem::swap(&mut sigma_f_nm, &mut sigma_b_nm);
    }

    let mean = targets.mean();
    let ss_tot: f64 = targets.iter().map(|&t| (t - mean) * (t - mean)).sum();
    let goodness = if ss_tot > 0.0 {
        (1.0 - cost / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    PsfParameters {
        alpha,
        beta,
        sigma_f_nm,
        sigma_b_nm,
        goodness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_samples(alpha: f64, beta: f64, sigma_f: f64, sigma_b: f64) -> Vec<RadialDoseSample> {
        let mut samples = Vec::new();
        for i in 0..=20 {
            let r = i as f64 * 3.0;
            samples.push(RadialDoseSample::new(
                r,
                kernel::two_gaussian(r, alpha, beta, sigma_f, sigma_b),
            ));
        }
        for i in 1..=150 {
            let r = i as f64 * 100.0;
            samples.push(RadialDoseSample::new(
                r,
                kernel::two_gaussian(r, alpha, beta, sigma_f, sigma_b),
            ));
        }
        samples
    }

    fn relative_error(fitted: f64, truth: f64) -> f64 {
        (fitted - truth).abs() / truth
    }

    #[test]
    fn noiseless_samples_round_trip_within_one_percent() {
        let samples = synthetic_samples(1.0, 3.0, 30.0, 3000.0);
        let params = fit(&samples).unwrap();

        assert!(relative_error(params.alpha, 1.0) < 0.01, "alpha = {}", params.alpha);
        assert!(relative_error(params.beta, 3.0) < 0.01, "beta = {}", params.beta);
        assert!(
            relative_error(params.sigma_f_nm, 30.0) < 0.01,
            "sigma_f = {}",
            params.sigma_f_nm
        );
        assert!(
            relative_error(params.sigma_b_nm, 3000.0) < 0.01,
            "sigma_b = {}",
            params.sigma_b_nm
        );
        assert!(params.goodness > 0.999, "goodness = {}", params.goodness);
    }

    #[test]
    fn fitted_ranges_keep_the_forward_term_short() {
        let samples = synthetic_samples(1.5, 4.0, 40.0, 5000.0);
        let params = fit(&samples).unwrap();
        assert!(params.sigma_f_nm < params.sigma_b_nm);
        assert_eq!(params.degeneracy(), None);
    }

    #[test]
    fn too_few_valid_samples_is_insufficient_data() {
        let samples: Vec<_> = (0..5)
            .map(|i| RadialDoseSample::new(i as f64 * 10.0, 1e-4))
            .collect();
        assert_eq!(
            fit(&samples),
            Err(FitError::InsufficientData {
                found: 5,
                required: MIN_VALID_SAMPLES
            })
        );
    }

    #[test]
    fn invalid_samples_are_filtered_before_the_count_check() {
        let mut samples = synthetic_samples(1.0, 3.0, 30.0, 3000.0);
        samples.truncate(12);
        samples.push(RadialDoseSample::new(f64::NAN, 1.0));
        samples.push(RadialDoseSample::new(10.0, -2.0));
        samples.push(RadialDoseSample::new(10.0, 0.0));

        // 12 valid survivors: still enough to fit.
        assert!(fit(&samples).is_ok());
    }

    #[test]
    fn all_invalid_samples_report_zero_found() {
        let samples = vec![RadialDoseSample::new(0.0, 0.0); 20];
        assert_eq!(
            fit(&samples),
            Err(FitError::InsufficientData {
                found: 0,
                required: MIN_VALID_SAMPLES
            })
        );
    }
}
