//! Bounded Nelder-Mead minimisation used to estimate smoothing and ARIMA
//! coefficients.

use std::cmp::Ordering;

/// Outcome of a minimisation run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
}

/// Nelder-Mead settings.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Iteration budget.
    pub max_iter: usize,
    /// Convergence tolerance. Applied to the spread of objective values
    /// relative to the best value, and to the simplex size relative to the
    /// centroid norm (both absolute below 1).
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Initial simplex step, relative to each non-zero coordinate.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Minimise `objective` starting from `initial`.
///
/// Every candidate is clamped into `bounds` (one `(min, max)` pair per
/// coordinate) before it is evaluated. Non-finite objective values rank last.
///
/// # Example
/// ```
/// use demand_planner::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let start = clamp(initial, bounds);
    let mut simplex: Vec<Vec<f64>> = vec![start.clone()];
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        let mut vertex = clamp(&vertex, bounds);
        // A vertex clamped back onto the start would collapse the simplex.
        if vertex == start {
            vertex[i] -= config.initial_step;
            vertex = clamp(&vertex, bounds);
        }
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
        let (best, second_worst, worst) = (order[0], order[n - 1], order[n]);

        let scale = values[best].abs().max(1.0);
        let centroid = centroid_without(&simplex, worst);
        let spread = simplex
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max);
        let size = centroid.iter().map(|x| x * x).sum::<f64>().sqrt().max(1.0);
        if (values[worst] - values[best]).abs() <= config.tolerance * scale
            || spread <= config.tolerance * size
        {
            converged = true;
            break;
        }

        let reflected = clamp(&towards(&centroid, &simplex[worst], -config.alpha), bounds);
        let f_reflected = eval(&reflected);

        if f_reflected < values[best] {
            let expanded = clamp(&towards(&centroid, &reflected, config.gamma), bounds);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
            continue;
        }

        let (contracted, f_limit) = if f_reflected < values[worst] {
            (towards(&centroid, &reflected, config.rho), f_reflected)
        } else {
            (towards(&centroid, &simplex[worst], config.rho), values[worst])
        };
        let contracted = clamp(&contracted, bounds);
        let f_contracted = eval(&contracted);
        if f_contracted < f_limit {
            simplex[worst] = contracted;
            values[worst] = f_contracted;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in (0..=n).filter(|&i| i != best) {
            let shrunk = towards(&anchor, &simplex[i], config.sigma);
            simplex[i] = clamp(&shrunk, bounds);
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal))
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

/// Point `from + t * (to - from)`.
fn towards(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(f, x)| f + t * (x - f)).collect()
}

fn centroid_without(simplex: &[Vec<f64>], skip: usize) -> Vec<f64> {
    let dims = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut c = vec![0.0; dims];
    for vertex in simplex.iter().enumerate().filter(|(i, _)| *i != skip).map(|(_, v)| v) {
        for (acc, x) in c.iter_mut().zip(vertex) {
            *acc += x;
        }
    }
    c.iter_mut().for_each(|x| *x /= count);
    c
}

fn clamp(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| b.get(i).map_or(x, |&(lo, hi)| x.clamp(lo, hi)))
            .collect(),
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
