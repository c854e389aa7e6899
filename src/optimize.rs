//! Bounded numeric solvers used by the layout engine and the label placer.
//!
//! Both callers only depend on the [`Minimizer`] contract: hand over an
//! objective and a seed vector, get back an approximate minimizer after a
//! bounded amount of work. [`NelderMead`] is the default implementation.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub fx: f64,
    pub iterations: usize,
}

pub trait Minimizer {
    fn minimize<F>(&self, objective: F, initial: &[f64]) -> Minimum
    where
        F: FnMut(&[f64]) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    /// Stop once best and worst simplex values are this close...
    pub min_error_delta: f64,
    /// ...and the two best vertices are this close in every coordinate.
    pub min_tolerance: f64,
    pub non_zero_delta: f64,
    pub zero_delta: f64,
    pub rho: f64,
    pub chi: f64,
    pub psi: f64,
    pub sigma: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            min_error_delta: 1e-6,
            min_tolerance: 1e-5,
            non_zero_delta: 1.05,
            zero_delta: 0.001,
            rho: 1.0,
            chi: 2.0,
            psi: -0.5,
            sigma: 0.5,
        }
    }
}

/// Derivative-free downhill simplex search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NelderMead {
    pub options: NelderMeadOptions,
}

impl NelderMead {
    pub fn new(options: NelderMeadOptions) -> Self {
        Self { options }
    }

    /// Default coefficients and vertex tolerance with a custom budget.
    pub fn with_limits(max_iterations: usize, min_error_delta: f64) -> Self {
        Self::new(NelderMeadOptions {
            max_iterations,
            min_error_delta,
            ..NelderMeadOptions::default()
        })
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    x: Vec<f64>,
    fx: f64,
}

fn by_value(a: &Vertex, b: &Vertex) -> Ordering {
    a.fx.partial_cmp(&b.fx).unwrap_or(Ordering::Equal)
}

// out = w1 * v1 + w2 * v2
fn weighted_sum(w1: f64, v1: &[f64], w2: f64, v2: &[f64]) -> Vec<f64> {
    v1.iter().zip(v2).map(|(a, b)| w1 * a + w2 * b).collect()
}

impl Minimizer for NelderMead {
    fn minimize<F>(&self, mut objective: F, initial: &[f64]) -> Minimum
    where
        F: FnMut(&[f64]) -> f64,
    {
        let opts = &self.options;
        let n = initial.len();
        if n == 0 {
            return Minimum {
                x: Vec::new(),
                fx: objective(initial),
                iterations: 0,
            };
        }

        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push(Vertex {
            x: initial.to_vec(),
            fx: objective(initial),
        });
        for i in 0..n {
            let mut point = initial.to_vec();
            point[i] = if point[i] != 0.0 {
                point[i] * opts.non_zero_delta
            } else {
                opts.zero_delta
            };
            let fx = objective(&point);
            simplex.push(Vertex { x: point, fx });
        }

        let mut iterations = 0;
        while iterations < opts.max_iterations {
            iterations += 1;
            simplex.sort_by(by_value);

            let max_diff = (0..n)
                .map(|i| (simplex[0].x[i] - simplex[1].x[i]).abs())
                .fold(0.0, f64::max);
            if (simplex[0].fx - simplex[n].fx).abs() < opts.min_error_delta
                && max_diff < opts.min_tolerance
            {
                break;
            }

            // centroid of every vertex except the worst
            let mut centroid = vec![0.0; n];
            for vertex in &simplex[..n] {
                for (c, v) in centroid.iter_mut().zip(&vertex.x) {
                    *c += v;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            let worst = simplex[n].clone();
            let reflected_x = weighted_sum(1.0 + opts.rho, &centroid, -opts.rho, &worst.x);
            let reflected = Vertex {
                fx: objective(&reflected_x),
                x: reflected_x,
            };

            if reflected.fx < simplex[0].fx {
                let expanded_x = weighted_sum(1.0 + opts.chi, &centroid, -opts.chi, &worst.x);
                let expanded = Vertex {
                    fx: objective(&expanded_x),
                    x: expanded_x,
                };
                simplex[n] = if expanded.fx < reflected.fx {
                    expanded
                } else {
                    reflected
                };
            } else if reflected.fx >= simplex[n - 1].fx {
                let contracted_x = if reflected.fx > worst.fx {
                    // inside
                    weighted_sum(1.0 + opts.psi, &centroid, -opts.psi, &worst.x)
                } else {
                    // outside
                    weighted_sum(1.0 - opts.psi * opts.rho, &centroid, opts.psi * opts.rho, &worst.x)
                };
                let contracted = Vertex {
                    fx: objective(&contracted_x),
                    x: contracted_x,
                };
                let bound = if reflected.fx > worst.fx {
                    worst.fx
                } else {
                    reflected.fx
                };

                if contracted.fx < bound {
                    simplex[n] = contracted;
                } else {
                    if opts.sigma >= 1.0 {
                        break;
                    }
                    // shrink towards the best vertex
                    let best = simplex[0].x.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        vertex.x = weighted_sum(1.0 - opts.sigma, &best, opts.sigma, &vertex.x);
                        vertex.fx = objective(&vertex.x);
                    }
                }
            } else {
                simplex[n] = reflected;
            }
        }

        simplex.sort_by(by_value);
        let best = simplex.swap_remove(0);
        Minimum {
            x: best.x,
            fx: best.fx,
            iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for BisectOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

/// Root of `f` on `[a, b]` by bisection.
///
/// When the endpoints do not bracket a sign change the endpoint with the
/// smaller residual is returned.
pub fn bisect<F>(mut f: F, mut a: f64, b: f64, options: BisectOptions) -> f64
where
    F: FnMut(f64) -> f64,
{
    let fa = f(a);
    let fb = f(b);
    if fa == 0.0 {
        return a;
    }
    if fb == 0.0 {
        return b;
    }
    if fa * fb > 0.0 {
        log::debug!("bisect: [{a}, {b}] does not bracket a root");
        return if fa.abs() <= fb.abs() { a } else { b };
    }

    let mut delta = b - a;
    for _ in 0..options.max_iterations {
        delta /= 2.0;
        let mid = a + delta;
        let fmid = f(mid);
        if fmid * fa >= 0.0 {
            a = mid;
        }
        if delta.abs() < options.tolerance || fmid == 0.0 {
            return mid;
        }
    }
    a + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nelder_mead_finds_quadratic_minimum() {
        let solver = NelderMead::default();
        let result = solver.minimize(
            |x| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2) + 2.0,
            &[0.0, 0.0],
        );
        assert!((result.x[0] - 3.0).abs() < 1e-2, "{:?}", result.x);
        assert!((result.x[1] + 1.0).abs() < 1e-2, "{:?}", result.x);
        assert!((result.fx - 2.0).abs() < 1e-4);
    }

    #[test]
    fn nelder_mead_handles_rosenbrock() {
        let solver = NelderMead::with_limits(2000, 1e-12);
        let result = solver.minimize(
            |x| {
                let a = 1.0 - x[0];
                let b = x[1] - x[0] * x[0];
                a * a + 100.0 * b * b
            },
            &[-1.2, 1.0],
        );
        assert!(result.fx < 1e-4, "fx = {}", result.fx);
    }

    #[test]
    fn nelder_mead_respects_iteration_cap() {
        let solver = NelderMead::with_limits(3, 0.0);
        let result = solver.minimize(|x| x[0].abs(), &[10.0]);
        assert!(result.iterations <= 3);
    }

    #[test]
    fn bisect_finds_square_root() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, BisectOptions::default());
        assert!((root - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn bisect_without_bracket_returns_closer_endpoint() {
        let root = bisect(|x| x + 10.0, 0.0, 1.0, BisectOptions::default());
        assert_eq!(root, 0.0);
    }
}
