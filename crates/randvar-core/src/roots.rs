//! Root finding and 1-D minimization
//!
//! These are the solvers behind the generic quantile and mode defaults: a
//! bracketed search that mixes secant interpolation with a bisection guard,
//! an unbracketed Newton iteration over a value+derivative callback, and a
//! derivative-free minimizer with outward bracket expansion.
//!
//! All entry points are free functions over closures; every piece of state
//! is local to the call. Failure is reported as `None`, never a partially
//! converged value presented as success.

/// Absolute width at which a bracket is considered resolved
const POSITION_TOLERANCE: f64 = 1e-11;

/// Iteration cap for the bracketed search
const MAX_BRACKET_ITERATIONS: usize = 1_000;

/// Iteration cap for the Newton iteration
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Iteration cap for bracket expansion and golden-section refinement
const MAX_MIN_ITERATIONS: usize = 200;

/// Derivatives below this magnitude are treated as vanishing
const DERIVATIVE_FLOOR: f64 = 1e-150;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Find a root of `f` inside the bracket `[a, b]`.
///
/// Requires `f(a)` and `f(b)` to have opposite signs (or one of them to be
/// exactly zero). Each iteration proposes a secant step; whenever the
/// proposal would leave the open bracket, or the bracket failed to shrink
/// enough on the previous pass, the step falls back to bisection. The
/// bisection guard bounds the iteration count even for pathological
/// derivatives.
///
/// Returns `None` for an invalid bracket, a NaN function value, or an
/// exhausted iteration budget.
pub fn find_root_bracketed<F>(f: F, a: f64, b: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() || a >= b {
        return None;
    }
    let (mut lo, mut hi) = (a, b);
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo.is_nan() || f_hi.is_nan() || f_lo.signum() == f_hi.signum() {
        return None;
    }

    let mut force_bisection = false;
    for _ in 0..MAX_BRACKET_ITERATIONS {
        let width = hi - lo;
        if width < POSITION_TOLERANCE {
            return Some(0.5 * (lo + hi));
        }

        let mut x = if force_bisection {
            0.5 * (lo + hi)
        } else {
            lo - f_lo * width / (f_hi - f_lo)
        };
        if !x.is_finite() || x <= lo || x >= hi {
            x = 0.5 * (lo + hi);
        }

        let fx = f(x);
        if fx == 0.0 {
            return Some(x);
        }
        if fx.is_nan() {
            log::debug!("bracketed root search hit NaN at x = {x}");
            return None;
        }

        if fx.signum() == f_lo.signum() {
            lo = x;
            f_lo = fx;
        } else {
            hi = x;
            f_hi = fx;
        }
        // A secant pass that keeps more than 3/4 of the bracket is stalling
        // on one endpoint; resolve it with a bisection next time.
        force_bisection = (hi - lo) > 0.75 * width;
    }
    log::debug!("bracketed root search exhausted its budget on [{a}, {b}]");
    None
}

/// Find a root of `f` by Newton iteration from `guess`.
///
/// The callback returns the pair `(f(x), f'(x))`. The iteration fails
/// rather than loop indefinitely on any divergence signal: a non-finite
/// function value (the iterate escaped the domain), a derivative at the
/// floor, a non-finite step, or an exhausted iteration cap.
pub fn find_root_newton<F>(f: F, guess: f64) -> Option<f64>
where
    F: Fn(f64) -> (f64, f64),
{
    if !guess.is_finite() {
        return None;
    }
    let mut x = guess;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let (fx, dfx) = f(x);
        if fx == 0.0 {
            return Some(x);
        }
        if !fx.is_finite() {
            log::debug!("Newton iteration left the domain at x = {x}");
            return None;
        }
        if !dfx.is_finite() || dfx.abs() < DERIVATIVE_FLOOR {
            log::debug!("Newton iteration hit a flat derivative at x = {x}");
            return None;
        }
        let next = x - fx / dfx;
        if !next.is_finite() {
            return None;
        }
        if (next - x).abs() < POSITION_TOLERANCE * (1.0 + x.abs()) {
            return Some(next);
        }
        x = next;
    }
    log::debug!("Newton iteration exhausted its budget from guess {guess}");
    None
}

/// Minimize `f` locally, starting from `guess`.
///
/// Expands a bracket outward from the guess until the middle point of the
/// triple is the lowest, then refines by golden-section search. Returns
/// `(argmin, f(argmin))` for the best point seen; on budget exhaustion
/// this is still never worse than the starting point. `None` only when
/// `f(guess)` is not finite.
pub fn find_min<F>(f: F, guess: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !guess.is_finite() {
        return None;
    }
    let f_guess = f(guess);
    if !f_guess.is_finite() {
        return None;
    }

    let h = 0.1 * guess.abs() + 0.1;
    let (mut a, mut b, mut c) = (guess - h, guess, guess + h);
    let (mut fa, mut fb, mut fc) = (f(a), f_guess, f(c));

    // Slide the triple downhill until the middle is a local bracket.
    let mut budget = MAX_MIN_ITERATIONS;
    while fb > fa.min(fc) && budget > 0 {
        budget -= 1;
        if fa < fc {
            let step = GOLDEN_RATIO * (b - a);
            c = b;
            fc = fb;
            b = a;
            fb = fa;
            a -= step;
            fa = f(a);
        } else {
            let step = GOLDEN_RATIO * (c - b);
            a = b;
            fa = fb;
            b = c;
            fb = fc;
            c += step;
            fc = f(c);
        }
        if !fa.is_finite() || !fc.is_finite() {
            break;
        }
    }

    let mut best = (b, fb);
    if fa < best.1 {
        best = (a, fa);
    }
    if fc < best.1 {
        best = (c, fc);
    }
    if budget == 0 || !fa.is_finite() || !fc.is_finite() {
        return Some(best);
    }

    // Golden-section refinement inside [a, c].
    const INV_GOLDEN: f64 = 0.618_033_988_749_895;
    let mut x1 = c - INV_GOLDEN * (c - a);
    let mut x2 = a + INV_GOLDEN * (c - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    for _ in 0..MAX_MIN_ITERATIONS {
        if (c - a).abs() < POSITION_TOLERANCE * (1.0 + a.abs() + c.abs()) {
            break;
        }
        if f1 < f2 {
            c = x2;
            x2 = x1;
            f2 = f1;
            x1 = c - INV_GOLDEN * (c - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + INV_GOLDEN * (c - a);
            f2 = f(x2);
        }
    }

    if f1 < best.1 {
        best = (x1, f1);
    }
    if f2 < best.1 {
        best = (x2, f2);
    }
    Some(best)
}
