use super::input::InputGeometry;
use super::OverlayOp;
use crate::geometry::{factory, Envelope, Geometry};
use crate::precision::PrecisionModel;

/// Relative slack for the result-area consistency heuristic.
const AREA_HEURISTIC_TOLERANCE: f64 = 0.1;

/// Envelope expansion applied before clipping under floating precision.
const SAFE_ENV_BUFFER_FACTOR: f64 = 0.1;

/// Envelope expansion in grid cells under fixed precision.
const SAFE_ENV_GRID_FACTOR: f64 = 25.0;

/// Dimension of the overlay result: intersection takes the minimum input
/// dimension, union and symmetric difference the maximum, difference the
/// dimension of A.
#[must_use]
pub fn result_dimension(op: OverlayOp, dim0: i8, dim1: i8) -> i8 {
    match op {
        OverlayOp::Intersection => dim0.min(dim1),
        OverlayOp::Union | OverlayOp::SymDifference => dim0.max(dim1),
        OverlayOp::Difference => dim0,
    }
}

/// Creates the empty geometry matching the result dimension of the inputs.
#[must_use]
pub fn create_empty_result(op: OverlayOp, a: &Geometry, b: &Geometry) -> Geometry {
    factory::create_empty(result_dimension(op, a.dimension(), b.dimension()))
}

/// Fast path: detects operations whose result is empty without running the
/// pipeline.
#[must_use]
pub fn is_empty_result(op: OverlayOp, a: &Geometry, b: &Geometry, pm: &PrecisionModel) -> bool {
    match op {
        OverlayOp::Intersection => is_env_disjoint(a, b, pm),
        OverlayOp::Difference => a.is_empty(),
        OverlayOp::Union | OverlayOp::SymDifference => a.is_empty() && b.is_empty(),
    }
}

/// Tests whether the input envelopes are disjoint, under the precision
/// model's rounding (rounding can make nearly-touching envelopes meet).
#[must_use]
pub fn is_env_disjoint(a: &Geometry, b: &Geometry, pm: &PrecisionModel) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    let env_a = a.envelope();
    let env_b = b.envelope();
    if pm.is_floating() {
        return env_a.disjoint(&env_b);
    }
    pm.make_precise(env_b.min_x) > pm.make_precise(env_a.max_x)
        || pm.make_precise(env_b.max_x) < pm.make_precise(env_a.min_x)
        || pm.make_precise(env_b.min_y) > pm.make_precise(env_a.max_y)
        || pm.make_precise(env_b.max_y) < pm.make_precise(env_a.min_y)
}

/// Working clip envelope for operations whose result extent is bounded:
/// the (safely expanded) envelope intersection for an intersection, A's
/// envelope for a difference. Union and symmetric difference are unbounded.
#[must_use]
pub fn clipping_envelope(
    op: OverlayOp,
    input: &InputGeometry,
    pm: &PrecisionModel,
) -> Option<Envelope> {
    match op {
        OverlayOp::Intersection => {
            let env_a = safe_env(&input.geometry(0).envelope(), pm);
            let env_b = safe_env(&input.geometry(1).envelope(), pm);
            Some(env_a.intersection(&env_b))
        }
        OverlayOp::Difference => Some(safe_env(&input.geometry(0).envelope(), pm)),
        OverlayOp::Union | OverlayOp::SymDifference => None,
    }
}

fn safe_env(env: &Envelope, pm: &PrecisionModel) -> Envelope {
    let expand = pm.grid_size().map_or_else(
        || {
            let mut min_size = env.height().min(env.width());
            // A zero-width envelope must not clip everything away.
            if min_size <= 0.0 {
                min_size = env.height().max(env.width());
            }
            SAFE_ENV_BUFFER_FACTOR * min_size
        },
        |grid| SAFE_ENV_GRID_FACTOR * grid,
    );
    let mut safe = *env;
    safe.expand_by(expand);
    safe
}

/// Heuristic check that the result area is consistent with the operation.
///
/// Catches floating-noding cases where a moved vertex inverts part of the
/// topology graph; failure is recoverable by rerunning under a degraded
/// strategy.
#[must_use]
pub fn is_result_area_consistent(
    a: &Geometry,
    b: &Geometry,
    op: OverlayOp,
    result: &Geometry,
) -> bool {
    let area_a = a.area();
    let area_b = b.area();
    let area_result = result.area();

    match op {
        OverlayOp::Intersection => {
            is_less(area_result, area_a) && is_less(area_result, area_b)
        }
        OverlayOp::Difference => {
            is_less(area_result, area_a) && is_greater(area_result, area_a - area_b)
        }
        OverlayOp::SymDifference => is_less(area_result, area_a + area_b),
        OverlayOp::Union => {
            is_less(area_a, area_result)
                && is_less(area_b, area_result)
                && is_greater(area_result, area_a - area_b)
        }
    }
}

fn is_less(v1: f64, v2: f64) -> bool {
    v1 <= v2 * (1.0 + AREA_HEURISTIC_TOLERANCE)
}

fn is_greater(v1: f64, v2: f64) -> bool {
    v1 >= v2 * (1.0 - AREA_HEURISTIC_TOLERANCE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(
            vec![
                p(x, y),
                p(x + size, y),
                p(x + size, y + size),
                p(x, y + size),
            ],
            vec![],
        ))
    }

    #[test]
    fn result_dimensions() {
        assert_eq!(result_dimension(OverlayOp::Intersection, 2, 1), 1);
        assert_eq!(result_dimension(OverlayOp::Union, 2, 1), 2);
        assert_eq!(result_dimension(OverlayOp::Difference, 1, 2), 1);
        assert_eq!(result_dimension(OverlayOp::SymDifference, 0, 2), 2);
    }

    #[test]
    fn empty_result_fast_paths() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(10.0, 10.0, 1.0);
        let empty = Geometry::Polygon(Polygon::new(vec![], vec![]));
        let pm = PrecisionModel::Floating;
        assert!(is_empty_result(OverlayOp::Intersection, &a, &b, &pm));
        assert!(is_empty_result(OverlayOp::Difference, &empty, &a, &pm));
        assert!(!is_empty_result(OverlayOp::Union, &a, &b, &pm));
        assert!(is_empty_result(OverlayOp::Union, &empty, &empty, &pm));
    }

    #[test]
    fn fixed_precision_env_disjointness() {
        // Under scale 1 the gap between 10.4 and 10.6 closes.
        let a = square(0.0, 0.0, 10.4);
        let b = square(10.6, 0.0, 5.0);
        assert!(is_env_disjoint(&a, &b, &PrecisionModel::Floating));
        assert!(!is_env_disjoint(&a, &b, &PrecisionModel::fixed(1.0)));
    }

    #[test]
    fn area_consistency() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0);
        let inter = square(5.0, 0.0, 5.0);
        assert!(!is_result_area_consistent(&a, &b, OverlayOp::Union, &inter));
        assert!(is_result_area_consistent(
            &a,
            &b,
            OverlayOp::Intersection,
            &inter
        ));
    }
}
