//! Animated ripples on water surfaces.

use cubetrace::math::{Face6, FreeCoordinate, FreePoint, FreeVector, fract_positive};

use crate::config::ShadingConstants;

/// Returns the unit normal of a rippled water surface at `point`, which lies on a face
/// with the given flat normal `face`, at animation time `time` in seconds.
///
/// The ripple tilts the flat normal along the face's two tangent axes by a sinusoid of
/// the fractional position within the cube, so the pattern repeats every block. The
/// result always stays on the same side of the surface as the flat normal.
pub fn water_normal(
    face: Face6,
    point: FreePoint,
    time: FreeCoordinate,
    constants: &ShadingConstants,
) -> FreeVector {
    let normal: FreeVector = face.normal_vector();
    let amplitude = constants.ripple_amplitude;
    if amplitude == 0.0 {
        return normal;
    }

    let axis = face.axis();
    let (u_axis, v_axis) = (axis.increment(), axis.decrement());
    let tau = core::f64::consts::TAU;
    let phase = time * constants.ripple_speed;
    let u = fract_positive(point[u_axis]) * constants.ripple_frequency * tau;
    let v = fract_positive(point[v_axis]) * constants.ripple_frequency * tau;

    let mut tilt = FreeVector::zero();
    tilt[u_axis] = amplitude * (u + phase).sin() * (v * 0.5 + phase * 0.7).cos();
    tilt[v_axis] = amplitude * (v - phase * 1.3).sin() * (u * 0.5).cos();
    let rippled = normal + tilt;
    // The tilt is perpendicular to the normal, so this is nonzero.
    rippled.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::point3;
    use pretty_assertions::assert_eq;

    #[test]
    fn unit_and_same_side() {
        let constants = ShadingConstants::default();
        for face in Face6::ALL {
            for i in 0..50 {
                let t = f64::from(i) * 0.37;
                let point = point3(t * 1.7, t * 0.3 + 24.0, -t);
                let n = water_normal(face, point, t, &constants);
                assert!((n.length() - 1.0).abs() < 1e-12, "{n:?}");
                assert!(face.dot(n) > 0.9, "{face:?} {n:?}");
            }
        }
    }

    #[test]
    fn animated() {
        let constants = ShadingConstants::default();
        let point = point3(3.25, 24.0, 7.6);
        assert_ne!(
            water_normal(Face6::PY, point, 0.0, &constants),
            water_normal(Face6::PY, point, 0.5, &constants)
        );
        // Periodic in whole blocks.
        let a = water_normal(Face6::PY, point, 1.0, &constants);
        let b = water_normal(Face6::PY, point3(5.25, 24.0, 9.6), 1.0, &constants);
        assert!((a - b).length() < 1e-9);
    }

    #[test]
    fn flat_without_amplitude() {
        let constants = ShadingConstants {
            ripple_amplitude: 0.0,
            ..ShadingConstants::default()
        };
        assert_eq!(
            water_normal(Face6::NY, point3(0.3, 1.0, 0.2), 2.0, &constants),
            FreeVector::new(0.0, -1.0, 0.0)
        );
    }
}
