//! Reflection, refraction and Fresnel terms for dielectric surfaces.
//!
//! All functions take the outward surface normal and work out from the sign
//! of `dot(incident, normal)` whether the ray is entering or leaving.

use glint_math::Vec3;

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Snell refraction through a surface with index `ior` (outside is 1.0).
///
/// Returns `Vec3::ZERO` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Vec3 {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, ior);
    let mut n = normal;
    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 || !k.is_finite() {
        Vec3::ZERO
    } else {
        eta * incident + (eta * cos_i - k.sqrt()) * n
    }
}

/// Fraction of light reflected, from the full dielectric Fresnel equations.
///
/// Returns 1.0 on total internal reflection, for non-positive indices and
/// whenever an intermediate value is not finite.
pub fn fresnel(incident: Vec3, normal: Vec3, ior: f32) -> f32 {
    if ior <= 0.0 || !ior.is_finite() {
        return 1.0;
    }

    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0_f32, ior);
    if cos_i > 0.0 {
        std::mem::swap(&mut eta_i, &mut eta_t);
    }

    let sin_t = eta_i / eta_t * (1.0 - cos_i * cos_i).max(0.0).sqrt();
    if !sin_t.is_finite() || sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    cos_i = cos_i.abs();
    let rs = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let rp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    let fr = (rs * rs + rp * rp) / 2.0;

    if fr.is_finite() {
        fr.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = reflect(incident, Vec3::Y);
        assert!((reflected - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_fresnel_normal_incidence_glass() {
        // ((n - 1) / (n + 1))^2 = 0.04 for n = 1.5
        let fr = fresnel(Vec3::NEG_Y, Vec3::Y, 1.5);
        assert!((fr - 0.04).abs() < 1e-5);
    }

    #[test]
    fn test_fresnel_total_internal_reflection() {
        // Leaving glass at a grazing angle, well past the critical angle
        let incident = Vec3::new(1.0, 0.2, 0.0).normalize();
        assert_eq!(fresnel(incident, Vec3::Y, 1.5), 1.0);
        assert_eq!(refract(incident, Vec3::Y, 1.5), Vec3::ZERO);
    }

    #[test]
    fn test_fresnel_degenerate_index() {
        assert_eq!(fresnel(Vec3::NEG_Y, Vec3::Y, 0.0), 1.0);
        assert_eq!(fresnel(Vec3::NEG_Y, Vec3::Y, -1.0), 1.0);
        assert_eq!(fresnel(Vec3::NEG_Y, Vec3::Y, f32::NAN), 1.0);
    }

    #[test]
    fn test_mirror_index_mostly_reflects() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        assert_eq!(fresnel(incident, Vec3::Y, 0.001), 1.0);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = refract(incident, Vec3::Y, 1.5);

        assert!(refracted.y < 0.0);
        // sin(theta_t) = sin(45deg) / 1.5
        let expected_sin = std::f32::consts::FRAC_1_SQRT_2 / 1.5;
        assert!((refracted.normalize().x - expected_sin).abs() < 1e-5);
    }
}
