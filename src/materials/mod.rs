//! Materials.

mod lambert;
mod mirror;
mod transparent;

// Re-export.
pub use lambert::*;
pub use mirror::*;
pub use transparent::*;

use crate::core::common::*;

/// Fresnel reflectance for a dielectric interface.
///
/// * `cos_i` - Cosine of the incident angle, positive on the `eta_i` side.
/// * `eta_i` - Index of refraction on the incident side.
/// * `eta_t` - Index of refraction on the transmitted side.
pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_i = clamp(cos_i, 0.0, 1.0);
    let sin_i = max(0.0, 1.0 - cos_i * cos_i).sqrt();
    let sin_t = eta_i / eta_t * sin_i;
    if sin_t >= 1.0 {
        // Total internal reflection.
        return 1.0;
    }
    let cos_t = max(0.0, 1.0 - sin_t * sin_t).sqrt();

    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_incidence_matches_closed_form() {
        // ((n1 - n2) / (n1 + n2))² at normal incidence.
        let f = fresnel_dielectric(1.0, 1.0, 1.5);
        assert!((f - 0.04).abs() < 1e-3);
    }

    #[test]
    fn grazing_incidence_reflects_everything() {
        let f = fresnel_dielectric(0.0, 1.0, 1.5);
        assert!((f - 1.0).abs() < 1e-4);
    }

    #[test]
    fn beyond_critical_angle_is_total() {
        // Inside glass looking out at a shallow angle.
        assert_eq!(fresnel_dielectric(0.2, 1.5, 1.0), 1.0);
    }
}
