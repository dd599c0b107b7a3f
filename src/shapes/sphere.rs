//! Sphere

use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::sampling::*;
use crate::core::shape::*;

/// A sphere of given radius centred at the object-space origin.
pub struct Sphere {
    /// The radius.
    radius: Float,
}

impl Sphere {
    /// Return a new `Sphere`.
    ///
    /// * `radius` - The radius.
    pub fn new(radius: Float) -> Self {
        debug_assert!(radius > 0.0);
        Self { radius }
    }

    /// Solve the ray-sphere quadratic. Returns the nearest root inside the
    /// ray's interval.
    fn solve(&self, ray: &Ray) -> Option<Float> {
        let a = ray.d.squared_length();
        let b = 2.0 * ray.o.dot(&ray.d);
        let c = ray.o.squared_length() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();

        // The more stable of the two quadratic forms.
        let q = if b < 0.0 {
            -0.5 * (b - root)
        } else {
            -0.5 * (b + root)
        };
        let (mut t0, mut t1) = (q / a, c / q);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > ray.maxt || t1 < ray.mint {
            return None;
        }
        if t0 >= ray.mint {
            Some(t0)
        } else if t1 <= ray.maxt {
            Some(t1)
        } else {
            None
        }
    }

    fn fragment_at(&self, p: Vector3) -> Fragment {
        let n = p.normalize();
        let theta = spherical_theta(&n);
        let phi = spherical_phi(&n);
        let uv = Vector2::new(phi * INV_TWO_PI, theta * INV_PI);

        let dpdu = Vector3::new(-TWO_PI * p.y, TWO_PI * p.x, 0.0);
        let sin_theta = theta.sin();
        let dpdv = if sin_theta == 0.0 {
            // Degenerate at the poles; pick any tangent.
            coordinate_system(&n).0
        } else {
            Vector3::new(p.z * phi.cos(), p.z * phi.sin(), -self.radius * sin_theta) * PI
        };

        Fragment::new(p, n, uv, dpdu, dpdv)
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<(Float, Fragment)> {
        let t = self.solve(ray)?;
        Some((t, self.fragment_at(ray.at(t))))
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.solve(ray).is_some()
    }

    fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    fn bbox(&self) -> BBox {
        let r = Vector3::new(self.radius, self.radius, self.radius);
        BBox::new(-r, r)
    }

    fn sample(&self, u1: Float, u2: Float) -> (Vector3, Vector3) {
        let n = uniform_sample_sphere(u1, u2);
        (n * self.radius, n)
    }

    fn sample_wrt(&self, p: &Vector3, u1: Float, u2: Float) -> (Vector3, Vector3) {
        let dist_squared = p.squared_length();
        if dist_squared - self.radius * self.radius < 1e-4 {
            // Reference point on or inside the sphere; fall back to uniform
            // area sampling.
            return self.sample(u1, u2);
        }

        // Sample inside the cone subtended by the sphere.
        let w = -*p / dist_squared.sqrt();
        let (wx, wy) = coordinate_system(&w);
        let cos_theta_max = max(0.0, 1.0 - self.radius * self.radius / dist_squared).sqrt();
        let local = uniform_sample_cone(u1, u2, cos_theta_max);
        let dir = local.x * wx + local.y * wy + local.z * w;

        let ray = Ray::new(*p, dir, 0.0);
        let ps = match self.solve(&ray) {
            Some(t) => ray.at(t),
            // Grazing direction; use the closest point along the ray.
            None => ray.at(ray.d.dot(&-*p) / ray.d.squared_length()),
        };
        (ps, ps.normalize())
    }

    fn pdf(&self, p: &Vector3, wi: &Vector3) -> Float {
        let dist_squared = p.squared_length();
        if dist_squared - self.radius * self.radius < 1e-4 {
            // Uniform area sampling inside; convert through the visible point.
            let ray = Ray::new(*p, *wi, 1e-3);
            return match self.intersect(&ray) {
                Some((t, fragment)) => {
                    let cos_theta = fragment.normal().abs_dot(wi);
                    if cos_theta == 0.0 {
                        0.0
                    } else {
                        t * t / (cos_theta * self.area())
                    }
                }
                None => 0.0,
            };
        }
        let cos_theta_max = max(0.0, 1.0 - self.radius * self.radius / dist_squared).sqrt();
        if self.intersect_p(&Ray::new(*p, *wi, 1e-3)) {
            uniform_cone_pdf(cos_theta_max)
        } else {
            0.0
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use crate::core::shape::Shape;

    #[test]
    fn intersects_from_outside() {
        let s = Sphere::new(1.0);
        let ray = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::UNIT_Z, 0.0);
        let (t, fragment) = s.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-4);
        assert!((fragment.normal() - -Vector3::UNIT_Z).length() < 1e-4);
    }

    #[test]
    fn intersects_from_inside() {
        let s = Sphere::new(1.0);
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_X, 0.0);
        let (t, _) = s.intersect(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-4);
    }

    #[test]
    fn respects_ray_interval() {
        let s = Sphere::new(1.0);
        let ray = Ray::segment(Vector3::new(0.0, 0.0, -3.0), Vector3::UNIT_Z, 0.0, 1.0);
        assert!(s.intersect(&ray).is_none());
        assert!(!s.intersect_p(&ray));
    }

    #[test]
    fn samples_lie_on_the_surface() {
        let s = Sphere::new(2.0);
        let mut rng = Rng::new(5);
        for _ in 0..100 {
            let (p, n) = s.sample(rng.uniform_float(), rng.uniform_float());
            assert!((p.length() - 2.0).abs() < 1e-4);
            assert!((n - p.normalize()).length() < 1e-4);

            let reference = Vector3::new(0.0, 0.0, 5.0);
            let (ps, _) = s.sample_wrt(&reference, rng.uniform_float(), rng.uniform_float());
            assert!((ps.length() - 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn cone_pdf_matches_subtended_solid_angle() {
        let s = Sphere::new(1.0);
        let p = Vector3::new(0.0, 0.0, 3.0);
        let pdf = s.pdf(&p, &-Vector3::UNIT_Z);
        let cos_theta_max = (1.0 as Float - 1.0 / 9.0).sqrt();
        assert!((pdf - uniform_cone_pdf(cos_theta_max)).abs() < 1e-4);
        // Directions missing the sphere have zero pdf.
        assert_eq!(s.pdf(&p, &Vector3::UNIT_X), 0.0);
    }
}
