//! Triangle Mesh

use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::sampling::*;
use crate::core::shape::*;
use std::sync::Arc;

/// Shared triangle mesh storage.
pub struct MeshData {
    /// Vertex positions.
    pub vertices: Vec<Vector3>,

    /// Per-vertex texture coordinates, if present.
    pub uvs: Option<Vec<Vector2>>,

    /// Vertex index triples, one per face.
    pub indices: Vec<[usize; 3]>,
}

/// A triangle mesh. The mesh itself is not intersectable; it refines into
/// one `Triangle` per face.
pub struct TriangleMesh {
    data: Arc<MeshData>,
}

impl TriangleMesh {
    /// Return a new `TriangleMesh`.
    ///
    /// * `vertices` - Vertex positions.
    /// * `uvs`      - Per-vertex texture coordinates, if present.
    /// * `indices`  - Vertex index triples, one per face.
    pub fn new(vertices: Vec<Vector3>, uvs: Option<Vec<Vector2>>, indices: Vec<[usize; 3]>) -> Self {
        if let Some(uvs) = &uvs {
            debug_assert_eq!(uvs.len(), vertices.len());
        }
        Self {
            data: Arc::new(MeshData {
                vertices,
                uvs,
                indices,
            }),
        }
    }

    /// Returns the number of faces.
    pub fn face_count(&self) -> usize {
        self.data.indices.len()
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.data.vertices.len()
    }
}

impl Shape for TriangleMesh {
    fn intersectable(&self) -> bool {
        false
    }

    fn refine(&self) -> Vec<ArcShape> {
        (0..self.data.indices.len())
            .map(|face| {
                Arc::new(Triangle {
                    data: Arc::clone(&self.data),
                    face,
                }) as ArcShape
            })
            .collect()
    }

    fn intersect(&self, _ray: &Ray) -> Option<(Float, Fragment)> {
        error!("TriangleMesh::intersect called on unrefined mesh");
        None
    }

    fn intersect_p(&self, _ray: &Ray) -> bool {
        false
    }

    fn area(&self) -> Float {
        (0..self.data.indices.len())
            .map(|face| {
                Triangle {
                    data: Arc::clone(&self.data),
                    face,
                }
                .area()
            })
            .sum()
    }

    fn bbox(&self) -> BBox {
        self.data
            .vertices
            .iter()
            .fold(BBox::default(), |acc, v| acc.union_point(v))
    }

    fn sample(&self, _u1: Float, _u2: Float) -> (Vector3, Vector3) {
        error!("TriangleMesh::sample called on unrefined mesh");
        (Vector3::ZERO, Vector3::UNIT_Z)
    }
}

/// A single face of a `TriangleMesh`.
pub struct Triangle {
    data: Arc<MeshData>,
    face: usize,
}

impl Triangle {
    fn corners(&self) -> (Vector3, Vector3, Vector3) {
        let [i0, i1, i2] = self.data.indices[self.face];
        (
            self.data.vertices[i0],
            self.data.vertices[i1],
            self.data.vertices[i2],
        )
    }

    /// Möller-Trumbore intersection. Returns `(t, b1, b2)`.
    fn solve(&self, ray: &Ray) -> Option<(Float, Float, Float)> {
        let (p0, p1, p2) = self.corners();
        let e1 = p1 - p0;
        let e2 = p2 - p0;

        let pvec = ray.d.cross(&e2);
        let det = e1.dot(&pvec);
        if abs(det) < 1e-10 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.o - p0;
        let b1 = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let b2 = ray.d.dot(&qvec) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t < ray.mint || t > ray.maxt {
            return None;
        }
        Some((t, b1, b2))
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<(Float, Fragment)> {
        let (t, b1, b2) = self.solve(ray)?;
        let (p0, p1, p2) = self.corners();
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let n = e1.cross(&e2).normalize();

        let uv = match &self.data.uvs {
            Some(uvs) => {
                let [i0, i1, i2] = self.data.indices[self.face];
                let b0 = 1.0 - b1 - b2;
                b0 * uvs[i0] + b1 * uvs[i1] + b2 * uvs[i2]
            }
            None => Vector2::new(b1, b2),
        };

        Some((t, Fragment::new(ray.at(t), n, uv, e1, e2)))
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.solve(ray).is_some()
    }

    fn area(&self) -> Float {
        let (p0, p1, p2) = self.corners();
        0.5 * (p1 - p0).cross(&(p2 - p0)).length()
    }

    fn bbox(&self) -> BBox {
        let (p0, p1, p2) = self.corners();
        BBox::new(p0, p1).union_point(&p2)
    }

    fn sample(&self, u1: Float, u2: Float) -> (Vector3, Vector3) {
        let (b0, b1) = uniform_sample_triangle(u1, u2);
        let (p0, p1, p2) = self.corners();
        let p = b0 * p0 + b1 * p1 + (1.0 - b0 - b1) * p2;
        let n = (p1 - p0).cross(&(p2 - p0)).normalize();
        (p, n)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    fn unit_quad() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            None,
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn mesh_refines_into_faces() {
        let mesh = unit_quad();
        assert!(!mesh.intersectable());
        let tris = mesh.refine();
        assert_eq!(tris.len(), 2);
        assert!((mesh.area() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_intersection_and_normal() {
        let mesh = unit_quad();
        let tris = mesh.refine();
        let ray = Ray::new(Vector3::new(0.75, 0.25, 5.0), -Vector3::UNIT_Z, 0.0);
        let (t, fragment) = tris[0].intersect(&ray).unwrap();
        assert!((t - 5.0).abs() < 1e-4);
        assert!(fragment.normal().abs_dot(&Vector3::UNIT_Z) > 0.999);
        // The other face does not contain the hit point.
        assert!(tris[1].intersect(&ray).is_none());
    }

    #[test]
    fn triangle_samples_are_on_the_face() {
        let mesh = unit_quad();
        let tris = mesh.refine();
        let mut rng = Rng::new(3);
        for _ in 0..100 {
            let (p, n) = tris[0].sample(rng.uniform_float(), rng.uniform_float());
            assert_eq!(p.z, 0.0);
            assert!(p.x >= -1e-5 && p.y >= -1e-5 && p.y <= p.x + 1e-4);
            assert!(n.abs_dot(&Vector3::UNIT_Z) > 0.999);
        }
    }
}
