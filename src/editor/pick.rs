//! Ray picking against triangle meshes (Möller–Trumbore).

use glam::{DMat4, DVec3};
use smallvec::SmallVec;

use super::mesh::Mesh;

/// Determinant below which a ray counts as parallel to a triangle.
pub const PARALLEL_EPS: f64 = 1e-9;
/// Hits at or before this ray parameter are discarded.
pub const MIN_T: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.dir * t
    }

    /// Same ray expressed in the space `m` maps into. The direction is
    /// not renormalised, so `t` keeps meaning across the change of space.
    #[inline]
    pub fn transformed(&self, m: &DMat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            dir: m.transform_vector3(self.dir),
        }
    }
}

/// Anything the editor can click on.
pub trait Pickable {
    fn mesh(&self) -> &Mesh;
    fn model(&self) -> DMat4;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit<K> {
    pub object: K,
    /// World-space length from the ray origin.
    pub distance: f64,
    pub point: DVec3,
}

/// Ray parameter of the hit on triangle `[v0, v1, v2]`, if any.
pub fn intersect_triangle(ray: &Ray, [v0, v1, v2]: [DVec3; 3]) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.dir.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < PARALLEL_EPS {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > MIN_T).then_some(t)
}

/// Nearest hit of `ray` on one object, in world space.
fn pick_object<T: Pickable + ?Sized>(ray: &Ray, object: &T) -> Option<(f64, DVec3)> {
    let model = object.model();
    if model.determinant().abs() < PARALLEL_EPS {
        return None;
    }
    let local = ray.transformed(&model.inverse());

    let t = object
        .mesh()
        .triangles()
        .filter_map(|tri| intersect_triangle(&local, tri))
        .min_by(f64::total_cmp)?;

    let point = model.transform_point3(local.at(t));
    Some((point.distance(ray.origin), point))
}

/// Every object `ray` hits, nearest first. Objects at equal distance keep
/// their iteration order.
pub fn intersect<'a, K, T, I>(ray: &Ray, objects: I) -> SmallVec<[PickHit<K>; 4]>
where
    T: Pickable + ?Sized + 'a,
    I: IntoIterator<Item = (K, &'a T)>,
{
    let mut hits: SmallVec<[PickHit<K>; 4]> = objects
        .into_iter()
        .filter_map(|(object, obj)| {
            let (distance, point) = pick_object(ray, obj)?;
            Some(PickHit {
                object,
                distance,
                point,
            })
        })
        .collect();
    // stable: first found wins ties
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mesh::{Transform, UNIT_CUBE};
    use glam::dvec3;

    struct Tri {
        mesh: Mesh,
        model: DMat4,
    }

    impl Pickable for Tri {
        fn mesh(&self) -> &Mesh {
            &self.mesh
        }
        fn model(&self) -> DMat4 {
            self.model
        }
    }

    fn unit_tri(model: DMat4) -> Tri {
        Tri {
            mesh: Mesh {
                positions: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
                indices: vec![[0, 1, 2]],
            },
            model,
        }
    }

    const DOWN_Z: Ray = Ray {
        origin: DVec3::new(0.25, 0.25, 5.0),
        dir: DVec3::new(0.0, 0.0, -1.0),
    };

    #[test]
    fn triangle_hit_under_identity() {
        let t = intersect_triangle(&DOWN_Z, [DVec3::ZERO, DVec3::X, DVec3::Y]).unwrap();
        assert!((t - 5.0).abs() < 1e-12);

        let hits = intersect(&DOWN_Z, [(0usize, &unit_tri(DMat4::IDENTITY))]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - dvec3(0.25, 0.25, 0.0)).length() < 1e-12);
        assert!((hits[0].distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn misses_are_excluded() {
        let tri = [DVec3::ZERO, DVec3::X, DVec3::Y];
        // parallel to the plane
        let flat = Ray::new(dvec3(0.25, 0.25, 1.0), DVec3::X);
        assert_eq!(intersect_triangle(&flat, tri), None);
        // outside the barycentric range
        let beside = Ray::new(dvec3(0.8, 0.8, 5.0), DVec3::NEG_Z);
        assert_eq!(intersect_triangle(&beside, tri), None);
        // behind the origin
        let away = Ray::new(dvec3(0.25, 0.25, 5.0), DVec3::Z);
        assert_eq!(intersect_triangle(&away, tri), None);
        // starting on the surface
        let on = Ray::new(dvec3(0.25, 0.25, 0.0), DVec3::NEG_Z);
        assert_eq!(intersect_triangle(&on, tri), None);
    }

    #[test]
    fn nearest_wins() {
        let far = unit_tri(DMat4::from_translation(dvec3(0.0, 0.0, 0.0)));
        let near = unit_tri(DMat4::from_translation(dvec3(0.0, 0.0, 3.0)));
        let hits = intersect(&DOWN_Z, [("far", &far), ("near", &near)]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, "near");
        assert!((hits[0].distance - 2.0).abs() < 1e-12);
        assert_eq!(hits[1].object, "far");
        assert!((hits[1].distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_iteration_order() {
        let a = unit_tri(DMat4::IDENTITY);
        let b = unit_tri(DMat4::IDENTITY);
        let hits = intersect(&DOWN_Z, [(1, &a), (2, &b)]);
        assert_eq!(hits.iter().map(|h| h.object).collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn distance_is_measured_in_world_space() {
        // scaled cube: local hit parameter differs from world distance
        struct Block(Transform);
        impl Pickable for Block {
            fn mesh(&self) -> &Mesh {
                &UNIT_CUBE
            }
            fn model(&self) -> DMat4 {
                self.0.model()
            }
        }
        let block = Block(Transform {
            translation: dvec3(0.0, 0.0, -10.0),
            scale: DVec3::splat(4.0),
            ..Default::default()
        });
        let ray = Ray::new(dvec3(0.1, 0.3, 0.0), DVec3::NEG_Z);
        let hits = intersect(&ray, [((), &block)]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 8.0).abs() < 1e-9);
        assert!((hits[0].point - dvec3(0.1, 0.3, -8.0)).length() < 1e-9);
    }

    #[test]
    fn degenerate_model_is_skipped() {
        let flat = unit_tri(DMat4::from_scale(dvec3(1.0, 1.0, 0.0)));
        assert!(intersect(&DOWN_Z, [(0, &flat)]).is_empty());
    }
}
