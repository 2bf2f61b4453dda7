// Indexed triangle meshes and the placement transform of an editor entity.

use glam::{DMat4, DQuat, DVec3, EulerRot};
use once_cell::sync::Lazy;

/// Triangle soup with an index buffer, in local space.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    /// Vertex positions of every triangle. Indices past the vertex buffer
    /// are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.indices.iter().filter_map(|&[a, b, c]| {
            Some([
                *self.positions.get(a as usize)?,
                *self.positions.get(b as usize)?,
                *self.positions.get(c as usize)?,
            ])
        })
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Axis-aligned cube of edge 1 centred on the origin, faces wound
    /// counter-clockwise seen from outside.
    pub fn unit_cube() -> Self {
        let positions = (0..8)
            .map(|i| {
                DVec3::new(
                    if i & 1 == 0 { -0.5 } else { 0.5 },
                    if i & 2 == 0 { -0.5 } else { 0.5 },
                    if i & 4 == 0 { -0.5 } else { 0.5 },
                )
            })
            .collect();
        #[rustfmt::skip]
        let indices = vec![
            [0, 4, 6], [0, 6, 2], // -x
            [1, 3, 7], [1, 7, 5], // +x
            [0, 1, 5], [0, 5, 4], // -y
            [2, 6, 7], [2, 7, 3], // +y
            [0, 2, 3], [0, 3, 1], // -z
            [4, 5, 7], [4, 7, 6], // +z
        ];
        Self { positions, indices }
    }
}

/// Shared by every block entity.
pub static UNIT_CUBE: Lazy<Mesh> = Lazy::new(Mesh::unit_cube);

/// Translation, Euler rotation (radians) and per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Yaw about y first, then pitch about x, then roll about z.
    #[inline]
    pub fn rotation_quat(&self) -> DQuat {
        DQuat::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z)
    }

    /// `T · R · S`: local points are scaled, rotated, then moved.
    pub fn model(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.translation)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
