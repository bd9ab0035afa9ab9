//! This module builds the vertex data for the shapes that the renderer doesn't provide: the cones
//! of foliage, the tapered base, and the octahedral star.

use glam::Vec3;
use std::f32::consts::TAU;

/// Indexed triangle data with per-vertex normals and texture coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,

    /// Unit vertex normals.
    pub normals: Vec<[f32; 3]>,

    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,

    /// Counter-clockwise triangles, three indices each.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Add a vertex and return its index.
    fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.normalize_or_zero().to_array());
        self.uvs.push(uv);
        index
    }

    /// Add a flat disc at height `y` facing up or down.
    fn push_cap(&mut self, y: f32, radius: f32, segments: u32, facing_up: bool) {
        let normal = if facing_up { Vec3::Y } else { Vec3::NEG_Y };
        let centre = self.push_vertex(Vec3::new(0., y, 0.), normal, [0.5, 0.5]);

        let ring_start = self.positions.len() as u32;
        for i in 0..=segments {
            let angle = i as f32 / segments as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            self.push_vertex(
                Vec3::new(radius * cos, y, radius * sin),
                normal,
                [cos.mul_add(0.5, 0.5), sin.mul_add(0.5, 0.5)],
            );
        }

        for i in 0..segments {
            let (a, b) = (ring_start + i, ring_start + i + 1);
            if facing_up {
                self.indices.extend([centre, b, a]);
            } else {
                self.indices.extend([centre, a, b]);
            }
        }
    }
}

/// A truncated cone centred on the origin with its axis vertical. A `radius_top` of zero makes a
/// cone with a point at the top.
pub fn frustum(radius_bottom: f32, radius_top: f32, height: f32, segments: u32) -> MeshData {
    debug_assert!(segments >= 3, "A frustum needs at least 3 segments");

    let mut mesh = MeshData::default();
    let half = height / 2.;
    let slope = (radius_bottom - radius_top) / height;

    // Each column has a bottom and a top vertex, and the seam is duplicated for the UVs
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        let normal = Vec3::new(cos, slope, sin);

        mesh.push_vertex(
            Vec3::new(radius_bottom * cos, -half, radius_bottom * sin),
            normal,
            [u, 1.],
        );
        mesh.push_vertex(
            Vec3::new(radius_top * cos, half, radius_top * sin),
            normal,
            [u, 0.],
        );
    }

    for i in 0..segments {
        let bottom = 2 * i;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;

        mesh.indices.extend([bottom, top, next_bottom]);
        if radius_top > 0. {
            mesh.indices.extend([top, next_top, next_bottom]);
        }
    }

    mesh.push_cap(-half, radius_bottom, segments, false);
    if radius_top > 0. {
        mesh.push_cap(half, radius_top, segments, true);
    }

    mesh
}

/// A regular octahedron with its vertices on the axes at distance `radius`, with flat shading.
pub fn octahedron(radius: f32) -> MeshData {
    let mut mesh = MeshData::default();

    for sx in [1., -1.] {
        for sy in [1., -1.] {
            for sz in [1., -1.] {
                let a = Vec3::new(sx * radius, 0., 0.);
                let mut b = Vec3::new(0., sy * radius, 0.);
                let mut c = Vec3::new(0., 0., sz * radius);

                let outward = Vec3::new(sx, sy, sz);
                if (b - a).cross(c - a).dot(outward) < 0. {
                    std::mem::swap(&mut b, &mut c);
                }

                let normal = outward.normalize();
                let first = mesh.push_vertex(a, normal, [0., 0.]);
                mesh.push_vertex(b, normal, [0.5, 1.]);
                mesh.push_vertex(c, normal, [1., 0.]);
                mesh.indices.extend([first, first + 1, first + 2]);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    /// Check that every triangle faces away from the vertical axis or the caps face up/down, by
    /// comparing the winding normal with the stored vertex normals.
    fn assert_outward_winding(mesh: &MeshData) {
        for triangle in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(mesh.positions[triangle[i] as usize]));
            let winding = (b - a).cross(c - a);
            if winding.length() < 1e-9 {
                continue;
            }

            let stored = triangle
                .iter()
                .map(|&i| Vec3::from_array(mesh.normals[i as usize]))
                .sum::<Vec3>();
            assert!(winding.dot(stored) > 0., "{triangle:?} winds inwards");
        }
    }

    fn assert_consistent(mesh: &MeshData) {
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len(), mesh.uvs.len());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.positions.len()));
        for normal in &mesh.normals {
            assert!(approx_eq!(f32, Vec3::from_array(*normal).length(), 1., epsilon = 1e-5));
        }
    }

    #[test]
    fn cone_test() {
        let mesh = frustum(2.5, 0., 1.5, 64);
        assert_consistent(&mesh);
        assert_outward_winding(&mesh);

        // Sides plus the bottom cap
        assert_eq!(mesh.indices.len(), 3 * (64 + 64));

        let top = mesh
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::NEG_INFINITY, f32::max);
        let bottom = mesh.positions.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min);
        assert!(approx_eq!(f32, top, 0.75));
        assert!(approx_eq!(f32, bottom, -0.75));
    }

    #[test]
    fn frustum_test() {
        let mesh = frustum(0.7, 0.5, 1., 32);
        assert_consistent(&mesh);
        assert_outward_winding(&mesh);

        // Two triangles per side segment plus both caps
        assert_eq!(mesh.indices.len(), 3 * (2 * 32 + 32 + 32));
    }

    #[test]
    fn octahedron_test() {
        let mesh = octahedron(0.45);
        assert_consistent(&mesh);
        assert_outward_winding(&mesh);
        assert_eq!(mesh.indices.len(), 24);

        for position in &mesh.positions {
            assert!(approx_eq!(f32, Vec3::from_array(*position).length(), 0.45));
        }
    }
}
