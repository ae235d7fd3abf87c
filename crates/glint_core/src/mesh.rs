//! Triangle mesh geometry.
//!
//! The tracer treats a mesh as a flat list of triangle vertex triples, so
//! indexed input is expanded once at construction time.

use std::path::Path;

use glint_math::{Aabb, Mat4, Vec3};

use crate::loader::{LoadError, LoadResult};

/// A triangle mesh with a precomputed bounding box.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Triangle vertices, each element is [v0, v1, v2]
    triangles: Vec<[Vec3; 3]>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices.
    ///
    /// Triangles referencing out-of-range vertices and a trailing partial
    /// triangle are skipped.
    pub fn new(positions: &[Vec3], indices: &[u32]) -> Self {
        let mut triangles = Vec::with_capacity(indices.len() / 3);

        for chunk in indices.chunks(3) {
            if chunk.len() < 3 {
                continue;
            }

            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    positions.len()
                );
                continue;
            }

            triangles.push([positions[i0], positions[i1], positions[i2]]);
        }

        Self::from_triangles(triangles)
    }

    /// Create a mesh from explicit vertex triples.
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let bounds = Self::compute_bounds(&triangles);
        Self { triangles, bounds }
    }

    /// Load every model of an OBJ file into a single mesh.
    pub fn load_obj(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let mut triangles = Vec::new();
        for model in &models {
            let positions: Vec<Vec3> = model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect();
            triangles.extend(Self::new(&positions, &model.mesh.indices).triangles);
        }

        if triangles.is_empty() {
            return Err(LoadError::EmptyMesh(path.display().to_string()));
        }

        log::info!(
            "Loaded {} triangles from {} model(s) in {}",
            triangles.len(),
            models.len(),
            path.display()
        );
        Ok(Self::from_triangles(triangles))
    }

    /// Return a copy of this mesh with every vertex transformed.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let triangles = self
            .triangles
            .iter()
            .map(|tri| tri.map(|v| matrix.transform_point3(v)))
            .collect();
        Self::from_triangles(triangles)
    }

    fn compute_bounds(triangles: &[[Vec3; 3]]) -> Aabb {
        if triangles.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in triangles.iter().flatten() {
            min = min.min(*v);
            max = max.max(*v);
        }

        Aabb::from_points(min, max)
    }

    pub fn triangles(&self) -> &[[Vec3; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_from_indices() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0), // v0
            Vec3::new(1.0, 0.0, 0.0), // v1
            Vec3::new(0.0, 1.0, 0.0), // v2
            Vec3::new(1.0, 1.0, 0.0), // v3
        ];
        // Two triangles: [0,1,2] and [1,3,2]
        let mesh = Mesh::new(&positions, &[0, 1, 2, 1, 3, 2]);

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles()[1], [positions[1], positions[3], positions[2]]);
    }

    #[test]
    fn test_invalid_indices_are_skipped() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = Mesh::new(&positions, &[0, 1, 2, 0, 1, 7, 2]);

        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = Mesh::from_triangles(vec![[
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.0, 0.0, 0.0),
        ]]);

        assert!((mesh.bounds.x.min - (-1.0)).abs() < 0.001);
        assert!((mesh.bounds.x.max - 4.0).abs() < 0.001);
        assert!((mesh.bounds.y.min - (-2.0)).abs() < 0.001);
        assert!((mesh.bounds.z.max - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_transformed_moves_bounds() {
        let mesh = Mesh::from_triangles(vec![[Vec3::ZERO, Vec3::X, Vec3::Y]]);
        let moved = mesh.transformed(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));

        assert_eq!(moved.triangles()[0][1], Vec3::new(1.0, 0.0, -5.0));
        assert!(moved.bounds.z.contains(-5.0));
        assert!(!moved.bounds.z.contains(0.0));
    }

    #[test]
    fn test_load_obj() {
        let dir = std::env::temp_dir().join(format!("glint_mesh_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quad.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = Mesh::load_obj(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
