//! CPU-side shape data.
//!
//! A [`Geometry`] is the vertex and index data of a shape before it is
//! uploaded to the GPU, together with its axis-aligned bounds. The only
//! built-in shape is the box; demos that want something else bring their own
//! vertex data.

use cgmath::{EuclideanSpace, Matrix4, Point3, Transform as _};

use crate::data_structures::mesh::MeshVertex;

/// An axis-aligned bounding box in whatever space its points live in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// The smallest box enclosing all `points`. Panics on an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point3<f32>>>(points: I) -> Self {
        let mut points = points.into_iter();
        let first = points.next().expect("Aabb of zero points");
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in points {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.min.z = aabb.min.z.min(p.z);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
            aabb.max.z = aabb.max.z.max(p.z);
        }
        aabb
    }

    /// The box enclosing this box after transforming its eight corners.
    ///
    /// The result is conservative: a rotated box grows to cover the rotated
    /// corners instead of rotating itself.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ];
        Aabb::from_points(corners.map(|c| matrix.transform_point(c)))
    }

    pub fn center(&self) -> Point3<f32> {
        self.min.midpoint(self.max)
    }
}

/// Vertex and index data of a shape, with its local-space bounds.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub aabb: Aabb,
}

impl Geometry {
    /// A unit cube centered at the origin, spanning -0.5..0.5 on every axis.
    pub fn cube() -> Self {
        box_geometry(1.0, 1.0, 1.0)
    }
}

/// A box centered at the origin with the given edge lengths.
///
/// Faces are flat-shaded: four vertices per face with the face normal, two
/// triangles each, counter-clockwise when seen from outside.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    let half = [width / 2.0, height / 2.0, depth / 2.0];

    // One row per face: normal, tangent and bitangent as signed axis indices,
    // chosen so that tangent x bitangent = normal.
    #[rustfmt::skip]
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([ 1.0,  0.0,  0.0], [0.0,  1.0, 0.0], [0.0, 0.0,  1.0]),
        ([-1.0,  0.0,  0.0], [0.0,  0.0, 1.0], [0.0, 1.0,  0.0]),
        ([ 0.0,  1.0,  0.0], [0.0,  0.0, 1.0], [1.0, 0.0,  0.0]),
        ([ 0.0, -1.0,  0.0], [1.0,  0.0, 0.0], [0.0, 0.0,  1.0]),
        ([ 0.0,  0.0,  1.0], [1.0,  0.0, 0.0], [0.0, 1.0,  0.0]),
        ([ 0.0,  0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0,  0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, tangent, bitangent) in faces {
        let base = vertices.len() as u32;
        for (st, sb) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let mut position = [0.0f32; 3];
            for axis in 0..3 {
                position[axis] =
                    (normal[axis] + st * tangent[axis] + sb * bitangent[axis]) * half[axis];
            }
            vertices.push(MeshVertex { position, normal });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let aabb = Aabb {
        min: Point3::new(-half[0], -half[1], -half[2]),
        max: Point3::new(half[0], half[1], half[2]),
    };

    Geometry {
        vertices,
        indices,
        aabb,
    }
}
