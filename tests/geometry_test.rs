use approx::assert_relative_eq;
use whirl::{
    Deg, InnerSpace, Matrix4, Point3, Quaternion, Rotation3, SquareMatrix, Transform as _,
    Vector3,
    camera::CameraUniform,
    data_structures::{
        geometry::{Aabb, Geometry, box_geometry},
        material::Material,
        mesh::{MeshVertex, ObjectUniform},
        transform::Transform,
    },
};

#[test]
fn cube_has_four_vertices_per_face() {
    let cube = Geometry::cube();
    assert_eq!(cube.vertices.len(), 24);
    assert_eq!(cube.indices.len(), 36);
    assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
}

#[test]
fn cube_spans_half_a_unit_on_every_axis() {
    let cube = Geometry::cube();
    assert_eq!(cube.aabb.min, Point3::new(-0.5, -0.5, -0.5));
    assert_eq!(cube.aabb.max, Point3::new(0.5, 0.5, 0.5));

    for vertex in &cube.vertices {
        for axis in 0..3 {
            assert!(vertex.position[axis].abs() <= 0.5);
        }
    }
}

#[test]
fn cube_normals_point_outward() {
    // The box is centered at the origin, so position . normal must be the
    // positive half extent for every vertex.
    let cube = Geometry::cube();
    for vertex in &cube.vertices {
        let position = Vector3::from(vertex.position);
        let normal = Vector3::from(vertex.normal);
        assert_relative_eq!(normal.magnitude(), 1.0);
        assert!(position.dot(normal) > 0.0, "inward normal on {vertex:?}");
    }
}

#[test]
fn cube_triangles_wind_counter_clockwise() {
    let cube = Geometry::cube();
    for triangle in cube.indices.chunks(3) {
        let [a, b, c] = [
            cube.vertices[triangle[0] as usize],
            cube.vertices[triangle[1] as usize],
            cube.vertices[triangle[2] as usize],
        ];
        let edge1 = Vector3::from(b.position) - Vector3::from(a.position);
        let edge2 = Vector3::from(c.position) - Vector3::from(a.position);
        let face_normal = edge1.cross(edge2);
        // Seen from outside (along the vertex normal) the winding is CCW.
        assert!(face_normal.dot(Vector3::from(a.normal)) > 0.0);
    }
}

#[test]
fn box_geometry_respects_edge_lengths() {
    let geometry = box_geometry(2.0, 4.0, 6.0);
    assert_eq!(geometry.aabb.min, Point3::new(-1.0, -2.0, -3.0));
    assert_eq!(geometry.aabb.max, Point3::new(1.0, 2.0, 3.0));
    assert_eq!(geometry.vertices.len(), 24);
}

#[test]
fn default_transform_is_identity() {
    let transform = Transform::default();
    assert_eq!(transform.to_matrix(), Matrix4::identity());
}

#[test]
fn transform_applies_scale_then_rotation_then_translation() {
    let transform = Transform {
        position: Vector3::new(1.0, 0.0, 0.0),
        rotation: Quaternion::from_angle_z(Deg(90.0)),
        scale: Vector3::new(2.0, 2.0, 2.0),
    };
    // (1, 0, 0) scales to (2, 0, 0), rotates to (0, 2, 0), moves to (1, 2, 0).
    let result = transform.to_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(result.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(result.y, 2.0, epsilon = 1e-5);
    assert_relative_eq!(result.z, 0.0, epsilon = 1e-5);
}

#[test]
fn aabb_grows_under_rotation() {
    let aabb = Aabb {
        min: Point3::new(-0.5, -0.5, -0.5),
        max: Point3::new(0.5, 0.5, 0.5),
    };
    let rotated = aabb.transformed(&Matrix4::from(Quaternion::from_angle_y(Deg(45.0))));
    // A unit cube rotated 45 degrees covers sqrt(2)/2 on x and z.
    let expected = 2.0f32.sqrt() / 2.0;
    assert_relative_eq!(rotated.max.x, expected, epsilon = 1e-5);
    assert_relative_eq!(rotated.max.z, expected, epsilon = 1e-5);
    assert_relative_eq!(rotated.max.y, 0.5, epsilon = 1e-5);
}

#[test]
fn aabb_center_is_midpoint() {
    let aabb = Aabb::from_points([Point3::new(-1.0, 0.0, 2.0), Point3::new(3.0, 4.0, 6.0)]);
    assert_eq!(aabb.center(), Point3::new(1.0, 2.0, 4.0));
}

#[test]
fn material_decodes_hex_colors() {
    assert_eq!(Material::from_hex(0x00ff00).color, [0.0, 1.0, 0.0, 1.0]);
    assert_eq!(Material::from_hex(0xff0000).color, [1.0, 0.0, 0.0, 1.0]);

    let mixed = Material::from_hex(0x4080ff);
    assert_relative_eq!(mixed.color[0], 64.0 / 255.0);
    assert_relative_eq!(mixed.color[1], 128.0 / 255.0);
    assert_relative_eq!(mixed.color[2], 1.0);
    assert_eq!(mixed.color[3], 1.0);
}

#[test]
fn gpu_structs_have_expected_layout() {
    // mat4 + vec4, tightly packed and 16-byte aligned for uniform use.
    assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
    assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    assert_eq!(std::mem::size_of::<MeshVertex>(), 24);

    let uniform = ObjectUniform {
        model: Matrix4::identity().into(),
        color: [0.0, 1.0, 0.0, 1.0],
    };
    assert_eq!(bytemuck::bytes_of(&uniform).len(), 80);
}
