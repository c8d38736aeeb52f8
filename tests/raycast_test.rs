use approx::assert_relative_eq;
use whirl::{
    Deg, InnerSpace, Matrix4, PhysicalPosition, Point3, Vector3,
    camera::{Camera, Projection},
    data_structures::geometry::Aabb,
    pick::Ray,
};

fn unit_cube() -> Aabb {
    Aabb {
        min: Point3::new(-0.5, -0.5, -0.5),
        max: Point3::new(0.5, 0.5, 0.5),
    }
}

fn demo_camera() -> (Camera, Projection) {
    // Five units back on +Z, looking down -Z, like the demos.
    let camera = Camera::new((0.0, 0.0, 5.0), Deg(-90.0), Deg(0.0));
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    (camera, projection)
}

#[test]
fn center_screen_ray_follows_the_view_direction() {
    let (camera, projection) = demo_camera();
    let ray = camera.cast_ray_from_mouse(
        PhysicalPosition::new(400.0, 300.0),
        800.0,
        600.0,
        &projection,
    );
    assert_eq!(ray.origin, Point3::new(0.0, 0.0, 5.0));
    assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(ray.direction.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-5);
}

#[test]
fn off_center_rays_lean_toward_the_cursor() {
    let (camera, projection) = demo_camera();
    // Cursor in the upper-right quadrant of the window.
    let ray = camera.cast_ray_from_mouse(
        PhysicalPosition::new(600.0, 150.0),
        800.0,
        600.0,
        &projection,
    );
    assert!(ray.direction.x > 0.0);
    assert!(ray.direction.y > 0.0);
    assert!(ray.direction.z < 0.0);
    assert_relative_eq!(ray.direction.magnitude(), 1.0, epsilon = 1e-5);
}

#[test]
fn ray_hits_a_cube_straight_ahead() {
    let ray = Ray {
        origin: Point3::new(0.0, 0.0, 5.0),
        direction: Vector3::new(0.0, 0.0, -1.0),
    };
    let t = ray.intersect_aabb(&unit_cube()).expect("cube in front");
    assert_relative_eq!(t, 4.5);
}

#[test]
fn ray_misses_a_cube_off_to_the_side() {
    let ray = Ray {
        origin: Point3::new(5.0, 0.0, 5.0),
        direction: Vector3::new(0.0, 0.0, -1.0),
    };
    assert_eq!(ray.intersect_aabb(&unit_cube()), None);
}

#[test]
fn ray_starting_inside_hits_at_zero() {
    let ray = Ray {
        origin: Point3::new(0.0, 0.0, 0.0),
        direction: Vector3::new(0.0, 0.0, -1.0),
    };
    assert_eq!(ray.intersect_aabb(&unit_cube()), Some(0.0));
}

#[test]
fn cube_behind_the_ray_does_not_hit() {
    let ray = Ray {
        origin: Point3::new(0.0, 0.0, 5.0),
        direction: Vector3::new(0.0, 0.0, 1.0),
    };
    assert_eq!(ray.intersect_aabb(&unit_cube()), None);
}

#[test]
fn nearer_cube_reports_the_smaller_distance() {
    let ray = Ray {
        origin: Point3::new(0.0, 0.0, 5.0),
        direction: Vector3::new(0.0, 0.0, -1.0),
    };
    let near = unit_cube();
    let far = Aabb {
        min: Point3::new(-0.5, -0.5, -3.5),
        max: Point3::new(0.5, 0.5, -2.5),
    };
    let t_near = ray.intersect_aabb(&near).expect("near cube");
    let t_far = ray.intersect_aabb(&far).expect("far cube");
    assert!(t_near < t_far);
}

#[test]
fn ray_respects_transformed_bounds() {
    // A cube moved two units to the right is missed by the center ray but
    // hit by a ray shifted the same way.
    let moved = unit_cube().transformed(&Matrix4::from_translation(Vector3::new(2.0, 0.0, 0.0)));

    let center = Ray {
        origin: Point3::new(0.0, 0.0, 5.0),
        direction: Vector3::new(0.0, 0.0, -1.0),
    };
    assert_eq!(center.intersect_aabb(&moved), None);

    let shifted = Ray {
        origin: Point3::new(2.0, 0.0, 5.0),
        direction: Vector3::new(0.0, 0.0, -1.0),
    };
    assert_relative_eq!(shifted.intersect_aabb(&moved).expect("hit"), 4.5);
}

#[test]
fn ray_through_the_cursor_hits_the_cube_under_it() {
    let (camera, projection) = demo_camera();

    // Center of the window: the origin cube is hit, a cube off to the right
    // is not.
    let ray = camera.cast_ray_from_mouse(
        PhysicalPosition::new(400.0, 300.0),
        800.0,
        600.0,
        &projection,
    );
    let right = unit_cube().transformed(&Matrix4::from_translation(Vector3::new(2.0, 0.0, 0.0)));
    assert!(ray.intersect_aabb(&unit_cube()).is_some());
    assert_eq!(ray.intersect_aabb(&right), None);
}
