use crate::scene::{NodeId, SceneGraph};
use crate::state::Camera;
use glam::{Vec2, Vec3};

/// Distance along `ray_dir` to the first intersection with the sphere, or
/// `None` on a miss or when the sphere lies behind the origin. From inside
/// the sphere this is the exit distance.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Nearest shape whose bounding sphere the pointer ray hits.
pub fn pick(scene: &SceneGraph, camera: &Camera, ndc: Vec2) -> Option<NodeId> {
    let (ro, rd) = camera.ray_from_ndc(ndc);
    let mut best = None::<(NodeId, f32)>;
    for (id, shape) in scene.shapes() {
        let center = scene.world_position(id);
        if let Some(t) = ray_sphere(ro, rd, center, shape.pick_radius()) {
            match best {
                Some((_, bt)) if t >= bt => {}
                _ => best = Some((id, t)),
            }
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_sphere_hits_in_front() {
        let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
        assert_eq!(t, Some(3.0));
    }

    #[test]
    fn ray_sphere_misses_sideways() {
        assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn ray_sphere_ignores_hits_behind() {
        assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 2.0).is_none());
    }

    #[test]
    fn ray_sphere_from_inside_returns_exit() {
        let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 1.0), 3.0);
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn pick_from_inside_a_scaled_shape() {
        let mut shape = crate::shape::RenderableShape::default();
        shape.on_click();
        let scene = crate::scene::SceneBuilder::new().shape(shape).build();
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, 1.0),
            ..Camera::default()
        };
        let (id, _) = scene.shapes().next().expect("shape");
        assert_eq!(pick(&scene, &camera, Vec2::ZERO), Some(id));
    }
}
