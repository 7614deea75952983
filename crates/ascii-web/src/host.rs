use crate::constants::SPHERE_SEGMENTS;
use crate::three;
use ascii_core::{Camera, Controls, Light, NodeId, SceneGraph, SceneRenderer, ShapeKind, Viewport};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// three.js objects mirroring the Rust scene graph.
///
/// The Rust side is the source of truth for shapes; the three.js camera is
/// driven by the orbit controls and read back each tick.
pub struct ThreeHost {
    pub scene: three::Scene,
    pub camera: three::PerspectiveCamera,
    pub renderer: three::WebGLRenderer,
    meshes: FnvHashMap<NodeId, three::Mesh>,
    controls: Option<three::OrbitControls>,
}

impl ThreeHost {
    pub fn new(
        canvas: &web::HtmlCanvasElement,
        graph: &SceneGraph,
        camera: &Camera,
    ) -> anyhow::Result<Self> {
        let params = js_sys::Object::new();
        js_sys::Reflect::set(&params, &"canvas".into(), canvas)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        js_sys::Reflect::set(&params, &"antialias".into(), &true.into())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let renderer = three::WebGLRenderer::new(&params);

        let scene = three::Scene::new();
        scene.set_background(&three::Color::new(graph.background.hex()));

        let cam = three::PerspectiveCamera::new(
            camera.fovy_radians.to_degrees() as f64,
            camera.aspect as f64,
            camera.znear as f64,
            camera.zfar as f64,
        );
        cam.position()
            .set(camera.eye.x as f64, camera.eye.y as f64, camera.eye.z as f64);
        cam.look_at(
            camera.target.x as f64,
            camera.target.y as f64,
            camera.target.z as f64,
        );

        let mut meshes = FnvHashMap::default();
        for (id, shape) in graph.shapes() {
            let geometry: three::BufferGeometry = match shape.kind {
                ShapeKind::Octahedron { radius, detail } => {
                    three::OctahedronGeometry::new(radius as f64, detail).unchecked_into()
                }
                ShapeKind::Cube { size } => {
                    let s = size as f64;
                    three::BoxGeometry::new(s, s, s).unchecked_into()
                }
                ShapeKind::Sphere { radius } => {
                    three::SphereGeometry::new(radius as f64, SPHERE_SEGMENTS.0, SPHERE_SEGMENTS.1)
                        .unchecked_into()
                }
            };
            let mesh = three::Mesh::new(&geometry, &three::MeshStandardMaterial::new());
            scene.add(&mesh);
            meshes.insert(id, mesh);
        }

        for (id, light) in graph.lights() {
            let pos = graph.world_position(id);
            let object: three::Object3D = match *light {
                Light::Spot {
                    angle,
                    penumbra,
                    intensity,
                    ..
                } => three::SpotLight::new(0xffffff, intensity as f64, 0.0, angle as f64, penumbra as f64)
                    .unchecked_into(),
                Light::Point { intensity, .. } => {
                    three::PointLight::new(0xffffff, intensity as f64).unchecked_into()
                }
                Light::Ambient { intensity } => {
                    three::AmbientLight::new(0xffffff, intensity as f64).unchecked_into()
                }
            };
            object.position().set(pos.x as f64, pos.y as f64, pos.z as f64);
            scene.add(&object);
        }

        let controls = graph
            .has_controls(Controls::Orbit)
            .then(|| three::OrbitControls::new(&cam, canvas));

        log::info!(
            "[host] mirrored {} mesh(es), {} light(s), orbit={}",
            meshes.len(),
            graph.lights().count(),
            controls.is_some()
        );

        let mut host = Self {
            scene,
            camera: cam,
            renderer,
            meshes,
            controls,
        };
        host.sync(graph, camera);
        Ok(host)
    }

    /// Push shape transforms and colors, and the camera projection, into
    /// the three.js objects.
    pub fn sync(&mut self, graph: &SceneGraph, camera: &Camera) {
        for (id, shape) in graph.shapes() {
            let Some(mesh) = self.meshes.get(&id) else {
                continue;
            };
            let pos = graph.world_position(id);
            let rot = shape.rotation();
            mesh.position().set(pos.x as f64, pos.y as f64, pos.z as f64);
            mesh.rotation().set(rot.x as f64, rot.y as f64, rot.z as f64);
            mesh.scale().set_scalar(shape.scale() as f64);
            mesh.material().color().set_hex(shape.color().hex());
        }
        self.camera.set_aspect(camera.aspect as f64);
        self.camera.update_projection_matrix();
    }

    /// Let the orbit controls move the three.js camera, then copy its eye
    /// and orbit target back into the Rust camera used for picking.
    pub fn update_controls(&mut self, camera: &mut Camera) {
        if let Some(controls) = &self.controls {
            controls.update();
            camera.eye = to_vec3(&self.camera.position());
            camera.target = to_vec3(&controls.target());
        }
    }

    pub fn set_size(&mut self, viewport: Viewport) {
        if let Some(w) = web::window() {
            self.renderer.set_pixel_ratio(w.device_pixel_ratio());
        }
        self.renderer
            .set_size(viewport.width as f64, viewport.height as f64, false);
    }
}

impl Drop for ThreeHost {
    fn drop(&mut self) {
        if let Some(controls) = self.controls.take() {
            controls.dispose();
        }
    }
}

fn to_vec3(v: &three::Vector3) -> glam::Vec3 {
    glam::Vec3::new(v.x() as f32, v.y() as f32, v.z() as f32)
}

pub type SharedHost = Rc<RefCell<ThreeHost>>;

/// Default draw of the mirrored scene, used when no subscriber takes over.
pub struct HostRenderer(pub SharedHost);

impl SceneRenderer for HostRenderer {
    fn set_size(&mut self, viewport: Viewport) {
        self.0.borrow_mut().set_size(viewport);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) {
        let mut host = self.0.borrow_mut();
        host.sync(scene, camera);
        host.renderer.render(&host.scene, &host.camera);
    }
}
