//! Minimal bindings to the parts of three.js and three-stdlib this frontend
//! drives. Only the members actually used are declared.

use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(module = "three")]
extern "C" {
    pub type Object3D;

    #[wasm_bindgen(method)]
    pub fn add(this: &Object3D, child: &Object3D);
    #[wasm_bindgen(method, getter)]
    pub fn position(this: &Object3D) -> Vector3;
    #[wasm_bindgen(method, getter)]
    pub fn rotation(this: &Object3D) -> Euler;
    #[wasm_bindgen(method, getter)]
    pub fn scale(this: &Object3D) -> Vector3;
    #[wasm_bindgen(method, js_name = lookAt)]
    pub fn look_at(this: &Object3D, x: f64, y: f64, z: f64);

    pub type Vector3;

    #[wasm_bindgen(method, getter)]
    pub fn x(this: &Vector3) -> f64;
    #[wasm_bindgen(method, getter)]
    pub fn y(this: &Vector3) -> f64;
    #[wasm_bindgen(method, getter)]
    pub fn z(this: &Vector3) -> f64;
    #[wasm_bindgen(method)]
    pub fn set(this: &Vector3, x: f64, y: f64, z: f64) -> Vector3;
    #[wasm_bindgen(method, js_name = setScalar)]
    pub fn set_scalar(this: &Vector3, s: f64) -> Vector3;

    pub type Euler;

    #[wasm_bindgen(method)]
    pub fn set(this: &Euler, x: f64, y: f64, z: f64) -> Euler;

    pub type Color;

    #[wasm_bindgen(constructor)]
    pub fn new(hex: u32) -> Color;
    #[wasm_bindgen(method, js_name = setHex)]
    pub fn set_hex(this: &Color, hex: u32) -> Color;

    #[wasm_bindgen(extends = Object3D)]
    pub type Scene;

    #[wasm_bindgen(constructor)]
    pub fn new() -> Scene;
    #[wasm_bindgen(method, setter)]
    pub fn set_background(this: &Scene, color: &Color);

    #[wasm_bindgen(extends = Object3D)]
    pub type PerspectiveCamera;

    #[wasm_bindgen(constructor)]
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> PerspectiveCamera;
    #[wasm_bindgen(method, setter)]
    pub fn set_aspect(this: &PerspectiveCamera, aspect: f64);
    #[wasm_bindgen(method, js_name = updateProjectionMatrix)]
    pub fn update_projection_matrix(this: &PerspectiveCamera);

    pub type WebGLRenderer;

    #[wasm_bindgen(constructor)]
    pub fn new(params: &JsValue) -> WebGLRenderer;
    #[wasm_bindgen(method, js_name = setPixelRatio)]
    pub fn set_pixel_ratio(this: &WebGLRenderer, ratio: f64);
    #[wasm_bindgen(method, js_name = setSize)]
    pub fn set_size(this: &WebGLRenderer, width: f64, height: f64, update_style: bool);
    #[wasm_bindgen(method)]
    pub fn render(this: &WebGLRenderer, scene: &Scene, camera: &PerspectiveCamera);
    #[wasm_bindgen(method, getter, js_name = domElement)]
    pub fn dom_element(this: &WebGLRenderer) -> web::HtmlCanvasElement;

    pub type BufferGeometry;

    #[wasm_bindgen(extends = BufferGeometry)]
    pub type OctahedronGeometry;

    #[wasm_bindgen(constructor)]
    pub fn new(radius: f64, detail: u32) -> OctahedronGeometry;

    #[wasm_bindgen(extends = BufferGeometry)]
    pub type BoxGeometry;

    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, depth: f64) -> BoxGeometry;

    #[wasm_bindgen(extends = BufferGeometry)]
    pub type SphereGeometry;

    #[wasm_bindgen(constructor)]
    pub fn new(radius: f64, width_segments: u32, height_segments: u32) -> SphereGeometry;

    pub type MeshStandardMaterial;

    #[wasm_bindgen(constructor)]
    pub fn new() -> MeshStandardMaterial;
    #[wasm_bindgen(method, getter)]
    pub fn color(this: &MeshStandardMaterial) -> Color;

    #[wasm_bindgen(extends = Object3D)]
    pub type Mesh;

    #[wasm_bindgen(constructor)]
    pub fn new(geometry: &BufferGeometry, material: &MeshStandardMaterial) -> Mesh;
    #[wasm_bindgen(method, getter)]
    pub fn material(this: &Mesh) -> MeshStandardMaterial;

    #[wasm_bindgen(extends = Object3D)]
    pub type SpotLight;

    #[wasm_bindgen(constructor)]
    pub fn new(
        color: u32,
        intensity: f64,
        distance: f64,
        angle: f64,
        penumbra: f64,
    ) -> SpotLight;

    #[wasm_bindgen(extends = Object3D)]
    pub type PointLight;

    #[wasm_bindgen(constructor)]
    pub fn new(color: u32, intensity: f64) -> PointLight;

    #[wasm_bindgen(extends = Object3D)]
    pub type AmbientLight;

    #[wasm_bindgen(constructor)]
    pub fn new(color: u32, intensity: f64) -> AmbientLight;
}

#[wasm_bindgen(module = "three-stdlib")]
extern "C" {
    pub type AsciiEffect;

    #[wasm_bindgen(constructor)]
    pub fn new(renderer: &WebGLRenderer, characters: &str, options: &JsValue) -> AsciiEffect;
    #[wasm_bindgen(method, getter, js_name = domElement)]
    pub fn dom_element(this: &AsciiEffect) -> web::HtmlElement;
    #[wasm_bindgen(method, js_name = setSize)]
    pub fn set_size(this: &AsciiEffect, width: f64, height: f64);
    #[wasm_bindgen(method)]
    pub fn render(this: &AsciiEffect, scene: &Scene, camera: &PerspectiveCamera);

    pub type OrbitControls;

    #[wasm_bindgen(constructor)]
    pub fn new(camera: &PerspectiveCamera, dom_element: &web::HtmlElement) -> OrbitControls;
    #[wasm_bindgen(method)]
    pub fn update(this: &OrbitControls) -> bool;
    #[wasm_bindgen(method, getter)]
    pub fn target(this: &OrbitControls) -> Vector3;
    #[wasm_bindgen(method)]
    pub fn dispose(this: &OrbitControls);
}
