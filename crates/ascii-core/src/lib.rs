//! Platform-free core of ascii-shape: the render loop, the scene graph, the
//! rotating shape controller and the bridge that runs a host ASCII effect
//! as an order-controlled render pass.

pub mod bridge;
pub mod constants;
pub mod effect;
pub mod error;
pub mod picking;
pub mod render_loop;
pub mod scene;
pub mod shape;
pub mod stage;
pub mod state;

pub use bridge::*;
pub use constants::*;
pub use effect::*;
pub use error::*;
pub use render_loop::*;
pub use scene::*;
pub use shape::*;
pub use stage::*;
pub use state::*;
