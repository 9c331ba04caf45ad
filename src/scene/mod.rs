//! A scene script is a JSON document that declares context options, named images, textures
//! and shadow masks, and a list of frames. Each frame is a list of commands tagged by `"op"`:
//! state changes, matrix operations, `draw` (a topology plus vertices), `blit`, `clear` and
//! `update_image`.
//!
//! ```json
//! {
//!   "opts": { "width": 64, "height": 64 },
//!   "images": { "dot": { "source": { "kind": "solid", "width": 2, "height": 2, "color": [255, 0, 0, 255] } } },
//!   "frames": [
//!     { "commands": [
//!       { "op": "draw", "topology": "triangles", "vertices": [
//!         { "position": [-0.5, -0.5, 0.0], "color": [0.0, 1.0, 0.0, 1.0] },
//!         { "position": [0.5, -0.5, 0.0] },
//!         { "position": [0.0, 0.5, 0.0] }
//!       ] },
//!       { "op": "blit", "image": "dot", "transform": { "position": [10, 10] } }
//!     ] },
//!     { "repeat": 3 }
//!   ]
//! }
//! ```

pub(crate) mod model;
mod runner;
mod script;

pub use runner::SceneRunner;
pub use script::SceneScript;
