// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive skinned-character viewer built on wgpu.
//!
//! Vitrine loads a glTF character, plays its skeletal animation, and renders
//! it with a shadow-casting light rig over a ground plane and a photo
//! backdrop. Clicking the character toggles playback; the camera orbits
//! under mouse control and idles into a slow auto-rotation.
//!
//! # Key entry points
//!
//! - [`engine::ViewerEngine`] - the rendering engine and application state
//! - [`options::Options`] - runtime configuration (playback, lighting,
//!   display, camera, keybindings)
//! - the `viewer` feature adds a standalone winit window; the `gui` feature
//!   adds an egui control panel drawn over the scene
//!
//! # Architecture
//!
//! Asset parsing runs on background threads; finished characters and
//! backdrops arrive over channels and are installed between frames. The
//! render path is a two-pass forward pipeline: a depth-only shadow pass
//! from the key light, then a lit pass drawing backdrop, ground plane, and
//! the skinned character with its joint palette.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
#[cfg(feature = "gui")]
pub mod gui;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::ViewerEngine;
pub use error::ViewerError;
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;

#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
