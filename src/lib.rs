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
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
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

//! Interactive 3D segment viewer with feature-point picking, built on wgpu.
//!
//! Linemark renders a line segment with three highlightable feature-point
//! markers (start, end, center). A mouse click picks the nearest drawable
//! under the cursor and highlights the closest feature point; a key press
//! toggles marker visibility.
//!
//! # Key entry points
//!
//! - [`engine::SegmentRenderEngine`] - the render engine and command
//!   executor
//! - [`scene::SegmentEntity`] - the segment entity with its markers and
//!   highlight state
//! - [`picking`] - screen-space pick and feature-point resolution
//! - [`options::Options`] - runtime configuration (camera, colors,
//!   keybindings)
//!
//! # Architecture
//!
//! Everything runs single-threaded and event-driven: window events are
//! translated into [`input::InputEvent`] values, the
//! [`input::InputProcessor`] turns them into
//! [`engine::LinemarkCommand`]s, and the engine executes them against the
//! scene before the next frame is drawn.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{LinemarkCommand, SegmentRenderEngine};
pub use error::LinemarkError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
pub use scene::{FeaturePoint, Scene, SegmentEntity};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
