//! Drawing canvas core for interactive test questions.
//!
//! Students answer some questions by drawing: circling objects, connecting
//! matching pairs with lines, or stamping shapes to finish a sequence. This
//! crate owns that interaction state and the answer it produces. It compiles
//! to WebAssembly for the browser host and as a plain library for the server,
//! which reads the same answer types when grading.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`primitive`] | Geometric primitives and their JSON form |
//! | [`session`] | Per-question drawing state machine |
//! | [`history`] | Bounded undo/redo snapshot stacks |
//! | [`hit`] | Hit-testing for the select tool |
//! | [`answer`] | Answer normalization and graded item types |
//! | [`bindings`] | `wasm-bindgen` surface for the JavaScript host |
//! | [`consts`] | Default sizes, palette, limits |

pub mod answer;
pub mod bindings;
pub mod consts;
pub mod history;
pub mod hit;
pub mod primitive;
pub mod session;
