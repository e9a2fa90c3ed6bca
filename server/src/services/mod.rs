//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own grading logic and capture storage so route handlers
//! can stay focused on request decoding and response shaping.

pub mod analysis;
pub mod capture;
pub mod fallback;
pub mod tolerance;
