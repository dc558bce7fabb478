//! Utility helpers shared across widget modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from component and
//! session logic to improve reuse and testability.

pub mod color;
pub mod storage;
