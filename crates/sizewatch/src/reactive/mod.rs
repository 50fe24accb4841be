//! Explicit reactive state for components that track element sizes.
//!
//! - [`Observable`]: shared, version-tracked value with change callbacks. A
//!   component re-renders by subscribing to the observables it reads.
//! - [`LayoutEffect`]: runs a setup closure after layout whenever its
//!   dependency changes, running the previous cleanup first.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`).

pub mod effect;
pub mod observable;

pub use effect::LayoutEffect;
pub use observable::Observable;
