//! Image synthesis: prompt tiers, the service boundary, and the retrying synthesizer.

pub mod clock;
pub mod deadline;
pub mod imagen;
pub mod request;
pub mod service;
pub mod synthesizer;

#[cfg(test)]
#[path = "../../tests/unit/synth/request.rs"]
mod request_tests;

#[cfg(test)]
#[path = "../../tests/unit/synth/imagen.rs"]
mod imagen_tests;

#[cfg(test)]
#[path = "../../tests/unit/synth/deadline.rs"]
mod deadline_tests;
