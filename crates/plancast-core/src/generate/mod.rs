//! Schematic render generation: prompt composition, the upstream call, and
//! tolerant response extraction.

pub mod extract;
pub mod prompt;
pub mod upstream;

pub use extract::extract_image_url;
pub use prompt::{PROMPT_TEMPLATE, build_prompt};
pub use upstream::{GenerateError, GeneratedImage, PlanGenerator};
