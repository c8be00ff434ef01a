//! Code emission: per-widget policies and the project-level generator.

pub mod callbacks;
mod emitter;
mod generator;
pub mod literal;
pub mod policy;
pub mod tags;

pub use emitter::{EmitContext, emit, process};
pub use generator::{
    ARDUINO_SKELETON, CodeGenerator, GeneratorConfig, LINUX_SKELETON, bundled_skeleton,
    convert_enum, convert_key,
};
pub use literal::{create_char_literal, create_literal};
pub use policy::{EmitPolicy, Gate, policy_for};
