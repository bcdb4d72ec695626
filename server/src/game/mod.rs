pub mod allocator;
pub mod clock;
pub mod engine;
pub mod lifecycle;
pub mod scoring;
pub mod types;
pub mod voting;
pub mod world;

pub use engine::Engine;
