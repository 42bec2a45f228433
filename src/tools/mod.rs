//! External tools and the seams the pipeline calls them through.
//!
//! - [`command`] - subprocess builder with logging and stdin payloads
//! - [`generator`] - [`ModelGenerator`] and the openapi-generator implementation
//! - [`renderer`] - [`TemplateRenderer`] with Tera and gomplate back-ends

pub mod command;
pub mod generator;
pub mod renderer;

pub use command::{ToolCommand, ToolOutput};
pub use generator::{ModelGenerator, OpenApiGenerator};
pub use renderer::{
    GomplateRenderer, Renderer, RendererBackend, TemplateRenderer, TeraRenderer, upper_first,
};
