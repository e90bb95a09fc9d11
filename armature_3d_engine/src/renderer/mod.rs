/// Renderer module - backend contract and the headless backend

pub mod renderer;
pub mod buffer;
pub mod shader;
pub mod pipeline;
pub mod texture;
pub mod draw;
pub mod lighting;
pub mod headless_renderer;

pub use renderer::*;
pub use buffer::*;
pub use shader::*;
pub use pipeline::*;
pub use texture::*;
pub use draw::*;
pub use lighting::*;
pub use headless_renderer::HeadlessRenderer;
