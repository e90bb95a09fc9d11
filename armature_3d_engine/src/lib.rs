/*!
# Armature 3D Engine

Scene-graph renderer for articulated figures.

A `SceneGraph` holds named graph and leaf nodes in an arena; each node has a
local transform and a cumulative world transform, and lifecycle calls
(initialise, update, render, shutdown) traverse the tree depth-first in
insertion order. Leaves draw through the backend-agnostic `Renderer` trait;
`HeadlessRenderer` is the in-memory backend used by the demo and the tests.

## Architecture

- **SceneGraph / SceneNode**: arena tree, lookup by name, removal, traversal
- **Renderable**: contract for leaf kinds (cube, teapot, textured cube, model)
- **Renderer**: factory for buffers, shaders, pipelines and textures plus frame calls
- **ResourceManager**: reference-counted meshes loaded from `MeshSource`s
- **Framework / Application**: per-frame driver
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod framework;

// Main armature3d namespace module
pub mod armature3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Renderer backend trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, SeverityFilter};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Frame driver
    pub mod framework {
        pub use crate::framework::*;
    }
}

// Re-export math library at crate root
pub use glam;
