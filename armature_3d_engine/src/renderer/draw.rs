/// Draw call submitted to the backend between begin_frame and end_frame

use std::sync::Arc;
use crate::renderer::{Buffer, IndexType, Pipeline, Texture};

/// One indexed draw
///
/// The constant buffer is bound to the stages declared by the pipeline; the
/// optional texture goes to pixel-stage slot 0.
pub struct DrawCall<'a> {
    /// Label used in logs and command traces (usually the node name)
    pub label: &'a str,
    pub pipeline: &'a Arc<dyn Pipeline>,
    pub vertex_buffer: &'a Arc<dyn Buffer>,
    pub index_buffer: &'a Arc<dyn Buffer>,
    pub index_type: IndexType,
    pub index_count: u32,
    pub constant_buffer: &'a Arc<dyn Buffer>,
    pub texture: Option<&'a Arc<dyn Texture>>,
}
