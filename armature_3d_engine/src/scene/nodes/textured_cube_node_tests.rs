use super::*;
use crate::renderer::{Config, HeadlessRenderer, Renderer};
use crate::resource::ResourceManager;

#[test]
fn test_default_texture_is_woodbox() {
    let node = TexturedCubeNode::new(Vec4::ONE);
    assert_eq!(node.texture_file(), "woodbox.bmp");
}

#[test]
fn test_draw_binds_texture() {
    let mut renderer = HeadlessRenderer::new(Config::default());
    let mut resources = ResourceManager::new();
    let mut node = TexturedCubeNode::new(Vec4::new(0.2, 0.2, 0.2, 1.0));
    node.initialise("Body", &mut RenderContext::new(&mut renderer, &mut resources)).unwrap();

    renderer.begin_frame().unwrap();
    node.render("Body", &Mat4::IDENTITY, &mut RenderContext::new(&mut renderer, &mut resources)).unwrap();
    renderer.end_frame().unwrap();

    assert!(renderer.commands().iter().any(|c| c == "create_shader shaderTexture.hlsl:PS Pixel"));
    assert!(renderer.commands().iter()
        .any(|c| c == "draw Body pipeline=Body/pipeline indices=36 texture=woodbox.bmp"));
}

#[test]
fn test_missing_texture_fails_initialise() {
    let mut renderer = HeadlessRenderer::new(Config::default());
    renderer.fail_resource("crate.bmp");
    let mut resources = ResourceManager::new();
    let mut node = TexturedCubeNode::with_texture(Vec4::ONE, "crate.bmp");

    let result = node.initialise("Body", &mut RenderContext::new(&mut renderer, &mut resources));

    assert!(result.is_err());
    assert!(!node.is_uploaded());
}
