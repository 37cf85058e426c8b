use crate::{Component, ImageSource, RenderContext, RenderResult, SceneNode};
use std::rc::Rc;
use tracing::warn;

/// Places an image. A missing width or height follows the image's aspect
/// ratio; both missing means the intrinsic size.
#[derive(Debug, Clone)]
pub struct Image {
    pub image: Rc<ImageSource>,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Image {
    pub fn new(image: Rc<ImageSource>, x: f64, y: f64) -> Self {
        Self {
            image,
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

impl Component for Image {
    fn name(&self) -> &str {
        "Image"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let (width, height) = self.image.resolve_size(self.width, self.height);
        match cx.renderer().native_image() {
            Some(sink) => sink.image(&self.image, self.x, self.y, width, height),
            None => warn!("Renderer cannot draw images, skipping"),
        }
        Ok(None)
    }
}
