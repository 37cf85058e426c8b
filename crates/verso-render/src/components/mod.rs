//! Built-in components.
//!
//! Each component is a plain struct with builder methods. Wrap one with
//! [`SceneNode::component`](crate::SceneNode::component) to place it in a scene.

mod canvas;
mod group;
mod image;
mod path;
mod primitives;
mod text;

pub use canvas::Canvas;
pub use group::Group;
pub use image::Image;
pub use path::{PathShape, PathSource};
pub use primitives::{Circle, Ellipse, Line, Polygon, Rectangle};
pub use text::Text;
