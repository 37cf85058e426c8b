use crate::{Component, RenderContext, RenderResult, SceneNode, Style};
use verso_geometry::{CompoundPath, DrawingInstruction, Path, PathData};

/// Where a path component gets its outline from.
#[derive(Debug, Clone)]
pub enum PathSource {
    Path(Path),
    Compound(CompoundPath),
    Data(PathData),
    /// SVG path data, parsed when rendered.
    Svg(String),
    /// Instructions passed to the renderer verbatim.
    Instructions(Vec<DrawingInstruction>),
}

impl From<Path> for PathSource {
    fn from(path: Path) -> Self {
        PathSource::Path(path)
    }
}

impl From<CompoundPath> for PathSource {
    fn from(path: CompoundPath) -> Self {
        PathSource::Compound(path)
    }
}

impl From<PathData> for PathSource {
    fn from(data: PathData) -> Self {
        PathSource::Data(data)
    }
}

impl From<&str> for PathSource {
    fn from(d: &str) -> Self {
        PathSource::Svg(d.to_string())
    }
}

impl From<Vec<DrawingInstruction>> for PathSource {
    fn from(instructions: Vec<DrawingInstruction>) -> Self {
        PathSource::Instructions(instructions)
    }
}

impl PathSource {
    /// Canonical instructions for this outline.
    pub fn to_instructions(&self) -> RenderResult<Vec<DrawingInstruction>> {
        Ok(match self {
            PathSource::Path(path) => path.to_instructions(),
            PathSource::Compound(path) => path.to_instructions(),
            PathSource::Data(data) => data.to_instructions(),
            PathSource::Svg(d) => verso_svg::parse_path_data(d)?.to_instructions(),
            PathSource::Instructions(instructions) => instructions.clone(),
        })
    }
}

/// Draws an arbitrary outline.
#[derive(Debug, Clone)]
pub struct PathShape {
    pub source: PathSource,
    pub style: Style,
}

impl PathShape {
    pub fn new(source: impl Into<PathSource>) -> Self {
        Self {
            source: source.into(),
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for PathShape {
    fn name(&self) -> &str {
        "Path"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let instructions = self.source.to_instructions()?;
        cx.draw_path(&instructions, &self.style);
        Ok(None)
    }
}
