use serde::{Deserialize, Serialize};

/// Ordered chain of visual operations applied to a node.
///
/// Operations form a pipeline: the renderer applies them left to right, so
/// `[Padding(8), BackgroundColor]` and `[BackgroundColor, Padding(8)]` paint
/// different areas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Modifier {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Append an operation at the end of the pipeline.
    pub fn then(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }
}

/// One declarative visual transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operation {
    Padding {
        value: i32,
    },
    FillMaxSize,
    FillMaxWidth,
    FillMaxHeight,
    Width {
        value: i32,
    },
    Height {
        value: i32,
    },
    BackgroundColor {
        color: String,
    },
    Border {
        width: i32,
        color: String,
    },
    Shadow {
        elevation: i32,
    },
    Clip {
        shape: Shape,
    },
    Background {
        color: String,
        shape: Shape,
    },
    Alpha {
        value: f64,
    },
    Rotate {
        degrees: f64,
    },
}

impl Operation {
    /// Wire tags accepted for `composeModifier.operations[].type`.
    pub const TAGS: &'static [&'static str] = &[
        "Padding",
        "FillMaxSize",
        "FillMaxWidth",
        "FillMaxHeight",
        "Width",
        "Height",
        "BackgroundColor",
        "Border",
        "Shadow",
        "Clip",
        "Background",
        "Alpha",
        "Rotate",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Operation::Padding { .. } => "Padding",
            Operation::FillMaxSize => "FillMaxSize",
            Operation::FillMaxWidth => "FillMaxWidth",
            Operation::FillMaxHeight => "FillMaxHeight",
            Operation::Width { .. } => "Width",
            Operation::Height { .. } => "Height",
            Operation::BackgroundColor { .. } => "BackgroundColor",
            Operation::Border { .. } => "Border",
            Operation::Shadow { .. } => "Shadow",
            Operation::Clip { .. } => "Clip",
            Operation::Background { .. } => "Background",
            Operation::Alpha { .. } => "Alpha",
            Operation::Rotate { .. } => "Rotate",
        }
    }

    pub fn is_known_tag(tag: &str) -> bool {
        Self::TAGS.contains(&tag)
    }
}

/// Outline used by `Clip` and `Background`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Rectangle,
    Circle,
    RoundedCorner(CornerRadii),
}

impl Shape {
    pub fn rounded(radius: i32) -> Self {
        Shape::RoundedCorner(CornerRadii {
            radius: Some(radius),
            ..CornerRadii::default()
        })
    }
}

/// Corner radii for [`Shape::RoundedCorner`].
///
/// `radius` sets all four corners; a per-corner field overrides it for that
/// corner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadii {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_start: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_end: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_end: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_start: Option<i32>,
}

impl CornerRadii {
    /// Resolved radii in `[top_start, top_end, bottom_end, bottom_start]`
    /// order.
    pub fn resolved(&self) -> [i32; 4] {
        let base = self.radius.unwrap_or(0);
        [
            self.top_start.unwrap_or(base),
            self.top_end.unwrap_or(base),
            self.bottom_end.unwrap_or(base),
            self.bottom_start.unwrap_or(base),
        ]
    }
}
