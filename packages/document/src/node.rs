use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub data: NodeData,
}

/// Kind-specific node properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeData {
    /// Document root; its children are pages
    Document,

    /// Top-level canvas
    Page,

    /// Container with optional auto layout
    Frame(FrameProps),

    /// Text-bearing leaf
    Text(TextProps),

    /// Plain shape leaf
    Rectangle {
        #[serde(default)]
        fills: Vec<Rgb>,
    },
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, data: NodeData) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            data,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Whether this node may hold children
    pub fn is_container(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document | NodeData::Page | NodeData::Frame(_)
        )
    }

    pub fn as_text(&self) -> Option<&TextProps> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameProps> {
        match &self.data {
            NodeData::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}

/// Frame properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameProps {
    #[serde(default)]
    pub layout: AutoLayout,
    #[serde(default)]
    pub fills: Vec<Rgb>,
    #[serde(default)]
    pub corner_radius: f64,
}

/// Auto-layout settings of a frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLayout {
    #[serde(default)]
    pub mode: LayoutMode,
    /// Sizing along the layout direction
    #[serde(default)]
    pub primary_sizing: Sizing,
    /// Sizing across the layout direction
    #[serde(default)]
    pub counter_sizing: Sizing,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default)]
    pub item_spacing: f64,
}

impl AutoLayout {
    /// Auto layout that hugs its contents in both directions
    pub fn hug(mode: LayoutMode) -> Self {
        Self {
            mode,
            primary_sizing: Sizing::Auto,
            counter_sizing: Sizing::Auto,
            padding: Padding::default(),
            item_spacing: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_item_spacing(mut self, spacing: f64) -> Self {
        self.item_spacing = spacing;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sizing {
    #[default]
    Fixed,
    /// Hug contents
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(value: f64) -> Self {
        Self {
            top: 0.0,
            right: value,
            bottom: 0.0,
            left: value,
        }
    }
}

/// Solid fill color, channels in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f64) -> Self {
        Self::new(level, level, level)
    }
}

/// Text properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub characters: String,
    #[serde(default)]
    pub font: FontName,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_weight")]
    pub font_weight: u16,
}

fn default_font_size() -> f64 {
    12.0
}

fn default_font_weight() -> u16 {
    400
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            characters: String::new(),
            font: FontName::default(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
        }
    }
}

/// Typeface family plus style, e.g. `Inter Bold`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    pub fn inter(style: impl Into<String>) -> Self {
        Self::new("Inter", style)
    }

    /// Numeric weight implied by the style name
    pub fn weight(&self) -> u16 {
        let style = self.style.to_ascii_lowercase().replace([' ', '-'], "");
        match style.as_str() {
            s if s.starts_with("thin") => 100,
            s if s.starts_with("extralight") => 200,
            s if s.starts_with("light") => 300,
            s if s.starts_with("medium") => 500,
            s if s.starts_with("semibold") => 600,
            s if s.starts_with("extrabold") => 800,
            s if s.starts_with("bold") => 700,
            s if s.starts_with("black") => 900,
            _ => 400,
        }
    }
}

impl Default for FontName {
    fn default() -> Self {
        Self::inter("Regular")
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_from_style() {
        assert_eq!(FontName::inter("Regular").weight(), 400);
        assert_eq!(FontName::inter("Bold").weight(), 700);
        assert_eq!(FontName::inter("Semi Bold").weight(), 600);
        assert_eq!(FontName::inter("ExtraBold").weight(), 800);
        assert_eq!(FontName::inter("Light Italic").weight(), 300);
    }

    #[test]
    fn test_node_data_serialization() {
        let node = Node::new(
            NodeId::from("1:2"),
            "Heading",
            NodeData::Text(TextProps {
                characters: "Overview".to_string(),
                ..TextProps::default()
            }),
        );

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["data"]["type"], "TEXT");
        assert_eq!(json["data"]["characters"], "Overview");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
