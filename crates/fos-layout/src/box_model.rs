//! CSS Box Model

/// Box dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxDimensions {
    pub content: Rect,
    pub padding: EdgeSizes,
    pub border: EdgeSizes,
    pub margin: EdgeSizes,
}

/// Rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Edge sizes (top, right, bottom, left)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeSizes {
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl From<fos_dom::Edges> for EdgeSizes {
    fn from(edges: fos_dom::Edges) -> Self {
        Self {
            top: edges.top,
            bottom: edges.bottom,
            ..Self::default()
        }
    }
}

impl BoxDimensions {
    /// Get the area covered by content + padding
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.content.x - self.padding.left,
            y: self.content.y - self.padding.top,
            width: self.content.width + self.padding.left + self.padding.right,
            height: self.content.height + self.padding.top + self.padding.bottom,
        }
    }

    /// Get the area covered by content + padding + border
    pub fn border_box(&self) -> Rect {
        let padding = self.padding_box();
        Rect {
            x: padding.x - self.border.left,
            y: padding.y - self.border.top,
            width: padding.width + self.border.left + self.border.right,
            height: padding.height + self.border.top + self.border.bottom,
        }
    }

    /// Get the area covered by content + padding + border + margin
    pub fn margin_box(&self) -> Rect {
        let border = self.border_box();
        Rect {
            x: border.x - self.margin.left,
            y: border.y - self.margin.top,
            width: border.width + self.margin.left + self.margin.right,
            height: border.height + self.margin.top + self.margin.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_nest() {
        let edge = |v| EdgeSizes { top: v, right: v, bottom: v, left: v };
        let dims = BoxDimensions {
            content: Rect { x: 20.0, y: 20.0, width: 100.0, height: 50.0 },
            padding: edge(5.0),
            border: edge(2.0),
            margin: edge(10.0),
        };
        assert_eq!(dims.border_box().y, 13.0);
        assert_eq!(dims.margin_box().height, 84.0);
    }
}
