//! Compass face rendering
//!
//! Turns direction results and the current heading into element transforms.
//! The renderer only reads [`DirectionResult`] values and a heading; it never
//! computes geodesic quantities itself.

use crate::algorithms::geo_math::format_distance;
use crate::core::{
    DirectionResult, DistanceUnit, Landmark, DEFAULT_COMPASS_DIAMETER_PX, DISTANCE_PLACEHOLDER,
    LANDMARK_MARGIN_PX,
};
use nalgebra::Vector2;
use std::fmt;

/// Vertical nudge applied after lifting an icon by its own height (px)
pub const ICON_BASE_OFFSET_PX: f64 = 20.0;

/// Dial label positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [Cardinal::North, Cardinal::East, Cardinal::South, Cardinal::West];

    pub fn label(&self) -> &'static str {
        match self {
            Cardinal::North => "N",
            Cardinal::East => "E",
            Cardinal::South => "S",
            Cardinal::West => "W",
        }
    }
}

/// Addressable piece of the compass face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element<'a> {
    LandmarkIcon(&'a str),
    CompassLine(&'a str),
    DistanceLabel(&'a str),
    /// Ring carrying the cardinal labels
    DialFrame,
    DialLabel(Cardinal),
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::LandmarkIcon(id) => write!(f, "compass-{}", id),
            Element::CompassLine(id) => write!(f, "line-{}", id),
            Element::DistanceLabel(id) => write!(f, "distance-{}", id),
            Element::DialFrame => write!(f, "compass-directions"),
            Element::DialLabel(cardinal) => write!(f, "direction-{}", cardinal.label()),
        }
    }
}

/// 2D transform applied to an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate { x: f64, y: f64 },
    Rotate { degrees: f64 },
    /// Horizontally centred, then rotated
    CenteredXRotate { degrees: f64 },
    /// Vertically centred, then rotated
    CenteredYRotate { degrees: f64 },
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Transform::Translate { x, y } => write!(f, "translate({}px, {}px)", css(x), css(y)),
            Transform::Rotate { degrees } => write!(f, "rotate({}deg)", css(degrees)),
            Transform::CenteredXRotate { degrees } => {
                write!(f, "translateX(-50%) rotate({}deg)", css(degrees))
            }
            Transform::CenteredYRotate { degrees } => {
                write!(f, "translateY(-50%) rotate({}deg)", css(degrees))
            }
        }
    }
}

/// Fold negative zero so equal inputs always print the same text
fn css(value: f64) -> f64 {
    value + 0.0
}

/// Margins that put an icon's visual base on its placement point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconAnchor {
    pub margin_left_px: f64,
    pub margin_top_px: f64,
}

impl IconAnchor {
    /// Unmeasured icons are treated as zero-sized
    pub fn for_icon(size: Option<(f64, f64)>) -> Self {
        let (width, height) = size.unwrap_or((0.0, 0.0));
        Self {
            margin_left_px: css(-(width / 2.0)),
            margin_top_px: css(-height + ICON_BASE_OFFSET_PX),
        }
    }
}

/// Display surface owned by the host UI
pub trait RenderSink {
    /// Rendered compass diameter, if it can be measured
    fn compass_diameter_px(&self) -> Option<f64>;

    /// Rendered icon width and height, if loaded
    fn icon_size_px(&self, landmark_id: &str) -> Option<(f64, f64)>;

    fn set_transform(&mut self, element: Element<'_>, transform: &Transform);

    fn set_icon_anchor(&mut self, landmark_id: &str, anchor: &IconAnchor);

    fn set_text(&mut self, element: Element<'_>, text: &str);
}

/// Places landmark icons, compass lines, distance labels and the dial
#[derive(Debug, Clone)]
pub struct CompassRenderer {
    margin_px: f64,
    fallback_diameter_px: f64,
    unit: DistanceUnit,
}

impl Default for CompassRenderer {
    fn default() -> Self {
        Self::new(LANDMARK_MARGIN_PX, DEFAULT_COMPASS_DIAMETER_PX, DistanceUnit::Metric)
    }
}

impl CompassRenderer {
    pub fn new(margin_px: f64, fallback_diameter_px: f64, unit: DistanceUnit) -> Self {
        Self {
            margin_px,
            fallback_diameter_px,
            unit,
        }
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: DistanceUnit) {
        self.unit = unit;
    }

    /// Bearing as seen from the device. Deliberately not wrapped: rotation
    /// transforms accept any angle.
    pub fn relative_bearing(bearing_degrees: f64, heading_degrees: f64) -> f64 {
        bearing_degrees - heading_degrees
    }

    /// Screen offset from the compass centre. Screen y grows downward, so
    /// shifting by -90 degrees puts a relative bearing of 0 straight up.
    pub fn icon_offset(relative_bearing: f64, radius_px: f64) -> Vector2<f64> {
        let angle = (relative_bearing - 90.0).to_radians();
        Vector2::new(radius_px * angle.cos(), radius_px * angle.sin())
    }

    /// Radius of the icon ring for the sink's current compass size
    pub fn ring_radius(&self, sink: &dyn RenderSink) -> f64 {
        let diameter = sink
            .compass_diameter_px()
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(self.fallback_diameter_px);
        diameter / 2.0 - self.margin_px
    }

    /// Position one landmark's icon and compass line
    pub fn place_landmark(&self, sink: &mut dyn RenderSink, result: &DirectionResult, heading_degrees: f64) {
        let id = result.landmark_id.as_str();
        let relative = Self::relative_bearing(result.bearing_degrees, heading_degrees);
        let offset = Self::icon_offset(relative, self.ring_radius(sink));

        let anchor = IconAnchor::for_icon(sink.icon_size_px(id));
        sink.set_icon_anchor(id, &anchor);
        sink.set_transform(
            Element::LandmarkIcon(id),
            &Transform::Translate {
                x: offset.x,
                y: offset.y,
            },
        );
        sink.set_transform(Element::CompassLine(id), &Transform::CenteredXRotate { degrees: relative });
    }

    pub fn label_distance(&self, sink: &mut dyn RenderSink, result: &DirectionResult) {
        let text = format_distance(result.distance_km, self.unit);
        sink.set_text(Element::DistanceLabel(&result.landmark_id), &text);
    }

    /// Full pass over every result: placement plus distance label
    pub fn render_landmarks(&self, sink: &mut dyn RenderSink, results: &[DirectionResult], heading_degrees: f64) {
        for result in results {
            self.place_landmark(sink, result, heading_degrees);
            self.label_distance(sink, result);
        }
    }

    /// Distance labels only, e.g. after a unit change
    pub fn render_distances(&self, sink: &mut dyn RenderSink, results: &[DirectionResult]) {
        for result in results {
            self.label_distance(sink, result);
        }
    }

    /// Keep the dial earth-referenced: the ring turns against the heading,
    /// the labels turn back so their text stays upright.
    pub fn render_dial(&self, sink: &mut dyn RenderSink, heading_degrees: f64) {
        sink.set_transform(Element::DialFrame, &Transform::Rotate { degrees: -heading_degrees });

        for cardinal in Cardinal::ALL {
            let transform = match cardinal {
                Cardinal::North | Cardinal::South => Transform::CenteredXRotate { degrees: heading_degrees },
                Cardinal::East | Cardinal::West => Transform::CenteredYRotate { degrees: heading_degrees },
            };
            sink.set_transform(Element::DialLabel(cardinal), &transform);
        }
    }

    /// Dial plus every landmark
    pub fn render_all(&self, sink: &mut dyn RenderSink, results: &[DirectionResult], heading_degrees: f64) {
        self.render_dial(sink, heading_degrees);
        self.render_landmarks(sink, results, heading_degrees);
    }

    /// Placeholder distance labels before any fix
    pub fn render_placeholders(&self, sink: &mut dyn RenderSink, landmarks: &[Landmark]) {
        for landmark in landmarks {
            sink.set_text(Element::DistanceLabel(&landmark.id), DISTANCE_PLACEHOLDER);
        }
    }
}
