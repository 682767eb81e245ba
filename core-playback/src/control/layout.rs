//! # Control Layout Description
//!
//! The default control panel expressed as data: anchor constraints plus
//! element styles. There is no layout engine here; hosts translate a
//! [`ControlLayout`] into their own constraint system (Auto Layout,
//! ConstraintLayout, a flexbox, ...).
//!
//! A constraint reads as `element.attribute = anchor + offset`. For
//! [`Anchor::Constant`] the offset is the value itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    PlayButton,
    BackButton,
    TitleLabel,
    CurrentSecondLabel,
    DurationSecondsLabel,
    LoadedProgress,
    PlayingSlider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
    Width,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// An attribute of the surface's container.
    Container(Attribute),
    /// An attribute of a sibling element.
    Element(ElementKind, Attribute),
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub attribute: Attribute,
    pub anchor: Anchor,
    pub offset: f64,
}

impl Constraint {
    pub fn to_container(attribute: Attribute, container: Attribute, offset: f64) -> Self {
        Self {
            attribute,
            anchor: Anchor::Container(container),
            offset,
        }
    }

    pub fn to_element(attribute: Attribute, kind: ElementKind, other: Attribute, offset: f64) -> Self {
        Self {
            attribute,
            anchor: Anchor::Element(kind, other),
            offset,
        }
    }

    pub fn constant(attribute: Attribute, value: f64) -> Self {
        Self {
            attribute,
            anchor: Anchor::Constant,
            offset: value,
        }
    }
}

/// RGBA, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const ORANGE: Color = Color::rgb(1.0, 0.5, 0.0);
    pub const CLEAR: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
    };

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementStyle {
    Button {
        image: String,
        /// Image shown while the button is selected.
        selected_image: Option<String>,
    },
    Label {
        /// `None` keeps the platform's default font.
        font_size: Option<f64>,
        text_color: Color,
    },
    Progress {
        track_tint: Color,
        progress_tint: Color,
    },
    Slider {
        thumb_image: String,
        minimum_track_tint: Color,
        maximum_track_tint: Color,
        track_height: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub constraints: Vec<Constraint>,
    pub style: ElementStyle,
}

/// Elements in insertion (back-to-front) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlLayout {
    pub elements: Vec<ElementSpec>,
}

impl ControlLayout {
    /// The stock panel: back button and title along the top edge, transport
    /// row (play, elapsed, progress/slider, duration) along the bottom.
    pub fn standard() -> Self {
        use Attribute::*;
        use ElementKind::*;

        let label = |font_size| ElementStyle::Label {
            font_size,
            text_color: Color::WHITE,
        };

        Self {
            elements: vec![
                ElementSpec {
                    kind: PlayButton,
                    constraints: vec![
                        Constraint::to_container(Left, Left, 16.0),
                        Constraint::to_container(CenterY, Bottom, -20.0),
                        Constraint::constant(Width, 30.0),
                        Constraint::constant(Height, 30.0),
                    ],
                    style: ElementStyle::Button {
                        image: "to_play".into(),
                        selected_image: Some("to_pause".into()),
                    },
                },
                ElementSpec {
                    kind: BackButton,
                    constraints: vec![
                        Constraint::to_container(CenterY, Top, 32.0),
                        Constraint::to_container(CenterX, Left, 22.0),
                        Constraint::constant(Width, 64.0),
                        Constraint::constant(Height, 64.0),
                    ],
                    style: ElementStyle::Button {
                        image: "back".into(),
                        selected_image: None,
                    },
                },
                ElementSpec {
                    kind: TitleLabel,
                    constraints: vec![
                        Constraint::to_element(CenterY, BackButton, CenterY, 0.0),
                        Constraint::to_element(Left, BackButton, CenterX, 16.0),
                    ],
                    style: label(None),
                },
                ElementSpec {
                    kind: CurrentSecondLabel,
                    constraints: vec![
                        Constraint::to_element(Left, PlayButton, Right, 5.0),
                        Constraint::to_element(CenterY, PlayButton, CenterY, 0.0),
                        // Fixed so the track does not jump as digits change.
                        Constraint::constant(Width, 35.0),
                    ],
                    style: label(Some(12.0)),
                },
                ElementSpec {
                    kind: DurationSecondsLabel,
                    constraints: vec![
                        Constraint::to_container(Right, Right, -16.0),
                        Constraint::to_element(CenterY, PlayButton, CenterY, 0.0),
                    ],
                    style: label(Some(12.0)),
                },
                ElementSpec {
                    kind: LoadedProgress,
                    constraints: vec![
                        Constraint::to_element(Left, CurrentSecondLabel, Right, 5.0),
                        Constraint::to_element(Right, DurationSecondsLabel, Left, -5.0),
                        Constraint::to_element(CenterY, PlayButton, CenterY, 0.0),
                        Constraint::constant(Height, 2.5),
                    ],
                    style: ElementStyle::Progress {
                        track_tint: Color::WHITE,
                        progress_tint: Color::GREEN,
                    },
                },
                ElementSpec {
                    kind: PlayingSlider,
                    // Same edges as the progress bar, drawn on top of it.
                    constraints: [Left, Right, Top, Bottom]
                        .into_iter()
                        .map(|edge| Constraint::to_element(edge, LoadedProgress, edge, 0.0))
                        .collect(),
                    style: ElementStyle::Slider {
                        thumb_image: "slider_thumb".into(),
                        minimum_track_tint: Color::ORANGE,
                        maximum_track_tint: Color::CLEAR,
                        track_height: 2.5,
                    },
                },
            ],
        }
    }

    pub fn element(&self, kind: ElementKind) -> Option<&ElementSpec> {
        self.elements.iter().find(|spec| spec.kind == kind)
    }
}

impl Default for ControlLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_every_element_once() {
        let layout = ControlLayout::standard();
        assert_eq!(layout.elements.len(), 7);
        for kind in [
            ElementKind::PlayButton,
            ElementKind::BackButton,
            ElementKind::TitleLabel,
            ElementKind::CurrentSecondLabel,
            ElementKind::DurationSecondsLabel,
            ElementKind::LoadedProgress,
            ElementKind::PlayingSlider,
        ] {
            assert_eq!(
                layout.elements.iter().filter(|e| e.kind == kind).count(),
                1,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn test_play_button_geometry() {
        let layout = ControlLayout::standard();
        let play = layout.element(ElementKind::PlayButton).unwrap();
        assert!(play
            .constraints
            .contains(&Constraint::to_container(Attribute::CenterY, Attribute::Bottom, -20.0)));
        assert!(play.constraints.contains(&Constraint::constant(Attribute::Width, 30.0)));
        assert_eq!(
            play.style,
            ElementStyle::Button {
                image: "to_play".into(),
                selected_image: Some("to_pause".into()),
            }
        );
    }

    #[test]
    fn test_slider_tracks_progress_edges() {
        let layout = ControlLayout::standard();
        let slider = layout.element(ElementKind::PlayingSlider).unwrap();
        for c in &slider.constraints {
            match c.anchor {
                Anchor::Element(kind, attribute) => {
                    assert_eq!(kind, ElementKind::LoadedProgress);
                    assert_eq!(attribute, c.attribute);
                    assert_eq!(c.offset, 0.0);
                }
                Anchor::Constant => assert_eq!(c.attribute, Attribute::Height),
                Anchor::Container(_) => panic!("slider must not anchor to the container"),
            }
        }
    }

    #[test]
    fn test_label_styles() {
        let layout = ControlLayout::standard();
        let elapsed = layout.element(ElementKind::CurrentSecondLabel).unwrap();
        assert_eq!(
            elapsed.style,
            ElementStyle::Label {
                font_size: Some(12.0),
                text_color: Color::WHITE,
            }
        );
    }

    #[test]
    fn test_layout_serializes() {
        let layout = ControlLayout::standard();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("\"kind\":\"playing_slider\""));
        assert!(json.contains("\"type\":\"slider\""));
        let back: ControlLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
