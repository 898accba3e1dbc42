use serde::{Deserialize, Serialize};

/// Visual prominence of a marker, ordered from least to most prominent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTier {
    Dot,
    Reduced,
    #[default]
    Full,
    Selected,
}

impl DisplayTier {
    pub const ALL: [DisplayTier; 4] = [
        DisplayTier::Dot,
        DisplayTier::Reduced,
        DisplayTier::Full,
        DisplayTier::Selected,
    ];

    /// The pane a marker of this tier is drawn on
    pub fn pane(self) -> Pane {
        match self {
            DisplayTier::Dot => Pane::Dot,
            DisplayTier::Reduced => Pane::Reduced,
            DisplayTier::Full => Pane::Full,
            DisplayTier::Selected => Pane::Selected,
        }
    }

    /// Whether the icon carries a text label at this tier
    pub fn shows_label(self) -> bool {
        matches!(self, DisplayTier::Full | DisplayTier::Selected)
    }
}

impl std::fmt::Display for DisplayTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayTier::Dot => write!(f, "dot"),
            DisplayTier::Reduced => write!(f, "reduced"),
            DisplayTier::Full => write!(f, "full"),
            DisplayTier::Selected => write!(f, "selected"),
        }
    }
}

/// A z-ordered rendering layer on the map surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    Dot,
    Reduced,
    Full,
    Selected,
}

impl Pane {
    /// Engine-facing pane name
    pub fn name(self) -> &'static str {
        match self {
            Pane::Dot => "marker-dot",
            Pane::Reduced => "marker-reduced",
            Pane::Full => "marker-full",
            Pane::Selected => "marker-selected",
        }
    }

    /// Stacking order; the selected pane sits above popups of the regular panes
    pub fn z_index(self) -> i32 {
        match self {
            Pane::Dot => 400,
            Pane::Reduced => 450,
            Pane::Full => 500,
            Pane::Selected => 650,
        }
    }
}

impl std::fmt::Display for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The tier and pane a marker is actually drawn with after hover is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Presentation {
    pub tier: DisplayTier,
    pub pane: Pane,
}

impl Presentation {
    /// Applies the hover rule: a hovered marker that is not already `selected`
    /// is drawn at `full` on the `selected` pane. Everything else keeps its
    /// assigned tier and that tier's pane.
    pub fn resolve(assigned: DisplayTier, hovered: bool) -> Self {
        if hovered && assigned != DisplayTier::Selected {
            Self {
                tier: DisplayTier::Full,
                pane: Pane::Selected,
            }
        } else {
            Self {
                tier: assigned,
                pane: assigned.pane(),
            }
        }
    }
}
