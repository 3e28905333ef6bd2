//! Static wizard stage definitions
//!
//! The wizard walks a fixed, ordered roster of stages. Choice stages carry
//! the catalog filter field they feed; the final stage is the computed
//! product listing and has no options of its own.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Catalog filter field fed by a choice stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum StageId {
    #[strum(serialize = "type")]
    Type,
    #[strum(serialize = "material")]
    Material,
    #[strum(serialize = "connection")]
    Connection,
    #[strum(serialize = "size")]
    Size,
    #[strum(serialize = "pressure")]
    Pressure,
}

/// How a stage collects its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Pick one of a fixed option set (rendered as cards)
    ChoiceSet,
    /// Pick from a list or enter a free-form custom value
    FreeTextChoice,
    /// Final stage: product listing computed from the accumulated answers
    ComputedListing,
}

/// One selectable option within a choice stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: Option<&'static str>,
}

const fn opt(id: &'static str, name: &'static str) -> StageOption {
    StageOption {
        id,
        name,
        description: None,
    }
}

const fn opt_desc(
    id: &'static str,
    name: &'static str,
    description: &'static str,
) -> StageOption {
    StageOption {
        id,
        name,
        description: Some(description),
    }
}

/// Static definition of a single wizard stage
#[derive(Debug, Clone, Copy)]
pub struct StageDef {
    /// Ordinal position in the wizard sequence
    pub index: usize,
    /// Display title shown in the stage header
    pub title: &'static str,
    pub kind: StageKind,
    /// Filter field this stage feeds; `None` for the listing stage
    pub field: Option<StageId>,
    pub options: &'static [StageOption],
}

impl StageDef {
    /// Resolve an option id to its display name.
    pub fn option_name(&self, option_id: &str) -> Option<&'static str> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.name)
    }

    /// True if the stage accepts a free-form custom value in addition to
    /// its listed options.
    pub fn accepts_custom(&self) -> bool {
        !matches!(self.kind, StageKind::ComputedListing)
    }
}

const STAGES: &[StageDef] = &[
    StageDef {
        index: 0,
        title: "Select A Strainer Type",
        kind: StageKind::ChoiceSet,
        field: Some(StageId::Type),
        options: &[
            opt("y-strainer", "Y Strainer"),
            opt("basket-strainer", "Basket Strainer"),
            opt("duplex-strainer", "Duplex Strainer"),
        ],
    },
    StageDef {
        index: 1,
        title: "Choose A Material of Construction",
        kind: StageKind::ChoiceSet,
        field: Some(StageId::Material),
        options: &[
            opt_desc(
                "stainless-steel",
                "Stainless Steel",
                "Corrosion resistant and suitable for food, pharmaceutical, and chemical applications.",
            ),
            opt_desc(
                "carbon-steel",
                "Carbon Steel",
                "Cost-effective and strong with good thermal conductivity. Best for non-corrosive applications.",
            ),
            opt_desc(
                "cast-iron",
                "Cast Iron",
                "Excellent wear resistance and vibration dampening. Good for water, steam, and some chemicals.",
            ),
            opt_desc(
                "cast-stainless-steel",
                "Cast Stainless Steel",
                "High strength and corrosion resistance. Suitable for water, steam, and various chemicals.",
            ),
        ],
    },
    StageDef {
        index: 2,
        title: "Select End Connection",
        kind: StageKind::ChoiceSet,
        field: Some(StageId::Connection),
        options: &[
            opt("flanged", "Flanged"),
            opt("threaded", "Threaded"),
            opt("welded", "Welded"),
            opt("grooved", "Grooved"),
        ],
    },
    StageDef {
        index: 3,
        title: "Select Size",
        kind: StageKind::FreeTextChoice,
        field: Some(StageId::Size),
        options: &[
            opt("0.375", "3/8\""),
            opt("0.5", "1/2\""),
            opt("0.75", "3/4\""),
            opt("1", "1\""),
            opt("1.25", "1-1/4\""),
            opt("1.5", "1-1/2\""),
            opt("2", "2\""),
            opt("2.5", "2-1/2\""),
            opt("3", "3\""),
            opt("4", "4\""),
            opt("5", "5\""),
            opt("6", "6\""),
            opt("8", "8\""),
            opt("10", "10\""),
            opt("12", "12\""),
        ],
    },
    StageDef {
        index: 4,
        title: "Select Pressure Rating",
        kind: StageKind::FreeTextChoice,
        field: Some(StageId::Pressure),
        options: &[
            opt("125", "125# (PN16)"),
            opt("150", "150# (PN20)"),
            opt("300", "300# (PN50)"),
            opt("800", "800# (PN130)"),
            opt("1500", "1500# (PN250)"),
            opt("table-e", "Table E"),
        ],
    },
    StageDef {
        index: 5,
        title: "Available Products",
        kind: StageKind::ComputedListing,
        field: None,
        options: &[],
    },
];

/// The full stage roster, listing stage last.
pub fn stages() -> &'static [StageDef] {
    STAGES
}

/// Index of the computed listing stage (always last).
pub fn listing_index() -> usize {
    STAGES.len() - 1
}

/// Number of choice stages (everything before the listing).
pub fn choice_stage_count() -> usize {
    STAGES.len() - 1
}

/// Look up a stage by index.
pub fn stage(index: usize) -> Option<&'static StageDef> {
    STAGES.get(index)
}
