use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::region::Region;

/// File naming scheme for exported panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelNaming {
    /// `p1.png`, `p2.png`, ...
    #[default]
    Short,
    /// `panel_1.png`, `panel_2.png`, ...
    Long,
}

impl PanelNaming {
    /// File name of the panel at 1-based `index`.
    pub fn file_name(&self, index: usize) -> String {
        match self {
            Self::Short => format!("p{index}.png"),
            Self::Long => format!("panel_{index}.png"),
        }
    }
}

impl fmt::Display for PanelNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "p{{n}}.png"),
            Self::Long => write!(f, "panel_{{n}}.png"),
        }
    }
}

/// Reading order: top to bottom, then left to right, then creation order.
pub fn reading_order(a: &Region, b: &Region) -> Ordering {
    a.rect
        .top
        .total_cmp(&b.rect.top)
        .then_with(|| a.rect.left.total_cmp(&b.rect.left))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort regions into export order. Panel `n` is element `n - 1`.
pub fn order_for_export<'a>(mut regions: Vec<&'a Region>) -> Vec<&'a Region> {
    regions.sort_by(|a, b| reading_order(a, b));
    regions
}
