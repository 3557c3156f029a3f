//! Measure identifiers and evaluation policies.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// One of the saliency quality measures this crate can compute.
///
/// Declaration order is the canonical report column order: the legacy
/// pixel-count trio first, then the toolbox-style measures with each
/// mask-tolerant variant next to its strict base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Maximum F over the legacy pixel-count precision/recall curves.
    #[serde(rename = "MAXF")]
    MaxFLegacy,
    /// Mean of the legacy adaptive-threshold F values.
    #[serde(rename = "MEANF")]
    MeanFLegacy,
    /// Mean absolute error (legacy path).
    #[serde(rename = "MAE")]
    Mae,
    /// Maximum F over the toolbox precision/recall curves.
    #[serde(rename = "Max-F")]
    MaxF,
    #[serde(rename = "Mod-Max-F")]
    ModMaxF,
    /// Adaptive-threshold F-measure.
    #[serde(rename = "Adp-F")]
    AdpF,
    #[serde(rename = "Mod-Adp-F")]
    ModAdpF,
    /// Distance-weighted F-measure.
    #[serde(rename = "Wgt-F")]
    WgtF,
    #[serde(rename = "Mod-Wgt-F")]
    ModWgtF,
    /// Enhanced-alignment measure.
    #[serde(rename = "E-measure")]
    EMeasure,
    /// Structure measure.
    #[serde(rename = "S-measure")]
    SMeasure,
    /// Mean squared error of the normalized prediction.
    #[serde(rename = "MAE2")]
    Mae2,
}

impl Measure {
    /// Every measure, in canonical report order.
    pub const ALL: [Self; 12] = [
        Self::MaxFLegacy,
        Self::MeanFLegacy,
        Self::Mae,
        Self::MaxF,
        Self::ModMaxF,
        Self::AdpF,
        Self::ModAdpF,
        Self::WgtF,
        Self::ModWgtF,
        Self::EMeasure,
        Self::SMeasure,
        Self::Mae2,
    ];

    /// Report column name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MaxFLegacy => "MAXF",
            Self::MeanFLegacy => "MEANF",
            Self::Mae => "MAE",
            Self::MaxF => "Max-F",
            Self::ModMaxF => "Mod-Max-F",
            Self::AdpF => "Adp-F",
            Self::ModAdpF => "Mod-Adp-F",
            Self::WgtF => "Wgt-F",
            Self::ModWgtF => "Mod-Wgt-F",
            Self::EMeasure => "E-measure",
            Self::SMeasure => "S-measure",
            Self::Mae2 => "MAE2",
        }
    }

    /// Inverse of [`Measure::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Whether this measure is produced by the legacy pixel-count path.
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::MaxFLegacy | Self::MeanFLegacy | Self::Mae)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of measures enabled for a run.
///
/// Iteration follows canonical report order. The default set enables every
/// measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureSet(BTreeSet<Measure>);

impl Default for MeasureSet {
    fn default() -> Self {
        Self(Measure::ALL.into_iter().collect())
    }
}

impl MeasureSet {
    pub fn new(measures: impl IntoIterator<Item = Measure>) -> Self {
        Self(measures.into_iter().collect())
    }

    pub fn contains(&self, measure: Measure) -> bool {
        self.0.contains(&measure)
    }

    pub fn iter(&self) -> impl Iterator<Item = Measure> + '_ {
        self.0.iter().copied()
    }

    /// Whether any measure of the legacy pixel-count path is enabled.
    pub fn any_legacy(&self) -> bool {
        self.0.iter().any(|m| m.is_legacy())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Measure> for MeasureSet {
    fn from_iter<T: IntoIterator<Item = Measure>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// How an F-family measure treats an all-background ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPolicy {
    /// A sample with no foreground scores 0 (scalar) or contributes no
    /// curve.
    Strict,
    /// A sample with no foreground is scored on background agreement, so a
    /// blank prediction against a blank mask scores 1.
    Tolerant,
}
