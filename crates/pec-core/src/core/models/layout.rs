use super::feature::Feature;
use super::ids::FeatureId;
use super::pattern::Pattern;
use slotmap::SlotMap;

/// The set of leaf exposure features for one correction run.
///
/// Features live in a slot map for cheap ID-based lookup, with a separate
/// insertion-order list so iteration (and therefore solver output and report
/// ordering) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ExposureLayout {
    features: SlotMap<FeatureId, Feature>,
    order: Vec<FeatureId>,
}

impl ExposureLayout {
    /// Creates a new, empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layout by flattening `patterns` in order.
    pub fn from_patterns(patterns: &[Pattern]) -> Self {
        let mut layout = Self::new();
        for pattern in patterns {
            for feature in pattern.flatten() {
                layout.add_feature(feature);
            }
        }
        layout
    }

    /// Inserts a feature and returns its ID.
    pub fn add_feature(&mut self, feature: Feature) -> FeatureId {
        let id = self.features.insert(feature);
        self.order.push(id);
        id
    }

    /// Looks up a feature by ID.
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id)
    }

    /// The ordinal position of a feature in insertion order, used as the
    /// stable record ID in exported reports.
    pub fn index_of(&self, id: FeatureId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Iterates features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &Feature)> {
        self.order.iter().map(|&id| (id, &self.features[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
