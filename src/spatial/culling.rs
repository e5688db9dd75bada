use crate::{
    core::viewport::{ProjectedPosition, Viewport},
    spatial::clustering::Cluster,
    traits::Locatable,
};

/// Screen-space visibility checks for cluster pins.
///
/// Culling looks at the unclamped projection: a pin is kept when its raw
/// position is inside the clamp range on both axes, so pins far outside the
/// window disappear instead of piling up on the clamped edge.
pub struct Culling;

impl Culling {
    /// Returns `true` if a raw position lies inside the viewport's render range.
    pub fn position_visible(viewport: &Viewport, raw: &ProjectedPosition) -> bool {
        let (min, max) = viewport.clamp_range();
        raw.within(min, max)
    }

    /// Returns `true` if the cluster's anchor should be drawn.
    pub fn cluster_visible<T: Locatable>(viewport: &Viewport, cluster: &Cluster<'_, T>) -> bool {
        Self::position_visible(viewport, &viewport.project_unclamped(&cluster.anchor))
    }

    /// Cull a slice of clusters, collecting the indices of the visible ones.
    pub fn visible_indices<T: Locatable>(
        viewport: &Viewport,
        clusters: &[Cluster<'_, T>],
    ) -> Vec<usize> {
        clusters
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| Self::cluster_visible(viewport, c).then_some(idx))
            .collect()
    }
}
