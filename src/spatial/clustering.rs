use crate::prelude::HashMap;
use crate::{
    core::{
        config::{ClusterStrategy, MapViewOptions},
        geo::GeoPoint,
        viewport::{ProjectedPosition, Viewport},
    },
    traits::Locatable,
};

/// A group of records whose pins land close together on screen
///
/// Holds borrowed records only; clusters are rebuilt on every call and never
/// outlive the list they were computed from.
#[derive(Debug, Clone)]
pub struct Cluster<'a, T> {
    /// Identifier of the first member
    pub id: String,
    /// Coordinates of the first member. Fixed once the cluster is formed.
    pub anchor: GeoPoint,
    /// Members in input order
    pub members: Vec<&'a T>,
}

impl<'a, T: Locatable> Cluster<'a, T> {
    /// Starts a cluster anchored at its first member
    pub fn new(first: &'a T) -> Self {
        Self {
            id: first.id().to_string(),
            anchor: first.location(),
            members: vec![first],
        }
    }

    /// Get the number of items in the cluster
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Check if this is a single-item cluster
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    pub fn member_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id()).collect()
    }
}

/// Configuration for clustering
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringConfig {
    /// When off, every record becomes its own cluster
    pub enabled: bool,
    /// Maximum distance (percent units, exclusive) to join a cluster
    pub threshold: f64,
    pub strategy: ClusterStrategy,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self::from(&MapViewOptions::default())
    }
}

impl From<&MapViewOptions> for ClusteringConfig {
    fn from(options: &MapViewOptions) -> Self {
        Self {
            enabled: options.clustering_enabled,
            threshold: options.cluster_threshold,
            strategy: options.strategy,
        }
    }
}

/// Greedy grouping of records in projected screen space
///
/// Each record joins the first existing cluster whose anchor projects closer
/// than the threshold, otherwise it starts a new one. The result depends
/// only on the input order and the viewport.
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    config: ClusteringConfig,
}

impl Clustering {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Update the clustering configuration
    pub fn set_config(&mut self, config: ClusteringConfig) {
        self.config = config;
    }

    /// Groups the records for the given viewport
    pub fn cluster<'a, T, I>(&self, records: I, viewport: &Viewport) -> Vec<Cluster<'a, T>>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        if !self.config.enabled {
            return records.into_iter().map(Cluster::new).collect();
        }

        let clusters = match self.config.strategy {
            ClusterStrategy::Linear => self.linear(records, viewport),
            ClusterStrategy::Grid => self.grid(records, viewport),
        };
        log::debug!(
            "clustered into {} groups at zoom {}",
            clusters.len(),
            viewport.zoom()
        );
        clusters
    }

    /// O(n·k) scan over the clusters formed so far
    fn linear<'a, T, I>(&self, records: I, viewport: &Viewport) -> Vec<Cluster<'a, T>>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut clusters: Vec<Cluster<'a, T>> = Vec::new();
        // Anchor positions, parallel to `clusters`
        let mut anchors: Vec<ProjectedPosition> = Vec::new();

        for record in records {
            let pos = viewport.project(&record.location());
            match anchors
                .iter()
                .position(|anchor| pos.distance_to(anchor) < self.config.threshold)
            {
                Some(index) => clusters[index].members.push(record),
                None => {
                    anchors.push(pos);
                    clusters.push(Cluster::new(record));
                }
            }
        }

        clusters
    }

    /// Same grouping as `linear`, with anchors bucketed by grid cell
    ///
    /// Cells are one threshold wide, so any anchor within range of a point
    /// sits in the point's cell or one of its eight neighbours.
    fn grid<'a, T, I>(&self, records: I, viewport: &Viewport) -> Vec<Cluster<'a, T>>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let threshold = self.config.threshold;
        let mut clusters: Vec<Cluster<'a, T>> = Vec::new();
        let mut anchors: Vec<ProjectedPosition> = Vec::new();
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::default();

        let cell_of = |pos: &ProjectedPosition| {
            (
                (pos.left / threshold).floor() as i64,
                (pos.top / threshold).floor() as i64,
            )
        };

        for record in records {
            let pos = viewport.project(&record.location());
            let (cx, cy) = cell_of(&pos);

            let mut best: Option<usize> = None;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(candidates) = cells.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &index in candidates {
                        if best.is_some_and(|b| b <= index) {
                            continue;
                        }
                        if pos.distance_to(&anchors[index]) < threshold {
                            best = Some(index);
                        }
                    }
                }
            }

            match best {
                Some(index) => clusters[index].members.push(record),
                None => {
                    cells.entry((cx, cy)).or_default().push(clusters.len());
                    anchors.push(pos);
                    clusters.push(Cluster::new(record));
                }
            }
        }

        clusters
    }
}
