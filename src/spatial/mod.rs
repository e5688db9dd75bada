pub mod clustering;
pub mod culling;

pub use clustering::{Cluster, Clustering, ClusteringConfig};
pub use culling::Culling;
