use chrono::{DateTime, Utc};
use evothello_network::NetworkSnapshot;
use serde::{Deserialize, Serialize};

/// Persisted training artifact: the leading network plus its provenance.
///
/// Written as JSON after every evaluated generation, so an interrupted
/// run can resume from its last checkpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generation: usize,
    pub final_fitness: f64,
    pub network: NetworkSnapshot,
}
