use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NetworkNode {
    pub id: String,
    pub affiliate_code: String,
    pub username: String,
    /// Depth in the tree, root at 0.
    pub level: u32,
    /// Paid commissions earned by this affiliate, in cents.
    pub earnings: i64,
    pub referral_count: i64,
    pub join_date: Option<DateTime<Utc>>,
    pub is_root: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub earnings: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NetworkStats {
    pub network_size: usize,
    pub network_levels: u32,
    pub network_earnings: i64,
    /// Nodes whose join date falls within the trailing 7 days.
    pub network_growth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NetworkResponse {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub stats: NetworkStats,
}

impl NetworkResponse {
    pub fn empty() -> Self {
        Self {
            nodes: vec![],
            edges: vec![],
            stats: NetworkStats {
                network_size: 0,
                network_levels: 0,
                network_earnings: 0,
                network_growth: 0,
            },
        }
    }
}
