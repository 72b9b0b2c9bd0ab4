use crate::entities::{
    CommissionStatus, affiliate_entity as affiliates, commission_entity as commissions,
    user_entity as users,
};
use crate::error::AppResult;
use crate::models::{NetworkEdge, NetworkNode, NetworkResponse, NetworkStats};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// One affiliate flattened for graph assembly.
#[derive(Debug, Clone)]
pub struct NetworkMember {
    pub affiliate_id: i64,
    pub affiliate_code: String,
    pub username: String,
    /// Live count of users whose referred_by equals this code, counted at
    /// fetch time rather than read from the denormalized counter.
    pub referral_count: i64,
    /// The member's signup time, not the affiliate profile's creation time
    /// (profiles may be created lazily, long after signup).
    pub join_date: Option<DateTime<Utc>>,
    /// Affiliate code of the member's referrer.
    pub referred_by: Option<String>,
    /// Paid commissions in cents.
    pub earnings: i64,
}

/// Builds the node/edge graph from pre-fetched members. BFS from the root
/// code, bounded by max_depth; the visited set makes cyclic referral chains
/// terminate instead of recursing forever.
pub fn assemble_network(
    root_code: &str,
    members: &[NetworkMember],
    max_depth: u32,
    now: DateTime<Utc>,
) -> NetworkResponse {
    let by_code: HashMap<&str, &NetworkMember> = members
        .iter()
        .map(|m| (m.affiliate_code.as_str(), m))
        .collect();
    let mut children: HashMap<&str, Vec<&NetworkMember>> = HashMap::new();
    for member in members {
        if let Some(parent) = member.referred_by.as_deref() {
            children.entry(parent).or_default().push(member);
        }
    }

    let Some(root) = by_code.get(root_code) else {
        return NetworkResponse::empty();
    };

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut frontier: Vec<&NetworkMember> = vec![root];
    visited.insert(root_code);

    let mut depth = 0;
    let mut max_level_seen = 0;
    while !frontier.is_empty() && depth <= max_depth {
        let mut next = Vec::new();
        for member in &frontier {
            max_level_seen = depth;
            nodes.push(NetworkNode {
                id: format!("node_{}", member.affiliate_id),
                affiliate_code: member.affiliate_code.clone(),
                username: member.username.clone(),
                level: depth,
                earnings: member.earnings,
                referral_count: member.referral_count,
                join_date: member.join_date,
                is_root: depth == 0,
            });

            if depth == max_depth {
                continue;
            }
            if let Some(kids) = children.get(member.affiliate_code.as_str()) {
                for kid in kids {
                    if !visited.insert(kid.affiliate_code.as_str()) {
                        continue;
                    }
                    edges.push(NetworkEdge {
                        source: format!("node_{}", member.affiliate_id),
                        target: format!("node_{}", kid.affiliate_id),
                        earnings: kid.earnings,
                    });
                    next.push(*kid);
                }
            }
        }
        frontier = next;
        depth += 1;
    }

    let week_ago = now - Duration::days(7);
    let stats = NetworkStats {
        network_size: nodes.len(),
        network_levels: max_level_seen + 1,
        network_earnings: nodes.iter().map(|n| n.earnings).sum(),
        network_growth: nodes
            .iter()
            .filter(|n| n.join_date.is_some_and(|d| d >= week_ago))
            .count(),
    };

    NetworkResponse {
        nodes,
        edges,
        stats,
    }
}

#[derive(Clone)]
pub struct NetworkService {
    pool: DatabaseConnection,
}

impl NetworkService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Fetches the referral tree level by level (one users query and one
    /// affiliates query per level, bounded by max_depth), then assembles the
    /// graph in memory.
    pub async fn build_network(
        &self,
        root_code: &str,
        max_depth: u32,
    ) -> AppResult<NetworkResponse> {
        let Some(root_affiliate) = affiliates::Entity::find()
            .filter(affiliates::Column::AffiliateCode.eq(root_code))
            .one(&self.pool)
            .await?
        else {
            return Ok(NetworkResponse::empty());
        };

        let root_user = users::Entity::find_by_id(root_affiliate.user_id)
            .one(&self.pool)
            .await?;

        let mut members = vec![NetworkMember {
            affiliate_id: root_affiliate.id,
            affiliate_code: root_affiliate.affiliate_code.clone(),
            username: root_user.as_ref().map(|u| u.username.clone()).unwrap_or_default(),
            referral_count: 0,
            join_date: root_user.as_ref().and_then(|u| u.created_at),
            referred_by: None,
            earnings: 0,
        }];

        let mut seen_codes: HashSet<String> = HashSet::new();
        seen_codes.insert(root_affiliate.affiliate_code.clone());
        let mut frontier_codes = vec![root_affiliate.affiliate_code.clone()];

        for _ in 0..max_depth {
            if frontier_codes.is_empty() {
                break;
            }

            let referred_users = users::Entity::find()
                .filter(users::Column::ReferredBy.is_in(frontier_codes.clone()))
                .all(&self.pool)
                .await?;
            if referred_users.is_empty() {
                break;
            }

            let user_ids: Vec<i64> = referred_users.iter().map(|u| u.id).collect();
            let level_affiliates = affiliates::Entity::find()
                .filter(affiliates::Column::UserId.is_in(user_ids))
                .all(&self.pool)
                .await?;
            let by_user: HashMap<i64, &affiliates::Model> =
                level_affiliates.iter().map(|a| (a.user_id, a)).collect();

            let mut next_frontier = Vec::new();
            for user in &referred_users {
                let Some(affiliate) = by_user.get(&user.id) else {
                    continue;
                };
                if !seen_codes.insert(affiliate.affiliate_code.clone()) {
                    continue;
                }
                members.push(NetworkMember {
                    affiliate_id: affiliate.id,
                    affiliate_code: affiliate.affiliate_code.clone(),
                    username: user.username.clone(),
                    referral_count: 0,
                    join_date: user.created_at,
                    referred_by: user.referred_by.clone(),
                    earnings: 0,
                });
                next_frontier.push(affiliate.affiliate_code.clone());
            }
            frontier_codes = next_frontier;
        }

        self.fill_referral_counts(&mut members).await?;
        self.fill_earnings(&mut members).await?;

        Ok(assemble_network(root_code, &members, max_depth, Utc::now()))
    }

    /// Counts referred users per member code in one grouped query, so the
    /// per-node count reflects the users table rather than the denormalized
    /// counter (which can drift).
    async fn fill_referral_counts(&self, members: &mut [NetworkMember]) -> AppResult<()> {
        #[derive(FromQueryResult)]
        struct ReferralCountRow {
            referred_by: Option<String>,
            count: i64,
        }

        let codes: Vec<String> = members.iter().map(|m| m.affiliate_code.clone()).collect();
        let rows = users::Entity::find()
            .select_only()
            .column(users::Column::ReferredBy)
            .column_as(users::Column::Id.count(), "count")
            .filter(users::Column::ReferredBy.is_in(codes))
            .group_by(users::Column::ReferredBy)
            .into_model::<ReferralCountRow>()
            .all(&self.pool)
            .await?;

        let counts: HashMap<String, i64> = rows
            .into_iter()
            .filter_map(|row| row.referred_by.map(|code| (code, row.count)))
            .collect();
        for member in members {
            member.referral_count = counts.get(&member.affiliate_code).copied().unwrap_or(0);
        }
        Ok(())
    }

    /// Sums paid commissions for every member in one query.
    async fn fill_earnings(&self, members: &mut [NetworkMember]) -> AppResult<()> {
        let ids: Vec<i64> = members.iter().map(|m| m.affiliate_id).collect();
        let rows = commissions::Entity::find()
            .filter(commissions::Column::AffiliateId.is_in(ids))
            .filter(commissions::Column::Status.eq(CommissionStatus::Paid))
            .all(&self.pool)
            .await?;

        let mut totals: HashMap<i64, i64> = HashMap::new();
        for row in rows {
            *totals.entry(row.affiliate_id).or_default() += row.commission_amount;
        }
        for member in members {
            member.earnings = totals.get(&member.affiliate_id).copied().unwrap_or(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(
        id: i64,
        code: &str,
        referred_by: Option<&str>,
        earnings: i64,
        joined_days_ago: i64,
    ) -> NetworkMember {
        NetworkMember {
            affiliate_id: id,
            affiliate_code: code.to_string(),
            username: format!("user{id}"),
            referral_count: 0,
            join_date: Some(Utc::now() - Duration::days(joined_days_ago)),
            referred_by: referred_by.map(|s| s.to_string()),
            earnings,
        }
    }

    #[test]
    fn test_node_referral_count_is_independent_of_fetched_subtree() {
        // A node at the depth bound still reports its full referred-user
        // count even though none of its children were fetched.
        let mut leaf = member(2, "LEAF0001", Some("ROOT0001"), 0, 0);
        leaf.referral_count = 7;
        let members = vec![member(1, "ROOT0001", None, 0, 0), leaf];

        let net = assemble_network("ROOT0001", &members, 1, Utc::now());
        let node = net.nodes.iter().find(|n| n.id == "node_2").unwrap();
        assert_eq!(node.referral_count, 7);
    }

    #[test]
    fn test_growth_counts_signup_dates() {
        // join_date carries the user's signup time; two recent signups count
        // toward 7-day growth regardless of when profiles were provisioned.
        let members = vec![
            member(1, "ROOT0001", None, 0, 365),
            member(2, "KIDA0001", Some("ROOT0001"), 0, 3),
            member(3, "KIDB0001", Some("ROOT0001"), 0, 9),
            member(4, "KIDC0001", Some("ROOT0001"), 0, 1),
        ];
        let net = assemble_network("ROOT0001", &members, DEFAULT_MAX_DEPTH, Utc::now());
        assert_eq!(net.stats.network_growth, 2);
    }

    #[test]
    fn test_three_level_chain() {
        let members = vec![
            member(1, "ROOT0001", None, 1000, 30),
            member(2, "MIDA0001", Some("ROOT0001"), 500, 10),
            member(3, "LEAF0001", Some("MIDA0001"), 0, 2),
        ];
        let net = assemble_network("ROOT0001", &members, DEFAULT_MAX_DEPTH, Utc::now());

        assert_eq!(net.nodes.len(), 3);
        assert_eq!(net.edges.len(), 2);
        assert_eq!(net.stats.network_levels, 3);
        assert_eq!(net.stats.network_earnings, 1500);
        assert_eq!(net.stats.network_growth, 1);

        let root = &net.nodes[0];
        assert!(root.is_root);
        assert_eq!(root.level, 0);
        assert_eq!(root.id, "node_1");
    }

    #[test]
    fn test_depth_bound_truncates() {
        // chain of 8, root + depth 5 keeps 6 nodes
        let mut members = vec![member(0, "C0", None, 0, 0)];
        for i in 1..8 {
            let parent = format!("C{}", i - 1);
            members.push(member(i, &format!("C{i}"), Some(&parent), 0, 0));
        }
        let net = assemble_network("C0", &members, 5, Utc::now());
        assert_eq!(net.nodes.len(), 6);
        assert_eq!(net.stats.network_levels, 6);
        assert_eq!(net.nodes.iter().map(|n| n.level).max(), Some(5));
    }

    #[test]
    fn test_cycle_terminates() {
        // a <-> b referral cycle must not loop or duplicate nodes
        let members = vec![
            member(1, "AAAA0001", Some("BBBB0001"), 0, 0),
            member(2, "BBBB0001", Some("AAAA0001"), 0, 0),
        ];
        let net = assemble_network("AAAA0001", &members, DEFAULT_MAX_DEPTH, Utc::now());
        assert_eq!(net.nodes.len(), 2);
        assert_eq!(net.edges.len(), 1);
    }

    #[test]
    fn test_unknown_root_is_empty() {
        let members = vec![member(1, "AAAA0001", None, 0, 0)];
        let net = assemble_network("ZZZZ9999", &members, DEFAULT_MAX_DEPTH, Utc::now());
        assert!(net.nodes.is_empty());
        assert!(net.edges.is_empty());
        assert_eq!(net.stats.network_size, 0);
    }

    #[test]
    fn test_branching_fanout() {
        let members = vec![
            member(1, "ROOT0001", None, 0, 0),
            member(2, "KIDA0001", Some("ROOT0001"), 100, 0),
            member(3, "KIDB0001", Some("ROOT0001"), 200, 0),
            member(4, "GKID0001", Some("KIDA0001"), 300, 0),
        ];
        let net = assemble_network("ROOT0001", &members, DEFAULT_MAX_DEPTH, Utc::now());
        assert_eq!(net.nodes.len(), 4);
        assert_eq!(net.edges.len(), 3);
        let edge = net.edges.iter().find(|e| e.target == "node_4").unwrap();
        assert_eq!(edge.source, "node_2");
        assert_eq!(edge.earnings, 300);
    }
}
