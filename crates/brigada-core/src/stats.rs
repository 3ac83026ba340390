//! Dashboard statistics, derived on demand from the personnel records.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::personnel::{Personnel, PersonnelStatus};

/// Head count for one rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankCount {
  pub rank:  String,
  pub count: usize,
}

/// Summary figures for the dashboard. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  pub total_active:   usize,
  /// Inactive plus on-leave members.
  pub total_inactive: usize,
  pub total:          usize,
  /// Sorted by descending count; ties keep first-seen order.
  pub by_rank:        Vec<RankCount>,
  /// Records created within the calendar month before `now`.
  pub new_last_month: usize,
}

impl Stats {
  pub fn compute(personnel: &[Personnel], now: DateTime<Utc>) -> Self {
    let count = |status: PersonnelStatus| personnel.iter().filter(|p| p.status == status).count();

    let mut by_rank: Vec<RankCount> = Vec::new();
    for p in personnel {
      match by_rank.iter_mut().find(|rc| rc.rank == p.rank) {
        Some(rc) => rc.count += 1,
        None => by_rank.push(RankCount {
          rank:  p.rank.clone(),
          count: 1,
        }),
      }
    }
    by_rank.sort_by(|a, b| b.count.cmp(&a.count));

    let cutoff = now.checked_sub_months(Months::new(1)).unwrap_or(now);
    let new_last_month = personnel.iter().filter(|p| p.created_at > cutoff).count();

    Self {
      total_active: count(PersonnelStatus::Active),
      total_inactive: count(PersonnelStatus::Inactive) + count(PersonnelStatus::OnLeave),
      total: personnel.len(),
      by_rank,
      new_last_month,
    }
  }
}
