//! Point arithmetic: per-level income, retroactive windows and the
//! hourly sweep with regional bonuses.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::game::{
    types::{PlayerId, Region},
    world::World,
};

const HOUR_MS: i64 = 3_600_000;

/// Points a territory yields per hour at `level`.
pub fn points_per_hour(level: u8) -> u64 {
    match level {
        1 => 1,
        2 => 2,
        3 => 4,
        _ => 0,
    }
}

/// Whole hours between `from` and `to`, rounded up. Zero if `to <= from`.
pub fn duration_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let ms = (to - from).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    ((ms + HOUR_MS - 1) / HOUR_MS) as u64
}

/// Sole owner of every territory in `region`, if any.
pub fn region_owner(world: &World, region: Region) -> Option<PlayerId> {
    let mut territories = world.territories.iter().filter(|t| t.region == region);
    let first = territories.next()?.owner_id?;
    territories
        .all(|t| t.owner_id == Some(first))
        .then_some(first)
}

/// Outcome of one hourly sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Points credited per player; players with no gain are absent.
    pub gains: BTreeMap<PlayerId, u64>,
    pub bonuses: Vec<(Region, PlayerId)>,
    /// Territories or regions skipped because their owner is unknown.
    pub skipped: usize,
}

/// Accrue hourly income and regional bonuses, then credit every player in
/// one batch.
pub fn apply_hourly(world: &mut World, now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();

    for t in &world.territories {
        let Some(owner) = t.owner_id else { continue };
        if world.player(owner).is_none() {
            log::warn!("territory {} owned by unknown player {owner}; skipped", t.id);
            report.skipped += 1;
            continue;
        }
        let gain = points_per_hour(t.level);
        if gain > 0 {
            *report.gains.entry(owner).or_default() += gain;
        }
    }

    for region in Region::ALL {
        let Some(owner) = region_owner(world, region) else { continue };
        let Some(name) = world.player(owner).map(|p| p.name.clone()) else {
            log::warn!("region {} held by unknown player {owner}; skipped", region.name());
            report.skipped += 1;
            continue;
        };
        *report.gains.entry(owner).or_default() += region.bonus();
        report.bonuses.push((region, owner));
        world.log_event(
            format!(
                "{name} earned a {} point bonus for controlling region {}.",
                region.bonus(),
                region.name()
            ),
            now,
        );
    }

    for (id, gain) in &report.gains {
        if let Some(p) = world.player_mut(*id) {
            p.score += gain;
        }
    }

    report
}
