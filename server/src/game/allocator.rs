//! Picks and reserves a challenge template for a territory.

use rand::{seq::IndexedRandom, Rng};

use crate::{
    error::{GameError, GameResult},
    game::{
        types::{ChallengeTemplate, TemplateStatus, Territory, MAX_LEVEL},
        world::World,
    },
};

/// Level a successful challenge on `t` would target.
pub fn target_level(t: &Territory) -> GameResult<u8> {
    match t.owner_id {
        None => Ok(1),
        Some(_) if t.level >= MAX_LEVEL => Err(GameError::MaxLevelReached),
        Some(_) => Ok(t.level + 1),
    }
}

/// Return the template reserved for `territory_id`, reserving a random
/// matching one first if needed. Repeated calls return the same template
/// until a challenge on the territory is resolved.
pub fn allocate<R: Rng + ?Sized>(
    world: &mut World,
    territory_id: &str,
    rng: &mut R,
) -> GameResult<ChallengeTemplate> {
    let territory = world
        .territory(territory_id)
        .ok_or_else(|| GameError::TerritoryNotFound(territory_id.to_owned()))?;
    let level = target_level(territory)?;

    let reserved: Vec<(u32, u8)> = world
        .templates()
        .filter(|t| {
            t.status == TemplateStatus::Available
                && t.assigned_to_territory_id.as_deref() == Some(territory_id)
        })
        .map(|t| (t.id, t.level))
        .collect();

    for (id, reserved_level) in reserved {
        let Some(tpl) = world.template_mut(id) else { continue };
        if reserved_level == level {
            return Ok(tpl.clone());
        }
        // Reserved before the territory changed hands; no longer applicable.
        tpl.assigned_to_territory_id = None;
        log::debug!(
            "template {id} released from territory {territory_id}: level {reserved_level}, now targeting {level}"
        );
    }

    let candidates: Vec<u32> = world
        .templates()
        .filter(|t| {
            t.level == level
                && t.status == TemplateStatus::Available
                && t.assigned_to_territory_id.is_none()
        })
        .map(|t| t.id)
        .collect();

    let id = *candidates
        .choose(rng)
        .ok_or(GameError::NoTemplateAvailable { level })?;
    let tpl = world
        .template_mut(id)
        .ok_or(GameError::TemplateNotFound(id))?;
    tpl.assigned_to_territory_id = Some(territory_id.to_owned());
    log::debug!("template {id} reserved for territory {territory_id}");
    Ok(tpl.clone())
}
