//! Spawn policy
//!
//! Survival time selects a band of per-type spawn rates (expected spawns per
//! second). Each tick every positive rate gets one Bernoulli trial with
//! probability `rate * dt`. Large `dt` spikes are not compensated for.

use rand::Rng;

use super::enemy::EnemyType;
use super::enemy_types::enemy_type;
use crate::SimError;
use crate::tuning::SpawnBandConfig;

/// A band with its type names resolved against the catalogue
#[derive(Debug, Clone)]
pub struct SpawnBand {
    /// Band applies while minutes survived is below this; `None` = open-ended
    pub until_minutes: Option<f32>,
    pub rates: Vec<(&'static EnemyType, f32)>,
}

impl SpawnBand {
    fn covers(&self, minutes: f32) -> bool {
        self.until_minutes.is_none_or(|until| minutes < until)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpawnTable {
    bands: Vec<SpawnBand>,
}

impl SpawnTable {
    /// Resolve names once. Unknown names are returned as errors and their
    /// rows skipped, the rest of the band still spawns.
    pub fn resolve(config: &[SpawnBandConfig]) -> (Self, Vec<SimError>) {
        let mut errors = Vec::new();
        let bands = config
            .iter()
            .map(|band| SpawnBand {
                until_minutes: band.until_minutes,
                rates: band
                    .rates
                    .iter()
                    .filter_map(|(name, rate)| match enemy_type(name) {
                        Ok(kind) => Some((kind, *rate)),
                        Err(err) => {
                            errors.push(err);
                            None
                        }
                    })
                    .collect(),
            })
            .collect();
        (Self { bands }, errors)
    }

    pub fn bands(&self) -> &[SpawnBand] {
        &self.bands
    }

    /// First band whose bound is above `minutes`
    pub fn band_for(&self, minutes: f32) -> Option<&SpawnBand> {
        self.bands.iter().find(|band| band.covers(minutes))
    }

    /// Enemy types to spawn this tick, in table order
    pub fn roll<R: Rng + ?Sized>(&self, minutes: f32, dt: f32, rng: &mut R) -> Vec<&'static EnemyType> {
        let Some(band) = self.band_for(minutes) else {
            return Vec::new();
        };
        band.rates
            .iter()
            .filter(|&&(_, rate)| rate > 0.0)
            .filter(|&&(_, rate)| rng.random::<f32>() < rate * dt)
            .map(|&(kind, _)| kind)
            .collect()
    }
}
