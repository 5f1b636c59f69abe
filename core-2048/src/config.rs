use crate::{
    error::ConfigError,
    grid::{MAX_SIZE, MAX_TILE, MIN_SIZE},
    spawn::SpawnPolicy,
};

pub const DEFAULT_SIZE: usize = 4;
pub const DEFAULT_TARGET: u64 = 2048;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub size: usize,
    /// Reaching a tile of at least this value wins the game.
    pub target: u64,
    pub spawn: SpawnPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            target: DEFAULT_TARGET,
            spawn: SpawnPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < MIN_SIZE {
            return Err(ConfigError::SizeTooSmall {
                size: self.size,
                min: MIN_SIZE,
            });
        }

        if self.size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge {
                size: self.size,
                max: MAX_SIZE,
            });
        }

        if self.target == 0 {
            return Err(ConfigError::ZeroTarget);
        }

        if self.target > MAX_TILE {
            return Err(ConfigError::TargetTooLarge {
                target: self.target,
                max: MAX_TILE,
            });
        }

        if !self.spawn.is_valid() {
            return Err(ConfigError::FourProbability(self.spawn.four_probability));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_classic() {
        let config = EngineConfig::default();

        assert_eq!(config.size, 4);
        assert_eq!(config.target, 2048);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unplayable_values() {
        let small = EngineConfig {
            size: 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            small.validate(),
            Err(ConfigError::SizeTooSmall { size: 1, min: 2 })
        );

        let huge = EngineConfig {
            size: usize::MAX,
            ..EngineConfig::default()
        };
        assert_eq!(
            huge.validate(),
            Err(ConfigError::SizeTooLarge {
                size: usize::MAX,
                max: 64
            })
        );

        let unreachable_target = EngineConfig {
            target: u64::MAX,
            ..EngineConfig::default()
        };
        assert_eq!(
            unreachable_target.validate(),
            Err(ConfigError::TargetTooLarge {
                target: u64::MAX,
                max: 1 << 63
            })
        );

        let zero_target = EngineConfig {
            target: 0,
            ..EngineConfig::default()
        };
        assert_eq!(zero_target.validate(), Err(ConfigError::ZeroTarget));

        let bad_spawn = EngineConfig {
            spawn: SpawnPolicy {
                four_probability: -0.5,
            },
            ..EngineConfig::default()
        };
        assert_eq!(
            bad_spawn.validate(),
            Err(ConfigError::FourProbability(-0.5))
        );
    }
}
