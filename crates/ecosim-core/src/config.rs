//! Configuration types for the simulation.

use crate::{EntityKind, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rules for plants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantRules {
    /// Age at which a plant withers
    pub max_age: i32,
    /// Chance per tick of seeding an adjacent empty cell
    pub reproduction_probability: f64,
}

impl Default for PlantRules {
    fn default() -> Self {
        Self {
            max_age: 10,
            reproduction_probability: 0.2,
        }
    }
}

/// Rules shared by herbivores and carnivores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalRules {
    /// Age at which the animal dies
    pub max_age: i32,
    /// Chance per tick of stepping to an adjacent empty cell
    pub move_probability: f64,
    /// Chance per tick of eating all adjacent prey
    pub eat_probability: f64,
    /// Chance per tick of reproducing once above the energy threshold
    pub reproduction_probability: f64,
    /// Energy the parent pays per offspring
    pub reproduction_cost: i32,
    /// Energy gained per prey eaten (not capped at max energy)
    pub energy_per_kill: i32,
}

impl AnimalRules {
    pub fn herbivore() -> Self {
        Self {
            max_age: 50,
            move_probability: 0.7,
            eat_probability: 0.9,
            reproduction_probability: 0.075,
            reproduction_cost: 10,
            energy_per_kill: 30,
        }
    }

    pub fn carnivore() -> Self {
        Self {
            max_age: 80,
            move_probability: 0.5,
            eat_probability: 1.0,
            reproduction_probability: 0.025,
            reproduction_cost: 10,
            energy_per_kill: 20,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        validate_probability(&format!("{name}.move_probability"), self.move_probability)?;
        validate_probability(&format!("{name}.eat_probability"), self.eat_probability)?;
        validate_probability(
            &format!("{name}.reproduction_probability"),
            self.reproduction_probability,
        )?;
        if self.reproduction_cost < 0 {
            return Err(Error::Validation(format!(
                "{name}.reproduction_cost must not be negative, got {}",
                self.reproduction_cost
            )));
        }
        Ok(())
    }
}

/// Ecosystem configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcosystemConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// Energy given to spawned and newborn animals
    pub max_energy: i32,
    /// Minimum energy before an animal rolls for reproduction
    pub reproduction_energy_threshold: i32,
    pub plant: PlantRules,
    pub herbivore: AnimalRules,
    pub carnivore: AnimalRules,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            max_energy: 200,
            reproduction_energy_threshold: 20,
            plant: PlantRules::default(),
            herbivore: AnimalRules::herbivore(),
            carnivore: AnimalRules::carnivore(),
        }
    }
}

impl EcosystemConfig {
    /// Number of cells on the grid
    pub fn capacity(&self) -> u64 {
        let side = self.grid_size.max(0) as u64;
        side * side
    }

    /// Animal rules for `kind`, or `None` for plants and empty cells
    pub fn animal_rules(&self, kind: EntityKind) -> Option<&AnimalRules> {
        match kind {
            EntityKind::Herbivore => Some(&self.herbivore),
            EntityKind::Carnivore => Some(&self.carnivore),
            EntityKind::Plant | EntityKind::Empty => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size <= 0 {
            return Err(Error::Validation(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if self.grid_size.checked_mul(self.grid_size).is_none() {
            return Err(Error::Validation(format!(
                "grid_size {} is too large: cell count overflows i32",
                self.grid_size
            )));
        }
        if self.max_energy <= 0 {
            return Err(Error::Validation(format!(
                "max_energy must be positive, got {}",
                self.max_energy
            )));
        }
        validate_probability(
            "plant.reproduction_probability",
            self.plant.reproduction_probability,
        )?;
        self.herbivore.validate("herbivore")?;
        self.carnivore.validate("carnivore")?;
        Ok(())
    }
}

fn validate_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Directory served for any path not handled by the API
    pub static_dir: String,
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// OpenTelemetry endpoint
    pub otel_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "./public".to_string(),
            seed: None,
            otel_endpoint: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `ECOSIM_*` and `OTEL_EXPORTER_OTLP_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("ECOSIM_BIND_ADDRESS") {
            config.bind_address = addr;
        }
        if let Some(port) = lookup("ECOSIM_PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::Validation(format!("ECOSIM_PORT is not a port: {port}")))?;
        }
        if let Some(dir) = lookup("ECOSIM_STATIC_DIR") {
            config.static_dir = dir;
        }
        if let Some(seed) = lookup("ECOSIM_SEED") {
            config.seed = Some(
                seed.parse()
                    .map_err(|_| Error::Validation(format!("ECOSIM_SEED is not a u64: {seed}")))?,
            );
        }
        config.otel_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").or(config.otel_endpoint);

        debug!(?config, "Loaded server configuration");
        Ok(config)
    }
}
