//! Run configuration, validation, and error types.
//!
//! [`RunConfig`] is deserialized from TOML. Every field carries a serde
//! default, so an empty document describes the reference run: a 1000-cell
//! pipe of air at one atmosphere driven by the 50-harmonic piston for 60 s.
//! [`validate()`](RunConfig::validate) checks every invariant before a
//! [`Driver`](crate::Driver) is built from it.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use pipeflow_core::gas::{
    AIR_MOLAR_MASS, ATMOSPHERIC_PRESSURE, GAS_CONSTANT, REFERENCE_TEMPERATURE,
};
use pipeflow_core::{Forcing, GasProperties, GridState};
use pipeflow_forcing::{
    ConstantForcing, ForcingError, FourierForcing, PiecewiseProfile, Segment, DEFAULT_HARMONICS,
    REFERENCE_PERIOD,
};
use pipeflow_space::{Line1D, SpaceError};
use serde::{Deserialize, Serialize};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors from loading or validating a [`RunConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for this schema.
    Parse(toml::de::Error),
    /// Grid parameters are invalid.
    Space(SpaceError),
    /// Forcing parameters are invalid.
    Forcing(ForcingError),
    /// `dt` is NaN, infinite, zero or negative.
    InvalidTimeStep {
        /// The invalid value.
        dt: f64,
    },
    /// `total_time` is NaN, infinite, zero or negative.
    InvalidTotalTime {
        /// The invalid value.
        total_time: f64,
    },
    /// `snapshot_interval` is NaN, infinite, zero or negative.
    InvalidInterval {
        /// The invalid value.
        interval: f64,
    },
    /// A gas constant is not finite and positive.
    InvalidGas {
        /// Name of the offending property.
        property: &'static str,
    },
    /// The initial pressure is not finite and positive.
    InvalidInitialState {
        /// The invalid pressure.
        pressure: f64,
    },
    /// The snapshot sample count is zero.
    InvalidSampling {
        /// The configured count.
        samples: usize,
    },
    /// The validated settings were rejected while assembling the driver.
    InvalidDriver {
        /// Why the driver builder refused them.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Space(e) => write!(f, "grid: {e}"),
            Self::Forcing(e) => write!(f, "forcing: {e}"),
            Self::InvalidTimeStep { dt } => {
                write!(f, "dt must be finite and positive, got {dt}")
            }
            Self::InvalidTotalTime { total_time } => {
                write!(f, "total_time must be finite and positive, got {total_time}")
            }
            Self::InvalidInterval { interval } => {
                write!(
                    f,
                    "snapshot_interval must be finite and positive, got {interval}"
                )
            }
            Self::InvalidGas { property } => {
                write!(f, "gas {property} must be finite and positive")
            }
            Self::InvalidInitialState { pressure } => {
                write!(f, "initial pressure must be finite and positive, got {pressure}")
            }
            Self::InvalidSampling { samples } => {
                write!(f, "snapshot samples must be at least 1, got {samples}")
            }
            Self::InvalidDriver { reason } => write!(f, "cannot build driver: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Space(e) => Some(e),
            Self::Forcing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ForcingError> for ConfigError {
    fn from(e: ForcingError) -> Self {
        Self::Forcing(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

// ── Sections ───────────────────────────────────────────────────────

/// `[grid]`: cell count and spacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of cells. Default: 1000.
    pub cells: usize,
    /// Cell spacing in metres. Default: 5e-3.
    pub dx: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells: 1000,
            dx: 5e-3,
        }
    }
}

/// `[gas]`: ideal-gas constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasConfig {
    /// Gas constant `R`. Default: 8.31.
    pub gas_constant: f64,
    /// Molar mass `μ`. Default: 0.029 (air).
    pub molar_mass: f64,
    /// Temperature `T0`. Default: 293.15.
    pub temperature: f64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
            molar_mass: AIR_MOLAR_MASS,
            temperature: REFERENCE_TEMPERATURE,
        }
    }
}

impl GasConfig {
    /// The gas constants as used by the solver.
    pub fn properties(&self) -> GasProperties {
        GasProperties {
            gas_constant: self.gas_constant,
            molar_mass: self.molar_mass,
            temperature: self.temperature,
        }
    }
}

/// `[initial]`: the uniform state at rest the run starts from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialConfig {
    /// Uniform initial pressure in Pa. Default: 101325.
    pub pressure: f64,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            pressure: ATMOSPHERIC_PRESSURE,
        }
    }
}

/// `[time]`: fixed step and run length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeConfig {
    /// Timestep in seconds. Default: 1e-5.
    pub dt: f64,
    /// Simulated duration in seconds. Default: 60.
    pub total_time: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            dt: 1e-5,
            total_time: 60.0,
        }
    }
}

/// Which forcing waveform drives the piston.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForcingKind {
    /// Truncated Fourier series of the segment profile.
    #[default]
    Fourier,
    /// The segment profile itself.
    Piecewise,
    /// A constant acceleration, `value`.
    Constant,
}

impl fmt::Display for ForcingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fourier => "fourier",
            Self::Piecewise => "piecewise",
            Self::Constant => "constant",
        })
    }
}

/// `[forcing]`: piston waveform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForcingConfig {
    /// Waveform. Default: `fourier`.
    pub kind: ForcingKind,
    /// Highest Fourier harmonic. Default: 50.
    pub harmonics: usize,
    /// Profile period in seconds. Default: 60.
    pub period: f64,
    /// Acceleration for `kind = "constant"`. Default: 0.
    pub value: f64,
    /// Profile segments. Default: the reference piston cycle.
    pub segments: Vec<Segment>,
}

impl Default for ForcingConfig {
    fn default() -> Self {
        let reference = PiecewiseProfile::reference();
        Self {
            kind: ForcingKind::Fourier,
            harmonics: DEFAULT_HARMONICS,
            period: REFERENCE_PERIOD,
            value: 0.0,
            segments: reference.segments().to_vec(),
        }
    }
}

impl ForcingConfig {
    /// The segment profile described by `period` and `segments`.
    pub fn profile(&self) -> Result<PiecewiseProfile, ForcingError> {
        PiecewiseProfile::new(self.period, self.segments.iter().copied())
    }

    /// Build the configured waveform.
    pub fn build(&self) -> Result<Box<dyn Forcing>, ForcingError> {
        let forcing: Box<dyn Forcing> = match self.kind {
            ForcingKind::Fourier => {
                Box::new(FourierForcing::from_profile(&self.profile()?, self.harmonics)?)
            }
            ForcingKind::Piecewise => Box::new(self.profile()?),
            ForcingKind::Constant => Box::new(ConstantForcing::new(self.value)),
        };
        Ok(forcing)
    }
}

/// `[output]`: snapshots and progress lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Write snapshot files at all. Default: true.
    pub snapshots: bool,
    /// Snapshot directory, created if missing. Default: `build`.
    pub dir: PathBuf,
    /// Simulated seconds between snapshots. Default: 0.1.
    pub snapshot_interval: f64,
    /// Maximum rows per snapshot. Default: 1000.
    pub samples: usize,
    /// Steps between progress lines; 0 disables them. Default: 1000.
    pub print_every: u64,
    /// Write snapshots on a background thread. Default: true.
    pub background: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshots: true,
            dir: PathBuf::from("build"),
            snapshot_interval: 0.1,
            samples: 1000,
            print_every: 1000,
            background: true,
        }
    }
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Complete configuration for one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Evaluate interior cells on the rayon pool. Default: true.
    pub parallel: bool,
    /// Grid geometry.
    pub grid: GridConfig,
    /// Gas constants.
    pub gas: GasConfig,
    /// Initial state.
    pub initial: InitialConfig,
    /// Step size and duration.
    pub time: TimeConfig,
    /// Piston waveform.
    pub forcing: ForcingConfig,
    /// Snapshot and progress output.
    pub output: OutputConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            grid: GridConfig::default(),
            gas: GasConfig::default(),
            initial: InitialConfig::default(),
            time: TimeConfig::default(),
            forcing: ForcingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// Does not validate; call [`validate()`](Self::validate).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML, e.g. to show the resolved setup.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every invariant of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid must support the one-sided stencils.
        self.space()?;
        // 2. Gas constants finite and positive.
        self.gas
            .properties()
            .validate()
            .map_err(|property| ConfigError::InvalidGas { property })?;
        // 3. Initial pressure finite and positive.
        let p = self.initial.pressure;
        if !p.is_finite() || p <= 0.0 {
            return Err(ConfigError::InvalidInitialState { pressure: p });
        }
        // 4. Timestep finite and positive.
        let dt = self.time.dt;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { dt });
        }
        // 5. Duration finite and positive.
        let total_time = self.time.total_time;
        if !total_time.is_finite() || total_time <= 0.0 {
            return Err(ConfigError::InvalidTotalTime { total_time });
        }
        // 6. Forcing builds.
        self.forcing.build()?;
        // 7. Snapshot cadence and sampling.
        let interval = self.output.snapshot_interval;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::InvalidInterval { interval });
        }
        if self.output.samples == 0 {
            return Err(ConfigError::InvalidSampling {
                samples: self.output.samples,
            });
        }
        Ok(())
    }

    /// The grid.
    pub fn space(&self) -> Result<Line1D, SpaceError> {
        Line1D::new(self.grid.cells, self.grid.dx)
    }

    /// Number of steps the run executes, `round(total_time / dt)`.
    pub fn total_steps(&self) -> u64 {
        (self.time.total_time / self.time.dt).round() as u64
    }

    /// Uniform initial state: configured pressure, gas at rest, density
    /// from the equation of state.
    pub fn initial_state(&self) -> GridState {
        let gas = self.gas.properties();
        let p = self.initial.pressure;
        GridState::uniform(self.grid.cells, gas.density_for_pressure(p), p)
    }
}
