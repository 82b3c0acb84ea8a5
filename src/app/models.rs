//! Core data structures for OBD telemetry
//!
//! Defines the canonical field identifiers, numeric field values and the
//! fixed-shape telemetry record produced by the line parser and persisted
//! by the storage layer.

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier of a telemetry measurement
///
/// Each variant corresponds to one column of the `obd_data` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObdField {
    Rpm,
    Speed,
    CoolTemp,
    ThrottlePos,
    IntakeManiPres,
    IntakeAirTemp,
    MafAirFlowRate,
    RunTime,
    BaroPressure,
    CatalystTemp,
    ControlModuleVoltage,
    EngineLoad,
    FuelLevel,
    FuelPressure,
    AmbientAirTemp,
    TimingAdvance,
}

impl ObdField {
    /// Every identifier, in storage column order
    pub const ALL: [ObdField; 16] = [
        ObdField::Rpm,
        ObdField::Speed,
        ObdField::CoolTemp,
        ObdField::ThrottlePos,
        ObdField::IntakeManiPres,
        ObdField::IntakeAirTemp,
        ObdField::MafAirFlowRate,
        ObdField::RunTime,
        ObdField::BaroPressure,
        ObdField::CatalystTemp,
        ObdField::ControlModuleVoltage,
        ObdField::EngineLoad,
        ObdField::FuelLevel,
        ObdField::FuelPressure,
        ObdField::AmbientAirTemp,
        ObdField::TimingAdvance,
    ];

    /// Column name of this identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ObdField::Rpm => "rpm",
            ObdField::Speed => "speed",
            ObdField::CoolTemp => "cool_temp",
            ObdField::ThrottlePos => "throttle_pos",
            ObdField::IntakeManiPres => "intake_mani_pres",
            ObdField::IntakeAirTemp => "intake_air_temp",
            ObdField::MafAirFlowRate => "maf_air_flow_rate",
            ObdField::RunTime => "run_time",
            ObdField::BaroPressure => "baro_pressure",
            ObdField::CatalystTemp => "catalyst_temp",
            ObdField::ControlModuleVoltage => "control_module_voltage",
            ObdField::EngineLoad => "engine_load",
            ObdField::FuelLevel => "fuel_level",
            ObdField::FuelPressure => "fuel_pressure",
            ObdField::AmbientAirTemp => "ambient_air_temp",
            ObdField::TimingAdvance => "timing_advance",
        }
    }
}

impl fmt::Display for ObdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObdField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObdField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown field identifier '{}'", s))
    }
}

/// Numeric value of one measurement
///
/// Values written with a decimal point are floats, everything else is an
/// integer; both serialize as plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Convert a raw value string, returning `None` when it is not numeric
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.contains('.') {
            raw.parse::<f64>().ok().map(FieldValue::Float)
        } else {
            raw.parse::<i64>().ok().map(FieldValue::Integer)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::Integer(value) => value as f64,
            FieldValue::Float(value) => value,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Float(value) => write!(f, "{}", value),
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match *self {
            FieldValue::Integer(value) => ToSqlOutput::from(value),
            FieldValue::Float(value) => ToSqlOutput::from(value),
        })
    }
}

/// One timestamped telemetry snapshot
///
/// Only measurements that were recognised and numerically valid are
/// present; absent slots are skipped when serializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObdRecord {
    /// Timestamp exactly as it appeared in the source line
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cool_temp: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle_pos: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake_mani_pres: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake_air_temp: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maf_air_flow_rate: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_time: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baro_pressure: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalyst_temp: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_module_voltage: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_load: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_pressure: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_air_temp: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_advance: Option<FieldValue>,
}

impl ObdRecord {
    /// Create an empty record for the given timestamp
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }

    fn slot(&self, field: ObdField) -> &Option<FieldValue> {
        match field {
            ObdField::Rpm => &self.rpm,
            ObdField::Speed => &self.speed,
            ObdField::CoolTemp => &self.cool_temp,
            ObdField::ThrottlePos => &self.throttle_pos,
            ObdField::IntakeManiPres => &self.intake_mani_pres,
            ObdField::IntakeAirTemp => &self.intake_air_temp,
            ObdField::MafAirFlowRate => &self.maf_air_flow_rate,
            ObdField::RunTime => &self.run_time,
            ObdField::BaroPressure => &self.baro_pressure,
            ObdField::CatalystTemp => &self.catalyst_temp,
            ObdField::ControlModuleVoltage => &self.control_module_voltage,
            ObdField::EngineLoad => &self.engine_load,
            ObdField::FuelLevel => &self.fuel_level,
            ObdField::FuelPressure => &self.fuel_pressure,
            ObdField::AmbientAirTemp => &self.ambient_air_temp,
            ObdField::TimingAdvance => &self.timing_advance,
        }
    }

    fn slot_mut(&mut self, field: ObdField) -> &mut Option<FieldValue> {
        match field {
            ObdField::Rpm => &mut self.rpm,
            ObdField::Speed => &mut self.speed,
            ObdField::CoolTemp => &mut self.cool_temp,
            ObdField::ThrottlePos => &mut self.throttle_pos,
            ObdField::IntakeManiPres => &mut self.intake_mani_pres,
            ObdField::IntakeAirTemp => &mut self.intake_air_temp,
            ObdField::MafAirFlowRate => &mut self.maf_air_flow_rate,
            ObdField::RunTime => &mut self.run_time,
            ObdField::BaroPressure => &mut self.baro_pressure,
            ObdField::CatalystTemp => &mut self.catalyst_temp,
            ObdField::ControlModuleVoltage => &mut self.control_module_voltage,
            ObdField::EngineLoad => &mut self.engine_load,
            ObdField::FuelLevel => &mut self.fuel_level,
            ObdField::FuelPressure => &mut self.fuel_pressure,
            ObdField::AmbientAirTemp => &mut self.ambient_air_temp,
            ObdField::TimingAdvance => &mut self.timing_advance,
        }
    }

    /// Value of a measurement, if present
    pub fn get(&self, field: ObdField) -> Option<FieldValue> {
        *self.slot(field)
    }

    /// Store a measurement, replacing any earlier value for the same field
    pub fn set(&mut self, field: ObdField, value: FieldValue) {
        *self.slot_mut(field) = Some(value);
    }

    /// Present measurements in storage column order
    pub fn measurements(&self) -> impl Iterator<Item = (ObdField, FieldValue)> + '_ {
        ObdField::ALL
            .iter()
            .filter_map(|&field| self.get(field).map(|value| (field, value)))
    }

    /// Whether at least one measurement is present
    pub fn has_measurements(&self) -> bool {
        self.measurements().next().is_some()
    }
}
