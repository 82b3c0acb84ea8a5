//! Sensor label catalog for OBD telemetry lines
//!
//! Maps the exact human-readable sensor labels written by logging devices
//! to canonical field identifiers. Matching is exact and case-sensitive;
//! new labels must be added to the catalog explicitly.

use std::collections::{BTreeSet, HashMap};

use crate::app::models::ObdField;
use crate::error::{ObdError, Result};

/// One label accepted by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Label exactly as it appears before `=` in a telemetry line
    pub label: String,

    /// Canonical identifier the label maps to
    pub field: ObdField,

    /// Core labels are the standard PIDs; optional labels are aliases some
    /// devices report instead
    pub core: bool,
}

impl CatalogEntry {
    pub fn core(label: impl Into<String>, field: ObdField) -> Self {
        Self {
            label: label.into(),
            field,
            core: true,
        }
    }

    pub fn optional(label: impl Into<String>, field: ObdField) -> Self {
        Self {
            label: label.into(),
            field,
            core: false,
        }
    }
}

/// Core labels: the ten original PIDs followed by five commonly available ones
const CORE_LABELS: &[(&str, ObdField)] = &[
    ("Vehicle Speed", ObdField::Speed),
    ("Engine Coolant Temperature", ObdField::CoolTemp),
    ("Throttle Position", ObdField::ThrottlePos),
    ("Intake Manifold Pressure", ObdField::IntakeManiPres),
    ("Intake Air Temperature", ObdField::IntakeAirTemp),
    ("MAF Air Flow Rate", ObdField::MafAirFlowRate),
    ("Run Time Since Engine Start", ObdField::RunTime),
    ("Barometric Pressure", ObdField::BaroPressure),
    ("Catalyst Temperature Bank1 Sensor1", ObdField::CatalystTemp),
    ("Control Module Voltage", ObdField::ControlModuleVoltage),
    ("Calculated Engine Load", ObdField::EngineLoad),
    ("Fuel Level", ObdField::FuelLevel),
    ("Fuel Pressure", ObdField::FuelPressure),
    ("Ambient Air Temperature", ObdField::AmbientAirTemp),
    ("Timing Advance", ObdField::TimingAdvance),
];

/// Optional labels reported by some vehicles
const OPTIONAL_LABELS: &[(&str, ObdField)] = &[
    ("Engine RPM", ObdField::Rpm),
    ("RPM", ObdField::Rpm),
    ("Engine Speed", ObdField::Rpm),
];

/// Read-only label lookup table
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    entries: Vec<CatalogEntry>,
    by_label: HashMap<String, ObdField>,
}

impl FieldCatalog {
    /// The catalog of labels written by supported logging devices
    pub fn standard() -> Self {
        let entries = CORE_LABELS
            .iter()
            .map(|&(label, field)| CatalogEntry::core(label, field))
            .chain(
                OPTIONAL_LABELS
                    .iter()
                    .map(|&(label, field)| CatalogEntry::optional(label, field)),
            )
            .collect::<Vec<_>>();

        let by_label = entries
            .iter()
            .map(|entry| (entry.label.clone(), entry.field))
            .collect();

        Self { entries, by_label }
    }

    /// Build a catalog from explicit entries
    ///
    /// Labels are trimmed and must be non-empty and unique.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut by_label = HashMap::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());

        for mut entry in entries {
            entry.label = entry.label.trim().to_string();
            if entry.label.is_empty() {
                return Err(ObdError::configuration("catalog labels cannot be empty"));
            }
            if by_label.insert(entry.label.clone(), entry.field).is_some() {
                return Err(ObdError::configuration(format!(
                    "duplicate catalog label '{}'",
                    entry.label
                )));
            }
            normalized.push(entry);
        }

        Ok(Self {
            entries: normalized,
            by_label,
        })
    }

    /// Canonical identifier for a label, if the label is known
    pub fn lookup(&self, label: &str) -> Option<ObdField> {
        self.by_label.get(label.trim()).copied()
    }

    /// Check if a label is known
    pub fn contains(&self, label: &str) -> bool {
        self.lookup(label).is_some()
    }

    /// All entries in declaration order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Distinct identifiers reachable through any label
    pub fn fields(&self) -> BTreeSet<ObdField> {
        self.entries.iter().map(|entry| entry.field).collect()
    }

    /// Get statistics about the catalog as (labels, core labels, identifiers)
    pub fn stats(&self) -> (usize, usize, usize) {
        (
            self.entries.len(),
            self.entries.iter().filter(|entry| entry.core).count(),
            self.fields().len(),
        )
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
