//! Transfer-coefficient resolution.
//!
//! The solvers only ever see an effective first-order rate constant
//! k_eff [1/s]. It is either the user's kLa passed through, or derived
//! from membrane permeability and geometry:
//!
//! `k_eff = (P/δ) × (A/V) / S`
//!
//! with P the permeability [mmol·m/(m²·s·kPa)], δ the wall thickness [m],
//! A the outer lateral area [m²], V the liquid volume [m³], and S the
//! solubility converted to mmol/(m³·kPa).

use crate::error::{ExchangeError, ExchangeResult};
use crate::geometry::TubeGeometry;
use ox_core::units::constants::BARRER_TO_MMOL_M_PER_M2_S_KPA;

/// Membrane permeability in one of the accepted input units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "unit", content = "value"))]
pub enum Permeability {
    /// Literature/benchmark unit.
    Barrer(f64),
    /// SI-consistent working unit.
    MmolMPerM2SKpa(f64),
}

impl Permeability {
    /// Convert to the working unit [mmol·m/(m²·s·kPa)].
    ///
    /// The Barrer factor is a fixed physical constant and is the only
    /// place the conversion happens.
    pub fn mmol_m_per_m2_s_kpa(&self) -> f64 {
        match self {
            Permeability::Barrer(v) => v * BARRER_TO_MMOL_M_PER_M2_S_KPA,
            Permeability::MmolMPerM2SKpa(v) => *v,
        }
    }

    /// Raw value as entered, for metadata echo.
    pub fn raw_value(&self) -> f64 {
        match self {
            Permeability::Barrer(v) | Permeability::MmolMPerM2SKpa(v) => *v,
        }
    }
}

/// Convert membrane permeability into an effective first-order transfer
/// rate [1/s] for the species whose solubility is given.
pub fn effective_kla_from_permeability(
    permeability: Permeability,
    geometry: &TubeGeometry,
    od_override_mm: Option<f64>,
    solubility_mmol_l_kpa: f64,
) -> ExchangeResult<f64> {
    let od_mm = od_override_mm.unwrap_or(geometry.tube_od_mm);
    if od_mm <= geometry.tube_id_mm {
        return Err(ExchangeError::NonPhysical {
            what: "tube OD must exceed tube ID in permeability mode",
        });
    }
    if solubility_mmol_l_kpa <= 0.0 {
        return Err(ExchangeError::NonPhysical {
            what: "solubility must be positive",
        });
    }

    let wall_thickness_m = geometry.wall_thickness_m(od_override_mm);
    let area_m2 = geometry.outer_area_m2(od_override_mm);
    let volume_m3 = geometry.tube_volume_ml() * 1e-6;
    let solubility_mmol_m3_kpa = solubility_mmol_l_kpa * 1000.0;

    let perm_si = permeability.mmol_m_per_m2_s_kpa();
    let mass_transfer_rate = (perm_si / wall_thickness_m) * (area_m2 / volume_m3);
    Ok(mass_transfer_rate / solubility_mmol_m3_kpa)
}
