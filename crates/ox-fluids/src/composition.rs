//! Gas composition (validated or normalized mole fractions).

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use ox_core::numeric::{Tolerances, clamp_fraction, nearly_equal};

/// Absolute closure tolerance for user-supplied mole fractions.
pub const FRACTION_SUM_TOL: f64 = 1e-9;

/// Gas-phase composition defined by mole fractions.
///
/// Two construction paths with different contracts:
/// - [`GasComposition::from_fractions`] takes user-facing fractions and
///   rejects anything that does not close to 1 within [`FRACTION_SUM_TOL`]
///   (validation never corrects inputs).
/// - [`GasComposition::from_molar_flows`] normalizes a molar inventory, the
///   correct semantic for depleted gas running along the exchanger.
#[derive(Debug, Clone, PartialEq)]
pub struct GasComposition {
    items: Vec<(Species, f64)>,
}

impl GasComposition {
    /// Create a pure-species composition.
    pub fn pure(species: Species) -> Self {
        Self {
            items: vec![(species, 1.0)],
        }
    }

    /// Create a composition from already-validated mole fractions.
    ///
    /// Rejects non-finite or out-of-range fractions and any set that does
    /// not sum to 1 within the closure tolerance. Fractions are stored
    /// as given, not renormalized.
    pub fn from_fractions(fractions: Vec<(Species, f64)>) -> FluidResult<Self> {
        if fractions.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut sum = 0.0;
        for (_, frac) in &fractions {
            if !frac.is_finite() {
                return Err(FluidError::NonPhysical {
                    what: "non-finite mole fraction",
                });
            }
            if *frac < 0.0 || *frac > 1.0 {
                return Err(FluidError::NonPhysical {
                    what: "mole fraction outside [0, 1]",
                });
            }
            sum += frac;
        }

        let closure_tol = Tolerances {
            abs: FRACTION_SUM_TOL,
            rel: 0.0,
        };
        if !nearly_equal(sum, 1.0, closure_tol) {
            return Err(FluidError::FractionsNotClosed {
                sum,
                tol: FRACTION_SUM_TOL,
            });
        }

        Ok(Self { items: fractions })
    }

    /// Create a composition by normalizing per-species molar flows.
    ///
    /// Used by the segmented solver on locally depleted gas inventories;
    /// a vanishing total collapses to an all-zero composition rather than
    /// dividing by zero.
    pub fn from_molar_flows(flows: &[(Species, f64)]) -> Self {
        let total: f64 = flows.iter().map(|(_, n)| n.max(0.0)).sum();
        if total <= 1e-15 {
            return Self {
                items: flows.iter().map(|(s, _)| (*s, 0.0)).collect(),
            };
        }
        Self {
            items: flows
                .iter()
                .map(|(s, n)| (*s, clamp_fraction(n.max(0.0) / total)))
                .collect(),
        }
    }

    /// Get mole fraction of a species (0.0 if not present).
    pub fn mole_fraction(&self, species: Species) -> f64 {
        self.items
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }
}
