//! Tube-in-shell exchanger geometry.
//!
//! Liquid runs inside a gas-permeable tube; sweep gas runs through the
//! annulus between tube OD and shell ID. All volumes are cylinder math on
//! the nominal dimensions.

use ox_core::units::{cm, mm};
use uom::si::length::{centimeter, meter};

/// Nominal exchanger dimensions as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TubeGeometry {
    /// Tube inner diameter [mm]
    pub tube_id_mm: f64,
    /// Tube outer diameter [mm]
    pub tube_od_mm: f64,
    /// Shell inner diameter [mm]
    pub shell_id_mm: f64,
    /// Tube length [cm]
    pub tube_length_cm: f64,
}

impl TubeGeometry {
    /// Liquid hold-up volume inside the tube [mL].
    pub fn tube_volume_ml(&self) -> f64 {
        tube_volume_ml(self.tube_id_mm, self.tube_length_cm)
    }

    /// Gas hold-up volume in the annulus between tube OD and shell ID [mL].
    pub fn annulus_volume_ml(&self) -> f64 {
        let shell_radius_cm = mm(self.shell_id_mm).get::<centimeter>() / 2.0;
        let tube_od_radius_cm = mm(self.tube_od_mm).get::<centimeter>() / 2.0;
        std::f64::consts::PI
            * (shell_radius_cm.powi(2) - tube_od_radius_cm.powi(2))
            * self.tube_length_cm
    }

    /// Membrane wall thickness [m], honoring an OD override when supplied.
    pub fn wall_thickness_m(&self, od_override_mm: Option<f64>) -> f64 {
        let od_mm = od_override_mm.unwrap_or(self.tube_od_mm);
        (mm(od_mm).get::<meter>() - mm(self.tube_id_mm).get::<meter>()) / 2.0
    }

    /// Outer lateral (transfer) surface area of the tube [m²].
    pub fn outer_area_m2(&self, od_override_mm: Option<f64>) -> f64 {
        let od_m = mm(od_override_mm.unwrap_or(self.tube_od_mm)).get::<meter>();
        let length_m = cm(self.tube_length_cm).get::<meter>();
        std::f64::consts::PI * od_m * length_m
    }
}

/// Liquid hold-up volume of a tube section [mL].
pub fn tube_volume_ml(tube_id_mm: f64, tube_length_cm: f64) -> f64 {
    let radius_cm = mm(tube_id_mm).get::<centimeter>() / 2.0;
    std::f64::consts::PI * radius_cm.powi(2) * tube_length_cm
}

/// Residence time [s] of a stream through a hold-up volume.
pub fn residence_time_s(volume_ml: f64, flow_ml_min: f64) -> f64 {
    (volume_ml / flow_ml_min) * 60.0
}
