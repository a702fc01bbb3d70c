// ox-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Length as UomLength, Pressure as UomPressure, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn cm(v: f64) -> Length {
    use uom::si::length::centimeter;
    Length::new::<centimeter>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn ml(v: f64) -> Volume {
    use uom::si::volume::milliliter;
    Volume::new::<milliliter>(v)
}

#[inline]
pub fn liter(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    /// Ideal gas constant in the working unit system [kPa·L/(mol·K)].
    pub const R_KPA_L_PER_MOL_K: f64 = 8.314_462_618;

    /// Standard atmosphere [kPa].
    pub const P_ATM_KPA: f64 = 101.325;

    /// Celsius-to-Kelvin offset.
    pub const CELSIUS_OFFSET_K: f64 = 273.15;

    /// Membrane permeability: 1 Barrer expressed in mmol·m/(m²·s·kPa).
    ///
    /// Must be applied identically wherever permeability enters a
    /// computation, for every species.
    pub const BARRER_TO_MMOL_M_PER_M2_S_KPA: f64 = 3.35e-10;

    #[inline]
    pub fn kelvin_from_celsius(t_c: f64) -> f64 {
        t_c + CELSIUS_OFFSET_K
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::length::meter;
    use uom::si::pressure::pascal;
    use uom::si::thermodynamic_temperature::kelvin;

    #[test]
    fn constructors_smoke() {
        let _p = kpa(101.325);
        let _t = celsius(25.0);
        let _l = mm(3.2);
        let _v = ml(12.9);
        let _dt = s(1.0);
        let _r = unitless(0.21);
    }

    #[test]
    fn kpa_is_thousand_pascal() {
        let p = kpa(101.325);
        assert!((p.get::<pascal>() - 101_325.0).abs() < 1e-9);
    }

    #[test]
    fn celsius_constructor_offsets_to_kelvin() {
        let t = celsius(25.0);
        assert!((t.get::<kelvin>() - 298.15).abs() < 1e-9);
    }

    #[test]
    fn length_conversions() {
        assert!((mm(3.2).get::<meter>() - 0.0032).abs() < 1e-15);
        assert!((cm(160.0).get::<meter>() - 1.6).abs() < 1e-12);
    }
}
