//! Physical constants for cosmological and spectral calculations.
//!
//! SI values for the Planck function, plus the handful of astronomical
//! conversions the pipeline needs. Grouped on a holder struct so call sites
//! read as `SI::PLANCK_CONSTANT` rather than bare numbers.

/// Physical constants in SI units with astronomy conversions.
pub struct SI {}

impl SI {
    /// Planck's constant
    /// Units: 6.62607015e-34 J·s
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-34;

    /// Speed of light in vacuum
    /// Units: 2.99792458e8 m/s
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

    /// Speed of light in vacuum
    /// Units: 2.99792458e5 km/s
    pub const SPEED_OF_LIGHT_KM_S: f64 = 2.99792458e5;

    /// Boltzmann constant
    /// Units: 1.380649e-23 J/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

    /// One megaparsec in centimeters
    /// Units: 3.0856775814913673e24 cm
    pub const MPC_IN_CM: f64 = 3.0856775814913673e24;

    /// One angstrom in meters
    pub const ANGSTROM_IN_M: f64 = 1e-10;

    /// Solar bolometric luminosity
    /// Units: 3.828e33 erg/s (IAU nominal value)
    pub const SOLAR_LUMINOSITY_ERG_S: f64 = 3.828e33;

    /// Solar metal mass fraction (Asplund et al. 2009)
    pub const SOLAR_METALLICITY: f64 = 0.0142;

    /// Hubble-rate conversion: 1 km/s/Mpc equals 1/GYR_PER_KM_S_MPC per Gyr
    /// Units: 977.7922216807892 Gyr·km/s/Mpc
    pub const GYR_PER_KM_S_MPC: f64 = 977.7922216807892;
}
