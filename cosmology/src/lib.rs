//! Cosmological distance and time calculations
//!
//! This crate provides the distance/age machinery needed to place simulated
//! galaxies on a redshift-space lightcone: a flat ΛCDM cosmology with
//! comoving, transverse and luminosity distances, age of the universe, and
//! a pre-tabulated monotone inverse of the comoving-distance relation for
//! fast redshift assignment.
//!
//! All distances are in comoving megaparsecs unless a unit suffix says
//! otherwise; ages are in gigayears.

pub mod constants;
pub mod inverse;
pub mod lambda_cdm;
pub mod spline;

pub use constants::SI;
pub use inverse::{DistanceInverter, InversionError};
pub use lambda_cdm::{CosmologyError, FlatLambdaCdm};
pub use spline::CubicSpline;
