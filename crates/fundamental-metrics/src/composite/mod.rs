//! Composite scores built from several ratios.
//!
//! Altman Z needs one year, Beneish M and Piotroski F compare a year with the
//! one before it. Zone and flag labels are derived from the numeric scores but
//! reported separately.

pub mod altman;
pub mod beneish;
pub mod piotroski;

pub use altman::{altman_z, altman_z_score, altman_zone, AltmanInputs};
pub use beneish::{beneish_m_score, manipulation_flag, BeneishIndices};
pub use piotroski::{piotroski_f_score, PiotroskiBreakdown};
