//! Cutting-stock problem input
//!
//! A [`CuttingProblem`] is what a user submits: the stock rod length, the ordered list of
//! cut types with their demanded quantities, and the number of rod slots the model may use.
//! It is validated once, before any model is built, so the solver never sees a degenerate
//! instance.

use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::AppError;

/// Number of rod slots modelled when the caller does not say otherwise.
///
/// This is an upper bound on the rods the optimiser may use. If the demand needs more
/// rods than this the problem is reported infeasible; the bound is never grown
/// automatically.
pub const DEFAULT_MAX_RODS: u32 = 10;

fn default_max_rods() -> u32 {
    DEFAULT_MAX_RODS
}

/// One required cut length and how many pieces of it are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutType {
    pub length: u32,
    pub demand: u32,
}

impl CutType {
    pub fn new(length: u32, demand: u32) -> Self {
        Self { length, demand }
    }

    /// Total material this cut type consumes across all its pieces.
    pub fn total_length(&self) -> u64 {
        self.length as u64 * self.demand as u64
    }
}

/// Parses `LENGTH:DEMAND`, e.g. `20:5`.
impl FromStr for CutType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (length, demand) = s.split_once(':').ok_or_else(|| {
            AppError::InvalidInput(format!("invalid cut '{}', expected LENGTH:DEMAND", s))
        })?;

        let length = length.trim().parse::<u32>().map_err(|_| {
            AppError::InvalidInput(format!("invalid length in '{}': must be a positive integer", s))
        })?;
        let demand = demand.trim().parse::<u32>().map_err(|_| {
            AppError::InvalidInput(format!("invalid demand in '{}': must be a positive integer", s))
        })?;

        Ok(CutType::new(length, demand))
    }
}

/// A complete optimisation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuttingProblem {
    pub rod_length: u32,
    #[serde(default)]
    pub cuts: Vec<CutType>,
    #[serde(default = "default_max_rods")]
    pub max_rods: u32,
}

impl CuttingProblem {
    /// Create a problem with the default rod-slot bound.
    pub fn new(rod_length: u32, cuts: Vec<CutType>) -> Self {
        Self {
            rod_length,
            cuts,
            max_rods: DEFAULT_MAX_RODS,
        }
    }

    pub fn with_max_rods(mut self, max_rods: u32) -> Self {
        self.max_rods = max_rods;
        self
    }

    /// Reject zero lengths, demands or bounds.
    ///
    /// A cut longer than the rod is *not* rejected here: whether demand can be met is the
    /// solver's call, and it reports such an instance as infeasible.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.rod_length == 0 {
            return Err(AppError::InvalidInput(
                "rod length must be at least 1".to_string(),
            ));
        }
        if self.max_rods == 0 {
            return Err(AppError::InvalidInput(
                "max rods must be at least 1".to_string(),
            ));
        }
        for (j, cut) in self.cuts.iter().enumerate() {
            if cut.length == 0 {
                return Err(AppError::InvalidInput(format!(
                    "cut type {} has length 0; lengths must be at least 1",
                    j + 1
                )));
            }
            if cut.demand == 0 {
                return Err(AppError::InvalidInput(format!(
                    "cut type {} has demand 0; demands must be at least 1",
                    j + 1
                )));
            }
        }
        Ok(())
    }

    /// Total material demanded across all cut types.
    ///
    /// Each product fits a `u64`, but their sum over several cut types may not.
    pub fn total_demand_length(&self) -> u128 {
        self.cuts.iter().map(|c| c.total_length() as u128).sum()
    }

    /// Total number of pieces demanded.
    pub fn total_pieces(&self) -> u64 {
        self.cuts.iter().map(|c| c.demand as u64).sum()
    }

    /// Cut types that can never fit on a rod, by index.
    pub fn oversized_cuts(&self) -> impl Iterator<Item = usize> + '_ {
        self.cuts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.length > self.rod_length)
            .map(|(j, _)| j)
    }
}

/// Reads a problem description from a JSON file.
///
/// ```json
/// { "rod_length": 600, "cuts": [{ "length": 20, "demand": 5 }], "max_rods": 10 }
/// ```
///
/// Well-formed JSON holding a wrong value (a negative or fractional length, a missing rod
/// length) is reported as [`AppError::InvalidInput`]; malformed JSON as a parse error.
pub fn read_problem(file_name: &Path) -> Result<CuttingProblem> {
    let file = fs::read_to_string(file_name)
        .with_context(|| format!("reading problem file {}", file_name.display()))?;

    serde_json::from_str(&file).map_err(|e| match e.classify() {
        Category::Data => {
            AppError::InvalidInput(format!("{}: {}", file_name.display(), e)).into()
        }
        _ => anyhow::Error::new(e)
            .context(format!("parsing problem file {}", file_name.display())),
    })
}
