//! Generation driver: runs controller steps to completion.

use std::time::{Duration, Instant};

use modlat_catalog::LatticeDef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::controller::LatticeController;
use crate::error::{LatticeError, Result};
use crate::structure::LatticeStructure;

/// Options for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Step limit as a multiple of the declared element count.
    pub iteration_factor: usize,
    /// Run both verification passes after every step.
    pub verify_each_step: bool,
    /// Run the relation completeness checks after every step.
    pub check_relations_each_step: bool,
    /// Minimum time between progress reports.
    pub progress_interval_ms: u64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            iteration_factor: 3,
            verify_each_step: false,
            check_relations_each_step: false,
            progress_interval_ms: 500,
        }
    }
}

impl GenerationOptions {
    /// Options with every per-step check enabled.
    #[must_use]
    pub fn checked() -> Self {
        Self {
            verify_each_step: true,
            check_relations_each_step: true,
            ..Self::default()
        }
    }
}

/// Runs `controller` until no step is left and checks the final count
/// against `def`.
///
/// `progress` receives `"<n> elements"` on the first step and then at most
/// once per progress interval.
///
/// # Errors
///
/// - [`LatticeError::IterationLimitExceeded`] if the run does not settle.
/// - [`LatticeError::ElementCountMismatch`] if it settles at the wrong size.
/// - Any step or per-step check error.
pub fn run_generation(
    controller: &mut LatticeController,
    def: &LatticeDef,
    options: &GenerationOptions,
    mut progress: impl FnMut(&str),
) -> Result<()> {
    let limit = options.iteration_factor * def.elements;
    let interval = Duration::from_millis(options.progress_interval_ms.max(1));
    let start = Instant::now();
    let mut last_report: Option<u128> = None;
    let mut iteration = 0;
    loop {
        if iteration > limit {
            return Err(LatticeError::IterationLimitExceeded { limit });
        }
        iteration += 1;
        let Some(step) = controller.create_new_element()? else {
            break;
        };
        debug!(lattice = def.name, iteration, "{step}");
        if options.verify_each_step {
            controller.verify_lattice_consistency()?;
        }
        if options.check_relations_each_step {
            controller.check_relations()?;
        }
        let slot = start.elapsed().as_millis() / interval.as_millis();
        if last_report.map_or(true, |last| slot > last) {
            progress(&format!("{} elements", controller.len()));
            last_report = Some(slot);
        }
    }
    if controller.len() != def.elements {
        return Err(LatticeError::ElementCountMismatch {
            name: def.name.to_string(),
            expected: def.elements,
            actual: controller.len(),
        });
    }
    info!(
        lattice = def.name,
        elements = controller.len(),
        iterations = iteration,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "lattice generated"
    );
    Ok(())
}

/// Generates a catalog lattice.
///
/// # Errors
///
/// See [`LatticeController::from_def`] and [`run_generation`].
pub fn generate_lattice(
    def: &LatticeDef,
    options: &GenerationOptions,
    progress: impl FnMut(&str),
) -> Result<LatticeController> {
    let mut controller = LatticeController::from_def(def)?;
    run_generation(&mut controller, def, options, progress)?;
    Ok(controller)
}

/// Looks up a catalog lattice by name, generates it and extracts its
/// structure.
///
/// # Errors
///
/// [`LatticeError::Catalog`] for an unknown name, before any state is
/// created; otherwise any generation error.
pub fn generate_structure(
    lattice_name: &str,
    options: &GenerationOptions,
    progress: impl FnMut(&str),
) -> Result<LatticeStructure> {
    let def = modlat_catalog::lookup(lattice_name)?;
    let controller = generate_lattice(def, options, progress)?;
    LatticeStructure::from_controller(&controller)
}
