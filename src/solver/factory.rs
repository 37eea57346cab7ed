use crate::domain::{
    models::SolverConfig,
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
#[cfg(feature = "cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create the solver named by the configuration
    pub fn create_solver(config: &SolverConfig) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(config.backend)
    }

    /// Create a solver for a specific backend, failing if it was not compiled in
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            #[cfg(feature = "cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(CoinCbcSolver::new())),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(HighsSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{} support was not compiled in (enable the matching cargo feature)",
                other
            ))),
        }
    }

    /// HiGHS when available, otherwise CBC
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        if cfg!(feature = "highs") {
            Self::create_from_backend(SolverBackend::Highs)
        } else if cfg!(feature = "cbc") {
            Self::create_from_backend(SolverBackend::CoinCbc)
        } else {
            Err(SolverError::SolverNotAvailable(
                "no MILP backend compiled in (enable the `highs` or `cbc` feature)".to_string(),
            ))
        }
    }

    /// Backends usable in this build
    pub fn available_backends() -> Vec<SolverBackend> {
        let mut backends = Vec::new();
        if cfg!(feature = "highs") {
            backends.push(SolverBackend::Highs);
        }
        if cfg!(feature = "cbc") {
            backends.push(SolverBackend::CoinCbc);
        }
        backends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_matches_availability() {
        let available = SolverFactory::available_backends();
        let auto = SolverFactory::create_from_backend(SolverBackend::Auto);
        assert_eq!(auto.is_ok(), !available.is_empty());
    }

    #[cfg(feature = "highs")]
    #[test]
    fn test_highs_by_name() {
        let solver = SolverFactory::create_solver(
            &SolverConfig::default().with_backend(SolverBackend::Highs),
        )
        .unwrap();
        assert_eq!(solver.name(), "HiGHS");
        assert!(solver.supports_mip());
    }

    #[cfg(not(feature = "cbc"))]
    #[test]
    fn test_missing_backend_is_reported() {
        let err = SolverFactory::create_from_backend(SolverBackend::CoinCbc)
            .err()
            .unwrap();
        assert!(matches!(err, SolverError::SolverNotAvailable(_)));
    }
}
