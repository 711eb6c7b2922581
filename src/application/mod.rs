// Facade combining the statistical prediction with the rules layer
pub mod advisor;

// Rule-based insights engine
pub mod insights_service;

// Trained-artifact adapters
pub mod ml;

// Prediction orchestrator
pub mod prediction_service;
