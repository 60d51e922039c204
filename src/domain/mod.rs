// Domain layer - Media model, errors and classification rules

pub mod errors;
pub mod model;
pub mod rules;
