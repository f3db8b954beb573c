//! Progress reporting for plan runs and project generation

pub mod reporter;
