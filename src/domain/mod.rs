// Domain layer - Pure statistics models and transformations
pub mod date_range;
pub mod ranking;
pub mod timeline;
