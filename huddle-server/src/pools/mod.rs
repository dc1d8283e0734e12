pub mod pool_handlers;
pub mod selection_handlers;
pub mod standings_handlers;
