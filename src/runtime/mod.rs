pub mod lifetime;
pub mod logging;

pub use lifetime::startup::prepare_engine;
pub use logging::init_logging;
