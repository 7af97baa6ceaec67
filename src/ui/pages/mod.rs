pub mod calculator;
pub mod sources;

pub use calculator::CalculatorPage;
pub use sources::SourcesPage;
