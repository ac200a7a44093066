pub mod context;
pub mod decision;
pub mod factory;
pub mod messages;
pub mod value;

pub use context::{ContextError, FormAdapter, ValidationContext};
pub use decision::{decision, first_failure, optional, Decision, DecisionFn, RuleSet};
pub use factory::*;
pub use messages::{ConfigError, Messages};
