use merit_quantities::{percent::Percent, power::Megawatts};

/// Input that violates the dispatch preconditions.
///
/// The dispatcher reports these instead of producing a partial plan.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown power plant type `{0}`")]
    UnknownKind(String),

    #[error("power plant `{name}` must have a positive efficiency, got {efficiency}")]
    NonPositiveEfficiency { name: String, efficiency: f64 },

    #[error("power plant `{name}` must have a non-negative `{field}`, got {value}")]
    NegativeBound { name: String, field: &'static str, value: Megawatts },

    #[error("power plant name `{0}` is used more than once")]
    DuplicateName(String),

    #[error("load must be a non-negative number, got {0}")]
    NegativeLoad(Megawatts),

    #[error("wind availability must be between 0% and 100%, got {0}")]
    WindOutOfRange(Percent),
}
