pub mod ids;
pub mod contact;
pub mod card;

// Re-exports for convenience
pub use ids::Id;
pub use contact::{CardKind, CardType, Contact, RepeaterInfo, ToneMode};
pub use card::Card;
