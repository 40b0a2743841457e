pub mod identifier;
pub mod patient;
pub mod record;

pub use identifier::*;
pub use patient::*;
pub use record::*;
