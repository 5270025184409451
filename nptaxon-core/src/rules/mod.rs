// Rules module - ordered first-match rule tables
// - engine.rs: Matcher / OrderedRules and pattern compilation
// - credentials.rs: credential text → bucket table
// - specialty.rs: free-text specialty → preferred label table

pub mod credentials;
pub mod engine;
pub mod specialty;

pub use engine::{Matcher, OrderedRules, Rule};
