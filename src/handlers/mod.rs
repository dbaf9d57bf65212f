// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token, plus ownership for /students/*)
pub mod protected;
pub mod public;
