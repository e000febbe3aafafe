//! Collaborators around the negotiation engine.
//!
//! The engine in `haggle-core` decides prices and outcomes deterministically;
//! this crate supplies everything the engine deliberately does not own:
//!
//! - `seller` - the counterparty contract plus a scripted reference seller
//! - `persona` - tera-backed sentence rendering for the buyer's messages
//! - `runner` - drives one session against a seller to a terminal outcome
//!
//! Nothing here influences the numeric engine: personas only phrase the
//! offers the engine already computed, and sellers are opaque collaborators
//! behind a trait.

pub mod persona;
pub mod runner;
pub mod seller;

pub use persona::{Persona, PersonaRenderer};
pub use runner::run_negotiation;
pub use seller::{ScriptedSeller, SellerAgent, SellerAsk, SellerResponse};
