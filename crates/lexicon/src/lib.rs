//! # VESTA Lexicon
//!
//! Static entity knowledge: synonym tables mapping user phrases to
//! controller entity identifiers, the resolver that applies them with
//! default fallbacks and range checks, and the domain allow-list that
//! bounds which device classes may ever be actuated.

pub mod domain;
pub mod resolver;
pub mod tables;

pub use domain::*;
pub use resolver::*;
pub use tables::*;
