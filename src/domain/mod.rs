//! Domain logic - version grammars, changelog entries and text edits,
//! independent of the filesystem

pub mod changelog;
pub mod scheme;
pub mod substitute;
pub mod version;

pub use changelog::{prepend_entry, ChangelogEntry, LatestEntry};
pub use scheme::{Derivation, DerivationInput, Substitution, VersionScheme};
pub use substitute::SubstitutionMode;
pub use version::{IncrementVersion, VariantVersion};
