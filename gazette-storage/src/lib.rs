//! Gazette Storage - Registries and Store Traits
//!
//! The strings registry lives entirely in memory. The countries registry is
//! defined as the [`CountryStore`] trait; the PostgreSQL implementation lives
//! in gazette-api and [`InMemoryCountryStore`] backs tests and local runs.

pub mod countries;
pub mod strings;

pub use countries::{sort_countries, CountryStore, InMemoryCountryStore};
pub use strings::StringsRegistry;
