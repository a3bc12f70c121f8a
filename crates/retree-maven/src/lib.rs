#![doc = include_str!("../README.md")]

mod error;
mod pom;
mod resolve;
mod version;

pub mod v1 {
    //! Versioned public API for reading POMs and matching versions.
    //!
    //! - [`Pom`] is read from `pom.xml` text with [`Pom::parse`]
    //! - [`resolve`] turns it into a [`MavenResolutionResult`], the marker
    //!   recipes query with [`MavenResolutionResult::find_dependencies`]
    //! - [`parse_pom_source`] does both and returns a [`retree::v1::SourceFile`]
    //!   carrying the marker
    //! - [`VersionComparator`] matches versions against selectors such as
    //!   `5.x`, `~1.2`, `[1.0,2.0)` or `latest.release`

    pub use crate::error::{MavenError, Result};
    pub use crate::pom::{Dependency, Parent, Pom, Scope};
    pub use crate::resolve::{
        MavenResolutionResult, ResolvedDependency, SPRING_BOOT_GROUP, SPRING_FRAMEWORK_GROUP,
        parse_pom_source, resolve, spring_framework_version,
    };
    pub use crate::version::{Bound, Version, VersionComparator};
}
