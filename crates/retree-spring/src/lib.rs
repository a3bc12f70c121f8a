#![doc = include_str!("../README.md")]

mod config;
mod find_property;
mod recipes;
mod relaxed;

pub mod v1 {
    //! Versioned public API for the Spring property recipes.
    //!
    //! - [`FindSpringProperty`] marks a property in `application*` files of
    //!   the main source set
    //! - [`FindSpringPropertyForVersions`] does the same, but only when the
    //!   project runs on a matching Spring Framework version
    //! - [`FindYamlProperty`] and [`FindProperties`] are the underlying
    //!   visitors, usable on any source
    //! - [`RecipeConfig`] reads either recipe from JSON

    pub use crate::config::RecipeConfig;
    pub use crate::find_property::{FindProperties, FindYamlProperty};
    pub use crate::recipes::{FindSpringProperty, FindSpringPropertyForVersions};
    pub use crate::relaxed::{KeyMatcher, normalize};
}
