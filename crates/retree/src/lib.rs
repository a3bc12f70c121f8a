#![doc = include_str!("../README.md")]

mod error;
mod markers;
mod properties;
mod recipe;
mod search;
mod source;
mod yaml;
mod yaml_map;

pub mod v1 {
    //! Versioned public API for retree trees, views and recipes.
    //!
    //! Everything you need is re-exported from this module. Types are organized
    //! into four groups:
    //!
    //! # Trees
    //!
    //! Lossless, immutable syntax trees. Printing a freshly parsed tree gives
    //! back the exact input text.
    //!
    //! - [`Documents`], [`Document`], [`Block`], [`Mapping`], [`MappingEntry`],
    //!   [`Sequence`], [`SequenceEntry`], [`Scalar`] for YAML
    //! - [`PropertiesFile`], [`PropertyEntry`], [`PropertyValue`] for
    //!   `.properties`
    //! - [`SourceFile`] wraps either of them, or plain text
    //! - [`Yaml`] is a handle over any YAML node, compared by identity
    //!
    //! # Navigation and rewriting
    //!
    //! - [`YamlMap`] is a map-like view that reads and writes scalars by key
    //! - [`YamlVisitor`] and [`PropertiesVisitor`] rewrite trees, rebuilding only
    //!   the nodes above a change
    //!
    //! # Recipes
    //!
    //! - [`Recipe`] and [`ScanningRecipe`] describe a rewrite
    //! - [`run`] and [`run_scanning`] apply one to a set of sources
    //! - [`Precondition`], [`HasSourceSet`], [`FindSourceFiles`], [`And`] and
    //!   [`Check`] restrict which sources a visitor looks at
    //!
    //! # Markers and search results
    //!
    //! - [`Markers`] carry out-of-band data such as [`SearchResult`] and
    //!   [`SourceSet`]
    //! - [`find_search_results`] lists the values a search recipe marked
    //!
    //! # Example: edit a value by key
    //!
    //! ```
    //! use retree::v1::*;
    //!
    //! let text = "spring:\n  application:\n    name: test\n";
    //! let docs = parse_yaml("application.yml", text).unwrap();
    //!
    //! let root = YamlMap::build(&docs.documents[0]);
    //! let name = root.get("spring").get("application").get("name");
    //! assert_eq!(name.value().as_deref(), Some("test"));
    //!
    //! name.set_value("changed");
    //! let edited = docs.with_documents(vec![root.document().unwrap()]);
    //! assert_eq!(edited.print(), "spring:\n  application:\n    name: changed\n");
    //! ```

    /// Rewriting traversals over YAML and properties trees.
    ///
    /// A visitor overrides the hooks for the nodes it cares about and returns
    /// either the node it was given or a replacement. The `walk_*` functions
    /// continue into children and rebuild a parent only when one of its
    /// children was replaced.
    ///
    /// # Example: upper-case every scalar
    ///
    /// ```
    /// use retree::v1::*;
    /// use retree::v1::visit::*;
    /// use std::rc::Rc;
    ///
    /// struct Upcase;
    ///
    /// impl YamlVisitor for Upcase {
    ///     fn visit_scalar(&mut self, scalar: &Rc<Scalar>) -> Rc<Scalar> {
    ///         scalar.with_value(scalar.value.to_uppercase())
    ///     }
    /// }
    ///
    /// let docs = Rc::new(parse_yaml("a.yml", "key: value\n").unwrap());
    /// let after = Upcase.visit_documents(&docs);
    /// assert_eq!(after.print(), "KEY: VALUE\n");
    /// ```
    pub mod visit {
        pub use crate::properties::visitor::{PropertiesVisitor, walk_entry, walk_file};
        pub use crate::yaml::visitor::{
            YamlVisitor, substitute, walk, walk_document, walk_documents, walk_mapping,
            walk_mapping_entry, walk_sequence, walk_sequence_entry,
        };
    }

    pub use crate::error::{Error, Result};
    pub use crate::markers::{Marker, Markers, SearchResult, SourceSet};
    pub use crate::properties::parser::parse as parse_properties;
    pub use crate::properties::tree::{
        Comment, Delimiter, PropertiesContent, PropertiesFile, PropertyEntry, PropertyValue,
        unescape,
    };
    pub use crate::recipe::{
        And, Check, ExecutionContext, FindSourceFiles, HasSourceSet, Precondition, Recipe,
        RecipeResult, RecipeRun, ScanningRecipe, TreeVisitor, run, run_scanning, unified_diff,
    };
    pub use crate::search::{SearchMatch, find_search_results};
    pub use crate::source::{PlainText, SourceFile};
    pub use self::visit::{PropertiesVisitor, YamlVisitor};
    pub use crate::yaml::parser::parse as parse_yaml;
    pub use crate::yaml::printer::print_block;
    pub use crate::yaml::tree::{
        Block, CollectionStyle, Document, DocumentEnd, Documents, Mapping, MappingEntry, Scalar,
        ScalarStyle, Sequence, SequenceEntry, Yaml,
    };
    pub use crate::yaml_map::YamlMap;
}
