//! Recipes: named, validated rewrites over a set of source files.
//!
//! A [`Recipe`] hands out a [`TreeVisitor`] that is applied to every source
//! file once. A [`ScanningRecipe`] first reads every source into an
//! accumulator and then builds its visitor from what it saw, which is how a
//! rule can depend on facts found in other files (for example, the
//! dependencies declared in a build file).
//!
//! A source file whose identity did not change is considered untouched; only
//! sources the visitor replaced show up in the [`RecipeRun`].

use crate::error::Result;
use crate::markers::SourceSet;
use crate::source::SourceFile;
use globset::{GlobBuilder, GlobMatcher};
use similar::TextDiff;
use std::path::Path;
use tracing::{debug, info};

/// State shared by everything that runs during one recipe run.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    warnings: Vec<String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem that should not abort the run.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

pub trait TreeVisitor {
    /// Return `source` itself when nothing changes.
    fn visit(&mut self, source: &SourceFile, ctx: &mut ExecutionContext) -> SourceFile;
}

impl<T: TreeVisitor + ?Sized> TreeVisitor for Box<T> {
    fn visit(&mut self, source: &SourceFile, ctx: &mut ExecutionContext) -> SourceFile {
        (**self).visit(source, ctx)
    }
}

pub trait Recipe {
    fn display_name(&self) -> String;

    fn description(&self) -> String;

    /// Reject invalid options before anything is visited.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn visitor(&self) -> Box<dyn TreeVisitor + '_>;
}

pub trait ScanningRecipe {
    type Accumulator;

    fn display_name(&self) -> String;

    fn description(&self) -> String;

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn initial_value(&self) -> Self::Accumulator;

    /// Called once per source before any edits are made.
    fn scan(&self, acc: &mut Self::Accumulator, source: &SourceFile, ctx: &mut ExecutionContext);

    fn visitor<'a>(&'a self, acc: &'a Self::Accumulator) -> Box<dyn TreeVisitor + 'a>;
}

// ============================================================================
// Preconditions
// ============================================================================

/// A cheap test deciding whether a visitor should look at a source at all.
pub trait Precondition {
    fn matches(&self, source: &SourceFile) -> bool;
}

impl Precondition for bool {
    fn matches(&self, _source: &SourceFile) -> bool {
        *self
    }
}

/// Matches sources carrying a [`SourceSet`] marker with the given name.
#[derive(Debug, Clone)]
pub struct HasSourceSet {
    pub name: String,
}

impl HasSourceSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Precondition for HasSourceSet {
    fn matches(&self, source: &SourceFile) -> bool {
        source
            .markers()
            .find_first::<SourceSet>()
            .is_some_and(|set| set.name == self.name)
    }
}

/// Matches sources whose path matches a glob such as `**/application*`.
/// Only `**` crosses directories; `*` and `?` stay within one path component.
#[derive(Debug, Clone)]
pub struct FindSourceFiles {
    matcher: GlobMatcher,
}

impl FindSourceFiles {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }
}

impl Precondition for FindSourceFiles {
    fn matches(&self, source: &SourceFile) -> bool {
        self.matcher.is_match(source.source_path())
    }
}

/// Both preconditions must match.
#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

impl<A: Precondition, B: Precondition> Precondition for And<A, B> {
    fn matches(&self, source: &SourceFile) -> bool {
        self.0.matches(source) && self.1.matches(source)
    }
}

/// Runs `visitor` only on sources that satisfy `precondition`.
pub struct Check<P, V> {
    precondition: P,
    visitor: V,
}

impl<P: Precondition, V: TreeVisitor> Check<P, V> {
    pub fn new(precondition: P, visitor: V) -> Self {
        Self {
            precondition,
            visitor,
        }
    }
}

impl<P: Precondition, V: TreeVisitor> TreeVisitor for Check<P, V> {
    fn visit(&mut self, source: &SourceFile, ctx: &mut ExecutionContext) -> SourceFile {
        if self.precondition.matches(source) {
            self.visitor.visit(source, ctx)
        } else {
            source.clone()
        }
    }
}

// ============================================================================
// Running
// ============================================================================

/// One changed source.
#[derive(Debug, Clone)]
pub struct RecipeResult {
    pub before: SourceFile,
    pub after: SourceFile,
}

impl RecipeResult {
    pub fn path(&self) -> &Path {
        self.after.source_path()
    }

    /// A unified diff of the printed source.
    pub fn diff(&self) -> String {
        unified_diff(self.path(), &self.before.print(), &self.after.print())
    }
}

/// A unified diff between two versions of the file at `path`, with `a/` and
/// `b/` headers and three lines of context.
pub fn unified_diff(path: &Path, before: &str, after: &str) -> String {
    let old_header = format!("a/{}", path.display());
    let new_header = format!("b/{}", path.display());
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string()
}

/// The outcome of running a recipe over a set of sources.
#[derive(Debug, Default)]
pub struct RecipeRun {
    pub results: Vec<RecipeResult>,
    pub warnings: Vec<String>,
}

impl RecipeRun {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Every source after the run, changed or not, in input order.
    pub fn apply(&self, sources: &[SourceFile]) -> Vec<SourceFile> {
        sources
            .iter()
            .map(|source| {
                self.results
                    .iter()
                    .find(|r| r.before.ptr_eq(source))
                    .map(|r| r.after.clone())
                    .unwrap_or_else(|| source.clone())
            })
            .collect()
    }
}

/// Validate `recipe`, then visit every source once.
pub fn run(recipe: &dyn Recipe, sources: &[SourceFile]) -> Result<RecipeRun> {
    recipe.validate()?;
    let mut ctx = ExecutionContext::new();
    let mut visitor = recipe.visitor();
    let results = edit(&recipe.display_name(), visitor.as_mut(), sources, &mut ctx);
    Ok(RecipeRun {
        results,
        warnings: ctx.warnings,
    })
}

/// Validate `recipe`, scan every source into the accumulator, then visit
/// every source once with the visitor built from it.
pub fn run_scanning<R: ScanningRecipe>(recipe: &R, sources: &[SourceFile]) -> Result<RecipeRun> {
    recipe.validate()?;
    let mut ctx = ExecutionContext::new();
    let mut acc = recipe.initial_value();
    for source in sources {
        debug!("Scanning {}", source.source_path().display());
        recipe.scan(&mut acc, source, &mut ctx);
    }
    let mut visitor = recipe.visitor(&acc);
    let results = edit(&recipe.display_name(), visitor.as_mut(), sources, &mut ctx);
    Ok(RecipeRun {
        results,
        warnings: ctx.warnings,
    })
}

fn edit<V: TreeVisitor + ?Sized>(
    name: &str,
    visitor: &mut V,
    sources: &[SourceFile],
    ctx: &mut ExecutionContext,
) -> Vec<RecipeResult> {
    let mut results = Vec::new();
    for source in sources {
        let after = visitor.visit(source, ctx);
        if !after.ptr_eq(source) {
            debug!("{} changed {}", name, source.source_path().display());
            results.push(RecipeResult {
                before: source.clone(),
                after,
            });
        }
    }
    info!(
        "{}: {} of {} source files changed",
        name,
        results.len(),
        sources.len()
    );
    results
}
