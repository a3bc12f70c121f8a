use anyhow::Result;
use retree::v1::{RecipeRun, SearchMatch, find_search_results};
use serde::Serialize;

/// What a search recipe found, in a form both humans and scripts can read.
#[derive(Debug, Serialize)]
pub struct Report {
    pub matches: Vec<SearchMatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Report {
    pub fn from_run(run: &RecipeRun) -> Report {
        Report {
            matches: run
                .results
                .iter()
                .flat_map(|r| find_search_results(&r.after))
                .collect(),
            warnings: run.warnings.clone(),
        }
    }

    /// One `path:line: property: value` line per match.
    pub fn to_text(&self) -> String {
        self.matches
            .iter()
            .map(|m| {
                format!(
                    "{}:{}: {}: {}\n",
                    m.source_path.display(),
                    m.line,
                    m.property,
                    m.value
                )
            })
            .collect()
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
