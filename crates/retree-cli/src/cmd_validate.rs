use anyhow::{Context, Result};
use retree::v1::SourceFile;
use std::path::PathBuf;

pub fn run(input: PathBuf) -> Result<()> {
    let content =
        std::fs::read_to_string(&input).with_context(|| format!("Failed to read {:?}", input))?;
    let source = SourceFile::parse(&input, &content)
        .with_context(|| format!("Failed to parse {:?}", input))?;
    if source.print() != content {
        anyhow::bail!("{:?} does not print back to its original text", input);
    }
    println!("Valid {} file: {}", source.kind(), input.display());
    Ok(())
}
