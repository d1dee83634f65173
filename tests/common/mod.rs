//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every fixture builds its own `MknState`, so each test starts with an empty
//! index cache and parse counter. Tests that exercise loading from disk use a
//! [`TempDocuments`] directory that is removed when dropped.
//!
//! # Available Fixtures
//!
//! - `loaded_state`: state with [`SAMPLE_CLAML`] already loaded
//! - `empty_state`: state with no document loaded
//! - `text_state`: state with [`TEXT_CLAML`], where only `J06` mentions both
//!   "akutní" and "infekce"

#![allow(dead_code)] // Items used across different integration test crates

use mkn_mcp::MknState;
use mkn_mcp::cache::DEFAULT_CACHE_CAPACITY;
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Two chapters; the respiratory one carries the full X → J00-J06 → J06 → J06.9 chain.
pub const SAMPLE_CLAML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ClaML SYSTEM "ClaML.dtd">
<ClaML version="2.0.0">
  <Title name="MKN-10" version="2018"/>
  <ModifierClass modifier="S04_4" code=".0">
    <Rubric kind="preferred"><Label xml:lang="cs">s komplikací</Label></Rubric>
  </ModifierClass>
  <ModifierClass modifier="S04_4" code=".1">
    <Rubric kind="preferred"><Label xml:lang="cs">bez komplikace</Label></Rubric>
  </ModifierClass>
  <Class code="II" kind="chapter">
    <Rubric kind="preferred">
      <Label xml:lang="cs">Novotvary</Label>
      <Label xml:lang="en">Neoplasms</Label>
    </Rubric>
    <SubClass code="C00-C14"/>
  </Class>
  <Class code="C00-C14" kind="block">
    <SuperClass code="II"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Zhoubné novotvary rtu, dutiny ústní a hltanu</Label></Rubric>
    <SubClass code="C00"/>
  </Class>
  <Class code="C00" kind="category">
    <SuperClass code="C00-C14"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Zhoubný novotvar rtu</Label></Rubric>
  </Class>
  <Class code="X" kind="chapter">
    <Rubric kind="preferred">
      <Label xml:lang="cs">Nemoci dýchací soustavy</Label>
      <Label xml:lang="en">Diseases of the respiratory system</Label>
    </Rubric>
    <SubClass code="J00-J06"/>
  </Class>
  <Class code="J00-J06" kind="block">
    <SuperClass code="X"/>
    <Rubric kind="preferred">
      <Label xml:lang="cs">Akutní infekce horních cest dýchacích</Label>
    </Rubric>
    <SubClass code="J06"/>
  </Class>
  <Class code="J06" kind="category">
    <SuperClass code="J00-J06"/>
    <Rubric kind="preferred">
      <Label xml:lang="cs">Akutní infekce horních cest dýchacích na více a neurčených místech</Label>
      <Label xml:lang="en">Acute upper respiratory infections of multiple and unspecified sites</Label>
    </Rubric>
    <Rubric kind="inclusion"><Label xml:lang="cs">Akutní infekce horních cest dýchacích NS</Label></Rubric>
    <Rubric kind="exclusion"><Label xml:lang="cs">chřipka</Label></Rubric>
    <ModifiedBy code="S04_4"/>
    <SubClass code="J06.9"/>
  </Class>
  <Class code="J06.9" kind="category">
    <SuperClass code="J06"/>
    <Rubric kind="preferred">
      <Label xml:lang="cs">Akutní infekce horních cest dýchacích NS</Label>
    </Rubric>
  </Class>
</ClaML>
"#;

/// Only `J06` has both "akutní" and "infekce" in its label.
pub const TEXT_CLAML: &str = r#"<ClaML version="2.0.0">
  <Class code="X" kind="chapter">
    <Rubric kind="preferred"><Label xml:lang="cs">Nemoci dýchací soustavy</Label></Rubric>
  </Class>
  <Class code="J00-J06" kind="block">
    <SuperClass code="X"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Infekce horních cest dýchacích</Label></Rubric>
  </Class>
  <Class code="J06" kind="category">
    <SuperClass code="J00-J06"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Akutní infekce horních cest dýchacích</Label></Rubric>
  </Class>
  <Class code="J06.9" kind="category">
    <SuperClass code="J06"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Zánět NS</Label></Rubric>
  </Class>
  <Class code="J20-J22" kind="block">
    <SuperClass code="X"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Jiné infekce dolních cest dýchacích</Label></Rubric>
  </Class>
  <Class code="J20" kind="category">
    <SuperClass code="J20-J22"/>
    <Rubric kind="preferred"><Label xml:lang="cs">Akutní bronchitida</Label></Rubric>
  </Class>
</ClaML>
"#;

/// A temporary directory for ClaML files, removed when dropped.
pub struct TempDocuments {
    _temp: TempDir,
    root: PathBuf,
}

impl TempDocuments {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `name` inside the directory and returns its full path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(name);
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", name, e));
        full_path
    }
}

impl Default for TempDocuments {
    fn default() -> Self {
        Self::new()
    }
}

/// State with `raw` loaded as if read from `sample.xml`.
pub fn state_with(raw: &str) -> Arc<MknState> {
    Arc::new(MknState::with_document(
        DEFAULT_CACHE_CAPACITY,
        "sample.xml",
        raw,
    ))
}

#[fixture]
pub fn loaded_state() -> Arc<MknState> {
    state_with(SAMPLE_CLAML)
}

#[fixture]
pub fn text_state() -> Arc<MknState> {
    state_with(TEXT_CLAML)
}

#[fixture]
pub fn empty_state() -> Arc<MknState> {
    Arc::new(MknState::default())
}

/// Parses a tool response, panicking with the raw text if it is not JSON.
pub fn parse_json(output: &str) -> serde_json::Value {
    serde_json::from_str(output)
        .unwrap_or_else(|e| panic!("Tool returned invalid JSON ({}): {}", e, output))
}

/// Codes listed under `results` in a search response, in order.
pub fn result_codes(response: &serde_json::Value) -> Vec<String> {
    response["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["code"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
