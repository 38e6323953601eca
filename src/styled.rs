use serde::Serialize;
use std::fmt;
use std::ops::Range;

use crate::attributes::{AttrValue, Attributes, PlatformHandle, FONT, FOREGROUND_COLOR};

/// A contiguous piece of text and the attributes that apply to all of it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledRun {
    pub text: String,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// Zero-width runs stand for embedded objects (attachments, markers).
    pub fn is_marker(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered styled runs: the host-independent equivalent of an attributed string.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// One unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut styled = Self::new();
        styled.push(text, Attributes::new());
        styled
    }

    pub fn from_runs(runs: impl IntoIterator<Item = StyledRun>) -> Self {
        Self {
            runs: runs.into_iter().collect(),
        }
    }

    /// Append a run. Empty text is ignored; use [`StyledText::push_marker`]
    /// for a deliberate zero-width run.
    pub fn push(&mut self, text: impl Into<String>, attributes: Attributes) {
        let text = text.into();
        if !text.is_empty() {
            self.runs.push(StyledRun::new(text, attributes));
        }
    }

    pub fn push_marker(&mut self, attributes: Attributes) {
        self.runs.push(StyledRun::new(String::new(), attributes));
    }

    /// Append a run, extending the last run instead when its attributes are
    /// identical. Markers are never merged.
    pub fn push_merged(&mut self, text: &str, attributes: &Attributes) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if !last.is_marker() && last.attributes == *attributes => {
                last.text.push_str(text);
            }
            _ => self.runs.push(StyledRun::new(text, attributes.clone())),
        }
    }

    pub fn append(&mut self, other: StyledText) {
        self.runs.extend(other.runs);
    }

    /// Merge every pair of neighbouring runs whose attributes are identical.
    pub fn merge_adjacent(&mut self) {
        let runs = std::mem::take(&mut self.runs);
        for run in runs {
            if run.is_marker() {
                self.runs.push(run);
            } else {
                self.push_merged(&run.text, &run.attributes);
            }
        }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<StyledRun> {
        self.runs
    }

    /// All run texts concatenated in order.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Total length of the text in bytes.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.text.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Byte range of every run within [`StyledText::text`], paired with its attributes.
    pub fn ranges(&self) -> impl Iterator<Item = (Range<usize>, &Attributes)> + '_ {
        let mut offset = 0;
        self.runs.iter().map(move |run| {
            let start = offset;
            offset += run.text.len();
            (start..offset, &run.attributes)
        })
    }

    /// Set one attribute on every run, replacing any previous value.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        for run in &mut self.runs {
            run.attributes.insert(key.to_string(), value.clone());
        }
    }

    pub fn set_font(&mut self, font: PlatformHandle) {
        self.set_attribute(FONT, font);
    }

    pub fn set_color(&mut self, color: impl Into<AttrValue>) {
        self.set_attribute(FOREGROUND_COLOR, color);
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::plain(text)
    }
}
