//! Controlled Vocabulary (CV) parameter handling for mzML
//!
//! mzML uses CV terms from the PSI-MS ontology to describe data semantically.
//! Besides `cvParam` and `userParam` elements, a handful of elements carry
//! their meaning in an `id` attribute (`software`, `dataProcessing`); those are
//! read into the same [`CvParam`] shape so a single mapper can handle them all.

use super::tree::MzMLNode;

/// A controlled vocabulary parameter from mzML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvParam {
    /// CV reference (e.g., "MS" for PSI-MS)
    pub cv_ref: Option<String>,

    /// Accession number (e.g., "MS:1000511")
    pub accession: Option<String>,

    /// Element identifier (`software@id`, `dataProcessing@id`)
    pub id: Option<String>,

    /// Human-readable name
    pub name: Option<String>,

    /// Optional value
    pub value: Option<String>,

    /// Unit accession
    pub unit_accession: Option<String>,

    /// Unit name
    pub unit_name: Option<String>,
}

impl CvParam {
    /// Create a named term with a value, as found in `cvParam`
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Builder-style unit setter
    pub fn with_unit(mut self, unit_name: impl Into<String>) -> Self {
        self.unit_name = Some(unit_name.into());
        self
    }

    /// Builder-style accession setter
    pub fn with_accession(mut self, accession: impl Into<String>) -> Self {
        self.accession = Some(accession.into());
        self
    }

    /// Read a parameter off any element exposing `id`, `name`, `value`, ... attributes
    pub fn from_node(node: &MzMLNode) -> Self {
        let owned = |key: &str| node.attr(key).map(str::to_string);
        Self {
            cv_ref: owned("cvRef"),
            accession: owned("accession"),
            id: owned("id"),
            name: owned("name"),
            value: owned("value"),
            unit_accession: owned("unitAccession"),
            unit_name: owned("unitName"),
        }
    }

    /// Collect every child element named `element` of `node` as parameters
    ///
    /// Returns an empty list when `node` is absent.
    pub fn collect(node: Option<&MzMLNode>, element: &str) -> Vec<CvParam> {
        node.map(|n| n.children_named(element).map(Self::from_node).collect())
            .unwrap_or_default()
    }

    /// Lookup key: the element `id` if present, else the term name
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }

    /// The value, treating an empty string as absent
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    /// Get the value as f64 if possible
    pub fn value_as_f64(&self) -> Option<f64> {
        self.value_str()?.trim().parse().ok()
    }

    /// Check if this is a boolean CV param (no value means true)
    pub fn is_flag(&self) -> bool {
        self.value_str().is_none()
    }
}
