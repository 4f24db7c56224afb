//! Closed value sets used by enumeration fields.

use serde::{Deserialize, Serialize};

/// A named, closed set of permissible string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    /// Enumeration name, referenced by field kinds.
    pub name: String,
    /// Permissible values, matched exactly and case-sensitively.
    pub values: Vec<String>,
}

impl Enumeration {
    /// Create an enumeration from its values.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a value is a member.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Case/control status of a sample.
    pub fn case_control() -> Self {
        Self::new("CaseControl", ["control", "case"])
    }

    /// Biological sex of an individual.
    pub fn biological_sex() -> Self {
        Self::new("BiologicalSex", ["Female", "Male", "Unknown"])
    }

    /// Role of a user.
    pub fn user_role() -> Self {
        Self::new("UserRole", ["data requester", "data steward"])
    }

    /// Vital status of an individual.
    pub fn vital_status() -> Self {
        Self::new("VitalStatus", ["alive", "deceased", "unknown"])
    }

    /// Study type.
    pub fn study_type() -> Self {
        Self::new(
            "StudyType",
            [
                "whole_genome_sequencing",
                "metagenomics",
                "transcriptome_analysis",
                "resequencing",
                "epigenetics",
                "synthetic_genomics",
                "forensic_paleo_genomics",
                "gene_regulation",
                "cancer_genomics",
                "population_genomics",
                "rna_seq",
                "exome_sequencing",
                "pooled_clone_sequencing",
                "other",
            ],
        )
    }

    /// Data file format.
    pub fn file_format() -> Self {
        Self::new(
            "FileFormat",
            [
                "bam",
                "complete_genomics",
                "cram",
                "fasta",
                "fastq",
                "pacbio_hdf5",
                "sff",
                "srf",
                "vcf",
            ],
        )
    }

    /// Status of a submission.
    pub fn submission_status() -> Self {
        Self::new("SubmissionStatus", ["in progress", "completed"])
    }

    /// Release status of a study or dataset.
    pub fn release_status() -> Self {
        Self::new("ReleaseStatus", ["unreleased", "released"])
    }

    /// All enumerations of the GHGA catalogue.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::case_control(),
            Self::biological_sex(),
            Self::user_role(),
            Self::vital_status(),
            Self::study_type(),
            Self::file_format(),
            Self::submission_status(),
            Self::release_status(),
        ]
    }
}
