//! The GHGA metadata catalogue, schema version 0.5.0.

use crate::error::SchemaError;

use super::catalogue::Catalogue;
use super::definition::EntityTypeDef;
use super::enums::Enumeration;
use super::field::FieldSpec;
use super::mixin::Mixin;
use super::value_object::ValueObject;

/// Schema version described by the built-in catalogue.
pub const SCHEMA_VERSION: &str = "0.5.0";

/// Name of the root entity type.
pub const ROOT_TYPE: &str = "NamedThing";

/// Submittable types, which narrow `alias` to required.
pub const ALIASED_TYPES: [&str; 11] = [
    "Experiment",
    "Sample",
    "Individual",
    "Donor",
    "File",
    "Analysis",
    "DataAccessPolicy",
    "DataAccessCommittee",
    "Project",
    "Study",
    "Dataset",
];

pub(crate) fn catalogue() -> Result<Catalogue, SchemaError> {
    let mut builder = Catalogue::builder(SCHEMA_VERSION);
    for enumeration in Enumeration::builtin() {
        builder = builder.enumeration(enumeration);
    }
    for object in ValueObject::builtin() {
        builder = builder.value_object(object);
    }
    for mixin in Mixin::builtin() {
        builder = builder.mixin(mixin);
    }
    for definition in definitions() {
        builder = builder.entity_type(definition);
    }
    builder.build()
}

/// Every entity type definition, parents before children.
pub fn definitions() -> Vec<EntityTypeDef> {
    let mut defs = vec![named_thing()];
    defs.extend(first_level());
    defs.extend(processes());
    defs.extend(information());
    defs.extend(material());
    defs.extend(people());
    defs.push(submission());
    defs.into_iter().map(require_alias).collect()
}

fn require_alias(def: EntityTypeDef) -> EntityTypeDef {
    if !ALIASED_TYPES.contains(&def.name.as_str()) {
        return def;
    }
    def.field(
        FieldSpec::string("alias", "The alias (alternate identifier) for an entity.").required(),
    )
}

fn named_thing() -> EntityTypeDef {
    EntityTypeDef::new(
        ROOT_TYPE,
        "A databased entity, concept or class. The root of all other entity types.",
    )
    .abstract_type()
    .mixins(["Metadata"])
    .field(FieldSpec::string("id", "The internal unique identifier for an entity.").required())
    .field(FieldSpec::string("alias", "The alias (alternate identifier) for an entity."))
    .field(FieldSpec::string_list(
        "xref",
        "Holds one or more database cross references for an entity.",
    ))
    .field(FieldSpec::timestamp(
        "creation_date",
        "Timestamp (in ISO 8601 format) when the entity was created.",
    ))
    .field(FieldSpec::timestamp(
        "update_date",
        "Timestamp (in ISO 8601 format) when the entity was updated.",
    ))
}

fn first_level() -> Vec<EntityTypeDef> {
    vec![
        EntityTypeDef::new(
            "Agent",
            "Something that bears responsibility for an activity: a person, organization or software.",
        )
        .parent(ROOT_TYPE)
        .field(FieldSpec::string("name", "The name for an entity."))
        .field(FieldSpec::string("description", "Description of an entity.")),
        EntityTypeDef::new("Person", "A member of the species Homo sapiens.")
            .parent(ROOT_TYPE)
            .field(FieldSpec::string("given_name", "First name."))
            .field(FieldSpec::string("family_name", "Last name."))
            .field(FieldSpec::string("additional_name", "Additional name(s).")),
        EntityTypeDef::new("Committee", "A group of people organized for a specific purpose.")
            .parent(ROOT_TYPE)
            .field(FieldSpec::string("name", "The name for an entity.")),
        EntityTypeDef::new(
            "MaterialEntity",
            "A physical entity that is spatially extended and has mass.",
        )
        .parent(ROOT_TYPE),
        EntityTypeDef::new(
            "BiologicalQuality",
            "A quality held by a biological entity.",
        )
        .parent(ROOT_TYPE),
        EntityTypeDef::new(
            "InformationContentEntity",
            "A generically dependent continuant that is about some thing.",
        )
        .parent(ROOT_TYPE),
        EntityTypeDef::new(
            "PlannedProcess",
            "A process that exists in time and depends on some entity while it occurs.",
        )
        .parent(ROOT_TYPE),
    ]
}

fn titled(def: EntityTypeDef) -> EntityTypeDef {
    def.field(FieldSpec::string("title", "The title that describes an entity."))
        .field(FieldSpec::string("description", "Description of an entity."))
}

fn processes() -> Vec<EntityTypeDef> {
    vec![
        titled(
            EntityTypeDef::new(
                "Investigation",
                "Carrying out a plan or procedure to discover facts about the object of study.",
            )
            .parent("PlannedProcess"),
        ),
        titled(
            EntityTypeDef::new(
                "DataTransformation",
                "A technique used to analyze and interpret data.",
            )
            .parent("PlannedProcess"),
        ),
        titled(
            EntityTypeDef::new(
                "ResearchActivity",
                "A planned process executed in the performance of scientific research.",
            )
            .parent("PlannedProcess"),
        ),
        EntityTypeDef::new(
            "ExperimentProcess",
            "How a Sample is transformed to a File via an assay, with its Protocol and Agent.",
        )
        .parent("PlannedProcess")
        .field(FieldSpec::string(
            "title",
            "A descriptive title of the steps leading up to sequencing.",
        ))
        .field(FieldSpec::link("has_input", "Sample", "The input to the Experiment Process."))
        .field(FieldSpec::link(
            "has_protocol",
            "Protocol",
            "The Protocol used by this Experiment Process.",
        ))
        .field(FieldSpec::link(
            "has_agent",
            "Agent",
            "The Agent executing the Experiment Process.",
        ))
        .field(FieldSpec::link("has_output", "File", "The output of this Experiment Process.")),
        EntityTypeDef::new(
            "AnalysisProcess",
            "How Files from a Study are transformed to other Files via a Workflow.",
        )
        .parent("PlannedProcess")
        .field(FieldSpec::string("title", "The title that describes an entity."))
        .field(FieldSpec::links(
            "has_input",
            "File",
            "The input data Files used in the Analysis Process.",
        ))
        .field(FieldSpec::link(
            "has_workflow_step",
            "WorkflowStep",
            "Workflow Step that operates on the input Files.",
        ))
        .field(FieldSpec::link(
            "has_agent",
            "Agent",
            "The Agent executing the workflow.",
        ))
        .field(FieldSpec::links(
            "has_output",
            "File",
            "The output data Files generated by the Analysis Process.",
        )),
        EntityTypeDef::new(
            "Experiment",
            "An investigation designed to generate data for verifying or falsifying a hypothesis.",
        )
        .parent("Investigation")
        .mixins(["Accession", "EgaAccession", "Attribute"])
        .field(FieldSpec::string(
            "biological_replicates",
            "Independent biological replicates made from different biosamples.",
        ))
        .field(FieldSpec::string(
            "technical_replicates",
            "Replicates made from the same biosample.",
        ))
        .field(FieldSpec::string(
            "experimental_replicates",
            "The replicate number of the assay.",
        ))
        .field(
            FieldSpec::link("has_study", "Study", "The Study associated with this Experiment.")
                .required(),
        )
        .field(
            FieldSpec::link("has_sample", "Sample", "The Sample associated with this Experiment.")
                .required(),
        )
        .field(FieldSpec::links(
            "has_file",
            "File",
            "Files generated as output of this Experiment.",
        ))
        .field(
            FieldSpec::links(
                "has_protocol",
                "Protocol",
                "Protocols associated with this Experiment.",
            )
            .required(),
        )
        .field(FieldSpec::links(
            "has_experiment_process",
            "ExperimentProcess",
            "Experiment Processes associated with this Experiment.",
        ))
        .field(FieldSpec::string("description", "Description of an entity.").required()),
        EntityTypeDef::new(
            "Study",
            "Studies are experimental investigations of a particular phenomenon.",
        )
        .parent("Investigation")
        .mixins([
            "Accession",
            "EgaAccession",
            "Attribute",
            "Publication",
            "ReleaseStatus",
            "Deprecated",
        ])
        .field(
            FieldSpec::string_list(
                "affiliation",
                "Institutions associated with this Study.",
            )
            .required(),
        )
        .field(FieldSpec::enumeration("type", "StudyType", "The type of the Study."))
        .field(FieldSpec::links(
            "has_experiment",
            "Experiment",
            "Experiments associated with this Study.",
        ))
        .field(FieldSpec::links(
            "has_analysis",
            "Analysis",
            "Analyses associated with this Study.",
        ))
        .field(FieldSpec::link(
            "has_project",
            "Project",
            "The Project associated with this Study.",
        ))
        .field(FieldSpec::string("title", "A comprehensive title for the study.").required())
        .field(FieldSpec::string("description", "A detailed description of the study.").required()),
        EntityTypeDef::new(
            "Analysis",
            "A data transformation from input data to output data, with its workflow.",
        )
        .parent("DataTransformation")
        .mixins(["Accession", "EgaAccession"])
        .field(
            FieldSpec::string(
                "reference_genome",
                "The reference genome used for this Analysis (e.g. GRCh38.p13).",
            )
            .required(),
        )
        .field(
            FieldSpec::string(
                "reference_chromosome",
                "The reference chromosome used for this Analysis.",
            )
            .required(),
        )
        .field(
            FieldSpec::links("has_input", "File", "The input data Files used in the Analysis.")
                .required(),
        )
        .field(FieldSpec::link("has_study", "Study", "The Study associated with this Analysis."))
        .field(FieldSpec::link(
            "has_workflow",
            "Workflow",
            "The Workflow associated with this Analysis.",
        ))
        .field(FieldSpec::links(
            "has_analysis_process",
            "AnalysisProcess",
            "Analysis Processes associated with this Analysis.",
        ))
        .field(FieldSpec::links(
            "has_output",
            "File",
            "The output data Files generated by this Analysis.",
        )),
        EntityTypeDef::new(
            "Project",
            "Any specifically defined piece of work undertaken to meet a single requirement.",
        )
        .parent("ResearchActivity")
        .mixins(["Accession", "Attribute"])
        .field(FieldSpec::string("title", "The title that describes an entity.").required())
        .field(FieldSpec::string("description", "Description of an entity.").required()),
    ]
}

fn information() -> Vec<EntityTypeDef> {
    vec![
        EntityTypeDef::new(
            "Technology",
            "The instrument used for an assay, with its instrument-specific attributes.",
        )
        .parent("InformationContentEntity"),
        EntityTypeDef::new("Workflow", "The workflow used to perform an analysis.")
            .parent("InformationContentEntity"),
        EntityTypeDef::new(
            "WorkflowStep",
            "One step of a Workflow, with its parameters.",
        )
        .parent("InformationContentEntity")
        .field(FieldSpec::records(
            "has_parameter",
            "WorkflowParameter",
            "Parameters associated with this Workflow Step.",
        )),
        EntityTypeDef::new(
            "Publication",
            "A publication, expected to carry at least a valid DOI.",
        )
        .parent("InformationContentEntity")
        .field(FieldSpec::string("title", "The title that describes an entity."))
        .field(FieldSpec::string(
            "abstract",
            "The abstract that describes the goals of the publication.",
        )),
        EntityTypeDef::new("File", "A file is an object that contains information generated from a process.")
            .parent("InformationContentEntity")
            .mixins(["Accession", "EgaAccession"])
            .field(FieldSpec::string("name", "The given filename.").required())
            .field(
                FieldSpec::enumeration("format", "FileFormat", "The format of the file.")
                    .required(),
            )
            .field(FieldSpec::string("size", "The size of a file in bytes."))
            .field(
                FieldSpec::string(
                    "checksum",
                    "A computed value used to detect corruption of the file contents.",
                )
                .required(),
            )
            .field(
                FieldSpec::string(
                    "checksum_type",
                    "The algorithm used to generate the checksum.",
                )
                .required(),
            ),
        EntityTypeDef::new(
            "DataAccessPolicy",
            "Under which circumstances a user can access Datasets of one or more Studies.",
        )
        .parent("InformationContentEntity")
        .mixins(["Accession", "EgaAccession"])
        .field(FieldSpec::string("name", "The name for an entity."))
        .field(FieldSpec::string("description", "Description of an entity.").required())
        .field(
            FieldSpec::string("policy_text", "The terms of data use and policy verbiage.")
                .required(),
        )
        .field(FieldSpec::string("policy_url", "URL for the policy, if available."))
        .field(
            FieldSpec::link(
                "has_data_access_committee",
                "DataAccessCommittee",
                "The Data Access Committee linked to this policy.",
            )
            .required(),
        )
        .field(FieldSpec::records(
            "has_data_use_condition",
            "DataUseCondition",
            "Data Use Conditions associated with the policy.",
        )),
        EntityTypeDef::new(
            "Protocol",
            "A plan specification detailed enough to be reproduced independently.",
        )
        .parent("InformationContentEntity")
        .mixins(["Attribute"])
        .field(FieldSpec::string("name", "The name for an entity."))
        .field(FieldSpec::string("description", "Description of an entity."))
        .field(FieldSpec::string("url", "URL for the resource that describes this entity.")),
        EntityTypeDef::new(
            "LibraryPreparationProtocol",
            "Information about the library preparation of an Experiment.",
        )
        .parent("Protocol")
        .field(FieldSpec::string("library_name", "A short name identifying the library.").required())
        .field(
            FieldSpec::string(
                "library_layout",
                "Whether the library was sequenced single-end or paired-end.",
            )
            .required(),
        )
        .field(FieldSpec::string("library_type", "The level of omics analysis.").required())
        .field(
            FieldSpec::string(
                "library_selection",
                "Method used to select, enrich or screen the sequenced material.",
            )
            .required(),
        )
        .field(
            FieldSpec::string(
                "library_preparation",
                "The general method for sequencing library preparation.",
            )
            .required(),
        )
        .field(
            FieldSpec::string(
                "library_preparation_kit_retail_name",
                "Identifier of the kit used to construct the library.",
            )
            .required(),
        )
        .field(
            FieldSpec::string(
                "library_preparation_kit_manufacturer",
                "Manufacturer of the library preparation kit.",
            )
            .required(),
        )
        .field(FieldSpec::string(
            "primer",
            "The type of primer used for reverse transcription.",
        ))
        .field(FieldSpec::string(
            "end_bias",
            "The end of the cDNA molecule that is preferentially sequenced.",
        ))
        .field(
            FieldSpec::string(
                "target_regions",
                "Genes or genome regions most likely involved in the phenotype under study.",
            )
            .required(),
        )
        .field(FieldSpec::string(
            "rnaseq_strandedness",
            "The strandedness of the library.",
        ))
        .field(FieldSpec::string("description", "Description of an entity.").required()),
        EntityTypeDef::new("SequencingProtocol", "Information about the sequencing of a sample.")
            .parent("Protocol")
            .field(FieldSpec::string("sequencing_center", "Center where sample was sequenced."))
            .field(
                FieldSpec::string(
                    "instrument_model",
                    "The name and model of the sequencing platform.",
                )
                .required(),
            )
            .field(FieldSpec::string(
                "paired_or_single_end",
                "Whether a FASTQ file holds forward or reverse reads.",
            ))
            .field(FieldSpec::string("sequencing_read_length", "Length of sequencing reads."))
            .field(FieldSpec::string(
                "index_sequence",
                "Nucleotide sequence added during library preparation to identify the sample.",
            ))
            .field(FieldSpec::string("target_coverage", "Mean (target) coverage."))
            .field(FieldSpec::string("lane_number", "Identifier of the sequencing lane."))
            .field(FieldSpec::string("flow_cell_id", "Barcode assigned to the flow cell."))
            .field(FieldSpec::string("flow_cell_type", "Type of flow cell used."))
            .field(FieldSpec::string(
                "umi_barcode_read",
                "The read that contains the UMI barcode.",
            ))
            .field(FieldSpec::string("umi_barcode_size", "The size of the UMI barcode."))
            .field(FieldSpec::string("umi_barcode_offset", "The offset of the UMI barcode."))
            .field(FieldSpec::string(
                "cell_barcode_read",
                "The read that contains the cell barcode.",
            ))
            .field(FieldSpec::string("cell_barcode_offset", "The offset of the cell barcode."))
            .field(FieldSpec::string("cell_barcode_size", "The size of the cell barcode."))
            .field(FieldSpec::string(
                "sample_barcode_read",
                "The read that contains the sample barcode.",
            ))
            .field(FieldSpec::string("description", "Description of an entity.").required()),
        EntityTypeDef::new(
            "Dataset",
            "A collection of Files prepared for distribution, tied to Studies and a policy.",
        )
        .parent("InformationContentEntity")
        .mixins([
            "Accession",
            "EgaAccession",
            "Publication",
            "ReleaseStatus",
            "Deprecated",
        ])
        .field(FieldSpec::string("title", "A title for the Dataset.").required())
        .field(FieldSpec::string("description", "Description of the Dataset.").required())
        .field(FieldSpec::links("has_study", "Study", "Studies in this Dataset.").required())
        .field(
            FieldSpec::links("has_experiment", "Experiment", "Experiments in this Dataset.")
                .required(),
        )
        .field(FieldSpec::links("has_sample", "Sample", "Samples in this Dataset.").required())
        .field(
            FieldSpec::links("has_analysis", "Analysis", "Analyses in this Dataset.").required(),
        )
        .field(FieldSpec::links("has_file", "File", "Files in this Dataset.").required())
        .field(
            FieldSpec::link(
                "has_data_access_policy",
                "DataAccessPolicy",
                "The Data Access Policy that applies to this Dataset.",
            )
            .required(),
        ),
    ]
}

fn ontology_term(def: EntityTypeDef) -> EntityTypeDef {
    def.mixins(["OntologyClass"])
        .field(FieldSpec::string("name", "The name for an entity."))
        .field(FieldSpec::string("description", "Description of an entity."))
}

fn material() -> Vec<EntityTypeDef> {
    vec![
        EntityTypeDef::new(
            "Population",
            "A collection of individuals from the same taxonomic class sampled at a site.",
        )
        .parent("MaterialEntity")
        .field(FieldSpec::string("name", "The name for an entity.")),
        EntityTypeDef::new(
            "Family",
            "Domestic groups linked through descent, marriage or adoption.",
        )
        .parent("Population")
        .mixins(["Accession"])
        .field(FieldSpec::links(
            "has_member",
            "Individual",
            "Individuals that collectively define this Family.",
        ))
        .field(FieldSpec::link(
            "has_proband",
            "Individual",
            "The Individual whose disorder brought the Family into a Study.",
        )),
        EntityTypeDef::new(
            "Cohort",
            "Individuals grouped together by a shared characteristic for a study.",
        )
        .parent("Population")
        .mixins(["Accession"])
        .field(FieldSpec::links(
            "has_member",
            "Individual",
            "Individuals that collectively define this Cohort.",
        )),
        ontology_term(
            EntityTypeDef::new(
                "AnatomicalEntity",
                "An organism or a structural part of an organism.",
            )
            .parent("MaterialEntity"),
        ),
        EntityTypeDef::new(
            "CellLine",
            "A genetically stable, homogenous population of cultured cells.",
        )
        .parent("MaterialEntity"),
        EntityTypeDef::new(
            "Biospecimen",
            "Natural material taken from a biological entity, linked to its Individual.",
        )
        .parent("MaterialEntity")
        .mixins(["Accession"])
        .field(FieldSpec::string("name", "The name for an entity."))
        .field(FieldSpec::string("description", "Description of an entity."))
        .field(FieldSpec::string(
            "isolation",
            "Method or device employed for collecting or isolating the biospecimen.",
        ))
        .field(FieldSpec::string(
            "storage",
            "Methods by which the biospecimen is stored.",
        ))
        .field(FieldSpec::link(
            "has_individual",
            "Individual",
            "The Individual from which this Biospecimen was derived.",
        ))
        .field(FieldSpec::link(
            "has_anatomical_entity",
            "AnatomicalEntity",
            "The anatomical site the Biospecimen was retrieved from.",
        ))
        .field(FieldSpec::links(
            "has_disease",
            "Disease",
            "Diseases associated with the Individual.",
        ))
        .field(FieldSpec::links(
            "has_phenotypic_feature",
            "PhenotypicFeature",
            "Phenotypic features associated with the Individual.",
        )),
        EntityTypeDef::new(
            "Sample",
            "A limited quantity of material prepared from a Biospecimen for testing or analysis.",
        )
        .parent("MaterialEntity")
        .mixins(["Accession", "EgaAccession", "Attribute"])
        .field(FieldSpec::string("name", "Name of the sample.").required())
        .field(FieldSpec::string("description", "Short description of the sample.").required())
        .field(FieldSpec::string(
            "vital_status_at_sampling",
            "Vital status of the Individual at the point of sampling.",
        ))
        .field(FieldSpec::enumeration(
            "case_control_status",
            "CaseControl",
            "Whether the sample was taken as case or control.",
        ))
        .field(FieldSpec::string(
            "isolation",
            "Method or device employed for collecting or isolating the sample.",
        ))
        .field(FieldSpec::string("storage", "Methods by which the sample is stored."))
        .field(
            FieldSpec::link(
                "has_individual",
                "Individual",
                "The Individual from which this Sample was derived.",
            )
            .required(),
        )
        .field(FieldSpec::link(
            "has_anatomical_entity",
            "AnatomicalEntity",
            "Anatomical site associated with the sample.",
        ))
        .field(FieldSpec::link(
            "has_biospecimen",
            "Biospecimen",
            "The Biospecimen this Sample was prepared from.",
        )),
        EntityTypeDef::new(
            "DiseaseOrPhenotypicFeature",
            "A Disease or Phenotypic Feature, used where the two are interchangeable.",
        )
        .parent("BiologicalQuality")
        .field(FieldSpec::string("name", "The name for an entity."))
        .field(FieldSpec::string("description", "Description of an entity.")),
        ontology_term(
            EntityTypeDef::new(
                "Disease",
                "A disposition to undergo pathological processes caused by disorders.",
            )
            .parent("DiseaseOrPhenotypicFeature"),
        ),
        ontology_term(
            EntityTypeDef::new(
                "PhenotypicFeature",
                "The observable manifestation of a genotype, excluding disease.",
            )
            .parent("DiseaseOrPhenotypicFeature"),
        ),
    ]
}

fn people() -> Vec<EntityTypeDef> {
    vec![
        EntityTypeDef::new("Member", "Member of an Organization or a Committee.")
            .parent("Person")
            .field(FieldSpec::string("email", "The email of the Member.").required())
            .field(FieldSpec::string("telephone", "The telephone number of the Member.").required())
            .field(
                FieldSpec::string("organization", "The organization the Member is part of.")
                    .required(),
            ),
        EntityTypeDef::new("User", "A user in GHGA.")
            .parent("Person")
            .field(FieldSpec::string("email", "Email of a person."))
            .field(FieldSpec::enumeration("role", "UserRole", "The role of the user.")),
        EntityTypeDef::new(
            "Individual",
            "A Person who is participating in a Study.",
        )
        .parent("Person")
        .mixins(["Accession", "EgaAccession"])
        .field(
            FieldSpec::enumeration(
                "sex",
                "BiologicalSex",
                "The biological sex of the Individual.",
            )
            .required(),
        )
        .field(FieldSpec::string("karyotype", "The karyotype of the Individual if defined."))
        .field(FieldSpec::integer("age", "Age of the Individual.").required())
        .field(
            FieldSpec::enumeration(
                "vital_status",
                "VitalStatus",
                "Last known vital status of the Individual.",
            )
            .required(),
        )
        .field(FieldSpec::string(
            "geographical_region",
            "The geographical region where the Individual is located.",
        ))
        .field(FieldSpec::string(
            "ancestry",
            "Descent or lineage, from a person or from a population.",
        ))
        .field(FieldSpec::links(
            "has_parent",
            "Individual",
            "One or more parents of this Individual.",
        ))
        .field(FieldSpec::links(
            "has_children",
            "Individual",
            "One or more children of this Individual.",
        ))
        .field(FieldSpec::links(
            "has_disease",
            "Disease",
            "Diseases associated with this Individual.",
        ))
        .field(FieldSpec::links(
            "has_phenotypic_feature",
            "PhenotypicFeature",
            "Phenotypic features associated with this Individual.",
        )),
        EntityTypeDef::new(
            "Donor",
            "An Individual who participates in a Study by donating a Biospecimen.",
        )
        .parent("Individual"),
        EntityTypeDef::new(
            "DataAccessCommittee",
            "Members delegated to grant access to datasets after checking data-sharing criteria.",
        )
        .parent("Committee")
        .mixins(["Accession", "EgaAccession"])
        .field(FieldSpec::string("name", "The name for an entity.").required())
        .field(FieldSpec::string("description", "Description of an entity."))
        .field(
            FieldSpec::link(
                "main_contact",
                "Member",
                "The main contact for the Data Access Committee.",
            )
            .required(),
        )
        .field(FieldSpec::links(
            "has_member",
            "Member",
            "All members of this Data Access Committee.",
        )),
    ]
}

fn submission() -> EntityTypeDef {
    EntityTypeDef::new(
        "Submission",
        "A set of inter-related entities submitted together to GHGA.",
    )
    .parent(ROOT_TYPE)
    .field(FieldSpec::link("has_study", "Study", "The Study of this submission."))
    .field(FieldSpec::link("has_project", "Project", "The Project of this submission."))
    .field(FieldSpec::links("has_sample", "Sample", "Samples in this submission."))
    .field(FieldSpec::links(
        "has_biospecimen",
        "Biospecimen",
        "Biospecimens in this submission.",
    ))
    .field(FieldSpec::links(
        "has_individual",
        "Individual",
        "Individuals in this submission.",
    ))
    .field(FieldSpec::links(
        "has_experiment",
        "Experiment",
        "Experiments in this submission.",
    ))
    .field(FieldSpec::links("has_analysis", "Analysis", "Analyses in this submission."))
    .field(FieldSpec::links("has_file", "File", "Files in this submission."))
    .field(FieldSpec::link(
        "has_data_access_policy",
        "DataAccessPolicy",
        "The Data Access Policy for the data of this submission.",
    ))
    .field(FieldSpec::timestamp(
        "submission_date",
        "Timestamp (in ISO 8601 format) when the submission was marked completed.",
    ))
    .field(FieldSpec::enumeration(
        "submission_status",
        "SubmissionStatus",
        "The status of the submission.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cardinality, FieldKind};

    fn catalogue() -> &'static Catalogue {
        Catalogue::builtin().expect("built-in catalogue composes")
    }

    #[test]
    fn test_study_chain() {
        let study = catalogue().schema("Study").unwrap();
        assert_eq!(
            study.ancestors,
            vec!["NamedThing", "PlannedProcess", "Investigation"]
        );
        assert!(study.field("title").unwrap().required);
        assert!(!study.field("release_date").unwrap().required);
        assert!(study.has_mixin("ReleaseStatus"));
        assert!(study.has_mixin("Metadata"));
    }

    #[test]
    fn test_every_type_carries_identity() {
        for schema in catalogue().concrete_types() {
            let id = schema.field("id").unwrap();
            assert!(id.required, "{} id must be required", schema.entity_type);
            assert!(schema.field("schema_version").is_some());
            assert!(schema.field("update_date").is_some());
        }
    }

    #[test]
    fn test_submittable_types_require_alias() {
        let root = catalogue().schema(ROOT_TYPE).unwrap();
        assert!(!root.field("alias").unwrap().required);

        for schema in catalogue().concrete_types() {
            let alias = schema.field("alias").unwrap();
            let aliased = ALIASED_TYPES.contains(&schema.entity_type.as_str());
            assert_eq!(alias.required, aliased, "{}.alias", schema.entity_type);
        }

        // Narrowing keeps the inherited position.
        let study = catalogue().schema("Study").unwrap();
        let position = study.fields.get_index_of("alias").unwrap();
        assert_eq!(position, root.fields.get_index_of("alias").unwrap());
    }

    #[test]
    fn test_only_root_is_abstract() {
        let abstract_types: Vec<&str> = catalogue()
            .entity_types()
            .filter(|t| catalogue().schema(t).unwrap().is_abstract)
            .collect();
        assert_eq!(abstract_types, vec![ROOT_TYPE]);
    }

    #[test]
    fn test_donor_inherits_individual() {
        let donor = catalogue().schema("Donor").unwrap();
        assert_eq!(donor.depth(), 3);
        assert!(donor.field("sex").unwrap().required);
        assert!(catalogue().is_a("Donor", "Individual"));
    }

    #[test]
    fn test_relationship_cardinalities() {
        let individual = catalogue().schema("Individual").unwrap();
        assert_eq!(
            individual.field("has_parent").unwrap().kind,
            FieldKind::Relationship {
                target: "Individual".into(),
                cardinality: Cardinality::Many,
            }
        );

        let dac = catalogue().schema("DataAccessCommittee").unwrap();
        let contact = dac.field("main_contact").unwrap();
        assert!(contact.required);
        assert_eq!(
            contact.kind,
            FieldKind::Relationship {
                target: "Member".into(),
                cardinality: Cardinality::One,
            }
        );
    }

    #[test]
    fn test_ontology_terms_compose_mixin() {
        for name in ["Disease", "PhenotypicFeature", "AnatomicalEntity"] {
            assert!(catalogue().schema(name).unwrap().has_mixin("OntologyClass"));
        }
    }
}
