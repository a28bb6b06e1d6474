use serde::{Deserialize, Serialize};

/// Store slot holding the most recent record. Last writer wins.
pub const PARSED_RESUME_KEY: &str = "parsed_resume_data";

/// Placeholder saved in place of an empty postgraduate institute.
pub const NO_PG_INSTITUTE: &str = "nil";

/// The normalized, fully-defaulted structured form of one resume.
///
/// JSON keys are the ones the intake form and the model prompt agree on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResumeRecord {
    #[serde(rename = "UG_InstituteName")]
    pub ug_institute_name: String,
    #[serde(rename = "PG_InstituteName")]
    pub pg_institute_name: String,
    #[serde(rename = "PHD_InstituteName")]
    pub phd_institute_name: String,
    #[serde(rename = "Longevity_Years")]
    pub longevity_years: f64,
    #[serde(rename = "Workshops")]
    pub workshops: Vec<String>,
    #[serde(rename = "Trainings")]
    pub trainings: Vec<String>,
    #[serde(rename = "Achievements_No")]
    pub achievements_no: u32,
    #[serde(rename = "Achievements")]
    pub achievements: Vec<String>,
    #[serde(rename = "Skills_No")]
    pub skills_no: u32,
    #[serde(rename = "Skills")]
    pub skills: Vec<String>,
    #[serde(rename = "Projects_No")]
    pub projects_no: u32,
    #[serde(rename = "Projects")]
    pub projects: Vec<String>,
    #[serde(rename = "Total_Papers")]
    pub total_papers: u32,
    #[serde(rename = "Total_Patents")]
    pub total_patents: u32,
    #[serde(rename = "Books")]
    pub books: u32,
    /// 1 when the candidate is domiciled in Jammu & Kashmir, else 0.
    #[serde(rename = "State_JK")]
    pub state_jk: u8,
    #[serde(rename = "No_of_Jobs")]
    pub no_of_jobs: u32,
    /// Derived; owned by `refresh_derived`.
    #[serde(rename = "Experience_Average")]
    pub experience_average: f64,
    #[serde(rename = "Best_Fit_For")]
    pub best_fit_for: String,
}

/// The five list-valued fields of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceField {
    Workshops,
    Trainings,
    Achievements,
    Skills,
    Projects,
}

impl SequenceField {
    pub const ALL: [SequenceField; 5] = [
        SequenceField::Workshops,
        SequenceField::Trainings,
        SequenceField::Achievements,
        SequenceField::Skills,
        SequenceField::Projects,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SequenceField::Workshops => "Workshops",
            SequenceField::Trainings => "Trainings",
            SequenceField::Achievements => "Achievements",
            SequenceField::Skills => "Skills",
            SequenceField::Projects => "Projects",
        }
    }
}

impl ParsedResumeRecord {
    pub fn list_mut(&mut self, field: SequenceField) -> &mut Vec<String> {
        match field {
            SequenceField::Workshops => &mut self.workshops,
            SequenceField::Trainings => &mut self.trainings,
            SequenceField::Achievements => &mut self.achievements,
            SequenceField::Skills => &mut self.skills,
            SequenceField::Projects => &mut self.projects,
        }
    }

    /// The `_No` counter paired with a list, if it has one.
    pub fn count_mut(&mut self, field: SequenceField) -> Option<&mut u32> {
        match field {
            SequenceField::Achievements => Some(&mut self.achievements_no),
            SequenceField::Skills => Some(&mut self.skills_no),
            SequenceField::Projects => Some(&mut self.projects_no),
            SequenceField::Workshops | SequenceField::Trainings => None,
        }
    }

    /// Replaces a list and keeps its counter equal to the new length.
    pub fn replace_list(&mut self, field: SequenceField, items: Vec<String>) {
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        *self.list_mut(field) = items;
        if let Some(count) = self.count_mut(field) {
            *count = len;
        }
    }

    /// Recomputes every derived field from its inputs.
    pub fn refresh_derived(&mut self) {
        self.experience_average = experience_average(self.longevity_years, self.no_of_jobs);
    }

    pub fn has_phd(&self) -> bool {
        !self.phd_institute_name.trim().is_empty()
    }
}

/// Years per job, rounded to two decimals; 0 when there are no jobs.
pub fn experience_average(longevity_years: f64, no_of_jobs: u32) -> f64 {
    if no_of_jobs == 0 || !longevity_years.is_finite() || longevity_years <= 0.0 {
        return 0.0;
    }
    round2(longevity_years / f64::from(no_of_jobs))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
