//! Edit form service: read-side normalization, list editing and save rules for
//! the stored record.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::resume::coerce::normalize;
use crate::resume::models::{
    ParsedResumeRecord, SequenceField, NO_PG_INSTITUTE, PARSED_RESUME_KEY,
};
use crate::store::KeyValueStore;

/// A list edit: either a JSON array or the raw comma-separated text from the form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    CommaSeparated(String),
}

impl ListInput {
    pub fn into_items(self) -> Vec<String> {
        match self {
            ListInput::Items(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            ListInput::CommaSeparated(raw) => split_comma_list(&raw),
        }
    }
}

/// Splits form input on commas, trimming and dropping empty entries.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Partial update submitted by the form. Absent fields keep their stored value;
/// `Experience_Average` is never accepted from the client.
#[derive(Debug, Default, Deserialize)]
pub struct ResumeEdit {
    #[serde(rename = "UG_InstituteName")]
    pub ug_institute_name: Option<String>,
    #[serde(rename = "PG_InstituteName")]
    pub pg_institute_name: Option<String>,
    #[serde(rename = "PHD_InstituteName")]
    pub phd_institute_name: Option<String>,
    #[serde(rename = "Longevity_Years")]
    pub longevity_years: Option<f64>,
    #[serde(rename = "Workshops")]
    pub workshops: Option<ListInput>,
    #[serde(rename = "Trainings")]
    pub trainings: Option<ListInput>,
    #[serde(rename = "Achievements_No")]
    pub achievements_no: Option<u32>,
    #[serde(rename = "Achievements")]
    pub achievements: Option<ListInput>,
    #[serde(rename = "Skills_No")]
    pub skills_no: Option<u32>,
    #[serde(rename = "Skills")]
    pub skills: Option<ListInput>,
    #[serde(rename = "Projects_No")]
    pub projects_no: Option<u32>,
    #[serde(rename = "Projects")]
    pub projects: Option<ListInput>,
    #[serde(rename = "Total_Papers")]
    pub total_papers: Option<u32>,
    #[serde(rename = "Total_Patents")]
    pub total_patents: Option<u32>,
    #[serde(rename = "Books")]
    pub books: Option<u32>,
    #[serde(rename = "State_JK")]
    pub state_jk: Option<u8>,
    #[serde(rename = "No_of_Jobs")]
    pub no_of_jobs: Option<u32>,
    #[serde(rename = "Best_Fit_For")]
    pub best_fit_for: Option<String>,
}

/// Normalizes a stored JSON record for editing. Same field rules as coercion,
/// plus the `"nil"` placeholder for a missing postgraduate institute.
pub fn prepare_for_edit(raw: &str) -> Result<ParsedResumeRecord, AppError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        warn!("Stored resume record is not valid JSON: {e}");
        AppError::NotFound(
            "Stored resume data is unreadable. Please upload your resume again.".to_string(),
        )
    })?;
    let mut record = normalize(&value);
    if record.pg_institute_name.is_empty() {
        record.pg_institute_name = NO_PG_INSTITUTE.to_string();
    }
    Ok(record)
}

/// Applies a form submission. Counts go first so that an edited list always
/// leaves its `_No` counter equal to its new length.
pub fn apply_edit(record: &mut ParsedResumeRecord, edit: ResumeEdit) {
    let ResumeEdit {
        ug_institute_name,
        pg_institute_name,
        phd_institute_name,
        longevity_years,
        workshops,
        trainings,
        achievements_no,
        achievements,
        skills_no,
        skills,
        projects_no,
        projects,
        total_papers,
        total_patents,
        books,
        state_jk,
        no_of_jobs,
        best_fit_for,
    } = edit;

    set(&mut record.ug_institute_name, ug_institute_name);
    set(&mut record.pg_institute_name, pg_institute_name);
    set(&mut record.phd_institute_name, phd_institute_name);
    set(&mut record.best_fit_for, best_fit_for);
    set(
        &mut record.longevity_years,
        longevity_years.filter(|y| y.is_finite()).map(|y| y.max(0.0)),
    );
    set(&mut record.achievements_no, achievements_no);
    set(&mut record.skills_no, skills_no);
    set(&mut record.projects_no, projects_no);
    set(&mut record.total_papers, total_papers);
    set(&mut record.total_patents, total_patents);
    set(&mut record.books, books);
    set(&mut record.state_jk, state_jk.map(|v| v.min(1)));
    set(&mut record.no_of_jobs, no_of_jobs);

    let lists = [
        (SequenceField::Workshops, workshops),
        (SequenceField::Trainings, trainings),
        (SequenceField::Achievements, achievements),
        (SequenceField::Skills, skills),
        (SequenceField::Projects, projects),
    ];
    for (field, input) in lists {
        if let Some(input) = input {
            record.replace_list(field, input.into_items());
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Save rules: blank postgraduate institute becomes `"nil"`, derived fields are recomputed.
pub fn finalize_for_save(record: &mut ParsedResumeRecord) {
    if record.pg_institute_name.trim().is_empty() {
        record.pg_institute_name = NO_PG_INSTITUTE.to_string();
    }
    record.refresh_derived();
}

pub async fn load_for_edit(store: &dyn KeyValueStore) -> Result<ParsedResumeRecord, AppError> {
    let raw = store.get(PARSED_RESUME_KEY).await?.ok_or_else(|| {
        AppError::NotFound("No resume data found. Please upload your resume first.".to_string())
    })?;
    prepare_for_edit(&raw)
}

/// Loads the current record, applies `edit`, and overwrites the slot.
pub async fn save_edit(
    store: &dyn KeyValueStore,
    edit: ResumeEdit,
) -> Result<ParsedResumeRecord, AppError> {
    let mut record = load_for_edit(store).await?;
    apply_edit(&mut record, edit);
    finalize_for_save(&mut record);

    let serialized = serde_json::to_string(&record).map_err(|e| AppError::Internal(e.into()))?;
    store.set(PARSED_RESUME_KEY, serialized).await?;
    info!(
        "Saved edited resume (phd: {}, jobs: {})",
        record.has_phd(),
        record.no_of_jobs
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn store_with(value: serde_json::Value) -> MemoryStore {
        let store = MemoryStore::default();
        store
            .set(PARSED_RESUME_KEY, value.to_string())
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_split_comma_list_trims_and_drops_empties() {
        assert_eq!(
            split_comma_list(" Python, SQL ,, Rust ,"),
            vec!["Python", "SQL", "Rust"]
        );
        assert!(split_comma_list("   ").is_empty());
    }

    #[test]
    fn test_list_input_accepts_array_or_string() {
        let edit: ResumeEdit = serde_json::from_value(json!({
            "Skills": "Python, SQL",
            "Projects": ["Chatbot", "  "]
        }))
        .unwrap();
        assert_eq!(edit.skills.unwrap().into_items(), vec!["Python", "SQL"]);
        assert_eq!(edit.projects.unwrap().into_items(), vec!["Chatbot"]);
    }

    #[test]
    fn test_prepare_for_edit_fills_gaps() {
        let record = prepare_for_edit(r#"{"Skills": "oops", "Longevity_Years": 6, "No_of_Jobs": 3}"#)
            .unwrap();
        assert!(record.skills.is_empty());
        assert_eq!(record.pg_institute_name, NO_PG_INSTITUTE);
        assert_eq!(record.experience_average, 2.0);
    }

    #[test]
    fn test_prepare_for_edit_rejects_garbage() {
        assert!(matches!(
            prepare_for_edit("not json"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_editing_lists_recomputes_counts() {
        let mut record = ParsedResumeRecord {
            skills_no: 9,
            ..Default::default()
        };
        let edit: ResumeEdit = serde_json::from_value(json!({
            "Skills": "Python, SQL, Rust",
            "Achievements": "",
            "Workshops": "Cloud Computing"
        }))
        .unwrap();
        apply_edit(&mut record, edit);
        assert_eq!(record.skills_no, 3);
        assert_eq!(record.achievements_no, 0);
        assert_eq!(record.workshops, vec!["Cloud Computing"]);
    }

    #[test]
    fn test_explicit_count_kept_when_list_untouched() {
        let mut record = ParsedResumeRecord::default();
        let edit: ResumeEdit = serde_json::from_value(json!({"Projects_No": 4})).unwrap();
        apply_edit(&mut record, edit);
        assert_eq!(record.projects_no, 4);
    }

    #[test]
    fn test_finalize_sets_nil_and_average() {
        let mut record = ParsedResumeRecord {
            pg_institute_name: "  ".into(),
            longevity_years: 6.0,
            no_of_jobs: 3,
            ..Default::default()
        };
        finalize_for_save(&mut record);
        assert_eq!(record.pg_institute_name, NO_PG_INSTITUTE);
        assert_eq!(record.experience_average, 2.0);

        record.no_of_jobs = 0;
        finalize_for_save(&mut record);
        assert_eq!(record.experience_average, 0.0);
    }

    #[tokio::test]
    async fn test_load_for_edit_without_record_is_not_found() {
        let store = MemoryStore::default();
        assert!(matches!(
            load_for_edit(&store).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_edit_overwrites_slot() {
        let store = store_with(json!({
            "UG_InstituteName": "NIT Srinagar",
            "PG_InstituteName": "IISc",
            "Longevity_Years": 5,
            "No_of_Jobs": 2,
            "Best_Fit_For": "Data Engineer"
        }))
        .await;
        let edit: ResumeEdit = serde_json::from_value(json!({
            "PG_InstituteName": "",
            "No_of_Jobs": 4,
            "Experience_Average": 99,
            "Skills": "Python, SQL"
        }))
        .unwrap();

        let saved = save_edit(&store, edit).await.unwrap();

        assert_eq!(saved.ug_institute_name, "NIT Srinagar");
        assert_eq!(saved.pg_institute_name, NO_PG_INSTITUTE);
        assert_eq!(saved.experience_average, 1.25);
        assert_eq!(saved.skills_no, 2);
        assert_eq!(saved.best_fit_for, "Data Engineer");

        let raw = store.get(PARSED_RESUME_KEY).await.unwrap().unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["Experience_Average"], 1.25);
        assert_eq!(stored["Skills"], json!(["Python", "SQL"]));
    }
}
