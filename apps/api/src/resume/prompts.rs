// Resume intake LLM prompt template.
// The field labels are the ones recruiters see on the intake form; coercion
// tolerates the punctuation drift they invite ("No. of Jobs", "State_J&K").

pub const RESUME_PARSE_PROMPT: &str = r#"Extract the following fields in JSON format (strictly use double quotes for all keys and values):

- UG_InstituteName
- PG_InstituteName
- PHD_InstituteName
- Longevity_Years
- Workshops
- Trainings
- Achievements_No.
- Achievements
- Skills_No.
- Skills
- Projects_No.
- Projects
- Total_Papers
- Total_Patents
- Books
- State_J&K (1 for yes, 0 for no)
- No. of Jobs
- Experience_Average (Longevity_Years / No. of Jobs)
- Best_Fit_For (Suggest a Computer Science job role suitable for the candidate)

Resume:
{resume_text}
"#;

/// Fills the template with the extracted resume text, verbatim.
pub fn build_resume_prompt(resume_text: &str) -> String {
    RESUME_PARSE_PROMPT.replace("{resume_text}", resume_text)
}
