//! Three-step profile wizard.
//!
//! `BasicInfo -> Lifestyle -> Goals`, forward moves guarded by per-step
//! checks, backward moves unconditional. Persisting needs both the `Goals`
//! step and an armed explicit-complete flag, so reaching or rendering the
//! last step never submits on its own.

use std::collections::BTreeSet;

use super::{FlowError, InFlight, Route};
use crate::client::api::WellnessApi;
use crate::dto::{ProfileRequest, ProfileResponse};
use crate::models::profile::{ExerciseFrequency, Gender};

pub const DEFAULT_LEVEL: i32 = 5;

const BASIC_INFO_INCOMPLETE: &str = "Please fill in all required fields in Basic Information";
const LIFESTYLE_INCOMPLETE: &str = "Please fill in all required fields in Lifestyle & Health";
const ENERGY_MISSING: &str = "Please set your energy level";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    BasicInfo,
    Lifestyle,
    Goals,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::BasicInfo, WizardStep::Lifestyle, WizardStep::Goals];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::BasicInfo => 0,
            WizardStep::Lifestyle => 1,
            WizardStep::Goals => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "Basic Info",
            WizardStep::Lifestyle => "Lifestyle",
            WizardStep::Goals => "Goals",
        }
    }

    fn forward(self) -> Self {
        match self {
            WizardStep::BasicInfo => WizardStep::Lifestyle,
            WizardStep::Lifestyle | WizardStep::Goals => WizardStep::Goals,
        }
    }

    fn back(self) -> Self {
        match self {
            WizardStep::BasicInfo | WizardStep::Lifestyle => WizardStep::BasicInfo,
            WizardStep::Goals => WizardStep::Lifestyle,
        }
    }
}

/// Form contents while the wizard is open. `None` and blank strings mean
/// "not filled in yet".
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub occupation: String,
    pub sleep_hours: Option<f64>,
    pub exercise_frequency: Option<ExerciseFrequency>,
    pub stress_level: Option<i32>,
    pub wellness_goals: BTreeSet<String>,
    pub energy_level: Option<i32>,
    pub additional_info: String,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            age: None,
            gender: None,
            occupation: String::new(),
            sleep_hours: None,
            exercise_frequency: None,
            stress_level: Some(DEFAULT_LEVEL),
            wellness_goals: BTreeSet::new(),
            energy_level: Some(DEFAULT_LEVEL),
            additional_info: String::new(),
        }
    }
}

impl ProfileDraft {
    pub fn set_goal(&mut self, goal: &str, checked: bool) {
        if checked {
            self.wellness_goals.insert(goal.to_string());
        } else {
            self.wellness_goals.remove(goal);
        }
    }

    pub fn basic_info_complete(&self) -> bool {
        self.age.is_some_and(|age| age > 0)
            && self.gender.is_some()
            && !self.occupation.trim().is_empty()
    }

    pub fn lifestyle_complete(&self) -> bool {
        self.sleep_hours.is_some()
            && self.exercise_frequency.is_some()
            && self.stress_level.is_some()
    }

    /// The full request, or the message for the first missing section.
    pub fn to_request(&self) -> Result<ProfileRequest, FlowError> {
        let (Some(age), Some(gender)) = (self.age, self.gender) else {
            return Err(FlowError::Validation(BASIC_INFO_INCOMPLETE.into()));
        };
        if !self.basic_info_complete() {
            return Err(FlowError::Validation(BASIC_INFO_INCOMPLETE.into()));
        }

        let (Some(sleep_hours), Some(exercise_frequency), Some(stress_level)) =
            (self.sleep_hours, self.exercise_frequency, self.stress_level)
        else {
            return Err(FlowError::Validation(LIFESTYLE_INCOMPLETE.into()));
        };

        let energy_level = self
            .energy_level
            .ok_or_else(|| FlowError::Validation(ENERGY_MISSING.into()))?;

        Ok(ProfileRequest {
            age,
            gender,
            occupation: self.occupation.trim().to_string(),
            sleep_hours,
            exercise_frequency,
            stress_level,
            wellness_goals: self.wellness_goals.clone(),
            energy_level,
            additional_info: self.additional_info.clone(),
        })
    }
}

impl From<ProfileResponse> for ProfileDraft {
    fn from(p: ProfileResponse) -> Self {
        Self {
            age: Some(p.age),
            gender: Some(p.gender),
            occupation: p.occupation,
            sleep_hours: Some(p.sleep_hours),
            exercise_frequency: Some(p.exercise_frequency),
            stress_level: Some(p.stress_level),
            wellness_goals: p.wellness_goals,
            energy_level: Some(p.energy_level),
            additional_info: p.additional_info,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileWizard {
    step: WizardStep,
    draft: ProfileDraft,
    explicit_submit: bool,
    loading: bool,
    error: Option<String>,
}

impl Default for ProfileWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::BasicInfo,
            draft: ProfileDraft::default(),
            explicit_submit: false,
            loading: false,
            error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the "Complete Profile" control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Goals && !self.loading
    }

    /// Pre-fills the draft from the saved profile. Returns `false` for a user
    /// without one, which is the normal first-visit case.
    pub async fn load_existing(&mut self, api: &dyn WellnessApi) -> Result<bool, FlowError> {
        match api.get_profile().await {
            Ok(Some(profile)) => {
                self.draft = profile.into();
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!("No existing profile found");
                Ok(false)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn next(&mut self) -> Result<WizardStep, FlowError> {
        if self.step == WizardStep::Goals {
            return Ok(self.step);
        }

        let incomplete = match self.step {
            WizardStep::BasicInfo if !self.draft.basic_info_complete() => {
                Some(BASIC_INFO_INCOMPLETE)
            }
            WizardStep::Lifestyle if !self.draft.lifestyle_complete() => {
                Some(LIFESTYLE_INCOMPLETE)
            }
            _ => None,
        };

        if let Some(message) = incomplete {
            self.error = Some(message.to_string());
            return Err(FlowError::Validation(message.into()));
        }

        self.error = None;
        self.step = self.step.forward();
        Ok(self.step)
    }

    pub fn previous(&mut self) -> WizardStep {
        self.explicit_submit = false;
        self.step = self.step.back();
        self.step
    }

    /// Records the user pressing "Complete Profile". Ignored on other steps.
    pub fn press_complete(&mut self) {
        if self.step == WizardStep::Goals {
            self.explicit_submit = true;
        }
    }

    /// Form submit handler. Dispatches only on `Goals` after `press_complete`;
    /// anything else returns `Ok(None)` without a request. The flag is
    /// consumed by every dispatch attempt.
    pub async fn submit(&mut self, api: &dyn WellnessApi) -> Result<Option<Route>, FlowError> {
        if self.step != WizardStep::Goals || !self.explicit_submit || self.loading {
            return Ok(None);
        }
        self.explicit_submit = false;

        let request = match self.draft.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.error = None;
        let result = {
            let _in_flight = InFlight::begin(&mut self.loading);
            api.save_profile(&request).await
        };

        match result {
            Ok(saved) => {
                tracing::debug!(profile_id = %saved.id, "Profile completed");
                Ok(Some(Route::Mood))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// "Complete Profile" button handler.
    pub async fn complete(&mut self, api: &dyn WellnessApi) -> Result<Option<Route>, FlowError> {
        self.press_complete();
        self.submit(api).await
    }
}
