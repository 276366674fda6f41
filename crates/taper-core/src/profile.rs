//! Per-user profile. Analytics read it; they never change it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the user is in their taper.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaperStage {
  #[default]
  Researching,
  Planning,
  Active,
  Holding,
  Completed,
  Reinstated,
  Supporting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:      Uuid,
  pub display_name: Option<String>,
  /// The medication being tapered; preferred over entry drug names in share
  /// text.
  pub drug:         Option<String>,
  #[serde(default)]
  pub taper_stage:  TaperStage,
}

impl Profile {
  pub fn new(user_id: Uuid) -> Self {
    Self {
      user_id,
      display_name: None,
      drug: None,
      taper_stage: TaperStage::default(),
    }
  }
}
