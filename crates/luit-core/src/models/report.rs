use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::image::UploadedImageRef;
use super::working_list::WorkingList;

/// Contamination observed at a water source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContaminationType {
    Arsenic,
    Fluoride,
    Bacteria,
    Turbidity,
    Other,
}

/// Kind of water source being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterSource {
    Tubewell,
    Pond,
    River,
    Tap,
    Well,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Safe,
    Caution,
    Unsafe,
    Critical,
}

impl SeverityLevel {
    /// Severity a citizen report is filed with for a given contamination.
    pub fn for_contamination(contamination: ContaminationType) -> Self {
        match contamination {
            ContaminationType::Arsenic => SeverityLevel::Critical,
            ContaminationType::Bacteria => SeverityLevel::Unsafe,
            _ => SeverityLevel::Caution,
        }
    }
}

impl FromStr for ContaminationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arsenic" => Ok(ContaminationType::Arsenic),
            "fluoride" => Ok(ContaminationType::Fluoride),
            "bacteria" => Ok(ContaminationType::Bacteria),
            "turbidity" => Ok(ContaminationType::Turbidity),
            "other" => Ok(ContaminationType::Other),
            _ => Err(format!(
                "Invalid contamination type: {} (expected arsenic, fluoride, bacteria, turbidity or other)",
                s
            )),
        }
    }
}

impl FromStr for WaterSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tubewell" => Ok(WaterSource::Tubewell),
            "pond" => Ok(WaterSource::Pond),
            "river" => Ok(WaterSource::River),
            "tap" => Ok(WaterSource::Tap),
            "well" => Ok(WaterSource::Well),
            _ => Err(format!(
                "Invalid water source: {} (expected tubewell, pond, river, tap or well)",
                s
            )),
        }
    }
}

impl fmt::Display for ContaminationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContaminationType::Arsenic => "arsenic",
            ContaminationType::Fluoride => "fluoride",
            ContaminationType::Bacteria => "bacteria",
            ContaminationType::Turbidity => "turbidity",
            ContaminationType::Other => "other",
        };
        f.write_str(s)
    }
}

/// Body of `POST /reporting/report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub village: String,
    pub contamination_type: ContaminationType,
    pub water_source: WaterSource,
    pub severity_level: SeverityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub reported_by: String,
    pub user_name: String,
    pub affected_population: u32,
}

impl ReportRequest {
    /// Anonymous report with severity derived from the contamination type.
    pub fn new(
        latitude: f64,
        longitude: f64,
        village: impl Into<String>,
        contamination_type: ContaminationType,
        water_source: WaterSource,
    ) -> Self {
        Self {
            latitude,
            longitude,
            village: village.into(),
            contamination_type,
            water_source,
            severity_level: SeverityLevel::for_contamination(contamination_type),
            description: None,
            image_url: None,
            image_public_id: None,
            reported_by: "anonymous".to_string(),
            user_name: "Anonymous".to_string(),
            affected_population: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn with_image(mut self, image: &UploadedImageRef) -> Self {
        self.image_url = Some(image.url.clone());
        self.image_public_id = Some(image.public_id.clone());
        self
    }

    /// Attach the first image of `images`; the rest stay with the caller.
    pub fn with_first_image(self, images: &WorkingList) -> Self {
        match images.first() {
            Some(image) => self.with_image(image),
            None => self,
        }
    }

    pub fn with_reporter(mut self, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.reported_by = user_id.into();
        self.user_name = name.into();
        self
    }

    pub fn with_affected_population(mut self, count: u32) -> Self {
        self.affected_population = count;
        self
    }

    /// Check the fields the report form requires before submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.village.trim().is_empty() {
            return Err("Village is required".to_string());
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("Invalid latitude: {}", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("Invalid longitude: {}", self.longitude));
        }
        Ok(())
    }
}

/// Response of `POST /reporting/report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub alert_triggered: bool,
    #[serde(default)]
    pub alert_id: Option<String>,
}
