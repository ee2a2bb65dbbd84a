use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(url(message = "Link URL must be a valid absolute URL"))]
    pub url: String,
    #[validate(length(max = 255))]
    pub title: Option<String>,
}

/// The ten informational link slots of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSlot {
    Link,
    NewsUpdatesAndGuidelines,
    DiseasePreventionInfo,
    DiseaseSpreadStatistics,
    GettingTestedInfo,
    GovernmentBenefitsInfo,
    PublicTransportClosuresInfo,
    QuarantineGuidelines,
    SchoolClosuresInfo,
    TravelBans,
}

impl LinkSlot {
    pub const ALL: [LinkSlot; 10] = [
        LinkSlot::Link,
        LinkSlot::NewsUpdatesAndGuidelines,
        LinkSlot::DiseasePreventionInfo,
        LinkSlot::DiseaseSpreadStatistics,
        LinkSlot::GettingTestedInfo,
        LinkSlot::GovernmentBenefitsInfo,
        LinkSlot::PublicTransportClosuresInfo,
        LinkSlot::QuarantineGuidelines,
        LinkSlot::SchoolClosuresInfo,
        LinkSlot::TravelBans,
    ];

    /// schema.org property name for this slot.
    pub fn schema_key(self) -> &'static str {
        match self {
            LinkSlot::Link => "url",
            LinkSlot::NewsUpdatesAndGuidelines => "newsUpdatesAndGuidelines",
            LinkSlot::DiseasePreventionInfo => "diseasePreventionInfo",
            LinkSlot::DiseaseSpreadStatistics => "diseaseSpreadStatistics",
            LinkSlot::GettingTestedInfo => "gettingTestedInfo",
            LinkSlot::GovernmentBenefitsInfo => "governmentBenefitsInfo",
            LinkSlot::PublicTransportClosuresInfo => "publicTransportClosuresInfo",
            LinkSlot::QuarantineGuidelines => "quarantineGuidelines",
            LinkSlot::SchoolClosuresInfo => "schoolClosuresInfo",
            LinkSlot::TravelBans => "travelBans",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkSlot::Link => "link",
            LinkSlot::NewsUpdatesAndGuidelines => "news_updates_and_guidelines",
            LinkSlot::DiseasePreventionInfo => "disease_prevention_info",
            LinkSlot::DiseaseSpreadStatistics => "disease_spread_statistics",
            LinkSlot::GettingTestedInfo => "getting_tested_info",
            LinkSlot::GovernmentBenefitsInfo => "government_benefits_info",
            LinkSlot::PublicTransportClosuresInfo => "public_transport_closures_info",
            LinkSlot::QuarantineGuidelines => "quarantine_guidelines",
            LinkSlot::SchoolClosuresInfo => "school_closures_info",
            LinkSlot::TravelBans => "travel_bans",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkSlot::Link => "Link",
            LinkSlot::NewsUpdatesAndGuidelines => "News updates and guidelines",
            LinkSlot::DiseasePreventionInfo => "Disease prevention info",
            LinkSlot::DiseaseSpreadStatistics => "Disease spread statistics",
            LinkSlot::GettingTestedInfo => "Getting tested info",
            LinkSlot::GovernmentBenefitsInfo => "Government benefits info",
            LinkSlot::PublicTransportClosuresInfo => "Public transport closures info",
            LinkSlot::QuarantineGuidelines => "Quarantine guidelines",
            LinkSlot::SchoolClosuresInfo => "School closures info",
            LinkSlot::TravelBans => "Travel bans",
        }
    }
}
