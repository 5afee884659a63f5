use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    pub id: String,
    pub name: Option<String>,
    pub position: Option<String>,
    pub supervisor_id: Option<String>,
    pub score: f64,
}

impl Worker {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            position: None,
            supervisor_id: None,
            score,
        }
    }

    pub fn with_supervisor(mut self, supervisor_id: impl Into<String>) -> Self {
        self.supervisor_id = Some(supervisor_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }
}

// Declared low to high so the derived Ord ranks Outstanding highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CategoryLabel {
    #[serde(rename = "Kurang")]
    Poor,
    #[serde(rename = "Cukup")]
    Fair,
    #[serde(rename = "Baik")]
    Good,
    #[serde(rename = "Sangat Baik")]
    VeryGood,
    #[serde(rename = "Istimewa")]
    Outstanding,
}

impl CategoryLabel {
    /// All labels, high to low.
    pub const ALL: [CategoryLabel; 5] = [
        CategoryLabel::Outstanding,
        CategoryLabel::VeryGood,
        CategoryLabel::Good,
        CategoryLabel::Fair,
        CategoryLabel::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryLabel::Outstanding => "Istimewa",
            CategoryLabel::VeryGood => "Sangat Baik",
            CategoryLabel::Good => "Baik",
            CategoryLabel::Fair => "Cukup",
            CategoryLabel::Poor => "Kurang",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            CategoryLabel::Outstanding => "Outstanding",
            CategoryLabel::VeryGood => "Very Good",
            CategoryLabel::Good => "Good",
            CategoryLabel::Fair => "Fair",
            CategoryLabel::Poor => "Poor",
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub skewness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub id: String,
    pub name: Option<String>,
    pub position: Option<String>,
    pub supervisor_id: Option<String>,
    pub score: f64,
    pub supervisor_score: Option<f64>,
    pub gap_vs_supervisor_pct: Option<f64>,
    pub gap_vs_corporate_pct: Option<f64>,
    pub category: Option<CategoryLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRef {
    pub id: String,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMembers {
    pub label: CategoryLabel,
    pub members: Vec<MemberRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: CategoryLabel,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub score: f64,
    pub density: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryBand {
    pub label: CategoryLabel,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub supervisor_id: String,
    pub supervisor_name: Option<String>,
    pub subordinate_ids: Vec<String>,
    pub stats: DistributionStats,
    pub members: Option<Vec<CategoryMembers>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub corporate: DistributionStats,
    pub records: Vec<ComparisonRecord>,
    pub breakdown: Vec<CategoryShare>,
    pub members: Vec<CategoryMembers>,
    pub groups: Vec<GroupDistribution>,
}

impl ComparisonReport {
    pub fn group(&self, supervisor_id: &str) -> Option<&GroupDistribution> {
        self.groups
            .iter()
            .find(|group| group.supervisor_id == supervisor_id)
    }
}
