//! Wizard sections and the required-field table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::fields::FieldKey;

/// One step of the five-step wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    CompanyOverview,
    MarketingDetails,
    CompetitorInfo,
    FinancialOverview,
    GeneratePlan,
}

impl Section {
    /// All sections in wizard order.
    pub const ALL: [Section; 5] = [
        Section::CompanyOverview,
        Section::MarketingDetails,
        Section::CompetitorInfo,
        Section::FinancialOverview,
        Section::GeneratePlan,
    ];

    pub const FIRST_STEP: u8 = 1;
    pub const LAST_STEP: u8 = 5;

    /// Section for a 1-based step index.
    pub fn from_step(step: u8) -> Option<Section> {
        match step {
            1 => Some(Section::CompanyOverview),
            2 => Some(Section::MarketingDetails),
            3 => Some(Section::CompetitorInfo),
            4 => Some(Section::FinancialOverview),
            5 => Some(Section::GeneratePlan),
            _ => None,
        }
    }

    /// 1-based step index.
    pub fn step(&self) -> u8 {
        match self {
            Section::CompanyOverview => 1,
            Section::MarketingDetails => 2,
            Section::CompetitorInfo => 3,
            Section::FinancialOverview => 4,
            Section::GeneratePlan => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Section::CompanyOverview => "company_overview",
            Section::MarketingDetails => "marketing_details",
            Section::CompetitorInfo => "competitor_info",
            Section::FinancialOverview => "financial_overview",
            Section::GeneratePlan => "generate_plan",
        }
    }

    /// Display title for headers and the progress list.
    pub fn title(&self) -> &'static str {
        match self {
            Section::CompanyOverview => "Company Overview",
            Section::MarketingDetails => "Marketing Details",
            Section::CompetitorInfo => "Competitor Information",
            Section::FinancialOverview => "Financial Overview",
            Section::GeneratePlan => "Generate Plan",
        }
    }

    /// One-line intro shown above the section's fields.
    pub fn intro(&self) -> &'static str {
        match self {
            Section::CompanyOverview => "Tell us about your business and what makes it unique.",
            Section::MarketingDetails => "How will you attract and retain customers?",
            Section::CompetitorInfo => "Who are your competitors and what makes you different?",
            Section::FinancialOverview => "What are your financial projections and strategy?",
            Section::GeneratePlan => "Review your answers and generate the plan.",
        }
    }

    /// Fields rendered on this step, in form order. Empty for `GeneratePlan`.
    pub fn fields(&self) -> &'static [FieldKey] {
        match self {
            Section::CompanyOverview => &[
                FieldKey::CompanyName,
                FieldKey::BusinessDescription,
                FieldKey::Mission,
                FieldKey::TargetMarket,
            ],
            Section::MarketingDetails => &[
                FieldKey::MarketingStrategy,
                FieldKey::CustomerAcquisition,
                FieldKey::MarketingChannels,
                FieldKey::BudgetConsiderations,
            ],
            Section::CompetitorInfo => &[
                FieldKey::CompetitorOverview,
                FieldKey::CompetitiveAdvantages,
                FieldKey::MarketPositioning,
                FieldKey::UniqueValueProp,
            ],
            Section::FinancialOverview => &[
                FieldKey::ExpectedCosts,
                FieldKey::FinancialStrategy,
                FieldKey::ProjectedSales,
                FieldKey::RevenueModel,
                FieldKey::FundingRequirements,
            ],
            Section::GeneratePlan => &[],
        }
    }

    pub fn next(&self) -> Option<Section> {
        Section::from_step(self.step() + 1)
    }

    pub fn previous(&self) -> Option<Section> {
        self.step().checked_sub(1).and_then(Section::from_step)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Section::GeneratePlan
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .find(|sec| sec.name() == s)
            .copied()
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Which fields must be non-blank for each section to count as complete.
///
/// `GeneratePlan` never has an entry: it is complete when every other
/// section is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFieldSpec {
    required: BTreeMap<Section, Vec<FieldKey>>,
}

impl RequiredFieldSpec {
    /// Build a table from explicit entries.
    pub fn new(
        entries: impl IntoIterator<Item = (Section, Vec<FieldKey>)>,
    ) -> Result<Self, String> {
        let mut required = BTreeMap::new();
        for (section, fields) in entries {
            if section.is_terminal() {
                return Err(format!("section '{section}' cannot have required fields"));
            }
            required.insert(section, fields);
        }
        Ok(Self { required })
    }

    /// Build a table from snake_case names, as found in config files.
    pub fn from_names(entries: &BTreeMap<String, Vec<String>>) -> Result<Self, String> {
        let mut parsed = Vec::with_capacity(entries.len());
        for (section, fields) in entries {
            let section: Section = section.parse()?;
            let fields = fields
                .iter()
                .map(|f| f.parse::<FieldKey>())
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push((section, fields));
        }
        Self::new(parsed)
    }

    /// Required fields for `section`, in reporting order.
    pub fn fields_for(&self, section: Section) -> &[FieldKey] {
        self.required.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sections that have an entry, in wizard order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.required.keys().copied()
    }

    /// Total number of required fields across all sections.
    pub fn total(&self) -> usize {
        self.required.values().map(Vec::len).sum()
    }

    pub fn is_required(&self, key: FieldKey) -> bool {
        self.required.values().any(|fields| fields.contains(&key))
    }
}

impl Default for RequiredFieldSpec {
    fn default() -> Self {
        let mut required = BTreeMap::new();
        required.insert(
            Section::CompanyOverview,
            vec![
                FieldKey::CompanyName,
                FieldKey::BusinessDescription,
                FieldKey::Mission,
                FieldKey::TargetMarket,
            ],
        );
        required.insert(Section::MarketingDetails, vec![FieldKey::MarketingStrategy]);
        required.insert(
            Section::CompetitorInfo,
            vec![FieldKey::CompetitorOverview, FieldKey::CompetitiveAdvantages],
        );
        required.insert(
            Section::FinancialOverview,
            vec![
                FieldKey::ExpectedCosts,
                FieldKey::FinancialStrategy,
                FieldKey::ProjectedSales,
            ],
        );
        Self { required }
    }
}
