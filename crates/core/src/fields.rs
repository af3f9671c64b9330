//! Form field vocabulary and the accumulated field map.
//!
//! Every answer the user gives is stored under a [`FieldKey`]. The key set is
//! fixed: seventeen fields spread over the four data-entry sections.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::section::Section;

/// Unique identifier for a wizard session (log correlation only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One field of the business plan form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    CompanyName,
    BusinessDescription,
    Mission,
    TargetMarket,
    MarketingStrategy,
    CustomerAcquisition,
    MarketingChannels,
    BudgetConsiderations,
    CompetitorOverview,
    CompetitiveAdvantages,
    MarketPositioning,
    UniqueValueProp,
    ExpectedCosts,
    FinancialStrategy,
    ProjectedSales,
    RevenueModel,
    FundingRequirements,
}

impl FieldKey {
    /// All keys, in form order.
    pub const ALL: [FieldKey; 17] = [
        FieldKey::CompanyName,
        FieldKey::BusinessDescription,
        FieldKey::Mission,
        FieldKey::TargetMarket,
        FieldKey::MarketingStrategy,
        FieldKey::CustomerAcquisition,
        FieldKey::MarketingChannels,
        FieldKey::BudgetConsiderations,
        FieldKey::CompetitorOverview,
        FieldKey::CompetitiveAdvantages,
        FieldKey::MarketPositioning,
        FieldKey::UniqueValueProp,
        FieldKey::ExpectedCosts,
        FieldKey::FinancialStrategy,
        FieldKey::ProjectedSales,
        FieldKey::RevenueModel,
        FieldKey::FundingRequirements,
    ];

    /// The snake_case key used in answer files and prompt slots.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::CompanyName => "company_name",
            FieldKey::BusinessDescription => "business_description",
            FieldKey::Mission => "mission",
            FieldKey::TargetMarket => "target_market",
            FieldKey::MarketingStrategy => "marketing_strategy",
            FieldKey::CustomerAcquisition => "customer_acquisition",
            FieldKey::MarketingChannels => "marketing_channels",
            FieldKey::BudgetConsiderations => "budget_considerations",
            FieldKey::CompetitorOverview => "competitor_overview",
            FieldKey::CompetitiveAdvantages => "competitive_advantages",
            FieldKey::MarketPositioning => "market_positioning",
            FieldKey::UniqueValueProp => "unique_value_prop",
            FieldKey::ExpectedCosts => "expected_costs",
            FieldKey::FinancialStrategy => "financial_strategy",
            FieldKey::ProjectedSales => "projected_sales",
            FieldKey::RevenueModel => "revenue_model",
            FieldKey::FundingRequirements => "funding_requirements",
        }
    }

    /// Title-cased key, as used in "<Label> is required".
    pub fn label(&self) -> String {
        title_case(self.as_str())
    }

    /// The question shown to the user for this field.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            FieldKey::CompanyName => "Company Name",
            FieldKey::BusinessDescription => "Business/Product Description",
            FieldKey::Mission => "Mission Statement",
            FieldKey::TargetMarket => "Target Market",
            FieldKey::MarketingStrategy => "Marketing Strategy",
            FieldKey::CustomerAcquisition => "Customer Acquisition Methods",
            FieldKey::MarketingChannels => "Marketing Channels",
            FieldKey::BudgetConsiderations => "Budget Considerations",
            FieldKey::CompetitorOverview => "Competitor Overview",
            FieldKey::CompetitiveAdvantages => "Competitive Advantages",
            FieldKey::MarketPositioning => "Market Positioning",
            FieldKey::UniqueValueProp => "Unique Value Proposition",
            FieldKey::ExpectedCosts => "Expected Costs",
            FieldKey::FinancialStrategy => "Financial Strategy",
            FieldKey::ProjectedSales => "Projected Sales",
            FieldKey::RevenueModel => "Revenue Model",
            FieldKey::FundingRequirements => "Funding Requirements",
        }
    }

    /// Short help text shown under the question.
    pub fn hint(&self) -> &'static str {
        match self {
            FieldKey::CompanyName => "Enter your company or business name",
            FieldKey::BusinessDescription => {
                "Describe what your business does or what product/service you offer"
            }
            FieldKey::Mission => "What is your company's mission and purpose?",
            FieldKey::TargetMarket => "Describe your ideal customers and target audience",
            FieldKey::MarketingStrategy => "Describe your overall marketing approach and strategy",
            FieldKey::CustomerAcquisition => "How will you acquire new customers?",
            FieldKey::MarketingChannels => "Which channels will you use for marketing?",
            FieldKey::BudgetConsiderations => {
                "What's your marketing budget and how will you allocate it?"
            }
            FieldKey::CompetitorOverview => {
                "Describe your main competitors and the competitive landscape"
            }
            FieldKey::CompetitiveAdvantages => "What advantages do you have over competitors?",
            FieldKey::MarketPositioning => "How do you position yourself in the market?",
            FieldKey::UniqueValueProp => "What unique value do you provide to customers?",
            FieldKey::ExpectedCosts => "What are your expected startup and operational costs?",
            FieldKey::FinancialStrategy => "How will you manage your finances and cash flow?",
            FieldKey::ProjectedSales => "What are your sales projections for the first year?",
            FieldKey::RevenueModel => "How will you generate revenue?",
            FieldKey::FundingRequirements => "Do you need funding? If so, how much and for what?",
        }
    }

    /// Sample answer, used for the onboarding example file.
    pub fn example(&self) -> &'static str {
        match self {
            FieldKey::CompanyName => "Acme Fitness Co",
            FieldKey::BusinessDescription => {
                "A mobile app offering personalized workout plans and nutrition guidance"
            }
            FieldKey::Mission => {
                "Empower busy professionals to stay healthy through simple daily routines"
            }
            FieldKey::TargetMarket => {
                "Professionals aged 25-45 in urban areas seeking convenient home workouts"
            }
            FieldKey::MarketingStrategy => {
                "Content marketing with short workout videos and referral incentives"
            }
            FieldKey::CustomerAcquisition => "Free 14-day trial, partnerships with gyms",
            FieldKey::MarketingChannels => "Instagram, TikTok, YouTube, email newsletters",
            FieldKey::BudgetConsiderations => "$2k/month split 60% ads, 40% creators",
            FieldKey::CompetitorOverview => {
                "FitApp, HealthPro - both offer generic plans and limited coaching"
            }
            FieldKey::CompetitiveAdvantages => {
                "Personalized plans, AI-driven coaching, progress tracking dashboard"
            }
            FieldKey::MarketPositioning => {
                "Premium yet affordable alternative focusing on accountability"
            }
            FieldKey::UniqueValueProp => "Daily micro-workouts tailored to schedule and equipment",
            FieldKey::ExpectedCosts => "Development $8k, hosting $200/mo, marketing $2k/mo",
            FieldKey::FinancialStrategy => {
                "Keep CAC:LTV at 1:3, reinvest 30% of profits into growth"
            }
            FieldKey::ProjectedSales => "500 subscriptions in year 1 at $15/month",
            FieldKey::RevenueModel => "Monthly subscription with annual discount",
            FieldKey::FundingRequirements => "$50k to cover 6 months runway and marketing tests",
        }
    }

    /// The data-entry section this field is rendered on.
    pub fn section(&self) -> Section {
        match self {
            FieldKey::CompanyName
            | FieldKey::BusinessDescription
            | FieldKey::Mission
            | FieldKey::TargetMarket => Section::CompanyOverview,
            FieldKey::MarketingStrategy
            | FieldKey::CustomerAcquisition
            | FieldKey::MarketingChannels
            | FieldKey::BudgetConsiderations => Section::MarketingDetails,
            FieldKey::CompetitorOverview
            | FieldKey::CompetitiveAdvantages
            | FieldKey::MarketPositioning
            | FieldKey::UniqueValueProp => Section::CompetitorInfo,
            FieldKey::ExpectedCosts
            | FieldKey::FinancialStrategy
            | FieldKey::ProjectedSales
            | FieldKey::RevenueModel
            | FieldKey::FundingRequirements => Section::FinancialOverview,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown field key '{s}'"))
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Title-case a snake_case identifier: underscores become spaces, the first
/// letter of each word is upper-cased and the rest lower-cased.
pub fn title_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut in_word = false;
    for c in ident.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// The accumulated free-text answers of one session.
///
/// Absent keys read as the empty string. Values are stored verbatim;
/// trimming is the validator's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    values: BTreeMap<FieldKey, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value for `key`, or `""` if it was never set.
    pub fn get(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Overwrite the value for `key`.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Apply a batch of values. Keys not in the batch keep their value.
    pub fn merge<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (FieldKey, V)>,
        V: Into<String>,
    {
        for (key, value) in values {
            self.set(key, value);
        }
    }

    /// Whether `key` is absent or whitespace-only.
    pub fn is_blank(&self, key: FieldKey) -> bool {
        self.get(key).trim().is_empty()
    }

    /// Trimmed company name, if one was entered.
    pub fn company_name(&self) -> Option<&str> {
        let name = self.get(FieldKey::CompanyName).trim();
        (!name.is_empty()).then_some(name)
    }

    /// Iterate the stored values in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: Into<String>> FromIterator<(FieldKey, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (FieldKey, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        map.merge(iter);
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let plain: BTreeMap<&str, &str> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        plain.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let plain = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut map = FieldMap::new();
        for (key, value) in plain {
            let key: FieldKey = key.parse().map_err(D::Error::custom)?;
            map.set(key, value);
        }
        Ok(map)
    }
}
